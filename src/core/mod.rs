//! Core module containing fundamental traits and types for the crate

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod render;
pub mod service;
pub mod store;
pub mod text;

pub use auth::{AuthDirectory, AuthUser, Role, SessionRegistry};
pub use entity::Entity;
pub use error::{BlogError, Result};
pub use field::{Collation, FieldValue};
pub use query::{Page, PaginationMeta, QueryParams};
pub use render::render_rich_text;
pub use service::{DataService, Patchable};
pub use store::KeyValueStore;
