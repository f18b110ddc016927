//! HTTP surface for the blog
//!
//! `ServerBuilder` wires services into an axum router that exposes:
//! - the post and user listings, backed by the listing pipeline
//! - post authoring behind an admin bearer token
//! - mock auth, analytics and contact endpoints
//! - `/health` and `/healthz`

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_api_routes;
