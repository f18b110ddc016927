//! # blogflow
//!
//! Listing core and HTTP API for a personal blog.
//!
//! ## Features
//!
//! - **Declarative listings**: each listing type (posts, users) is described
//!   once by a static [`ListingSpec`](listing::ListingSpec); search,
//!   categorical filters and sort keys are interpreted uniformly
//! - **Deterministic pipeline**: filter → stable sort → window, recomputed
//!   from state on every read
//! - **Stale-load protection**: async reloads carry generation tickets, only
//!   the latest one is applied
//! - **Pluggable persistence**: `DataService` over an in-memory collection or
//!   a JSON blob in any `KeyValueStore`
//! - **HTTP API**: axum routes for listings, post authoring, mock auth,
//!   analytics and contact
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blogflow::prelude::*;
//!
//! let mut posts = Listing::<Post>::from_entities(sample_posts(), 12);
//! posts.set_category_filter("技术");
//! posts.set_sort_by("title");
//!
//! let page = posts.view();
//! println!("{} of {} posts", page.items.len(), page.pagination.total);
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod listing;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BlogError, Collation, DataService, Entity, FieldValue, KeyValueStore, Page,
        PaginationMeta, Patchable, QueryParams, Result, render_rich_text,
        auth::{AuthDirectory, AuthUser, Role, SessionRegistry},
    };

    // === Listing ===
    pub use crate::listing::{
        Direction, FetchTicket, FilterState, Listable, Listing, ListingSession, ListingSpec,
        LoadFailure, LoadOutcome, LoadState, MatchKind, PredicateDescriptor, SortKey,
    };

    // === Entities ===
    pub use crate::entities::{
        FollowSet, NewPost, Post, PostPatch, PublicUser, UserPatch,
        post::sample_posts,
        user::sample_users,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryDataService, InMemoryKeyValueStore, KvDataService};

    // === Server ===
    pub use crate::config::AppConfig;
    pub use crate::server::{AppState, ServerBuilder};
}
