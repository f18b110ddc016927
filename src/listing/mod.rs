//! Listing pipeline: predicate → ordering → windowing
//!
//! A listing type (posts, users) is described once by a static
//! [`ListingSpec`]: which fields the free-text search reads, which
//! categorical selectors exist, and the closed table of sort keys. The
//! stages interpret those descriptors uniformly, so adding a listing type
//! never adds filtering or sorting code.
//!
//! Every stage is a pure function of its input view and the current state;
//! [`Listing`] holds that state and recomputes derived views on read.

pub mod container;
pub mod ordering;
pub mod predicate;
pub mod session;
pub mod window;

pub use container::Listing;
pub use ordering::{Direction, SortKey};
pub use predicate::{FilterState, MatchKind, PredicateDescriptor};
pub use session::{FetchTicket, ListingSession, LoadFailure, LoadOutcome, LoadState};

use crate::core::Entity;

/// Declarative description of one listing type
#[derive(Debug)]
pub struct ListingSpec {
    /// Name used in logs
    pub name: &'static str,

    /// Fields read by the free-text search
    pub search_fields: &'static [&'static str],

    /// Categorical selectors this listing accepts
    pub predicates: &'static [PredicateDescriptor],

    /// Closed set of sort keys
    pub sort_keys: &'static [SortKey],

    /// Identifier of the default sort key
    pub default_sort: &'static str,

    /// Page size used when none is configured
    pub default_limit: usize,
}

impl ListingSpec {
    /// Find the predicate descriptor for a selector name
    pub fn predicate(&self, selector: &str) -> Option<&PredicateDescriptor> {
        self.predicates.iter().find(|p| p.selector == selector)
    }

    /// Resolve a sort-key identifier, falling back to the default
    pub fn sort_key(&self, id: &str) -> Option<&SortKey> {
        ordering::resolve(self.sort_keys, id, self.default_sort)
    }
}

/// An entity type with a declared listing
pub trait Listable: Entity {
    /// The listing descriptor for this type
    fn listing() -> &'static ListingSpec;
}
