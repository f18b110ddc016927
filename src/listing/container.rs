//! State container for one listing

use crate::core::{Page, PaginationMeta};
use crate::listing::predicate::{self, FilterState};
use crate::listing::{Listable, ListingSpec, ordering, window};

/// Owns a listing's entity collection and its filter/sort/page state
///
/// Derived views (filtered, ordered, windowed) are recomputed on every read
/// from the current state, so a read always reflects the latest write.
///
/// Page-reset policy:
/// - every filter setter, `set_sort_by` and `reset_filters` reset the page
///   to 1 and recompute the pagination metadata
/// - `set_page` stores any page ≥ 1 without upper clamping
/// - `next_page` / `previous_page` move only when the flags allow it
/// - `replace_entities` keeps filters and page
#[derive(Debug, Clone)]
pub struct Listing<T: Listable> {
    spec: &'static ListingSpec,
    entities: Vec<T>,
    filters: FilterState,
    sort_by: String,
    pagination: PaginationMeta,
}

impl<T: Listable> Listing<T> {
    /// Create an empty listing with the type's default page size
    pub fn new() -> Self {
        Self::with_limit(T::listing().default_limit)
    }

    /// Create an empty listing with a fixed page size
    pub fn with_limit(limit: usize) -> Self {
        let spec = T::listing();
        Self {
            spec,
            entities: Vec::new(),
            filters: FilterState::default(),
            sort_by: spec.default_sort.to_string(),
            pagination: PaginationMeta::new(1, limit, 0),
        }
    }

    /// Create a listing over an initial collection
    pub fn from_entities(entities: Vec<T>, limit: usize) -> Self {
        let mut listing = Self::with_limit(limit);
        listing.replace_entities(entities);
        listing
    }

    pub fn spec(&self) -> &'static ListingSpec {
        self.spec
    }

    /// The backing collection in load order
    pub fn entities(&self) -> &[T] {
        &self.entities
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    /// Current sort-key identifier as set (possibly unknown)
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn pagination(&self) -> PaginationMeta {
        self.pagination
    }

    pub fn page(&self) -> usize {
        self.pagination.page
    }

    pub fn limit(&self) -> usize {
        self.pagination.limit
    }

    // === Derived views ===

    /// Entities passing every active predicate, in collection order
    pub fn filtered(&self) -> Vec<&T> {
        predicate::apply_filters(&self.entities, self.spec, &self.filters)
    }

    /// Filtered view ordered by the current sort key
    pub fn ordered(&self) -> Vec<&T> {
        let filtered = self.filtered();
        match self.spec.sort_key(&self.sort_by) {
            Some(key) => ordering::apply_sort(&filtered, key),
            None => filtered,
        }
    }

    /// The current page and its metadata
    pub fn view(&self) -> Page<T> {
        let ordered = self.ordered();
        let (items, pagination) = window::window(&ordered, self.pagination.page, self.pagination.limit);
        Page {
            items: items.into_iter().cloned().collect(),
            pagination,
        }
    }

    // === Mutators ===

    /// Replace the search query
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filters.search = query.into();
        tracing::debug!(listing = self.spec.name, search = %self.filters.search, "search changed");
        self.reset_page();
    }

    /// Replace a categorical selector
    ///
    /// Returns `false` (and changes nothing) when this listing does not
    /// declare `selector`.
    pub fn set_filter(&mut self, selector: &str, value: impl Into<String>) -> bool {
        let Some(descriptor) = self.spec.predicate(selector) else {
            tracing::debug!(listing = self.spec.name, selector, "ignoring undeclared selector");
            return false;
        };
        let value = value.into();
        tracing::debug!(listing = self.spec.name, selector, value = %value, "filter changed");
        self.filters.selectors.insert(descriptor.selector, value);
        self.reset_page();
        true
    }

    pub fn set_category_filter(&mut self, category: impl Into<String>) -> bool {
        self.set_filter("category", category)
    }

    pub fn set_tag_filter(&mut self, tag: impl Into<String>) -> bool {
        self.set_filter("tag", tag)
    }

    pub fn set_role_filter(&mut self, role: impl Into<String>) -> bool {
        self.set_filter("role", role)
    }

    /// Replace the sort-key identifier
    ///
    /// Unknown identifiers are stored as given and read as the default
    /// order.
    pub fn set_sort_by(&mut self, key: impl Into<String>) {
        self.sort_by = key.into();
        tracing::debug!(listing = self.spec.name, sort = %self.sort_by, "sort changed");
        self.reset_page();
    }

    /// Set the page directly; 0 is stored as 1, no upper bound is applied
    pub fn set_page(&mut self, page: usize) {
        self.pagination = PaginationMeta::new(page.max(1), self.pagination.limit, self.total());
    }

    /// Advance one page if there is a next page
    pub fn next_page(&mut self) -> bool {
        match window::next_page(&self.pagination) {
            Some(page) => {
                self.set_page(page);
                true
            }
            None => false,
        }
    }

    /// Go back one page if there is a previous page
    pub fn previous_page(&mut self) -> bool {
        match window::previous_page(&self.pagination) {
            Some(page) => {
                self.set_page(page);
                true
            }
            None => false,
        }
    }

    /// Restore search, selectors and sort to their defaults
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.sort_by = self.spec.default_sort.to_string();
        tracing::debug!(listing = self.spec.name, "filters reset");
        self.reset_page();
    }

    /// Wholesale replace of the backing collection
    pub fn replace_entities(&mut self, entities: Vec<T>) {
        tracing::debug!(listing = self.spec.name, count = entities.len(), "collection replaced");
        self.entities = entities;
        self.recompute();
    }

    /// Patch one entity in place by id, then recompute pagination
    ///
    /// Returns `false` when no entity has `id`.
    pub fn update_entity(&mut self, id: &str, patch: impl FnOnce(&mut T)) -> bool {
        let Some(entity) = self.entities.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        patch(entity);
        tracing::debug!(listing = self.spec.name, id, "entity updated");
        self.recompute();
        true
    }

    fn total(&self) -> usize {
        self.filtered().len()
    }

    fn reset_page(&mut self) {
        self.pagination = PaginationMeta::new(1, self.pagination.limit, self.total());
    }

    fn recompute(&mut self) {
        self.pagination = PaginationMeta::new(self.pagination.page, self.pagination.limit, self.total());
    }
}

impl<T: Listable> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}
