//! Predicate stage

use crate::core::Entity;
use crate::listing::ListingSpec;
use std::collections::BTreeMap;

/// How a categorical selector is matched against a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Field value equals the selector
    Equals,
    /// Field value collection contains the selector
    Contains,
}

/// A categorical filter a listing accepts
#[derive(Debug, Clone, Copy)]
pub struct PredicateDescriptor {
    /// Selector name (`category`, `tag`, `role`)
    pub selector: &'static str,
    /// Entity field the selector is compared to
    pub field: &'static str,
    pub kind: MatchKind,
}

impl PredicateDescriptor {
    /// Evaluate against one entity; absent fields never match
    pub fn matches<T: Entity>(&self, entity: &T, selector: &str) -> bool {
        let Some(value) = entity.field(self.field) else {
            return false;
        };
        match self.kind {
            MatchKind::Equals => value.equals(selector),
            MatchKind::Contains => value.has_member(selector),
        }
    }
}

/// Current search query and selector values
///
/// Empty strings mean "not active".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub selectors: BTreeMap<&'static str, String>,
}

impl FilterState {
    /// Value of a selector, empty when unset
    pub fn selector(&self, name: &str) -> &str {
        self.selectors.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether any predicate is active
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.selectors.values().any(|v| !v.is_empty())
    }
}

/// Case-insensitive search across a listing's search fields
pub fn matches_search<T: Entity>(entity: &T, fields: &[&str], folded_query: &str) -> bool {
    fields.iter().any(|field| {
        entity
            .field(field)
            .is_some_and(|value| value.contains_folded(folded_query))
    })
}

/// Keep the entities passing every active predicate, in input order
pub fn apply_filters<'a, T: Entity>(
    entities: &'a [T],
    spec: &ListingSpec,
    state: &FilterState,
) -> Vec<&'a T> {
    let folded = state.search.to_lowercase();
    let active: Vec<(&PredicateDescriptor, &str)> = spec
        .predicates
        .iter()
        .map(|p| (p, state.selector(p.selector)))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    entities
        .iter()
        .filter(|e| folded.is_empty() || matches_search(*e, spec.search_fields, &folded))
        .filter(|e| active.iter().all(|(p, value)| p.matches(*e, value)))
        .collect()
}
