//! Entity trait defining the abstraction every listed record implements

use crate::core::field::FieldValue;

/// Base trait for all records held by a listing.
///
/// An entity has:
/// - a stable, non-empty string identity that never changes once created
/// - named fields readable as [`FieldValue`]s, used by predicate and
///   ordering descriptors
///
/// Absent fields return `None`; descriptors treat that as non-matching
/// (predicates) or as the collation minimum (ordering).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "posts", "users")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "post", "user")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> &str;

    /// Get the value of a specific field by name
    fn field(&self, name: &str) -> Option<FieldValue>;
}
