//! Field value types used by listing descriptors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value read from an entity by name
///
/// Listing descriptors never touch concrete struct fields; they ask the
/// entity for a named [`FieldValue`] and interpret it uniformly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    Boolean(bool),
}

impl FieldValue {
    /// Get the value as a string slice if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Case-insensitive substring test
    ///
    /// `needle` must already be lowercased. Lists match when any element
    /// contains the needle; non-textual values never match.
    pub fn contains_folded(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.to_lowercase().contains(needle),
            FieldValue::List(items) => items.iter().any(|s| s.to_lowercase().contains(needle)),
            _ => false,
        }
    }

    /// Exact string equality
    pub fn equals(&self, selector: &str) -> bool {
        match self {
            FieldValue::Text(s) => s == selector,
            FieldValue::Boolean(b) => selector.parse::<bool>().is_ok_and(|v| v == *b),
            FieldValue::Integer(i) => selector.parse::<i64>().is_ok_and(|v| v == *i),
            _ => false,
        }
    }

    /// Membership test; scalar text falls back to equality
    pub fn has_member(&self, selector: &str) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|s| s == selector),
            other => other.equals(selector),
        }
    }
}

/// How two field values of the same sort key are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// Integer comparison
    Numeric,
    /// Timestamp comparison
    Chronological,
    /// Human-facing text: case-folded first, raw code points as tiebreak
    Locale,
    /// Plain code point comparison
    Ordinal,
}

impl Collation {
    /// Compare two values under this collation
    ///
    /// Missing values, and values of a type this collation does not read,
    /// are replaced by [`Collation::missing`] so that they behave as the
    /// minimum of the domain.
    pub fn compare(self, a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        let fallback = self.missing();
        let a = a.filter(|v| self.accepts(v)).unwrap_or(&fallback);
        let b = b.filter(|v| self.accepts(v)).unwrap_or(&fallback);

        match (self, a, b) {
            (_, FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (_, FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (Collation::Locale, FieldValue::Text(a), FieldValue::Text(b)) => locale_compare(a, b),
            (_, FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Whether this collation reads `value`
    fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Collation::Numeric, FieldValue::Integer(_))
                | (Collation::Chronological, FieldValue::Timestamp(_))
                | (Collation::Locale | Collation::Ordinal, FieldValue::Text(_))
        )
    }

    /// The value a missing field is treated as
    pub fn missing(self) -> FieldValue {
        match self {
            Collation::Numeric => FieldValue::Integer(0),
            Collation::Chronological => FieldValue::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
            Collation::Locale | Collation::Ordinal => FieldValue::Text(String::new()),
        }
    }
}

/// Case-insensitive comparison with a deterministic tiebreak
fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_folded_text() {
        let value = FieldValue::Text("Hello Rust".to_string());
        assert!(value.contains_folded("rust"));
        assert!(!value.contains_folded("go"));
    }

    #[test]
    fn test_contains_folded_list() {
        let value = FieldValue::List(vec!["Vue.js".to_string(), "TypeScript".to_string()]);
        assert!(value.contains_folded("script"));
        assert!(!value.contains_folded("python"));
    }

    #[test]
    fn test_non_text_never_contains() {
        assert!(!FieldValue::Integer(42).contains_folded("42"));
        assert!(!FieldValue::Boolean(true).contains_folded("true"));
    }

    #[test]
    fn test_equals_and_membership() {
        let category = FieldValue::Text("技术".to_string());
        assert!(category.equals("技术"));
        assert!(!category.equals("设计"));

        let tags = FieldValue::List(vec!["a".to_string(), "b".to_string()]);
        assert!(tags.has_member("b"));
        assert!(!tags.has_member("c"));
        assert!(!tags.equals("a"));

        assert!(FieldValue::Boolean(true).equals("true"));
        assert!(FieldValue::Integer(7).has_member("7"));
    }

    #[test]
    fn test_missing_date_compares_as_earliest() {
        let now = FieldValue::Timestamp(Utc::now());
        assert_eq!(
            Collation::Chronological.compare(None, Some(&now)),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_number_compares_as_zero() {
        let zero = FieldValue::Integer(0);
        assert_eq!(Collation::Numeric.compare(None, Some(&zero)), Ordering::Equal);
        assert_eq!(Collation::Numeric.missing(), zero);
    }

    #[test]
    fn test_mistyped_value_compares_as_missing() {
        let text = FieldValue::Text("12".to_string());
        let zero = FieldValue::Integer(0);
        assert_eq!(Collation::Numeric.compare(Some(&text), Some(&zero)), Ordering::Equal);

        let empty = FieldValue::Text(String::new());
        assert_eq!(Collation::Ordinal.compare(None, Some(&empty)), Ordering::Equal);
        assert_eq!(
            Collation::Locale.compare(Some(&FieldValue::Integer(3)), Some(&empty)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_locale_is_case_insensitive_first() {
        let lower = FieldValue::Text("apple".to_string());
        let upper = FieldValue::Text("Banana".to_string());
        assert_eq!(
            Collation::Locale.compare(Some(&lower), Some(&upper)),
            Ordering::Less
        );
        // Ordinal puts uppercase first
        assert_eq!(
            Collation::Ordinal.compare(Some(&lower), Some(&upper)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&FieldValue::Integer(3)).expect("serialize");
        assert_eq!(json, "3");
        let restored: FieldValue = serde_json::from_str(r#"["x","y"]"#).expect("deserialize");
        assert_eq!(restored, FieldValue::List(vec!["x".into(), "y".into()]));
    }
}
