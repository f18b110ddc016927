//! Ordering stage

use crate::core::{Collation, Entity, FieldValue};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One entry of a listing's closed sort-key table
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    /// Identifier clients send, e.g. `publishedAt`
    pub id: &'static str,
    /// Entity field compared
    pub field: &'static str,
    pub direction: Direction,
    /// Comparison rule; also defines the value a missing field takes
    pub collation: Collation,
}

impl SortKey {
    /// Compare two already-extracted field values
    pub fn compare(&self, a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        let ord = self.collation.compare(a, b);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Resolve `id` in `keys`; unknown identifiers fall back to `default`
pub fn resolve<'a>(keys: &'a [SortKey], id: &str, default: &str) -> Option<&'a SortKey> {
    keys.iter()
        .find(|k| k.id == id)
        .or_else(|| keys.iter().find(|k| k.id == default))
}

/// Stable sort of a view into a new vector; the input is left as is
pub fn apply_sort<'a, T: Entity>(view: &[&'a T], key: &SortKey) -> Vec<&'a T> {
    let mut decorated: Vec<(Option<FieldValue>, &'a T)> =
        view.iter().map(|e| (e.field(key.field), *e)).collect();

    // slice::sort_by is stable
    decorated.sort_by(|(a, _), (b, _)| key.compare(a.as_ref(), b.as_ref()));

    decorated.into_iter().map(|(_, e)| e).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Row {
        id: &'static str,
        score: Option<i64>,
        name: &'static str,
    }

    impl Entity for Row {
        fn resource_name() -> &'static str {
            "rows"
        }

        fn resource_name_singular() -> &'static str {
            "row"
        }

        fn id(&self) -> &str {
            self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "score" => self.score.map(FieldValue::Integer),
                "name" => Some(FieldValue::Text(self.name.to_string())),
                _ => None,
            }
        }
    }

    const KEYS: &[SortKey] = &[
        SortKey {
            id: "score",
            field: "score",
            direction: Direction::Descending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "name",
            field: "name",
            direction: Direction::Ascending,
            collation: Collation::Locale,
        },
    ];

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "a",
                score: Some(1),
                name: "delta",
            },
            Row {
                id: "b",
                score: None,
                name: "Alpha",
            },
            Row {
                id: "c",
                score: Some(5),
                name: "charlie",
            },
            Row {
                id: "d",
                score: Some(1),
                name: "bravo",
            },
        ]
    }

    fn ids(view: &[&Row]) -> Vec<&'static str> {
        view.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_descending_numeric_missing_is_minimum() {
        let data = rows();
        let view: Vec<&Row> = data.iter().collect();
        let sorted = apply_sort(&view, &KEYS[0]);
        assert_eq!(ids(&sorted), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_equal_keys_keep_relative_order() {
        let data = rows();
        let view: Vec<&Row> = vec![&data[3], &data[0]];
        let sorted = apply_sort(&view, &KEYS[0]);
        assert_eq!(ids(&sorted), vec!["d", "a"]);
    }

    #[test]
    fn test_locale_ascending() {
        let data = rows();
        let view: Vec<&Row> = data.iter().collect();
        let sorted = apply_sort(&view, &KEYS[1]);
        assert_eq!(ids(&sorted), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_input_view_untouched() {
        let data = rows();
        let view: Vec<&Row> = data.iter().collect();
        let _ = apply_sort(&view, &KEYS[1]);
        assert_eq!(ids(&view), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unknown_key_falls_back_to_default() {
        assert_eq!(resolve(KEYS, "nope", "name").map(|k| k.id), Some("name"));
        assert_eq!(resolve(KEYS, "score", "name").map(|k| k.id), Some("score"));
        assert!(resolve(KEYS, "nope", "also-nope").is_none());
    }
}
