//! Service trait for the persistence boundary

use crate::core::entity::Entity;
use crate::core::error::Result;
use async_trait::async_trait;

/// An entity that accepts partial updates
pub trait Patchable: Entity {
    /// Partial update payload; absent fields leave the entity untouched
    type Patch: Send + 'static;

    /// Merge a patch into this entity
    ///
    /// Implementations never change the identity.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Service trait for managing entities of one type
///
/// This is the boundary the listing pipeline loads from. Implementations
/// fail closed: a lookup miss is `Ok(None)`, a mutation against a missing
/// id is `EntityError::NotFound` and leaves the stored collection as it was.
#[async_trait]
pub trait DataService<T: Patchable>: Send + Sync {
    /// Load the full candidate set, in storage order
    async fn list(&self) -> Result<Vec<T>>;

    /// Get an entity by id
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Create a new entity and return the persisted record
    async fn create(&self, entity: T) -> Result<T>;

    /// Apply a partial update and return the persisted record
    async fn update(&self, id: &str, patch: T::Patch) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    #[derive(Clone, Debug)]
    struct Counter {
        id: String,
        value: i64,
    }

    impl Entity for Counter {
        fn resource_name() -> &'static str {
            "counters"
        }

        fn resource_name_singular() -> &'static str {
            "counter"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            (name == "value").then_some(FieldValue::Integer(self.value))
        }
    }

    impl Patchable for Counter {
        type Patch = Option<i64>;

        fn apply_patch(&mut self, patch: Self::Patch) {
            if let Some(value) = patch {
                self.value = value;
            }
        }
    }

    // The trait can be used in generic contexts
    #[allow(dead_code)]
    async fn generic_create<T, S>(service: &S, entity: T) -> Result<T>
    where
        T: Patchable,
        S: DataService<T>,
    {
        service.create(entity).await
    }

    #[test]
    fn test_patch_keeps_identity() {
        let mut counter = Counter {
            id: "c1".into(),
            value: 1,
        };
        counter.apply_patch(Some(5));
        counter.apply_patch(None);
        assert_eq!(counter.id(), "c1");
        assert_eq!(counter.field("value"), Some(FieldValue::Integer(5)));
    }
}
