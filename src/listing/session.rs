//! Asynchronous loading around a listing
//!
//! Loads are not serialised. Each `begin_load` hands out a ticket carrying a
//! generation number; only the completion holding the latest ticket is
//! applied, earlier ones are reported as stale and dropped.

use crate::core::{BlogError, DataService, Page, Patchable, Result};
use serde::Serialize;
use crate::listing::{Listable, Listing};

/// Load lifecycle of a listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(LoadFailure),
}

/// Why the last applied load failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Error code of the underlying [`BlogError`]
    pub code: &'static str,
    pub message: String,
}

impl From<&BlogError> for LoadFailure {
    fn from(err: &BlogError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Token identifying one in-flight load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced
    Applied { count: usize },
    /// A newer load had started; the result was discarded
    Stale,
    /// The load failed; the collection is now empty
    Failed(LoadFailure),
}

/// A [`Listing`] plus its load state
#[derive(Debug, Clone)]
pub struct ListingSession<T: Listable> {
    listing: Listing<T>,
    state: LoadState,
    generation: u64,
}

impl<T: Listable> ListingSession<T> {
    pub fn new(listing: Listing<T>) -> Self {
        Self {
            listing,
            state: LoadState::Idle,
            generation: 0,
        }
    }

    pub fn listing(&self) -> &Listing<T> {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing<T> {
        &mut self.listing
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Current page of the underlying listing
    pub fn view(&self) -> Page<T> {
        self.listing.view()
    }

    /// Mark a load as started and return its ticket
    pub fn begin_load(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        tracing::debug!(
            listing = self.listing.spec().name,
            generation = self.generation,
            "load started"
        );
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of a load started with `ticket`
    ///
    /// A failure degrades to an empty collection with the error recorded in
    /// the state; it is never propagated.
    pub fn complete_load(&mut self, ticket: FetchTicket, result: Result<Vec<T>>) -> LoadOutcome {
        let name = self.listing.spec().name;
        if ticket.generation != self.generation {
            tracing::debug!(
                listing = name,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(entities) => {
                let count = entities.len();
                self.listing.replace_entities(entities);
                self.state = LoadState::Loaded;
                tracing::debug!(listing = name, count, "load applied");
                LoadOutcome::Applied { count }
            }
            Err(err) => {
                let failure = LoadFailure::from(&err);
                tracing::warn!(
                    listing = name,
                    code = failure.code,
                    error = %failure.message,
                    "load failed, showing empty listing"
                );
                self.listing.replace_entities(Vec::new());
                self.state = LoadState::Failed(failure.clone());
                LoadOutcome::Failed(failure)
            }
        }
    }

    /// Load the full collection from `service` and apply it
    pub async fn refresh<S>(&mut self, service: &S) -> LoadOutcome
    where
        T: Patchable,
        S: DataService<T> + ?Sized,
    {
        let ticket = self.begin_load();
        let result = service.list().await;
        self.complete_load(ticket, result)
    }

    /// Failure of the last applied load, if it failed
    pub fn last_failure(&self) -> Option<&LoadFailure> {
        match &self.state {
            LoadState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use crate::core::{Collation, Entity, FieldValue};
    use crate::listing::{Direction, ListingSpec, SortKey};
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: String,
        order: i64,
    }

    impl Entity for Note {
        fn resource_name() -> &'static str {
            "notes"
        }

        fn resource_name_singular() -> &'static str {
            "note"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            (name == "order").then_some(FieldValue::Integer(self.order))
        }
    }

    impl Patchable for Note {
        type Patch = ();

        fn apply_patch(&mut self, _patch: ()) {}
    }

    static NOTES: ListingSpec = ListingSpec {
        name: "notes",
        search_fields: &[],
        predicates: &[],
        sort_keys: &[SortKey {
            id: "order",
            field: "order",
            direction: Direction::Ascending,
            collation: Collation::Numeric,
        }],
        default_sort: "order",
        default_limit: 10,
    };

    impl Listable for Note {
        fn listing() -> &'static ListingSpec {
            &NOTES
        }
    }

    fn notes(n: i64) -> Vec<Note> {
        (0..n)
            .map(|i| Note {
                id: format!("n{i}"),
                order: i,
            })
            .collect()
    }

    struct Fixed(Result<Vec<Note>>);

    #[async_trait]
    impl DataService<Note> for Fixed {
        async fn list(&self) -> Result<Vec<Note>> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(BlogError::Internal(e.to_string())),
            }
        }

        async fn get(&self, _id: &str) -> Result<Option<Note>> {
            Ok(None)
        }

        async fn create(&self, entity: Note) -> Result<Note> {
            Ok(entity)
        }

        async fn update(&self, id: &str, _patch: ()) -> Result<Note> {
            Err(BlogError::not_found("note", id))
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut session = ListingSession::new(Listing::<Note>::new());
        let first = session.begin_load();
        let second = session.begin_load();
        assert!(session.is_loading());

        assert_eq!(
            session.complete_load(second, Ok(notes(2))),
            LoadOutcome::Applied { count: 2 }
        );
        assert_eq!(session.complete_load(first, Ok(notes(5))), LoadOutcome::Stale);
        assert_eq!(session.listing().entities().len(), 2);
        assert_eq!(session.state(), &LoadState::Loaded);
    }

    #[test]
    fn test_failure_degrades_to_empty() {
        let mut session = ListingSession::new(Listing::from_entities(notes(3), 10));
        let ticket = session.begin_load();
        let outcome = session.complete_load(
            ticket,
            Err(StorageError::Backend("disk gone".into()).into()),
        );
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(session.view().items.is_empty());
        assert_eq!(session.last_failure().map(|f| f.code), Some("STORAGE_ERROR"));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failure_keeps_error_code() {
        let mut session = ListingSession::new(Listing::<Note>::new());
        let ticket = session.begin_load();
        let err = StorageError::Corrupt {
            key: "notes".into(),
            message: "expected value".into(),
        };
        let outcome = session.complete_load(ticket, Err(err.into()));

        let failure = session.last_failure().expect("failure recorded");
        assert_eq!(failure.code, "STORAGE_CORRUPT");
        assert!(failure.message.contains("notes"));
        assert_eq!(outcome, LoadOutcome::Failed(failure.clone()));
    }

    #[tokio::test]
    async fn test_refresh_from_service() {
        let service = Fixed(Ok(notes(4)));
        let mut session = ListingSession::new(Listing::new());
        let outcome = session.refresh(&service).await;
        assert_eq!(outcome, LoadOutcome::Applied { count: 4 });
        assert_eq!(session.view().pagination.total, 4);
    }

    #[tokio::test]
    async fn test_refresh_keeps_filters() {
        let service = Fixed(Ok(notes(4)));
        let mut session = ListingSession::new(Listing::<Note>::with_limit(2));
        session.listing_mut().set_page(2);
        session.refresh(&service).await;
        assert_eq!(session.listing().page(), 2);
        let ids: Vec<String> = session.view().items.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["n2", "n3"]);
    }
}
