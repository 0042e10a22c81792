use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::{Destination, DestinationUpdate, NewDestination, Status};
use crate::storage::{self, destinations_key, KeyValueStore, StorageError};
use crate::utils::contains_ignore_case;

#[derive(Error, Debug)]
pub enum DestinationError {
    #[error("Destination {0} is required")]
    MissingField(&'static str),

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, DestinationError>;

pub struct DestinationStore {
    store: Arc<dyn KeyValueStore>,
}

impl DestinationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The user's destinations in insertion order. No stored list means an
    /// empty one.
    pub fn list(&self, user_id: &str) -> Result<Vec<Destination>> {
        let key = destinations_key(user_id);
        Ok(storage::read_json(self.store.as_ref(), &key)?.unwrap_or_default())
    }

    /// Overwrite the user's whole list.
    pub fn replace_all(&self, user_id: &str, destinations: &[Destination]) -> Result<()> {
        let key = destinations_key(user_id);
        storage::write_json(self.store.as_ref(), &key, destinations)?;
        debug!(user_id, count = destinations.len(), "Saved destinations");
        Ok(())
    }

    /// Append a new destination. Name and country must be non-blank.
    pub fn add(&self, user_id: &str, draft: NewDestination) -> Result<Destination> {
        if draft.name.trim().is_empty() {
            return Err(DestinationError::MissingField("name"));
        }
        if draft.country.trim().is_empty() {
            return Err(DestinationError::MissingField("country"));
        }

        let mut destinations = self.list(user_id)?;
        let destination = Destination::from_draft(draft);
        destinations.push(destination.clone());
        self.replace_all(user_id, &destinations)?;
        Ok(destination)
    }

    /// Merge `update` into destination `id`. Returns `false` if it does not
    /// exist, in which case nothing is written.
    pub fn update(&self, user_id: &str, id: &str, update: &DestinationUpdate) -> Result<bool> {
        let mut destinations = self.list(user_id)?;
        let Some(destination) = destinations.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        destination.apply(update);
        self.replace_all(user_id, &destinations)?;
        Ok(true)
    }

    pub fn set_status(&self, user_id: &str, id: &str, status: Status) -> Result<bool> {
        self.update(user_id, id, &DestinationUpdate::status(status))
    }

    /// Returns `false` if there was nothing to remove.
    pub fn remove(&self, user_id: &str, id: &str) -> Result<bool> {
        let mut destinations = self.list(user_id)?;
        let before = destinations.len();
        destinations.retain(|d| d.id != id);
        if destinations.len() == before {
            return Ok(false);
        }
        self.replace_all(user_id, &destinations)?;
        Ok(true)
    }

    /// Destinations matching `filter`, in stored order.
    pub fn search(&self, user_id: &str, filter: &DestinationFilter) -> Result<Vec<Destination>> {
        Ok(self
            .list(user_id)?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect())
    }
}

/// Text search over name or country, combined with an optional status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationFilter {
    pub query: String,
    /// `None` means all statuses.
    pub status: Option<Status>,
}

impl DestinationFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, destination: &Destination) -> bool {
        let matches_search = contains_ignore_case(&destination.name, &self.query)
            || contains_ignore_case(&destination.country, &self.query);
        let matches_status = self.status.map_or(true, |s| destination.status == s);
        matches_search && matches_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, DestinationStore) {
        let backing = Arc::new(MemoryStore::new());
        let destinations = DestinationStore::new(backing.clone());
        (backing, destinations)
    }

    #[test]
    fn test_empty_list_when_nothing_stored() {
        let (_, store) = store();
        assert!(store.list("u1").unwrap().is_empty());
    }

    #[test]
    fn test_add_and_list() {
        let (backing, store) = store();
        let kyoto = store.add("u1", NewDestination::new("Kyoto", "Japan")).unwrap();
        store.add("u1", NewDestination::new("Lima", "Peru")).unwrap();

        let list = store.list("u1").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], kyoto);
        assert!(backing.contains("destinations_u1").unwrap());
    }

    #[test]
    fn test_add_requires_name_and_country() {
        let (_, store) = store();
        assert!(matches!(
            store.add("u1", NewDestination::new("  ", "Japan")),
            Err(DestinationError::MissingField("name"))
        ));
        assert!(matches!(
            store.add("u1", NewDestination::new("Kyoto", "")),
            Err(DestinationError::MissingField("country"))
        ));
        assert!(store.list("u1").unwrap().is_empty());
    }

    #[test]
    fn test_lists_are_isolated_per_user() {
        let (_, store) = store();
        store.add("alice", NewDestination::new("Kyoto", "Japan")).unwrap();
        store.add("bob", NewDestination::new("Lima", "Peru")).unwrap();

        let alice = store.list("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].name, "Kyoto");

        let bob_id = store.list("bob").unwrap()[0].id.clone();
        assert!(!store.remove("alice", &bob_id).unwrap());
        assert_eq!(store.list("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_update_and_remove() {
        let (_, store) = store();
        let oslo = store.add("u1", NewDestination::new("Oslo", "Norway")).unwrap();

        assert!(store.set_status("u1", &oslo.id, Status::Visited).unwrap());
        assert_eq!(store.list("u1").unwrap()[0].status, Status::Visited);

        assert!(!store.update("u1", "missing", &DestinationUpdate::default()).unwrap());

        assert!(store.remove("u1", &oslo.id).unwrap());
        assert!(!store.remove("u1", &oslo.id).unwrap());
        assert!(store.list("u1").unwrap().is_empty());
    }

    #[test]
    fn test_search() {
        let (_, store) = store();
        store.add("u1", NewDestination::new("Kyoto", "Japan")).unwrap();
        store
            .add("u1", NewDestination::new("Osaka", "Japan").with_status(Status::Visited))
            .unwrap();
        store.add("u1", NewDestination::new("Lima", "Peru")).unwrap();

        let japan = store.search("u1", &DestinationFilter::query("jap")).unwrap();
        assert_eq!(japan.len(), 2);

        let visited_japan = store
            .search("u1", &DestinationFilter::query("JAPAN").with_status(Some(Status::Visited)))
            .unwrap();
        assert_eq!(visited_japan.len(), 1);
        assert_eq!(visited_japan[0].name, "Osaka");

        let all = store.search("u1", &DestinationFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
    }
}
