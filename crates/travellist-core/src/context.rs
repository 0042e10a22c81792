//! The session context handed to front ends.
//!
//! `TravelList` owns the session manager and the destination store and
//! scopes every destination operation to the current user.

use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use crate::auth::{Argon2Verifier, AuthError, CredentialVerifier, PlaintextVerifier, SessionManager};
use crate::config::Config;
use crate::destinations::stats::{self, Achievement, TravelStats, RECENT_LIMIT};
use crate::destinations::{transfer, DestinationError, DestinationFilter, DestinationStore, ExportBundle, TransferError};
use crate::models::{Destination, NewDestination, Status};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Destinations(#[from] DestinationError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Everything the dashboard and progress screens show.
#[derive(Debug, Clone)]
pub struct Overview {
    pub stats: TravelStats,
    pub completion_percent: u32,
    pub world_progress_percent: u32,
    pub visited_countries: Vec<String>,
    pub planned_countries: Vec<String>,
    pub recent: Vec<Destination>,
    pub achievements: Vec<Achievement>,
}

impl Overview {
    pub fn from_destinations(destinations: &[Destination]) -> Self {
        let counts = TravelStats::from_destinations(destinations);
        Self {
            stats: counts,
            completion_percent: counts.completion_percent(),
            world_progress_percent: stats::world_progress_percent(destinations),
            visited_countries: to_owned(stats::visited_countries(destinations)),
            planned_countries: to_owned(stats::planned_countries(destinations)),
            recent: stats::recent(destinations, RECENT_LIMIT).into_iter().cloned().collect(),
            achievements: stats::achievements(destinations),
        }
    }
}

fn to_owned(countries: Vec<&str>) -> Vec<String> {
    countries.into_iter().map(String::from).collect()
}

pub struct TravelList {
    pub session: SessionManager,
    destinations: DestinationStore,
}

impl TravelList {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            session: SessionManager::with_verifier(durable.clone(), ephemeral, verifier),
            destinations: DestinationStore::new(durable),
        }
    }

    /// Open the on-disk durable tier from `config`, start a fresh ephemeral
    /// tier, and restore any stored session.
    pub fn open(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let durable = FileStore::new(&data_dir)
            .with_context(|| format!("Failed to open data directory: {}", data_dir.display()))?;

        let verifier: Arc<dyn CredentialVerifier> = if config.secure_credentials {
            Arc::new(Argon2Verifier::new())
        } else {
            Arc::new(PlaintextVerifier)
        };

        let mut app = Self::new(Arc::new(durable), Arc::new(MemoryStore::new()), verifier);
        app.session.restore().context("Failed to restore session")?;
        info!(
            data_dir = %data_dir.display(),
            authenticated = app.session.is_authenticated(),
            "TravelList opened"
        );
        Ok(app)
    }

    fn user_id(&self) -> Result<String, AppError> {
        Ok(self.session.require_user()?.id.clone())
    }

    pub fn destinations(&self, filter: &DestinationFilter) -> Result<Vec<Destination>, AppError> {
        let user_id = self.user_id()?;
        Ok(self.destinations.search(&user_id, filter)?)
    }

    pub fn add_destination(&self, draft: NewDestination) -> Result<Destination, AppError> {
        let user_id = self.user_id()?;
        Ok(self.destinations.add(&user_id, draft)?)
    }

    pub fn set_status(&self, id: &str, status: Status) -> Result<bool, AppError> {
        let user_id = self.user_id()?;
        Ok(self.destinations.set_status(&user_id, id, status)?)
    }

    pub fn remove_destination(&self, id: &str) -> Result<bool, AppError> {
        let user_id = self.user_id()?;
        Ok(self.destinations.remove(&user_id, id)?)
    }

    pub fn overview(&self) -> Result<Overview, AppError> {
        let user_id = self.user_id()?;
        let list = self.destinations.list(&user_id)?;
        Ok(Overview::from_destinations(&list))
    }

    pub fn export(&self) -> Result<ExportBundle, AppError> {
        let user = self.session.require_user()?;
        Ok(transfer::export_user(&self.destinations, user)?)
    }

    pub fn import(&self, json: &str) -> Result<usize, AppError> {
        let user = self.session.require_user()?;
        Ok(transfer::import_user(&self.destinations, user, json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn in_memory() -> TravelList {
        TravelList::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(PlaintextVerifier),
        )
    }

    #[test]
    fn test_destination_operations_require_login() {
        let app = in_memory();
        assert!(matches!(
            app.add_destination(NewDestination::new("Kyoto", "Japan")),
            Err(AppError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(matches!(app.overview(), Err(AppError::Auth(AuthError::NotAuthenticated))));
        assert!(matches!(app.import("{}"), Err(AppError::Auth(AuthError::NotAuthenticated))));
    }

    #[test]
    fn test_destinations_follow_current_user() {
        let mut app = in_memory();
        app.session.register("a@x.com", "pw", "Alice").unwrap();
        app.add_destination(NewDestination::new("Kyoto", "Japan")).unwrap();

        app.session.logout().unwrap();
        app.session.register("b@x.com", "pw", "Bob").unwrap();
        assert!(app.destinations(&DestinationFilter::default()).unwrap().is_empty());

        app.session.login("a@x.com", "pw", false).unwrap();
        assert_eq!(app.destinations(&DestinationFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_overview() {
        let mut app = in_memory();
        app.session.register("a@x.com", "pw", "Alice").unwrap();
        let kyoto = app.add_destination(NewDestination::new("Kyoto", "Japan")).unwrap();
        app.add_destination(NewDestination::new("Lima", "Peru")).unwrap();
        app.set_status(&kyoto.id, Status::Visited).unwrap();

        let overview = app.overview().unwrap();
        assert_eq!(overview.stats.total, 2);
        assert_eq!(overview.completion_percent, 50);
        assert_eq!(overview.visited_countries, vec!["Japan".to_string()]);
        assert_eq!(overview.recent.len(), 2);
    }

    #[test]
    fn test_open_restores_remembered_session() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(temp.path().to_path_buf()),
            ..Config::default()
        };

        {
            let mut app = TravelList::new(
                Arc::new(FileStore::new(temp.path()).unwrap()),
                Arc::new(MemoryStore::new()),
                Arc::new(PlaintextVerifier),
            );
            app.session.register("a@x.com", "pw", "Alice").unwrap();
            app.session.login("a@x.com", "pw", true).unwrap();
        }

        // Guard against a developer's TRAVELLIST_DATA_DIR leaking in
        if std::env::var_os(crate::config::DATA_DIR_ENV).is_some() {
            return;
        }
        let app = TravelList::open(&config).unwrap();
        assert!(!app.session.is_loading());
        assert_eq!(app.session.current_user().map(|u| u.name.as_str()), Some("Alice"));
    }
}
