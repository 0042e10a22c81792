use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{Destination, User};

use super::store::{DestinationError, DestinationStore};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Destinations(#[from] DestinationError),
}

/// Everything a user can take with them: profile, destinations, and when
/// the snapshot was made.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub user: User,
    pub destinations: Vec<Destination>,
    pub export_date: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(user: User, destinations: Vec<Destination>) -> Self {
        Self {
            user,
            destinations,
            export_date: Utc::now(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        export_file_name(self.export_date.date_naive())
    }
}

/// `travellist-export-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("travellist-export-{}.json", date.format("%Y-%m-%d"))
}

/// Snapshot `user`'s data.
pub fn export_user(store: &DestinationStore, user: &User) -> Result<ExportBundle, TransferError> {
    let destinations = store.list(&user.id)?;
    Ok(ExportBundle::new(user.clone(), destinations))
}

/// Pull the destination list out of an exported document.
///
/// Only `destinations` is read; it must be an array of destination records.
pub fn parse_import(json: &str) -> Result<Vec<Destination>, TransferError> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| TransferError::InvalidFormat(e.to_string()))?;

    let destinations = match document.get("destinations") {
        Some(value) if value.is_array() => value.clone(),
        _ => {
            return Err(TransferError::InvalidFormat(
                "missing destinations list".to_string(),
            ))
        }
    };

    serde_json::from_value(destinations).map_err(|e| TransferError::InvalidFormat(e.to_string()))
}

/// Replace `user`'s destinations with the ones in `json`. The user recorded
/// in the document is ignored. Returns how many destinations were imported.
pub fn import_user(store: &DestinationStore, user: &User, json: &str) -> Result<usize, TransferError> {
    let destinations = parse_import(json)?;
    store.replace_all(&user.id, &destinations)?;
    info!(user_id = %user.id, count = destinations.len(), "Imported destinations");
    Ok(destinations.len())
}
