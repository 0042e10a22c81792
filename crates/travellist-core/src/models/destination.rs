use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Wishlist,
    Planned,
    Visited,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Wishlist, Status::Planned, Status::Visited];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wishlist" => Some(Status::Wishlist),
            "planned" => Some(Status::Planned),
            "visited" => Some(Status::Visited),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Wishlist => write!(f, "wishlist"),
            Status::Planned => write!(f, "planned"),
            Status::Visited => write!(f, "visited"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub best_time: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: Status,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

impl Destination {
    /// Build a stored destination from a draft, assigning id and timestamp.
    pub fn from_draft(draft: NewDestination) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            country: draft.country,
            best_time: draft.best_time,
            budget: draft.budget,
            priority: draft.priority,
            notes: draft.notes,
            status: draft.status,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: &DestinationUpdate) {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(ref country) = update.country {
            self.country = country.clone();
        }
        if let Some(ref best_time) = update.best_time {
            self.best_time = best_time.clone();
        }
        if let Some(ref budget) = update.budget {
            self.budget = budget.clone();
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(ref notes) = update.notes {
            self.notes = notes.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    pub fn formatted_date(&self) -> String {
        format_date(&self.created_at)
    }
}

/// A destination as entered, before it is assigned an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDestination {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub best_time: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: Status,
}

impl NewDestination {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial destination edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub best_time: Option<String>,
    pub budget: Option<String>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub status: Option<Status>,
}

impl DestinationUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
