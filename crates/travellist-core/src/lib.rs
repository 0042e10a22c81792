//! Core library for travellist: a local travel bucket-list tracker.
//!
//! All state lives in key-value storage on the local machine:
//!
//! - `auth`: accounts (`CredentialStore`) and the current session
//!   (`SessionManager`) over a durable and an ephemeral tier
//! - `destinations`: per-user destination lists, statistics, export/import
//! - `storage`: the `KeyValueStore` tiers (`FileStore`, `MemoryStore`)
//! - `context`: `TravelList`, which ties the pieces together for a front end

pub mod auth;
pub mod config;
pub mod context;
pub mod destinations;
pub mod models;
pub mod storage;
pub mod utils;

pub use auth::{AuthError, SessionManager, SessionTier};
pub use config::Config;
pub use context::{AppError, Overview, TravelList};
pub use models::{Destination, NewDestination, Priority, ProfileUpdate, Status, User};
