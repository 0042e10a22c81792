//! Per-user destination lists.
//!
//! Each user's bucket list is stored whole under `destinations_<userId>` in
//! the durable tier. Nothing here reads or writes another user's key.
//!
//! - `DestinationStore`: list/add/update/remove/search
//! - `stats`: counts, progress and achievements derived from a list
//! - `transfer`: JSON export and import of a user's data

pub mod stats;
pub mod store;
pub mod transfer;

pub use stats::{Achievement, TravelStats};
pub use store::{DestinationError, DestinationFilter, DestinationStore};
pub use transfer::{export_user, import_user, ExportBundle, TransferError};
