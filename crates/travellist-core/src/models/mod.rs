//! Data models for travellist entities.
//!
//! - `User`, `ProfileUpdate`: account identity and partial profile edits
//! - `Destination`, `Priority`, `Status`: bucket-list entries owned by a user
//!
//! Field names serialize in camelCase so stored data matches the layout
//! the web client wrote.

pub mod destination;
pub mod user;

pub use destination::{Destination, DestinationUpdate, NewDestination, Priority, Status};
pub use user::{ProfileUpdate, User};
