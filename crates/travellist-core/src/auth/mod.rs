//! Local accounts and session handling.
//!
//! This module provides:
//! - `CredentialStore`: the registry of accounts, keyed by email
//! - `SessionManager`: the current user, persisted in a durable or an
//!   ephemeral storage tier
//! - `CredentialVerifier`: the seam for how secrets are stored and compared
//!
//! There are no real security guarantees here. With the default
//! `PlaintextVerifier` the secret is stored as-is.

pub mod credentials;
pub mod error;
pub mod session;
pub mod verifier;

pub use credentials::{CredentialRecord, CredentialStore};
pub use error::AuthError;
pub use session::{SessionManager, SessionTier};
pub use verifier::{Argon2Verifier, CredentialVerifier, PlaintextVerifier, VerifierError};
