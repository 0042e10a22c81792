//! Secret sealing and comparison.
//!
//! The credential store never compares secrets itself; it hands the stored
//! form to a [`CredentialVerifier`]. [`PlaintextVerifier`] matches the data
//! already on disk (stored form == secret). [`Argon2Verifier`] stores an
//! argon2id PHC string instead.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Failed to hash secret: {0}")]
    Hash(String),
}

pub trait CredentialVerifier: Send + Sync {
    /// Produce the form of `secret` that gets written to storage.
    fn seal(&self, secret: &str) -> Result<String, VerifierError>;

    /// Check `secret` against a previously sealed value.
    fn verify(&self, secret: &str, stored: &str) -> bool;
}

/// Exact string equality. No normalization, no hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn seal(&self, secret: &str) -> Result<String, VerifierError> {
        Ok(secret.to_string())
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        secret == stored
    }
}

/// Salted argon2id hashes in PHC string format.
#[derive(Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn seal(&self, secret: &str) -> Result<String, VerifierError> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| VerifierError::Hash(e.to_string()))
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        // A stored value that is not a PHC string never matches
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
