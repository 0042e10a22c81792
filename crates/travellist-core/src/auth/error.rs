use thiserror::Error;

use crate::storage::StorageError;

use super::verifier::VerifierError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("An account with email '{email}' already exists")]
    AlreadyExists { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("Credential failure: {0}")]
    Verifier(#[from] VerifierError),
}

impl AuthError {
    /// Failures that come from the storage layer rather than from the
    /// caller's input. The same action may succeed if tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Storage(_) | AuthError::Verifier(_))
    }

    /// Short message suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::AlreadyExists { .. } => "An account with that email already exists".to_string(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::NotAuthenticated => "Please log in first".to_string(),
            AuthError::Storage(_) | AuthError::Verifier(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
