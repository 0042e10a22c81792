use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{ProfileUpdate, User};
use crate::storage::{self, KeyValueStore, StorageError, SESSION_KEY};

use super::credentials::CredentialStore;
use super::error::AuthError;
use super::verifier::CredentialVerifier;

/// Where a session payload lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTier {
    /// Survives restarts ("remember me").
    Durable,
    /// Lives only as long as the current process.
    Ephemeral,
}

impl SessionTier {
    /// Restore checks tiers in this order; the first payload found wins.
    pub const RESTORE_ORDER: [SessionTier; 2] = [SessionTier::Durable, SessionTier::Ephemeral];
}

impl std::fmt::Display for SessionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionTier::Durable => write!(f, "durable"),
            SessionTier::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// Single current-user session over a [`CredentialStore`] and two storage
/// tiers.
///
/// Two states: anonymous (`current_user() == None`) and authenticated.
/// Login and register move to authenticated, logout moves back, and
/// `update_profile` refreshes the stored payload without a state change.
///
/// Logging in never clears the other tier. If both tiers end up holding a
/// payload, [`restore`](Self::restore) prefers the durable one.
pub struct SessionManager {
    credentials: CredentialStore,
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    current: Option<User>,
    loading: bool,
}

impl SessionManager {
    /// The credential collection lives in the durable tier.
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        let credentials = CredentialStore::new(durable.clone());
        Self::from_parts(credentials, durable, ephemeral)
    }

    pub fn with_verifier(
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let credentials = CredentialStore::with_verifier(durable.clone(), verifier);
        Self::from_parts(credentials, durable, ephemeral)
    }

    fn from_parts(
        credentials: CredentialStore,
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            credentials,
            durable,
            ephemeral,
            current: None,
            loading: true,
        }
    }

    fn tier(&self, tier: SessionTier) -> &dyn KeyValueStore {
        match tier {
            SessionTier::Durable => self.durable.as_ref(),
            SessionTier::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Decode the payload in `tier`. A malformed payload is removed and
    /// treated as absent.
    fn read_payload(&self, tier: SessionTier) -> Result<Option<User>, StorageError> {
        match storage::read_json::<User>(self.tier(tier), SESSION_KEY) {
            Ok(user) => Ok(user),
            Err(StorageError::Corrupt { source, .. }) => {
                warn!(%tier, error = %source, "Discarding malformed session payload");
                self.tier(tier).remove(SESSION_KEY)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn write_payload(&self, tier: SessionTier, user: &User) -> Result<(), StorageError> {
        storage::write_json(self.tier(tier), SESSION_KEY, user)
    }

    fn find_session(&self) -> Result<Option<(SessionTier, User)>, StorageError> {
        for tier in SessionTier::RESTORE_ORDER {
            if let Some(user) = self.read_payload(tier)? {
                return Ok(Some((tier, user)));
            }
        }
        Ok(None)
    }

    /// Adopt a previously stored session, durable tier first.
    ///
    /// Intended to run once at startup; `is_loading()` is true until it
    /// finishes, whether or not it succeeds.
    pub fn restore(&mut self) -> Result<Option<User>, AuthError> {
        let found = self.find_session();
        self.loading = false;

        self.current = match found? {
            Some((tier, user)) => {
                info!(user_id = %user.id, %tier, "Restored session");
                Some(user)
            }
            None => {
                debug!("No stored session");
                None
            }
        };
        Ok(self.current.clone())
    }

    /// Check credentials and start a session. `remember_me` selects the
    /// durable tier; otherwise the payload goes to the ephemeral tier.
    pub fn login(&mut self, email: &str, secret: &str, remember_me: bool) -> Result<User, AuthError> {
        let user = match self.credentials.verify(email, secret) {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Login failed");
                return Err(e);
            }
        };

        let tier = if remember_me {
            SessionTier::Durable
        } else {
            SessionTier::Ephemeral
        };
        self.write_payload(tier, &user)?;
        self.current = Some(user.clone());

        info!(user_id = %user.id, %tier, "Logged in");
        Ok(user)
    }

    /// Create an account and start an ephemeral session for it.
    pub fn register(&mut self, email: &str, secret: &str, name: &str) -> Result<User, AuthError> {
        let user = self.credentials.register(email, secret, name)?;
        self.write_payload(SessionTier::Ephemeral, &user)?;
        self.current = Some(user.clone());

        info!(user_id = %user.id, "Registered and logged in");
        Ok(user)
    }

    /// End the session and remove the payload from both tiers.
    ///
    /// Both removals are attempted even if the first one fails.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        let previous = self.current.take();

        let durable = self.durable.remove(SESSION_KEY);
        let ephemeral = self.ephemeral.remove(SESSION_KEY);
        durable?;
        ephemeral?;

        match previous {
            Some(user) => info!(user_id = %user.id, "Logged out"),
            None => debug!("Logout with no active session"),
        }
        Ok(())
    }

    /// Merge `update` into the current user, the stored account, and every
    /// tier that currently holds a session payload.
    ///
    /// Returns `Ok(None)` and does nothing when no one is logged in.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Option<User>, AuthError> {
        let Some(current) = self.current.as_mut() else {
            debug!("Profile update ignored, no active session");
            return Ok(None);
        };
        current.apply(update);
        let updated = current.clone();

        self.credentials.update_profile(&updated.id, update)?;

        for tier in SessionTier::RESTORE_ORDER {
            if self.tier(tier).contains(SESSION_KEY)? {
                self.write_payload(tier, &updated)?;
                debug!(user_id = %updated.id, %tier, "Refreshed session payload");
            }
        }

        Ok(Some(updated))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// The current user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<&User, AuthError> {
        self.current.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// True until the first `restore` completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Tiers that currently hold a session payload.
    pub fn active_tiers(&self) -> Result<Vec<SessionTier>, AuthError> {
        let mut tiers = Vec::new();
        for tier in SessionTier::RESTORE_ORDER {
            if self.tier(tier).contains(SESSION_KEY)? {
                tiers.push(tier);
            }
        }
        Ok(tiers)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}
