use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{ProfileUpdate, User};
use crate::storage::{self, KeyValueStore, StorageError, USERS_KEY};

use super::error::AuthError;
use super::verifier::{CredentialVerifier, PlaintextVerifier};

/// A stored account: the user's fields plus the sealed secret, flattened
/// into one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

/// Registry of accounts kept as a single list under [`USERS_KEY`].
///
/// Every operation reads the whole list, changes it, and writes it back.
/// There is no locking: two writers that interleave can both pass the
/// email check and leave two records for one email.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_verifier(store, Arc::new(PlaintextVerifier))
    }

    pub fn with_verifier(store: Arc<dyn KeyValueStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Missing collection reads as empty. A malformed one is an error; it is
    /// never overwritten with a fresh list.
    fn load(&self) -> Result<Vec<CredentialRecord>, StorageError> {
        Ok(storage::read_json(self.store.as_ref(), USERS_KEY)?.unwrap_or_default())
    }

    fn save(&self, records: &[CredentialRecord]) -> Result<(), StorageError> {
        storage::write_json(self.store.as_ref(), USERS_KEY, records)
    }

    /// Create an account. Email match is exact and case-sensitive.
    pub fn register(&self, email: &str, secret: &str, name: &str) -> Result<User, AuthError> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.user.email == email) {
            debug!(email, "Registration rejected, email taken");
            return Err(AuthError::AlreadyExists {
                email: email.to_string(),
            });
        }

        let user = User::new(email, name);
        let password = self.verifier.seal(secret)?;
        records.push(CredentialRecord {
            user: user.clone(),
            password,
        });
        self.save(&records)?;

        info!(user_id = %user.id, accounts = records.len(), "Registered account");
        Ok(user)
    }

    /// Find the account matching both email and secret.
    pub fn verify(&self, email: &str, secret: &str) -> Result<User, AuthError> {
        self.load()?
            .into_iter()
            .find(|r| r.user.email == email && self.verifier.verify(secret, &r.password))
            .map(|r| r.user)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Merge `update` into the account with `user_id`.
    ///
    /// Returns `false` without writing anything if no such account exists.
    /// Email uniqueness is not re-checked here.
    pub fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<bool, AuthError> {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.user.id == user_id) else {
            debug!(user_id, "Profile update skipped, account not found");
            return Ok(false);
        };

        record.user.apply(update);
        self.save(&records)?;
        debug!(user_id, "Updated stored profile");
        Ok(true)
    }

    /// All registered users, secrets stripped.
    pub fn users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.load()?.into_iter().map(|r| r.user).collect())
    }

    /// Number of stored records carrying `email`.
    pub fn count_email(&self, email: &str) -> Result<usize, AuthError> {
        Ok(self.load()?.iter().filter(|r| r.user.email == email).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::Argon2Verifier;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, CredentialStore) {
        let backing = Arc::new(MemoryStore::new());
        let creds = CredentialStore::new(backing.clone());
        (backing, creds)
    }

    #[test]
    fn test_register_then_duplicate() {
        let (_, creds) = store();
        let alice = creds.register("a@x.com", "pw", "Alice").unwrap();
        assert_eq!(alice.name, "Alice");

        let err = creds.register("a@x.com", "pw2", "Bob").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists { ref email } if email == "a@x.com"));
        assert_eq!(creds.count_email("a@x.com").unwrap(), 1);
        assert_eq!(creds.users().unwrap()[0].name, "Alice");
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let (_, creds) = store();
        creds.register("a@x.com", "pw", "Alice").unwrap();
        assert!(creds.register("A@x.com", "pw", "Other").is_ok());
        assert!(matches!(creds.verify("A@X.COM", "pw"), Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_verify() {
        let (_, creds) = store();
        let alice = creds.register("a@x.com", "pw", "Alice").unwrap();

        assert_eq!(creds.verify("a@x.com", "pw").unwrap(), alice);
        assert!(matches!(creds.verify("a@x.com", "nope"), Err(AuthError::InvalidCredentials)));
        assert!(matches!(creds.verify("b@x.com", "pw"), Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_stored_layout_flattens_user_and_password() {
        let (backing, creds) = store();
        creds.register("a@x.com", "pw", "Alice").unwrap();

        let raw = backing.get(USERS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &value[0];
        assert_eq!(record["email"], "a@x.com");
        assert_eq!(record["password"], "pw");
        assert!(record.get("createdAt").is_some());
        assert!(record.get("user").is_none());
    }

    #[test]
    fn test_update_profile() {
        let (_, creds) = store();
        let alice = creds.register("a@x.com", "pw", "Alice").unwrap();

        assert!(creds.update_profile(&alice.id, &ProfileUpdate::name("Alicia")).unwrap());
        assert_eq!(creds.verify("a@x.com", "pw").unwrap().name, "Alicia");
    }

    #[test]
    fn test_update_profile_unknown_id_is_noop() {
        let (backing, creds) = store();
        creds.register("a@x.com", "pw", "Alice").unwrap();
        let before = backing.get(USERS_KEY).unwrap();

        assert!(!creds.update_profile("missing", &ProfileUpdate::name("X")).unwrap());
        assert_eq!(backing.get(USERS_KEY).unwrap(), before);
    }

    #[test]
    fn test_update_profile_does_not_enforce_email_uniqueness() {
        let (_, creds) = store();
        creds.register("a@x.com", "pw", "Alice").unwrap();
        let bob = creds.register("b@x.com", "pw", "Bob").unwrap();

        creds.update_profile(&bob.id, &ProfileUpdate::email("a@x.com")).unwrap();
        assert_eq!(creds.count_email("a@x.com").unwrap(), 2);
    }

    #[test]
    fn test_corrupt_collection_is_storage_error() {
        let (backing, creds) = store();
        backing.set(USERS_KEY, "not json").unwrap();

        let err = creds.register("a@x.com", "pw", "Alice").unwrap_err();
        assert!(err.is_retryable());
        // The malformed data is left in place
        assert_eq!(backing.get(USERS_KEY).unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn test_reads_records_written_by_web_client() {
        let (backing, creds) = store();
        backing
            .set(
                USERS_KEY,
                r#"[{"id":"u1","email":"a@x.com","name":"Alice","createdAt":"2024-05-01T10:00:00.000Z","password":"pw"}]"#,
            )
            .unwrap();

        let user = creds.verify("a@x.com", "pw").unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_argon2_verifier_never_stores_secret() {
        let backing = Arc::new(MemoryStore::new());
        let creds = CredentialStore::with_verifier(backing.clone(), Arc::new(Argon2Verifier::new()));
        creds.register("a@x.com", "pw", "Alice").unwrap();

        let raw = backing.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("\"password\":\"pw\""));
        assert!(creds.verify("a@x.com", "pw").is_ok());
        assert!(creds.verify("a@x.com", "px").is_err());
    }
}
