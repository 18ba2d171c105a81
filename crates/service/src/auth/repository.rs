use async_trait::async_trait;

use super::domain::Credentials;
use super::errors::AuthError;

/// Repository abstraction for credential persistence.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn lookup(&self, username: &str) -> Result<Option<Credentials>, AuthError>;

    /// Store the credentials unless the username is taken; `Ok(false)` leaves the store untouched.
    async fn insert_if_absent(&self, username: &str, password_hash: &str) -> Result<bool, AuthError>;

    /// Remove the user together with the properties it owns.
    async fn delete_user(&self, username: &str) -> Result<bool, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCredentialRepository {
        creds: Mutex<HashMap<String, Credentials>>, // key: username
    }

    #[async_trait]
    impl CredentialRepository for MockCredentialRepository {
        async fn lookup(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(username).cloned())
        }

        async fn insert_if_absent(&self, username: &str, password_hash: &str) -> Result<bool, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            if creds.contains_key(username) {
                return Ok(false);
            }
            let c = Credentials { username: username.to_string(), password_hash: password_hash.to_string() };
            creds.insert(username.to_string(), c);
            Ok(true)
        }

        async fn delete_user(&self, username: &str) -> Result<bool, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            Ok(creds.remove(username).is_some())
        }
    }
}
