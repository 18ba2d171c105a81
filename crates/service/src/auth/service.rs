use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::hashing::{CredentialHasher, Sha256Base64};
use super::repository::CredentialRepository;

/// Auth business service independent of web framework
pub struct AuthService<R: CredentialRepository> {
    repo: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<R: CredentialRepository> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_hasher(repo, Arc::new(Sha256Base64))
    }

    pub fn with_hasher(repo: Arc<R>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockCredentialRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialRepository::default()));
    /// let input = RegisterInput { username: "alice".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        models::user::validate_username(&input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.trim().is_empty() {
            return Err(AuthError::Validation("password required".into()));
        }

        let hash = self.hasher.hash(&input.password);
        if !self.repo.insert_if_absent(&input.username, &hash).await? {
            debug!("username taken");
            return Err(AuthError::Conflict);
        }
        info!(username = %input.username, algorithm = self.hasher.algorithm(), "user_registered");
        Ok(AuthUser { username: input.username })
    }

    /// Check a raw password against the stored hash. Unknown users are simply invalid.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockCredentialRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockCredentialRepository::default()));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "bob".into(), password: "Passw0rd".into() }));
    /// let ok = tokio_test::block_on(svc.validate(LoginInput { username: "bob".into(), password: "Passw0rd".into() })).unwrap();
    /// assert!(ok);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn validate(&self, input: LoginInput) -> Result<bool, AuthError> {
        let Some(cred) = self.repo.lookup(&input.username).await? else {
            return Ok(false);
        };
        Ok(self.hasher.verify(&input.password, &cred.password_hash))
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.repo.lookup(username).await?.as_ref().map(AuthUser::from))
    }

    /// Delete a user after re-checking its password; owned properties go with it.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn delete_user(&self, input: LoginInput) -> Result<(), AuthError> {
        let cred = self.repo.lookup(&input.username).await?.ok_or(AuthError::NotFound)?;
        if !self.hasher.verify(&input.password, &cred.password_hash) {
            warn!("user deletion with bad credentials");
            return Err(AuthError::Unauthorized);
        }
        if !self.repo.delete_user(&input.username).await? {
            return Err(AuthError::NotFound);
        }
        info!(username = %input.username, "user_deleted");
        Ok(())
    }
}
