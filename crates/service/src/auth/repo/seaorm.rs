use sea_orm::DatabaseConnection;

use crate::auth::domain::Credentials;
use crate::auth::errors::AuthError;
use crate::auth::repository::CredentialRepository;

pub struct SeaOrmCredentialRepository {
    pub db: DatabaseConnection,
}

fn map_model_err(e: models::errors::ModelError) -> AuthError {
    match e {
        models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
        models::errors::ModelError::Db(msg) => AuthError::Repository(msg),
    }
}

#[async_trait::async_trait]
impl CredentialRepository for SeaOrmCredentialRepository {
    async fn lookup(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
        let res = models::user::find(&self.db, username).await.map_err(map_model_err)?;
        Ok(res.map(|u| Credentials { username: u.username, password_hash: u.password_hash }))
    }

    async fn insert_if_absent(&self, username: &str, password_hash: &str) -> Result<bool, AuthError> {
        models::user::insert_if_absent(&self.db, username, password_hash)
            .await
            .map_err(map_model_err)
    }

    async fn delete_user(&self, username: &str) -> Result<bool, AuthError> {
        models::user::delete_with_properties(&self.db, username)
            .await
            .map_err(map_model_err)
    }
}
