use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use models::property::{self, Model, PropertyInput};

use super::repository::PropertyRepository;
use crate::auth::repository::CredentialRepository;
use crate::errors::ServiceError;

/// Property CRUD with ownership checks on every mutation.
///
/// Reads are public. Mutations compare the caller-supplied username with the
/// stored owner (exact, case-sensitive) and then write through the owner-guarded
/// repository calls, so an ownership change between the check and the write is
/// never overwritten.
pub struct PropertyService<P: PropertyRepository, C: CredentialRepository> {
    properties: Arc<P>,
    users: Arc<C>,
}

impl<P: PropertyRepository, C: CredentialRepository> PropertyService<P, C> {
    pub fn new(properties: Arc<P>, users: Arc<C>) -> Self {
        Self { properties, users }
    }

    /// Create a listing owned by `username`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::repository::{mock::MockCredentialRepository, CredentialRepository};
    /// use service::property::{repository::mock::MockPropertyRepository, PropertyService};
    /// use models::property::PropertyInput;
    /// let users = Arc::new(MockCredentialRepository::default());
    /// tokio_test::block_on(users.insert_if_absent("alice", "hash")).unwrap();
    /// let svc = PropertyService::new(Arc::new(MockPropertyRepository::default()), users);
    /// let input = PropertyInput::new("123 Main St", 250000, 1200, "A beautiful property");
    /// let created = tokio_test::block_on(svc.create("alice", input)).unwrap();
    /// assert_eq!(created.user_id, "alice");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, username: &str, input: PropertyInput) -> Result<Model, ServiceError> {
        if self.users.lookup(username).await?.is_none() {
            debug!("create by unregistered user");
            return Err(ServiceError::AuthRequired(format!("user '{username}' is not registered")));
        }
        property::validate(&input).map_err(ServiceError::Validation)?;
        let created = self.properties.create(username, &input).await?;
        info!(property_id = created.id, "property_created");
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError> {
        self.properties.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        self.properties.get_all().await
    }

    /// Listings owned by a registered user; unknown users are `NotFound`.
    #[instrument(skip(self))]
    pub async fn list_owned_by(&self, username: &str) -> Result<Vec<Model>, ServiceError> {
        if self.users.lookup(username).await?.is_none() {
            return Err(ServiceError::not_found("user"));
        }
        self.properties.find_by_owner(username).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, username: &str, id: i32, input: PropertyInput) -> Result<Model, ServiceError> {
        let existing = self.properties.get_by_id(id).await?.ok_or_else(|| ServiceError::not_found("property"))?;
        ensure_owner(&existing, username)?;
        property::validate(&input).map_err(ServiceError::Validation)?;

        match self.properties.update_owned(id, username, &input).await? {
            Some(updated) => {
                info!(property_id = id, "property_updated");
                Ok(updated)
            }
            None => Err(self.lost_race(id, username).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str, id: i32) -> Result<(), ServiceError> {
        let existing = self.properties.get_by_id(id).await?.ok_or_else(|| ServiceError::not_found("property"))?;
        ensure_owner(&existing, username)?;

        if !self.properties.delete_owned(id, username).await? {
            return Err(self.lost_race(id, username).await);
        }
        info!(property_id = id, "property_deleted");
        Ok(())
    }

    // 条件写入未命中：记录在检查之后被删除或换了所有者
    async fn lost_race(&self, id: i32, username: &str) -> ServiceError {
        let current = match self.properties.get_by_id(id).await {
            Ok(current) => current,
            Err(e) => return e,
        };
        match current {
            None => ServiceError::not_found("property"),
            Some(existing) => ensure_owner(&existing, username)
                .err()
                .unwrap_or_else(|| ServiceError::Persistence(format!("property {id} changed concurrently"))),
        }
    }
}

fn ensure_owner(existing: &Model, username: &str) -> Result<(), ServiceError> {
    if existing.user_id != username {
        warn!(property_id = existing.id, %username, "ownership check failed");
        return Err(ServiceError::Forbidden(format!("property {} is not owned by '{username}'", existing.id)));
    }
    Ok(())
}
