use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::property::{self, Model, PropertyInput};

use crate::errors::ServiceError;

/// Persistence contract for property records.
///
/// `update` and `delete` trust the caller to have checked ownership; the `*_owned`
/// variants only write while the given owner still owns the record.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, owner: &str, input: &PropertyInput) -> Result<Model, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<Model>, ServiceError>;
    async fn get_all(&self) -> Result<Vec<Model>, ServiceError>;
    /// Fails with `NotFound` when `id` is unknown; nothing is created.
    async fn update(&self, id: i32, input: &PropertyInput) -> Result<Model, ServiceError>;
    async fn update_owned(&self, id: i32, owner: &str, input: &PropertyInput) -> Result<Option<Model>, ServiceError>;
    /// Absent ids are a no-op.
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    async fn delete_owned(&self, id: i32, owner: &str) -> Result<bool, ServiceError>;
    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPropertyRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PropertyRepository for SeaOrmPropertyRepository {
    async fn create(&self, owner: &str, input: &PropertyInput) -> Result<Model, ServiceError> {
        Ok(property::create(&self.db, owner, input).await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Model>, ServiceError> {
        Ok(property::find_by_id(&self.db, id).await?)
    }

    async fn get_all(&self) -> Result<Vec<Model>, ServiceError> {
        Ok(property::find_all(&self.db).await?)
    }

    async fn update(&self, id: i32, input: &PropertyInput) -> Result<Model, ServiceError> {
        property::update(&self.db, id, input)
            .await?
            .ok_or_else(|| ServiceError::not_found("property"))
    }

    async fn update_owned(&self, id: i32, owner: &str, input: &PropertyInput) -> Result<Option<Model>, ServiceError> {
        Ok(property::update_owned(&self.db, id, owner, input).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        property::delete(&self.db, id).await?;
        Ok(())
    }

    async fn delete_owned(&self, id: i32, owner: &str) -> Result<bool, ServiceError> {
        Ok(property::delete_owned(&self.db, id, owner).await?)
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Model>, ServiceError> {
        Ok(property::find_by_owner(&self.db, owner).await?)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPropertyRepository {
        rows: Mutex<BTreeMap<i32, Model>>,
        next_id: Mutex<i32>,
        fail: AtomicBool,
    }

    impl MockPropertyRepository {
        /// Make every subsequent call fail as a storage error.
        pub fn fail_all(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ServiceError::Persistence("storage unavailable".into()));
            }
            Ok(())
        }

        fn apply(row: &mut Model, input: &PropertyInput) {
            row.address = input.address.clone();
            row.price = input.price;
            row.size = input.size;
            row.description = input.description.clone();
        }
    }

    #[async_trait]
    impl PropertyRepository for MockPropertyRepository {
        async fn create(&self, owner: &str, input: &PropertyInput) -> Result<Model, ServiceError> {
            self.check()?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let row = Model {
                id: *next,
                address: input.address.clone(),
                price: input.price,
                size: input.size,
                description: input.description.clone(),
                user_id: owner.to_string(),
            };
            self.rows.lock().unwrap().insert(row.id, row.clone());
            Ok(row)
        }

        async fn get_by_id(&self, id: i32) -> Result<Option<Model>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn get_all(&self) -> Result<Vec<Model>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn update(&self, id: i32, input: &PropertyInput) -> Result<Model, ServiceError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("property"))?;
            Self::apply(row, input);
            Ok(row.clone())
        }

        async fn update_owned(&self, id: i32, owner: &str, input: &PropertyInput) -> Result<Option<Model>, ServiceError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) if row.user_id == owner => {
                    Self::apply(row, input);
                    Ok(Some(row.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.check()?;
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn delete_owned(&self, id: i32, owner: &str) -> Result<bool, ServiceError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            if rows.get(&id).is_some_and(|r| r.user_id == owner) {
                rows.remove(&id);
                return Ok(true);
            }
            Ok(false)
        }

        async fn find_by_owner(&self, owner: &str) -> Result<Vec<Model>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().values().filter(|r| r.user_id == owner).cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn listing(address: &str) -> PropertyInput {
        PropertyInput::new(address, 250000, 1200, "A beautiful property")
    }

    async fn repo_with_users(names: &[&str]) -> Result<SeaOrmPropertyRepository, anyhow::Error> {
        let db = get_db().await?;
        for n in names {
            models::user::insert_if_absent(&db, n, "h").await?;
        }
        Ok(SeaOrmPropertyRepository { db })
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() -> Result<(), anyhow::Error> {
        let repo = repo_with_users(&["alice"]).await?;
        let input = listing("123 Main St");
        let created = repo.create("alice", &input).await?;

        let found = repo.get_by_id(created.id).await?.unwrap();
        assert_eq!(PropertyInput::from(&found), input);
        assert_eq!(found.user_id, "alice");
        assert_eq!(repo.get_all().await?, vec![found]);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let repo = repo_with_users(&[]).await?;
        let err = repo.update(77, &listing("x")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(repo.get_by_id(77).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_absent_is_tolerated() -> Result<(), anyhow::Error> {
        let repo = repo_with_users(&["alice"]).await?;
        let p = repo.create("alice", &listing("1 Main St")).await?;
        repo.delete(p.id).await?;
        repo.delete(p.id).await?;
        assert!(repo.get_by_id(p.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn create_for_unknown_owner_is_persistence_error() -> Result<(), anyhow::Error> {
        let repo = repo_with_users(&[]).await?;
        let err = repo.create("ghost", &listing("1 Main St")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(_)));
        Ok(())
    }

    #[tokio::test]
    async fn owned_writes_respect_owner() -> Result<(), anyhow::Error> {
        let repo = repo_with_users(&["alice", "bob"]).await?;
        let p = repo.create("alice", &listing("1 Main St")).await?;

        assert!(repo.update_owned(p.id, "bob", &listing("stolen")).await?.is_none());
        assert!(!repo.delete_owned(p.id, "bob").await?);
        let updated = repo.update_owned(p.id, "alice", &listing("2 Main St")).await?.unwrap();
        assert_eq!(updated.address, "2 Main St");
        assert_eq!(repo.find_by_owner("alice").await?.len(), 1);
        assert!(repo.find_by_owner("bob").await?.is_empty());
        assert!(repo.delete_owned(p.id, "alice").await?);
        Ok(())
    }
}
