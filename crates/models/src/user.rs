use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::property;

pub const USERNAME_MAX_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Property,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Property => Entity::has_many(property::Entity).into() }
    }
}

impl Related<property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(ModelError::Validation(format!("username can't be longer than {USERNAME_MAX_LEN} characters")));
    }
    Ok(())
}

pub async fn find<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(username.to_string()).one(db).await?;
    Ok(found)
}

/// Insert the user unless the username is taken.
///
/// A single `INSERT .. ON CONFLICT DO NOTHING`; returns whether a row was written.
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C, username: &str, password_hash: &str) -> Result<bool, ModelError> {
    validate_username(username)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash.to_string()),
    };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Username).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(inserted == 1)
}

/// Delete the user and every property it owns in one transaction.
pub async fn delete_with_properties(db: &DatabaseConnection, username: &str) -> Result<bool, ModelError> {
    let txn = db.begin().await?;
    let removed = property::Entity::delete_many()
        .filter(property::Column::UserId.eq(username))
        .exec(&txn)
        .await?;
    let deleted = Entity::delete_by_id(username.to_string()).exec(&txn).await?;
    txn.commit().await?;
    tracing::debug!(%username, properties = removed.rows_affected, "user_deleted_with_properties");
    Ok(deleted.rows_affected > 0)
}
