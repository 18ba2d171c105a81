use std::borrow::Cow;

use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub address: String,
    pub price: i32,
    pub size: i32,
    pub description: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Username)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Listing fields supplied by a client. The owner is never part of the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PropertyInput {
    #[validate(
        custom(function = "address_present"),
        length(max = 255, message = "Address can't be longer than 255 characters")
    )]
    pub address: String,
    #[validate(range(min = 1, message = "Price must be greater than 0"))]
    pub price: i32,
    #[validate(range(min = 1, message = "Size must be greater than 0"))]
    pub size: i32,
    #[validate(
        custom(function = "description_present"),
        length(max = 500, message = "Description can't be longer than 500 characters")
    )]
    pub description: String,
}

impl PropertyInput {
    pub fn new(address: impl Into<String>, price: i32, size: i32, description: impl Into<String>) -> Self {
        Self { address: address.into(), price, size, description: description.into() }
    }
}

impl From<&Model> for PropertyInput {
    fn from(m: &Model) -> Self {
        Self { address: m.address.clone(), price: m.price, size: m.size, description: m.description.clone() }
    }
}

fn address_present(value: &str) -> Result<(), ValidationError> {
    present(value, "Address is required")
}

fn description_present(value: &str) -> Result<(), ValidationError> {
    present(value, "Description is required")
}

fn present(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

/// One violated rule on one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

const FIELD_ORDER: [&str; 4] = ["address", "price", "size", "description"];

/// Check the structural rules, reporting every violation in field order.
pub fn validate(input: &PropertyInput) -> Result<(), Vec<FieldViolation>> {
    let errors = match input.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = field.to_string();
            list.iter().map(move |e| FieldViolation {
                field: field.clone(),
                message: e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    violations.sort_by_key(|v| FIELD_ORDER.iter().position(|f| *f == v.field).unwrap_or(FIELD_ORDER.len()));
    Err(violations)
}

fn active_fields(input: &PropertyInput) -> ActiveModel {
    ActiveModel {
        address: Set(input.address.clone()),
        price: Set(input.price),
        size: Set(input.size),
        description: Set(input.description.clone()),
        ..Default::default()
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, owner: &str, input: &PropertyInput) -> Result<Model, ModelError> {
    let mut am = active_fields(input);
    am.user_id = Set(owner.to_string());
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id).one(db).await?;
    Ok(found)
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    let all = Entity::find().order_by_asc(Column::Id).all(db).await?;
    Ok(all)
}

pub async fn find_by_owner<C: ConnectionTrait>(db: &C, owner: &str) -> Result<Vec<Model>, ModelError> {
    let owned = Entity::find()
        .filter(Column::UserId.eq(owner))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(owned)
}

/// Replace the mutable fields of `id`; the owner column is left untouched.
/// Returns `None` when no such row exists.
pub async fn update<C: ConnectionTrait>(db: &C, id: i32, input: &PropertyInput) -> Result<Option<Model>, ModelError> {
    let res = Entity::update_many()
        .set(active_fields(input))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}

/// Compare-and-persist update: writes only while `owner` still owns `id`.
pub async fn update_owned(db: &DatabaseConnection, id: i32, owner: &str, input: &PropertyInput) -> Result<Option<Model>, ModelError> {
    let txn = db.begin().await?;
    let res = Entity::update_many()
        .set(active_fields(input))
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner))
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(None);
    }
    let updated = find_by_id(&txn, id).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Compare-and-persist delete: removes the row only while `owner` still owns it.
pub async fn delete_owned<C: ConnectionTrait>(db: &C, id: i32, owner: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
