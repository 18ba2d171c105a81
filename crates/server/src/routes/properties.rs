use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use models::property::{Model, PropertyInput};
use service::errors::ServiceError;

use super::ServerState;
use crate::errors::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};

/// Property as rendered to clients; `owner` is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyResponse {
    pub id: i32,
    pub address: String,
    pub price: i32,
    pub size: i32,
    pub description: String,
    pub owner: String,
}

impl From<Model> for PropertyResponse {
    fn from(m: Model) -> Self {
        Self { id: m.id, address: m.address, price: m.price, size: m.size, description: m.description, owner: m.user_id }
    }
}

/// Acting user for mutations, passed as `?username=`.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub username: String,
}

#[utoipa::path(
    post, path = "/properties", tag = "properties",
    params(("username" = String, Query, description = "Registered user who will own the listing")),
    request_body = crate::openapi::PropertyRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PropertyDoc),
        (status = 400, description = "Unknown user or invalid fields", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(input): AppJson<PropertyInput>,
) -> Result<(StatusCode, Json<PropertyResponse>), ApiError> {
    let created = state.properties.create(&owner.username, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(get, path = "/properties", tag = "properties", responses((status = 200, description = "All listings", body = [crate::openapi::PropertyDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<PropertyResponse>>, ApiError> {
    let all = state.properties.list().await?;
    Ok(Json(all.into_iter().map(PropertyResponse::from).collect()))
}

#[utoipa::path(
    get, path = "/properties/{id}", tag = "properties",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::PropertyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn get(State(state): State<ServerState>, AppPath(id): AppPath<i32>) -> Result<Json<PropertyResponse>, ApiError> {
    let found = state.properties.get(id).await?.ok_or_else(|| ServiceError::not_found("property"))?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    put, path = "/properties/{id}", tag = "properties",
    params(
        ("id" = i32, Path, description = "Property id"),
        ("username" = String, Query, description = "Acting user; must own the listing"),
    ),
    request_body = crate::openapi::PropertyRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PropertyDoc),
        (status = 400, description = "Invalid fields", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not the owner", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i32>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(input): AppJson<PropertyInput>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let updated = state.properties.update(&owner.username, id, input).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete, path = "/properties/{id}", tag = "properties",
    params(
        ("id" = i32, Path, description = "Property id"),
        ("username" = String, Query, description = "Acting user; must own the listing"),
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i32>,
    AppQuery(owner): AppQuery<OwnerQuery>,
) -> Result<StatusCode, ApiError> {
    state.properties.delete(&owner.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
