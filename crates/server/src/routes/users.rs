use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use service::auth::domain::{LoginInput, RegisterInput};

use super::properties::PropertyResponse;
use super::ServerState;
use crate::errors::ApiError;
use crate::extract::{AppJson, AppPath};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub password: String,
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::CredentialsRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::UserDoc),
        (status = 400, description = "Blank or oversized fields", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Username taken", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    AppJson(input): AppJson<RegisterInput>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { username: user.username })))
}

#[utoipa::path(
    post, path = "/users/validate", tag = "users",
    request_body = crate::openapi::CredentialsRequest,
    responses((status = 200, description = "Whether the password matches", body = crate::openapi::ValidateDoc))
)]
pub async fn validate(
    State(state): State<ServerState>,
    AppJson(input): AppJson<LoginInput>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let valid = state.auth.validate(input).await?;
    Ok(Json(ValidateResponse { valid }))
}

#[utoipa::path(
    get, path = "/users/{username}/properties", tag = "users",
    params(("username" = String, Path, description = "Owner")),
    responses(
        (status = 200, description = "Listings owned by the user", body = [crate::openapi::PropertyDoc]),
        (status = 404, description = "Unknown user", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn properties(
    State(state): State<ServerState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<Vec<PropertyResponse>>, ApiError> {
    let owned = state.properties.list_owned_by(&username).await?;
    Ok(Json(owned.into_iter().map(PropertyResponse::from).collect()))
}

#[utoipa::path(
    delete, path = "/users/{username}", tag = "users",
    params(("username" = String, Path, description = "User to remove")),
    request_body = crate::openapi::PasswordRequest,
    responses(
        (status = 204, description = "User and owned listings deleted"),
        (status = 401, description = "Wrong password", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Unknown user", body = crate::openapi::ErrorDoc),
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(username): AppPath<String>,
    AppJson(body): AppJson<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    state.auth.delete_user(LoginInput { username, password: body.password }).await?;
    Ok(StatusCode::NO_CONTENT)
}
