use std::sync::Arc;

use axum::{routing::{get, post}, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::auth::repo::seaorm::SeaOrmCredentialRepository;
use service::auth::AuthService;
use service::property::repository::SeaOrmPropertyRepository;
use service::property::PropertyService;

use crate::openapi::ApiDoc;

pub mod properties;
pub mod users;

pub type Auth = AuthService<SeaOrmCredentialRepository>;
pub type Properties = PropertyService<SeaOrmPropertyRepository, SeaOrmCredentialRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<Auth>,
    pub properties: Arc<Properties>,
}

impl ServerState {
    /// Wire both services onto one connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        let creds = Arc::new(SeaOrmCredentialRepository { db: db.clone() });
        let props = Arc::new(SeaOrmPropertyRepository { db });
        Self {
            auth: Arc::new(AuthService::new(creds.clone())),
            properties: Arc::new(PropertyService::new(props, creds)),
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: property CRUD, user management, health and docs
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let property_routes = Router::new()
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            get(properties::get).put(properties::update).delete(properties::delete),
        );

    let user_routes = Router::new()
        .route("/users", post(users::register))
        .route("/users/validate", post(users::validate))
        .route("/users/:username", axum::routing::delete(users::delete))
        .route("/users/:username/properties", get(users::properties));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(property_routes)
        .merge(user_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，级别 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应时记录状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx 以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
