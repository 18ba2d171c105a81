use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Listing fields accepted on create and update. Any `id` or `owner` sent is ignored.
#[derive(ToSchema)]
pub struct PropertyRequest {
    pub address: String,
    #[schema(minimum = 1)]
    pub price: i32,
    #[schema(minimum = 1)]
    pub size: i32,
    #[schema(max_length = 500)]
    pub description: String,
}

#[derive(ToSchema)]
pub struct PropertyDoc {
    pub id: i32,
    pub address: String,
    pub price: i32,
    pub size: i32,
    pub description: String,
    pub owner: String,
}

#[derive(ToSchema)]
pub struct CredentialsRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct PasswordRequest { pub password: String }

#[derive(ToSchema)]
pub struct UserDoc { pub username: String }

#[derive(ToSchema)]
pub struct ValidateDoc { pub valid: bool }

#[derive(ToSchema)]
pub struct ViolationDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub violations: Option<Vec<ViolationDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::properties::create,
        crate::routes::properties::list,
        crate::routes::properties::get,
        crate::routes::properties::update,
        crate::routes::properties::delete,
        crate::routes::users::register,
        crate::routes::users::validate,
        crate::routes::users::properties,
        crate::routes::users::delete,
    ),
    components(
        schemas(
            HealthResponse,
            PropertyRequest,
            PropertyDoc,
            CredentialsRequest,
            PasswordRequest,
            UserDoc,
            ValidateDoc,
            ViolationDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "properties"),
        (name = "users")
    )
)]
pub struct ApiDoc;
