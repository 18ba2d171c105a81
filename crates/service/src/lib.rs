//! Service layer providing business-oriented operations on top of models.
//! - `auth`: credential store and password hashing.
//! - `property`: property store and the ownership-guarded CRUD service.
//! - Repository traits keep the services independent of SeaORM; mocks live next to each trait.

pub mod errors;
pub mod auth;
pub mod property;
#[cfg(test)]
pub mod test_support;
