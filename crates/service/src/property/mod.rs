//! Property listings: the store abstraction and the ownership-guarded CRUD service.

pub mod repository;
pub mod service;

pub use service::PropertyService;
