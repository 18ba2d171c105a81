//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Owns the credential store (username -> password hash) and the hashing scheme.

pub mod domain;
pub mod errors;
pub mod hashing;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
