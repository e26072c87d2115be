//! Admin infrastructure - repositories and operations service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresAdminRepository;
pub use repository::InMemoryAdminRepository;
pub use service::{AdminService, BulkSendReport};
