//! Participant infrastructure - repository implementations

pub mod postgres_repository;
pub mod repository;

pub use postgres_repository::PostgresParticipantRepository;
pub use repository::InMemoryParticipantRepository;
