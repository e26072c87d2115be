//! API layer - axum routes, handlers and shared types

pub mod admin;
pub mod health;
pub mod participants;
pub mod router;
pub mod state;
pub mod teams;
pub mod types;

pub use router::create_router;
pub use state::AppState;
