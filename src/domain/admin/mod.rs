//! Admin domain - entity, validation and repository trait

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{Admin, AdminEntityError, AdminId};
pub use repository::AdminRepository;
pub use validation::{validate_password, validate_username, AdminValidationError};
