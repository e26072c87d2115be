//! Shared API types - envelope, errors and the JSON extractor

pub mod error;
pub mod json;
pub mod response;

pub use error::{ApiError, ApiErrorBody};
pub use json::Json;
pub use response::ApiResponse;
