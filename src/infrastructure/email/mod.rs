//! Outbound email - trait, delivery backends and templates

pub mod http;
pub mod mailer;
pub mod templates;

pub use http::HttpApiMailer;
pub use mailer::{EmailMessage, Mailer, TracingMailer};
