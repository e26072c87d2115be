//! Outbound email abstraction
//!
//! Sends are fire-and-forget: a failed send returns `false` and is logged by
//! the caller, but never rolls back the state change that triggered it.

use async_trait::async_trait;
use std::fmt::Debug;

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait for outbound email delivery
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    /// Deliver a message, returning whether the send succeeded
    async fn send(&self, message: &EmailMessage) -> bool;
}

/// Development mailer that logs instead of sending
#[derive(Debug, Clone, Default)]
pub struct TracingMailer;

impl TracingMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, message: &EmailMessage) -> bool {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Email send (log-only mailer)"
        );
        true
    }
}
