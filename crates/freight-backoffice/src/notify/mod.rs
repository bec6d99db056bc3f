//! Outbound email dispatch.
//!
//! Messages go out through one of two interchangeable providers selected by
//! configuration (Resend or SendGrid); a configuration switch can disable
//! sending entirely for non-production environments. The workflows depend on
//! the [`Mailer`] trait so tests can record or fail dispatches without a
//! network.

mod dispatcher;
mod router;
mod templates;

pub use dispatcher::EmailDispatcher;
pub use router::{notify_router, NotifyState};
pub use templates::review_invitation;

use async_trait::async_trait;

/// A fully rendered outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivery capability: attempt to send one message, report success/failure.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{provider} API key not configured")]
    NotConfigured { provider: &'static str },
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("{provider} rejected the message with status {status}")]
    Rejected { provider: &'static str, status: u16 },
}
