//! Notifier — dispatches the good-match summary after a successful run.
//!
//! A failed send never fails the run; the workflow records `email_sent = false`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::job_match::MatchResult;

pub mod email;
pub mod handlers;
pub mod smtp;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email notifications are not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Send failed: {0}")]
    Send(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        matches: &[MatchResult],
        threshold: u8,
    ) -> Result<(), NotifyError>;
}

/// Used when no SMTP server is configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _: &str, _: &[MatchResult], _: u8) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}
