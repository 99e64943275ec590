use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::job_match::{MatchKind, MatchResult};
use crate::notify::{Notifier, NotifyError};
use crate::state::AppState;
use crate::store::ConfigProvider;

#[derive(Serialize)]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/test-email
///
/// Sends one sample match to the configured recipient to check SMTP delivery.
pub async fn handle_test_email(
    State(state): State<AppState>,
) -> Result<Json<TestEmailResponse>, AppError> {
    let config = state.store.current().await?;
    let message = send_test_email(state.notifier.as_ref(), &config.recipient).await?;
    Ok(Json(TestEmailResponse {
        success: true,
        message,
    }))
}

pub async fn send_test_email(
    notifier: &dyn Notifier,
    recipient: &str,
) -> Result<String, NotifyError> {
    notifier.send(recipient, &[sample_match()], 0).await?;
    info!("Test email sent to {recipient}");
    Ok(format!("Test email sent to {recipient}!"))
}

fn sample_match() -> MatchResult {
    MatchResult {
        job_title: "Test Job".to_string(),
        company: "Test Company".to_string(),
        employment_type: "Full-time".to_string(),
        remote: "Yes".to_string(),
        salary: "$100,000".to_string(),
        benefits: String::new(),
        responsibilities: String::new(),
        qualifications: "Test qualifications".to_string(),
        apply_links: vec!["https://example.com".to_string()],
        match_score: 5,
        match_reason: "This is a test email".to_string(),
        kind: MatchKind::Scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DisabledNotifier;
    use crate::workflow::testing::RecordingNotifier;

    #[tokio::test]
    async fn test_sends_one_sample_match_with_zero_threshold() {
        let notifier = RecordingNotifier::default();

        let message = send_test_email(&notifier, "dev@example.com").await.unwrap();

        assert_eq!(message, "Test email sent to dev@example.com!");
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "dev@example.com");
        assert_eq!(sent[0].threshold, 0);
        assert_eq!(sent[0].matches.len(), 1);
        assert_eq!(sent[0].matches[0].job_title, "Test Job");
        assert_eq!(sent[0].matches[0].match_reason, "This is a test email");
    }

    #[tokio::test]
    async fn test_unconfigured_smtp_is_reported() {
        let err = send_test_email(&DisabledNotifier, "dev@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
    }

    #[tokio::test]
    async fn test_send_failure_is_returned() {
        let err = send_test_email(&RecordingNotifier::failing(), "dev@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Send(_)));
    }
}
