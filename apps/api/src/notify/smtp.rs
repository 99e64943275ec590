use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use crate::config::SmtpSettings;
use crate::models::job_match::MatchResult;
use crate::notify::email::{render_html, render_subject, render_text};
use crate::notify::{Notifier, NotifyError};

const FROM_NAME: &str = "JobScout";

/// STARTTLS SMTP notifier. The connection is opened lazily on first send.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let from_mailbox = parse_mailbox(&format!("{FROM_NAME} <{}>", settings.from_address))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| NotifyError::Send(format!("invalid SMTP relay: {e}")))?
            .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        debug!(host = %settings.host, port = settings.port, "SMTP notifier initialized");

        Ok(Self {
            transport: builder.build(),
            from_mailbox,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        recipient: &str,
        matches: &[MatchResult],
        threshold: u8,
    ) -> Result<(), NotifyError> {
        let message = build_message(self.from_mailbox.clone(), recipient, matches, threshold)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        info!(to = %recipient, matches = matches.len(), "Match email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e| NotifyError::Address(format!("{address}: {e}")))
}

fn build_message(
    from: Mailbox,
    recipient: &str,
    matches: &[MatchResult],
    threshold: u8,
) -> Result<Message, NotifyError> {
    Message::builder()
        .from(from)
        .to(parse_mailbox(recipient)?)
        .subject(render_subject(matches, threshold))
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(render_text(matches, threshold)),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(render_html(matches, threshold)),
                ),
        )
        .map_err(|e| NotifyError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Mailbox {
        parse_mailbox("JobScout <alerts@example.com>").unwrap()
    }

    #[test]
    fn test_invalid_recipient_is_address_error() {
        let err = build_message(sender(), "not an address", &[], 7).unwrap_err();
        assert!(matches!(err, NotifyError::Address(_)));
    }

    #[test]
    fn test_message_builds_for_valid_recipient() {
        let message = build_message(sender(), "dev@example.com", &[], 7).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: dev@example.com"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn test_notifier_builds_from_settings() {
        let settings = SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: Some("alerts@example.com".to_string()),
            password: Some("secret".to_string()),
            from_address: "alerts@example.com".to_string(),
        };
        assert!(SmtpNotifier::new(&settings).is_ok());
    }
}
