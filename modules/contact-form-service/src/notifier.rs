//! Email notifications for query updates.

use crate::config::EmailConfig;
use crate::error::NotifyError;
use async_trait::async_trait;
use contact_form_types::VisitorRecord;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Picks the SMTP notifier when email is configured, otherwise one that
/// fails every send.
pub fn from_config(email: Option<&EmailConfig>) -> Result<Arc<dyn Notifier>, NotifyError> {
    match email {
        Some(cfg) => Ok(Arc::new(SmtpNotifier::new(cfg)?)),
        None => Ok(Arc::new(UnconfiguredNotifier)),
    }
}

/// Subject and body of the email sent when a visitor asks to be contacted by email.
pub fn compose_query_email(record: &VisitorRecord, message: &str) -> (String, String) {
    let subject = format!("New Query from {}", record.name);
    let body = format!(
        "You received a new query via Email.\n\
         \n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         \n\
         Message:\n\
         {}\n\
         \n\
         Query ID: {}",
        record.name, record.email, record.phone, message, record.query_id
    );
    (subject, body.trim().to_string())
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(cfg: &EmailConfig) -> Result<Self, NotifyError> {
        let from = cfg
            .sender
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Message(format!("sender {}: {}", cfg.sender, e)))?;
        let to = cfg
            .receiver
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Message(format!("receiver {}: {}", cfg.receiver, e)))?;

        // Implicit TLS, as on port 465
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.sender.clone(), cfg.password.clone()))
            .build();

        Ok(Self { transport, from, to })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        log::info!("Sent notification email \"{}\"", subject);
        Ok(())
    }
}

pub struct UnconfiguredNotifier;

#[async_trait]
impl Notifier for UnconfiguredNotifier {
    async fn send(&self, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VisitorRecord {
        VisitorRecord {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            message: String::new(),
            source: "form".to_string(),
            timestamp: "2025-03-04T10:20:30.123456+00:00".to_string(),
            query_method: Vec::new(),
            query_id: "22c53f2544".to_string(),
            id: "22c53f2544".to_string(),
        }
    }

    #[test]
    fn test_compose_query_email() {
        let (subject, body) = compose_query_email(&record(), "Please call me back");
        assert_eq!(subject, "New Query from Jane");
        assert_eq!(
            body,
            "You received a new query via Email.\n\n\
             Name: Jane\n\
             Email: jane@example.com\n\
             Phone: +1 555 0100\n\n\
             Message:\n\
             Please call me back\n\n\
             Query ID: 22c53f2544"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_fails() {
        let notifier = from_config(None).unwrap();
        let err = notifier.send("s", "b").await.unwrap_err();
        assert!(matches!(err, NotifyError::Unconfigured));
    }

    #[test]
    fn test_smtp_notifier_rejects_bad_sender() {
        let cfg = EmailConfig {
            sender: "not an address".to_string(),
            password: "pw".to_string(),
            receiver: "inbox@example.com".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
        };
        assert!(matches!(
            SmtpNotifier::new(&cfg),
            Err(NotifyError::Message(_))
        ));
    }
}
