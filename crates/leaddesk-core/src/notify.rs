//! New-lead notifications.
//!
//! The [`Notifier`] trait is the seam between the intake pipeline and the
//! mail provider. The service dispatches notifications on a spawned task,
//! so a notifier may be slow or fail without touching the HTTP response.
//!
//! - [`SmtpNotifier`] sends a plain-text mail through an SMTP relay using
//!   `lettre`. The transport (and its connection pool) is built once.
//! - [`NoopNotifier`] drops notifications; used when mail is not configured.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use leaddesk_storage::LeadRecord;

use crate::error::NotifyError;
use crate::lead::NOT_PROVIDED;

/// The fields of a new lead that go into a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadNotification {
    pub lead_id: String,
    pub name: String,
    pub contact: String,
    pub linkedin: Option<String>,
    pub naukri: Option<String>,
    pub has_resume: bool,
}

impl From<&LeadRecord> for LeadNotification {
    fn from(r: &LeadRecord) -> Self {
        Self {
            lead_id: r.id.clone(),
            name: r.name.clone(),
            contact: r.contact.clone(),
            linkedin: r.linkedin.clone(),
            naukri: r.naukri.clone(),
            has_resume: r.resume.is_some(),
        }
    }
}

impl LeadNotification {
    #[must_use]
    pub fn subject(&self) -> String {
        format!("New Lead: {}", self.name)
    }

    #[must_use]
    pub fn body(&self) -> String {
        format!(
            "You have a new lead!\n\n\
             Name: {}\n\
             Contact: {}\n\
             LinkedIn: {}\n\
             Naukri: {}\n\
             Resume: {}\n",
            self.name,
            self.contact,
            self.linkedin.as_deref().unwrap_or(NOT_PROVIDED),
            self.naukri.as_deref().unwrap_or(NOT_PROVIDED),
            if self.has_resume { "Attached" } else { NOT_PROVIDED },
        )
    }
}

/// Delivers new-lead notifications somewhere.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one notification.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] describing why delivery failed.
    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError>;
}

/// SMTP relay settings for [`SmtpNotifier`].
#[derive(Clone)]
pub struct MailConfig {
    pub relay_host: String,
    pub username: String,
    pub password: String,
    /// Sender address; usually the SMTP username.
    pub from: String,
    /// Admin address receiving notifications.
    pub to: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("relay_host", &self.relay_host)
            .field("username", &self.username)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Sends notifications as plain-text mail through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport. No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidAddress`] for an unparseable sender or
    /// recipient, or [`NotifyError::Relay`] if the relay host is unusable.
    pub fn new(config: MailConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.from)?;
        let to = parse_mailbox(&config.to)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay_host)
            .map_err(|e| NotifyError::Relay {
                host: config.relay_host.clone(),
                reason: e.to_string(),
            })?
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from, to })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(lead.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(lead.body())
            .map_err(|e| NotifyError::Message {
                reason: e.to_string(),
            })?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Delivery {
                reason: e.to_string(),
            })?;

        tracing::debug!(
            lead_id = %lead.lead_id,
            code = %response.code(),
            "smtp relay accepted notification"
        );
        Ok(())
    }
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .finish_non_exhaustive()
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        tracing::debug!(lead_id = %lead.lead_id, "mail not configured, notification dropped");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn note(has_resume: bool) -> LeadNotification {
        LeadNotification {
            lead_id: "id-1".to_owned(),
            name: "Kiran Das".to_owned(),
            contact: "9123456780".to_owned(),
            linkedin: Some("https://linkedin.com/in/kiran".to_owned()),
            naukri: None,
            has_resume,
        }
    }

    #[test]
    fn subject_names_the_lead() {
        assert_eq!(note(false).subject(), "New Lead: Kiran Das");
    }

    #[test]
    fn body_lists_all_fields() {
        let body = note(true).body();
        assert!(body.contains("Name: Kiran Das\n"));
        assert!(body.contains("Contact: 9123456780\n"));
        assert!(body.contains("LinkedIn: https://linkedin.com/in/kiran\n"));
        assert!(body.contains("Naukri: Not provided\n"));
        assert!(body.contains("Resume: Attached\n"));
    }

    #[test]
    fn body_without_resume_says_not_provided() {
        assert!(note(false).body().contains("Resume: Not provided"));
    }

    #[test]
    fn smtp_notifier_rejects_bad_recipient() {
        let err = SmtpNotifier::new(MailConfig {
            relay_host: "smtp.example.com".to_owned(),
            username: "bot@example.com".to_owned(),
            password: "pw".to_owned(),
            from: "bot@example.com".to_owned(),
            to: "not an address".to_owned(),
        })
        .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { ref address, .. } if address == "not an address"));
    }

    #[test]
    fn mail_config_debug_hides_password() {
        let cfg = MailConfig {
            relay_host: "smtp.example.com".to_owned(),
            username: "bot@example.com".to_owned(),
            password: "topsecret".to_owned(),
            from: "bot@example.com".to_owned(),
            to: "admin@example.com".to_owned(),
        };
        assert!(!format!("{cfg:?}").contains("topsecret"));
    }

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        NoopNotifier.notify(&note(false)).await.unwrap();
    }
}
