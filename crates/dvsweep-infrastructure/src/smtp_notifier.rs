//! SMTP notifier implementation.

use async_trait::async_trait;
use dvsweep_core::config::SmtpConfig;
use dvsweep_core::error::{Result, SweepError};
use dvsweep_core::notify::{Notification, Notifier};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Delivers notifications over an authenticated SMTP relay.
///
/// Recipients are resolved once at construction; every notification of a
/// run goes to the same set.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                SweepError::config(format!("invalid SMTP relay '{}': {}", config.host, e))
            })?
            .port(config.port);

        if let Some(password) = &config.password {
            builder =
                builder.credentials(Credentials::new(config.username.clone(), password.clone()));
        }

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| SweepError::config(format!("invalid sender '{}': {}", config.from, e)))?;

        let mut recipients = Vec::with_capacity(config.recipients.len());
        for address in &config.recipients {
            recipients.push(address.parse().map_err(|e| {
                SweepError::config(format!("invalid recipient '{}': {}", address, e))
            })?);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            recipients,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let message = builder
            .body(notification.body.clone())
            .map_err(|e| SweepError::notification(format!("failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| SweepError::notification(format!("SMTP delivery failed: {}", e)))?;

        tracing::debug!(subject = %notification.subject, "notification delivered");
        Ok(())
    }
}
