//! SMTP email notifier via `lettre` with TLS support.
//!
//! Messages go out as `text/html` to every address of the configured
//! semicolon-delimited recipient list. Port 465 uses implicit TLS; any other
//! port uses STARTTLS unless TLS is switched off.

use comunica_core::config::DeliveryConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::traits::{Notification, Notifier, NotifyError};

/// Sends notifications as emails via SMTP.
#[derive(Debug)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from explicit SMTP settings.
    ///
    /// `credentials` is `(username, password)`; without it the connection is
    /// unauthenticated.
    pub fn from_config(
        smtp_host: &str,
        smtp_port: u16,
        tls: bool,
        from: &str,
        to: &[String],
        credentials: Option<(String, String)>,
    ) -> Result<Self, NotifyError> {
        let from_mailbox: Mailbox = from
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let to_mailboxes: Vec<Mailbox> = to
            .iter()
            .map(|addr| {
                addr.parse()
                    .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if to_mailboxes.is_empty() {
            return Err(NotifyError::Config(
                "at least one recipient is required".to_string(),
            ));
        }

        let mut builder = if smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(smtp_port)
        } else if tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(smtp_port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host).port(smtp_port)
        };

        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from: from_mailbox,
            to: to_mailboxes,
        })
    }

    /// Build from the delivery section of the process config. The sender
    /// address doubles as the SMTP login.
    pub fn from_delivery(config: &DeliveryConfig) -> Result<Self, NotifyError> {
        let sender = config
            .sender
            .as_deref()
            .ok_or_else(|| NotifyError::Config("EMAIL_REMETENTE is not set".to_string()))?;
        let credentials = config
            .sender_password
            .as_ref()
            .map(|password| (sender.to_string(), password.clone()));
        Self::from_config(
            &config.smtp_host,
            config.smtp_port,
            config.smtp_tls,
            sender,
            &config.recipient_list(),
            credentials,
        )
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len()
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut message_builder = Message::builder().from(self.from.clone());

        for recipient in &self.to {
            message_builder = message_builder.to(recipient.clone());
        }

        let email = message_builder
            .subject(&notification.subject)
            .header(ContentType::TEXT_HTML)
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            subject = %notification.subject,
            recipients = self.to.len(),
            "notification delivered"
        );

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}
