use async_trait::async_trait;
use mail_send::{Credentials, SmtpClientBuilder};

use super::{MailMessage, Notifier};
use crate::config::EmailNotification;
use crate::error::NotifyError;

/// Port on which relays expect TLS from the first byte. Every other port upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends notifications through an authenticated SMTP relay.
pub struct SmtpNotifier {
    settings: EmailNotification,
}

impl SmtpNotifier {
    pub fn new(settings: EmailNotification) -> Self {
        Self { settings }
    }

    fn message_for(&self, recipient: &str, subject: &str, body: &str) -> MailMessage {
        let sender = &self.settings.from;
        MailMessage::builder()
            .from(sender.name.as_str(), sender.user.as_str())
            .to(recipient)
            .subject(subject)
            .body(body)
            .build()
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    /// One connection per call and one message per recipient, in configured order.
    /// The first failing recipient aborts the remaining sends.
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let recipients = &self.settings.to;
        if recipients.is_empty() {
            log::warn!("No recipients configured, dropping notification '{subject}'");
            return Ok(());
        }

        let sender = &self.settings.from;
        log::debug!(
            "Sending '{subject}' to {} recipients via {}:{}",
            recipients.len(),
            sender.smtp_host,
            sender.smtp_port
        );

        let mut client = SmtpClientBuilder::new(&sender.smtp_host, sender.smtp_port)
            .implicit_tls(sender.smtp_port == IMPLICIT_TLS_PORT)
            .credentials(Credentials::new(&sender.user, &sender.password))
            .connect()
            .await
            .map_err(|source| NotifyError::Connect {
                host: sender.smtp_host.clone(),
                port: sender.smtp_port,
                source,
            })?;

        for recipient in recipients {
            let message = self.message_for(recipient, subject, body);
            client
                .send(message.to_builder())
                .await
                .map_err(|source| NotifyError::Send {
                    recipient: recipient.clone(),
                    source,
                })?;
        }

        if let Err(e) = client.quit().await {
            log::debug!("SMTP QUIT failed after delivery: {e}");
        }

        log::info!("All notifications sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailSender;

    fn settings(port: u16, to: Vec<String>) -> EmailNotification {
        EmailNotification {
            from: EmailSender {
                smtp_host: "127.0.0.1".to_string(),
                smtp_port: port,
                user: "alerts@example.com".to_string(),
                password: "secret".to_string(),
                name: "Uptime".to_string(),
            },
            to,
        }
    }

    #[tokio::test]
    async fn test_no_recipients_is_a_no_op() {
        let notifier = SmtpNotifier::new(settings(1, vec![]));
        assert!(notifier.notify("subject", "body").await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_relay_reports_connect_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let notifier = SmtpNotifier::new(settings(port, vec!["ops@example.com".to_string()]));
        match notifier.notify("subject", "body").await {
            Err(NotifyError::Connect { host, port: p, .. }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(p, port);
            }
            other => panic!("expected connect error, got {other:?}"),
        }
    }

    #[test]
    fn test_message_uses_sender_display_name() {
        let notifier = SmtpNotifier::new(settings(587, vec!["ops@example.com".to_string()]));
        let message = notifier.message_for("ops@example.com", "Back to normal: x", "All OK");
        assert_eq!(message.from_name, "Uptime");
        assert_eq!(message.from_address, "alerts@example.com");
        assert_eq!(message.to, "ops@example.com");
        assert_eq!(message.subject(), Some("Back to normal: x"));
        assert_eq!(message.body, "All OK");
    }
}
