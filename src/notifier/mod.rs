pub mod message;
pub mod smtp;

use async_trait::async_trait;

pub use message::MailMessage;
pub use smtp::SmtpNotifier;

use crate::error::NotifyError;

/// Delivers a notification to every configured recipient.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}
