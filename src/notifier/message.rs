use std::collections::BTreeMap;

use mail_builder::MessageBuilder;
use mail_builder::headers::address::Address;
use mail_builder::headers::raw::Raw;

const SUBJECT_HEADER: &str = "Subject";
const MAILER_HEADER: &str = "X-Mailer";

/// A single outgoing email, kept structured until it is handed to the SMTP client.
///
/// Sender and recipient live beside the header map because `mail-builder` needs
/// them as addresses, not as raw header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct MailMessageBuilder {
    from_name: String,
    from_address: String,
    to: String,
    headers: BTreeMap<String, String>,
    body: String,
}

impl MailMessage {
    pub fn builder() -> MailMessageBuilder {
        MailMessageBuilder::default().header(
            MAILER_HEADER,
            concat!("oxywatch/", env!("CARGO_PKG_VERSION")),
        )
    }

    pub fn subject(&self) -> Option<&str> {
        self.headers.get(SUBJECT_HEADER).map(String::as_str)
    }

    /// Convert into a `mail-builder` message ready for the wire.
    pub fn to_builder(&self) -> MessageBuilder<'_> {
        let from: Address<'_> = if self.from_name.is_empty() {
            self.from_address.as_str().into()
        } else {
            (self.from_name.as_str(), self.from_address.as_str()).into()
        };

        let mut builder = MessageBuilder::new()
            .from(from)
            .to(self.to.as_str())
            .text_body(self.body.as_str());

        for (name, value) in &self.headers {
            builder = if name == SUBJECT_HEADER {
                builder.subject(value.as_str())
            } else {
                builder.header(name.as_str(), Raw::new(value.as_str()))
            };
        }
        builder
    }
}

impl MailMessageBuilder {
    pub fn from(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.from_name = name.into();
        self.from_address = address.into();
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = address.into();
        self
    }

    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.header(SUBJECT_HEADER, subject)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> MailMessage {
        MailMessage {
            from_name: self.from_name,
            from_address: self.from_address,
            to: self.to,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MailMessage {
        MailMessage::builder()
            .from("Uptime", "alerts@example.com")
            .to("ops@example.com")
            .subject("Healthcheck fail: http://a.test")
            .body("Status code (500) is not expected (200)")
            .build()
    }

    #[test]
    fn test_builder_keeps_headers_and_body_apart() {
        let message = sample();
        assert_eq!(message.subject(), Some("Healthcheck fail: http://a.test"));
        assert!(message.headers.contains_key(MAILER_HEADER));
        assert_eq!(message.body, "Status code (500) is not expected (200)");
        assert!(!message.headers.values().any(|v| v.contains("not expected")));
    }

    #[test]
    fn test_rendered_message_contains_headers_and_body() {
        let rendered = sample()
            .to_builder()
            .write_to_string()
            .expect("message renders");

        assert!(rendered.contains("Subject: Healthcheck fail: http://a.test"));
        assert!(rendered.contains("alerts@example.com"));
        assert!(rendered.contains("Uptime"));
        assert!(rendered.contains("ops@example.com"));
        assert!(rendered.contains("X-Mailer: oxywatch/"));
        assert!(rendered.contains("Status code (500) is not expected (200)"));
    }

    #[test]
    fn test_rendered_message_without_display_name() {
        let message = MailMessage::builder()
            .from("", "alerts@example.com")
            .to("ops@example.com")
            .subject("Back to normal: http://a.test")
            .body("All OK")
            .build();
        let rendered = message.to_builder().write_to_string().expect("message renders");
        assert!(rendered.contains("alerts@example.com"));
        assert!(rendered.contains("All OK"));
    }
}
