use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Top level configuration for the monitor.
/// Read once at startup and held for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds to sleep between two rounds over all targets.
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,

    /// Minutes between two alerts for the same failing target.
    #[serde(default)]
    pub notification_interval: u64,

    /// Maximum number of failure alerts sent per failure episode.
    #[serde(default = "default_max_notifications")]
    pub max_notifications: u32,

    /// Optional HTTP timeout for a single probe. The client default applies when unset.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    pub targets: Vec<TargetConfig>,

    pub email_notification: EmailNotification,
}

/// A monitored endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// The URL that is fetched on every round.
    pub host: String,

    /// The status code a healthy target answers with.
    /// Defaults to 200 if not specified.
    #[serde(default = "default_status_code")]
    pub expected_status_code: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailNotification {
    pub from: EmailSender,
    #[serde(default)]
    pub to: Vec<String>,
}

/// Credentials and relay for outgoing mail.
#[derive(Clone, Deserialize)]
pub struct EmailSender {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub user: String,
    pub password: String,
    /// Display name used in the From header.
    #[serde(default)]
    pub name: String,
}

impl std::fmt::Debug for EmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSender")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

fn default_ping_interval() -> u64 {
    60
}

fn default_max_notifications() -> u32 {
    3
}

fn default_status_code() -> u16 {
    200
}

impl Config {
    /// Check every target host and status code before the monitor starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for target in &self.targets {
            target.validate()?;
        }
        Ok(())
    }
}

impl TargetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTarget {
            host: self.host.clone(),
            reason,
        };

        let url = Url::parse(&self.host).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !(100..=599).contains(&self.expected_status_code) {
            return Err(invalid(format!(
                "expected_status_code {} is not an HTTP status code",
                self.expected_status_code
            )));
        }
        Ok(())
    }
}
