//! Error types shared across the monitor.

use thiserror::Error;

/// Errors raised while loading the configuration file. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid target {host}: {reason}")]
    InvalidTarget { host: String, reason: String },

    #[error("no targets configured")]
    NoTargets,
}

/// A probe that could not complete (DNS, connect, timeout, body read).
#[derive(Debug, Error)]
#[error("request to {url} failed")]
pub struct ProbeError {
    pub url: String,
    #[source]
    pub source: reqwest::Error,
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not connect to SMTP relay {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: mail_send::Error,
    },

    #[error("failed to send notification to {recipient}")]
    Send {
        recipient: String,
        #[source]
        source: mail_send::Error,
    },
}
