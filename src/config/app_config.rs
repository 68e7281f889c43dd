use std::env;
use std::path::Path;

use unicode_width::UnicodeWidthStr;

use super::model::{Config, TargetConfig};
use crate::error::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "conf.yml";
const MAX_HOST_WIDTH: usize = 48;

pub struct AppConfig {
    pub config: Config,
    pub max_host_width: usize,
}

/// Load the application configuration from a YAML file and environment variables
/// This function reads the configuration file specified by the `CONFIG_FILE` environment variable,
/// parses it into a `Config` struct, and overrides the SMTP password with `SMTP_PASSWORD` when set.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_file =
        env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let password_override = env::var("SMTP_PASSWORD").ok();

    let config = read_config(Path::new(&config_file), password_override)?;

    log::info!(
        "Loaded {} targets from {}, ping interval {}s, notification interval {}m",
        config.targets.len(),
        config_file,
        config.ping_interval,
        config.notification_interval
    );
    if config.email_notification.to.is_empty() {
        log::warn!("No notification recipients configured, alerts will only be logged");
    }

    let max_host_width = host_column_width(&config.targets);

    Ok(AppConfig {
        config,
        max_host_width,
    })
}

/// Display width of the widest host, capped so log lines stay readable.
pub fn host_column_width(targets: &[TargetConfig]) -> usize {
    targets
        .iter()
        .map(|t| t.host.as_str().width())
        .max()
        .unwrap_or(10)
        .min(MAX_HOST_WIDTH)
}

/// Read, parse and validate a config file.
pub fn read_config(path: &Path, password_override: Option<String>) -> Result<Config, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mut config: Config = serde_yaml::from_str(&config_str)?;
    if let Some(password) = password_override {
        config.email_notification.from.password = password;
    }
    config.validate()?;

    Ok(config)
}
