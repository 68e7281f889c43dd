//! Periodic uptime monitor: polls HTTP targets and emails when they fail or recover.

pub mod config;
pub mod error;
pub mod http_probe;
pub mod monitor;
pub mod notifier;
