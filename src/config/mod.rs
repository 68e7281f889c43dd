pub mod app_config;
pub mod model;

pub use app_config::{AppConfig, load_config};
pub use model::{Config, EmailNotification, EmailSender, TargetConfig};
