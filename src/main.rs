use std::time::Duration;

use tokio::sync::watch;

use oxywatch::config::load_config;
use oxywatch::http_probe::prelude::*;
use oxywatch::monitor::{RunContext, Scheduler};
use oxywatch::notifier::SmtpNotifier;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // reqwest and mail-send both link rustls, pick the provider explicitly.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("rustls crypto provider already installed");
    }

    let app_config = match load_config() {
        Ok(app_config) => app_config,
        Err(e) => {
            log::error!("Cannot start monitor: {}", report(&e));
            std::process::exit(1);
        }
    };
    let config = app_config.config;

    let prober = match HttpProber::new(config.request_timeout_seconds.map(Duration::from_secs)) {
        Ok(prober) => prober,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", report(&e));
            std::process::exit(1);
        }
    };
    let notifier = SmtpNotifier::new(config.email_notification.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {e}");
            // Keep the sender alive so the monitor is not stopped by accident.
            std::future::pending::<()>().await;
        }
        log::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let mut scheduler = Scheduler::from_config(&config, prober, notifier)
        .with_label_width(app_config.max_host_width);
    scheduler.run(RunContext::new(shutdown_rx)).await;
}
