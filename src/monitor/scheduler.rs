use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::sleep;

use super::target::{CheckOutcome, Target, ThrottlePolicy};
use super::to_fixed_width;
use crate::config::Config;
use crate::http_probe::prelude::*;
use crate::notifier::Notifier;

/// Pause before each target check within a round.
pub const PACE_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_LABEL_WIDTH: usize = 32;

/// Carries the shutdown signal into the scheduler loop.
pub struct RunContext {
    shutdown: watch::Receiver<bool>,
}

impl RunContext {
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self { shutdown }
    }

    fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleep for `duration` unless shutdown is requested first.
    /// Returns `true` when the loop should stop.
    async fn sleep_or_cancel(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = sleep(duration) => self.is_cancelled(),
            changed = self.shutdown.changed() => {
                // A dropped sender can never signal again, stop as well.
                changed.is_err() || self.is_cancelled()
            }
        }
    }
}

/// Round-robin loop over all targets.
///
/// Owns the targets exclusively and mutates them by index, so no locking is
/// needed. Probes run one at a time in configured order.
pub struct Scheduler<P, N> {
    targets: Vec<Target>,
    policy: ThrottlePolicy,
    ping_interval: Duration,
    pace_delay: Duration,
    label_width: usize,
    prober: P,
    notifier: N,
}

impl<P: Prober, N: Notifier> Scheduler<P, N> {
    pub fn new(
        targets: Vec<Target>,
        policy: ThrottlePolicy,
        ping_interval: Duration,
        prober: P,
        notifier: N,
    ) -> Self {
        Self {
            targets,
            policy,
            ping_interval,
            pace_delay: PACE_DELAY,
            label_width: DEFAULT_LABEL_WIDTH,
            prober,
            notifier,
        }
    }

    pub fn from_config(config: &Config, prober: P, notifier: N) -> Self {
        Self::new(
            config.targets.iter().map(Target::from).collect(),
            ThrottlePolicy::new(config.notification_interval, config.max_notifications),
            Duration::from_secs(config.ping_interval),
            prober,
            notifier,
        )
    }

    pub fn with_pace_delay(mut self, pace_delay: Duration) -> Self {
        self.pace_delay = pace_delay;
        self
    }

    /// Column width used for the host prefix in log lines.
    pub fn with_label_width(mut self, label_width: usize) -> Self {
        self.label_width = label_width;
        self
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Run rounds until the context is cancelled.
    pub async fn run(&mut self, mut ctx: RunContext) {
        log::info!(
            "Monitoring {} targets every {}s",
            self.targets.len(),
            self.ping_interval.as_secs()
        );

        loop {
            if ctx.is_cancelled() {
                break;
            }
            self.run_round().await;
            if ctx.sleep_or_cancel(self.ping_interval).await {
                break;
            }
        }

        log::info!("Shutdown requested, monitor stopped");
    }

    /// Check every target once, in configured order.
    pub async fn run_round(&mut self) {
        for idx in 0..self.targets.len() {
            sleep(self.pace_delay).await;
            self.check_target(idx).await;
        }
    }

    async fn check_target(&mut self, idx: usize) {
        let target = &mut self.targets[idx];
        let label = to_fixed_width(target.host(), self.label_width);

        let probe = self.prober.probe(target.host()).await;
        let outcome = target.classify(&probe);
        match (&outcome, &probe) {
            (CheckOutcome::Healthy, Ok(Some(response))) => {
                log::info!("[{label}] ✅ OK, status {}", response.status_code);
            }
            (CheckOutcome::Failing(failure), _) => {
                log::warn!("[{label}] ❌ {}", target.describe(failure));
            }
            _ => {}
        }

        let Some(notification) = target.record(outcome, &self.policy, Utc::now()) else {
            return;
        };

        log::info!("[{label}] Sending '{}'", notification.subject);
        if let Err(e) = self
            .notifier
            .notify(&notification.subject, &notification.body)
            .await
        {
            log::error!("[{label}] smtp error: {}", report(&e));
        }
    }
}
