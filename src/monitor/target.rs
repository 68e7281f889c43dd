//! Per-target health state and the rules deciding when to notify.
//!
//! A target is either healthy (`current_status` is `None`) or failing, in
//! which case `current_status` holds the description of the last failure.
//! Failure alerts are throttled per episode: at most one per
//! `notification_interval`, and never more than `max_notifications` until the
//! target recovers.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::TargetConfig;
use crate::http_probe::prelude::*;

/// Throttling rules for repeat failure alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub notification_interval: TimeDelta,
    pub max_notifications: u32,
}

impl ThrottlePolicy {
    /// `notification_interval` is given in minutes, as in the config file.
    pub fn new(notification_interval_minutes: u64, max_notifications: u32) -> Self {
        let minutes = i64::try_from(notification_interval_minutes).unwrap_or(i64::MAX);
        Self {
            notification_interval: TimeDelta::try_minutes(minutes).unwrap_or(TimeDelta::MAX),
            max_notifications,
        }
    }
}

/// Why a single check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// The probe could not complete. Holds the rendered error chain.
    Transport(String),
    StatusMismatch { expected: u16, actual: u16 },
    NullResponse,
}

/// The result of one check against a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Healthy,
    Failing(CheckFailure),
}

/// An alert the scheduler should hand to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Target {
    host: String,
    expected_status_code: u16,
    current_status: Option<String>,
    notifications_count: u32,
    last_notification: Option<DateTime<Utc>>,
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        Self::new(config.host.clone(), config.expected_status_code)
    }
}

impl Target {
    pub fn new(host: impl Into<String>, expected_status_code: u16) -> Self {
        Self {
            host: host.into(),
            expected_status_code,
            current_status: None,
            notifications_count: 0,
            last_notification: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Description of the last failure, `None` while healthy.
    pub fn current_status(&self) -> Option<&str> {
        self.current_status.as_deref()
    }

    pub fn is_failing(&self) -> bool {
        self.current_status.is_some()
    }

    pub fn notifications_count(&self) -> u32 {
        self.notifications_count
    }

    pub fn last_notification(&self) -> Option<DateTime<Utc>> {
        self.last_notification
    }

    /// Turn a probe result into a check outcome for this target.
    pub fn classify(
        &self,
        probe: &Result<Option<ProbeResponse>, ProbeError>,
    ) -> CheckOutcome {
        match probe {
            Err(e) => CheckOutcome::Failing(CheckFailure::Transport(report(&e.source))),
            Ok(None) => CheckOutcome::Failing(CheckFailure::NullResponse),
            Ok(Some(response)) if response.status_code != self.expected_status_code => {
                CheckOutcome::Failing(CheckFailure::StatusMismatch {
                    expected: self.expected_status_code,
                    actual: response.status_code,
                })
            }
            Ok(Some(_)) => CheckOutcome::Healthy,
        }
    }

    /// The text stored in `current_status` and used as the alert body.
    pub fn describe(&self, failure: &CheckFailure) -> String {
        match failure {
            CheckFailure::Transport(reason) => {
                format!("Ping failed for target {} due {}", self.host, reason)
            }
            CheckFailure::StatusMismatch { expected, actual } => {
                format!("Status code ({actual}) is not expected ({expected})")
            }
            CheckFailure::NullResponse => {
                format!("Got null response from target: {}", self.host)
            }
        }
    }

    /// Apply one check outcome and return the alert to send, if any.
    ///
    /// Counters are updated as soon as an alert is decided, so a failed
    /// delivery still counts against the throttle.
    pub fn record(
        &mut self,
        outcome: CheckOutcome,
        policy: &ThrottlePolicy,
        now: DateTime<Utc>,
    ) -> Option<Notification> {
        match outcome {
            CheckOutcome::Failing(failure) => {
                let description = self.describe(&failure);
                let notification = if self.may_alert(policy, now) {
                    let mut subject = format!("Healthcheck fail: {}", self.host);
                    if self.is_failing() {
                        subject.insert_str(0, "REMINDER: ");
                    }
                    self.last_notification = Some(now);
                    self.notifications_count += 1;
                    Some(Notification {
                        subject,
                        body: description.clone(),
                    })
                } else {
                    log::debug!(
                        "Alert for {} suppressed ({}/{} sent this episode)",
                        self.host,
                        self.notifications_count,
                        policy.max_notifications
                    );
                    None
                };
                self.current_status = Some(description);
                notification
            }
            CheckOutcome::Healthy => {
                self.current_status.take()?;
                self.notifications_count = 0;
                Some(Notification {
                    subject: format!("Back to normal: {}", self.host),
                    body: format!("All OK: {} back to normal", self.host),
                })
            }
        }
    }

    fn may_alert(&self, policy: &ThrottlePolicy, now: DateTime<Utc>) -> bool {
        let window_elapsed = match self.last_notification {
            None => true,
            Some(last) => now.signed_duration_since(last) >= policy.notification_interval,
        };
        window_elapsed && self.notifications_count < policy.max_notifications
    }
}
