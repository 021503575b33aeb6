//! Calendar schedule for periodic refresh.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use crate::coordinator::RefreshCoordinator;

/// Fires at minute 0 of every hour divisible by `every_hours`, in UTC.
///
/// The default, every 3 hours, corresponds to the cron expression
/// `0 */3 * * *`. As with cron, the cycle restarts at midnight when
/// `every_hours` does not divide 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    every_hours: u32,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self { every_hours: 3 }
    }
}

impl RefreshSchedule {
    /// Every `hours` hours, clamped to 1..=24.
    pub fn every_hours(hours: u32) -> Self {
        Self {
            every_hours: hours.clamp(1, 24),
        }
    }

    pub fn interval_hours(&self) -> u32 {
        self.every_hours
    }

    /// First fire time strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let mut candidate = after
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0))
            .unwrap_or(after);

        loop {
            candidate += TimeDelta::hours(1);
            if candidate.hour() % self.every_hours == 0 {
                return candidate;
            }
        }
    }
}

/// Run `coordinator.scheduled_refresh()` at every fire time of `schedule`
/// until `shutdown` resolves.
///
/// A refresh that has started runs to completion before shutdown is
/// observed.
pub async fn run_schedule<F>(coordinator: &RefreshCoordinator, schedule: RefreshSchedule, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let now = Utc::now();
        let next = schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::info!(next = %next.to_rfc3339(), "Next translation refresh scheduled");

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("Refresh schedule stopped");
                return;
            }
            _ = tokio::time::sleep(wait) => {
                coordinator.scheduled_refresh().await;
            }
        }
    }
}
