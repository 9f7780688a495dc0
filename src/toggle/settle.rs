use crate::config::{SettleMode, ToggleConfig};
use std::time::Duration;

/// How long to wait after a start/stop before reporting the new status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStrategy {
    /// Sleep once, then re-read
    Fixed(Duration),
    /// Re-read with backoff until the expected state shows up or the deadline passes
    Poll(PollSettings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub deadline: Duration,
}

impl PollSettings {
    /// Interval before the `attempt`-th re-read (0-based), doubling up to `max_interval`
    pub fn interval(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_interval
            .saturating_mul(factor)
            .min(self.max_interval.max(self.initial_interval))
    }
}

impl SettleStrategy {
    pub fn from_config(config: &ToggleConfig) -> Self {
        match config.settle_mode {
            SettleMode::Fixed => Self::Fixed(Duration::from_millis(config.settle_delay_ms)),
            SettleMode::Poll => Self::Poll(PollSettings {
                initial_interval: Duration::from_millis(config.poll_initial_ms),
                max_interval: Duration::from_millis(config.poll_max_interval_ms),
                deadline: Duration::from_millis(config.poll_deadline_ms),
            }),
        }
    }
}

impl Default for SettleStrategy {
    fn default() -> Self {
        Self::Fixed(Duration::from_millis(600))
    }
}
