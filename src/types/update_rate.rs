//! Delivery rate for record subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscription yields records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every record the source produces
    Native,

    /// At most `hz` records per second, latest wins
    Max(u32),
}

impl UpdateRate {
    /// Rate matching a `frequencyHz` entry of the game config, where 0 means "every frame".
    pub fn from_hz(hz: u32) -> Self {
        if hz == 0 { UpdateRate::Native } else { UpdateRate::Max(hz) }
    }

    /// Collapse to `Native` when the cap is not below the source rate.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if f64::from(hz) >= source_hz => UpdateRate::Native,
            other => other,
        }
    }

    /// Sampling period once normalized, `None` for native delivery.
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}
