//! Configuration: the game's `config.json` and replay options.
//!
//! The game decides which packet structure it streams from `config.json`:
//!
//! ```json
//! { "udp": { "packets": [
//!     { "structure": "wrc", "packet": "session_update",
//!       "ip": "127.0.0.1", "port": 20777, "frequencyHz": 60, "bEnabled": true }
//! ] } }
//! ```
//!
//! Socket fields (`ip`, `port`) are carried for callers that own the transport;
//! this crate only uses `structure`, `packet` and `frequencyHz`.

use serde::{Deserialize, Serialize};

use crate::UpdateRate;

/// Structure used when no config selects one.
pub const DEFAULT_STRUCTURE: &str = "wrc";

/// Tick rate assumed for capture replay when none is configured.
pub const DEFAULT_TICK_RATE: f64 = 60.0;

/// The game's telemetry `config.json`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub udp: UdpConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdpConfig {
    #[serde(default)]
    pub packets: Vec<UdpPacketConfig>,
}

/// One configured UDP output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UdpPacketConfig {
    pub structure: String,
    pub packet: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub frequency_hz: u32,
    #[serde(rename = "bEnabled", default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl UdpPacketConfig {
    /// Delivery rate requested by this output.
    pub fn update_rate(&self) -> UpdateRate {
        UpdateRate::from_hz(self.frequency_hz)
    }
}

impl TelemetryConfig {
    /// Parse from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        crate::documents::parse_json("config", text)
    }

    /// First enabled output, restricted to `packet` when given.
    pub fn select(&self, packet: Option<&str>) -> Option<&UdpPacketConfig> {
        self.udp
            .packets
            .iter()
            .filter(|p| p.enabled)
            .find(|p| packet.is_none_or(|id| p.packet == id))
    }
}

/// Playback settings for capture replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// Source rate in Hz
    pub tick_rate: f64,
    /// Playback multiplier, clamped to 0.1..=10.0
    pub speed: f64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self { tick_rate: DEFAULT_TICK_RATE, speed: 1.0 }
    }
}

impl ReplayOptions {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.clamp(0.1, 10.0);
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        if tick_rate.is_finite() && tick_rate > 0.0 {
            self.tick_rate = tick_rate;
        }
        self
    }

    /// Time between two replayed records.
    pub fn frame_interval(&self) -> std::time::Duration {
        let rate = self.tick_rate * self.speed;
        let rate = if rate.is_finite() && rate > 0.0 { rate } else { DEFAULT_TICK_RATE };
        std::time::Duration::from_secs_f64(1.0 / rate)
    }
}
