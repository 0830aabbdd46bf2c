//! Provider trait for datagram sources

use crate::Result;

/// Source of raw telemetry datagrams.
///
/// Each datagram is expected to hold exactly one marshalled record. Providers
/// handle their own pacing: a capture replay waits out the recording's tick
/// interval, a channel provider waits for the caller to push the next buffer.
/// Sockets are deliberately not a provider; callers that own a UDP socket feed
/// datagrams in through [`ChannelProvider`](crate::providers::ChannelProvider).
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Next datagram.
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - a datagram arrived
    /// - `Ok(None)` - the source ended normally
    /// - `Err(e)` - a source failure; the driver backs off and retries
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>>;

    /// Native rate of the source in Hz.
    fn tick_rate(&self) -> f64;
}
