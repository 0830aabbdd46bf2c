//! Provider fed by the caller through an mpsc channel

use tokio::sync::mpsc;

use crate::Result;
use crate::config::DEFAULT_TICK_RATE;
use crate::provider::Provider;

/// Datagrams pushed by the caller, e.g. from its own UDP socket loop.
///
/// The stream ends once every sender is dropped.
pub struct ChannelProvider {
    receiver: mpsc::Receiver<Vec<u8>>,
    tick_rate: f64,
}

impl ChannelProvider {
    pub fn new(receiver: mpsc::Receiver<Vec<u8>>, tick_rate: f64) -> Self {
        let tick_rate = if tick_rate.is_finite() && tick_rate > 0.0 { tick_rate } else { DEFAULT_TICK_RATE };
        Self { receiver, tick_rate }
    }

    /// Bounded channel plus the provider reading from it.
    pub fn channel(capacity: usize, tick_rate: f64) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx, tick_rate))
    }
}

#[async_trait::async_trait]
impl Provider for ChannelProvider {
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.receiver.recv().await)
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_until_senders_drop() {
        let (tx, mut provider) = ChannelProvider::channel(4, 60.0);
        tx.send(vec![1, 2]).await.unwrap();
        tx.send(vec![3]).await.unwrap();
        drop(tx);

        assert_eq!(provider.next_datagram().await.unwrap(), Some(vec![1, 2]));
        assert_eq!(provider.next_datagram().await.unwrap(), Some(vec![3]));
        assert_eq!(provider.next_datagram().await.unwrap(), None);
    }

    #[test]
    fn invalid_tick_rate_falls_back() {
        let (_tx, provider) = ChannelProvider::channel(1, 0.0);
        assert_eq!(provider.tick_rate(), DEFAULT_TICK_RATE);
    }
}
