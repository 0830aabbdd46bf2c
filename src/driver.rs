//! Driver task: pulls datagrams from a provider and publishes decoded records

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::provider::Provider;
use crate::record::Record;
use crate::schema::CompiledLayout;

/// Consecutive provider errors after which the driver gives up.
pub const MAX_PROVIDER_ERRORS: u32 = 10;

/// Counters maintained by a running driver.
#[derive(Debug, Default)]
pub struct DriverStats {
    decoded: AtomicU64,
    rejected: AtomicU64,
    provider_errors: AtomicU64,
    finished: AtomicBool,
}

impl DriverStats {
    /// Datagrams decoded and published.
    pub fn decoded(&self) -> u64 {
        self.decoded.load(Ordering::Relaxed)
    }

    /// Datagrams dropped because they failed to decode.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Provider failures, consecutive or not.
    pub fn provider_errors(&self) -> u64 {
        self.provider_errors.load(Ordering::Relaxed)
    }

    /// Whether the driver task has exited.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// Handles returned by [`Driver::spawn`].
pub struct DriverChannels {
    /// Latest decoded record; `None` until the first one arrives. The sender is
    /// dropped when the driver exits, which ends every watching stream.
    pub records: watch::Receiver<Option<Arc<Record>>>,
    /// Live counters
    pub stats: Arc<DriverStats>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Spawns the task that owns a provider and decodes its datagrams.
pub struct Driver;

impl Driver {
    /// Spawn a driver decoding every datagram with `layout`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<P>(provider: P, layout: Arc<CompiledLayout>) -> DriverChannels
    where
        P: Provider,
    {
        let (record_tx, record_rx) = watch::channel(None);
        let stats = Arc::new(DriverStats::default());
        let cancel = CancellationToken::new();

        let task_stats = Arc::clone(&stats);
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            Self::decode_task(provider, layout, record_tx, &task_stats, task_cancel).await;
            task_stats.finished.store(true, Ordering::Release);
        });

        DriverChannels { records: record_rx, stats, cancel }
    }

    async fn decode_task<P>(
        mut provider: P,
        layout: Arc<CompiledLayout>,
        record_tx: watch::Sender<Option<Arc<Record>>>,
        stats: &DriverStats,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!(record_size = layout.total_size(), tick_rate = provider.tick_rate(), "Driver started");
        let mut error_count = 0u32;
        let mut scratch = Record::new(Arc::clone(&layout));

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Driver cancelled");
                    break;
                }
                result = provider.next_datagram() => result,
            };

            match result {
                Ok(Some(bytes)) => {
                    error_count = 0;
                    match scratch.decode_in_place(&bytes) {
                        Ok(()) => {
                            let count = stats.decoded.fetch_add(1, Ordering::Relaxed) + 1;
                            trace!(count, "Record decoded");
                            if record_tx.send(Some(Arc::new(scratch.clone()))).is_err() {
                                debug!("All record receivers dropped, shutting down");
                                break;
                            }
                        }
                        Err(e) => {
                            stats.rejected.fetch_add(1, Ordering::Relaxed);
                            warn!(len = bytes.len(), error = %e, "Rejected datagram");
                        }
                    }
                }
                Ok(None) => {
                    info!(decoded = stats.decoded(), "Provider stream ended");
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    stats.provider_errors.fetch_add(1, Ordering::Relaxed);
                    error!(attempt = error_count, max = MAX_PROVIDER_ERRORS, error = %e, "Provider error");

                    if error_count >= MAX_PROVIDER_ERRORS {
                        error!("Too many provider errors, shutting down");
                        break;
                    }

                    // 100ms, 200ms, 400ms, ... capped at 1.6s
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!(
            decoded = stats.decoded(),
            rejected = stats.rejected(),
            "Driver ended"
        );
    }
}
