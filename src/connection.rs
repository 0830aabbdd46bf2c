//! Telemetry connections: a running driver plus typed subscriptions.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use codriver::{ReplayOptions, Record, TelemetryConnection, TelemetryContext, UpdateRate};
//!
//! # async fn run() -> codriver::Result<()> {
//! let context = TelemetryContext::load("telemetry")?;
//! let connection =
//!     TelemetryConnection::replay("stage.cap", context.default_layout()?, ReplayOptions::default()).await?;
//!
//! let mut records = connection.subscribe::<Record>(UpdateRate::Max(10))?;
//! while let Some(record) = records.next().await {
//!     println!("{} on {}", record, context.describe(&record).route());
//! }
//! # Ok(())
//! # }
//! ```

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::RecordAdapter;
use crate::config::ReplayOptions;
use crate::driver::{Driver, DriverStats};
use crate::provider::Provider;
use crate::providers::ReplayProvider;
use crate::record::Record;
use crate::schema::CompiledLayout;
use crate::stream::ThrottleExt;
use crate::types::UpdateRate;
use crate::Result;

/// How long [`TelemetryConnection::replay`] waits for the first record.
const FIRST_RECORD_TIMEOUT: Duration = Duration::from_secs(5);

/// Live view of a provider's decoded records.
///
/// Dropping the connection cancels its driver.
pub struct TelemetryConnection {
    records: watch::Receiver<Option<Arc<Record>>>,
    stats: Arc<DriverStats>,
    layout: Arc<CompiledLayout>,
    source_hz: f64,
    cancel: CancellationToken,
}

impl TelemetryConnection {
    /// Start decoding `provider` with `layout`. Must be called within a tokio runtime.
    pub fn new<P: Provider>(provider: P, layout: Arc<CompiledLayout>) -> Self {
        let source_hz = provider.tick_rate();
        let channels = Driver::spawn(provider, Arc::clone(&layout));
        info!(source_hz, record_size = layout.total_size(), "Telemetry connection started");

        Self { records: channels.records, stats: channels.stats, layout, source_hz, cancel: channels.cancel }
    }

    /// Replay a capture file.
    ///
    /// Waits for the first record before returning so subscriptions start with data.
    pub async fn replay<P: AsRef<Path>>(
        path: P,
        layout: Arc<CompiledLayout>,
        options: ReplayOptions,
    ) -> Result<Self> {
        let provider = ReplayProvider::open(path, layout.total_size(), options)?;
        let connection = Self::new(provider, layout);

        let mut records = connection.records.clone();
        let first = tokio::time::timeout(FIRST_RECORD_TIMEOUT, records.wait_for(Option::is_some)).await;
        match first {
            Ok(Ok(_)) => debug!("First replayed record available"),
            Ok(Err(_)) => warn!("Replay ended before producing a record"),
            Err(_) => warn!("Timeout waiting for the first replayed record"),
        }

        Ok(connection)
    }

    /// Most recently decoded record.
    pub fn latest(&self) -> Option<Arc<Record>> {
        self.records.borrow().clone()
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub fn layout(&self) -> &Arc<CompiledLayout> {
        &self.layout
    }

    /// Native rate of the provider in Hz.
    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Decoded records as shared pointers, at the source rate.
    ///
    /// Latest-wins: a slow consumer skips records rather than queueing them.
    pub fn records(&self) -> impl Stream<Item = Arc<Record>> + Send + 'static {
        WatchStream::new(self.records.clone()).filter_map(|record| async move { record })
    }

    /// Typed stream of records at most at `rate`.
    ///
    /// The adapter validates the layout here, so a missing channel fails the
    /// subscription instead of every record.
    pub fn subscribe<T>(&self, rate: UpdateRate) -> Result<BoxStream<'static, T>>
    where
        T: RecordAdapter + Send + 'static,
    {
        let validation = T::validate_layout(&self.layout)?;
        let records = self.records();

        let stream = match rate.throttle_interval(self.source_hz) {
            None => records.map(move |record| T::adapt(&record, &validation)).boxed(),
            Some(period) => {
                records.throttle(period).map(move |record| T::adapt(&record, &validation)).boxed()
            }
        };
        Ok(stream)
    }

    /// Stop the driver; streams end once it exits.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TelemetryConnection {
    fn drop(&mut self) {
        debug!("Dropping telemetry connection");
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdapterValidation, FieldBinding};
    use crate::capture::CaptureWriter;
    use crate::providers::ChannelProvider;
    use crate::test_utils::{header_layout, wrc_layout};
    use crate::{TelemetryError, ValueType, codec};

    struct Uid(u64);

    impl RecordAdapter for Uid {
        fn validate_layout(layout: &CompiledLayout) -> Result<AdapterValidation> {
            Ok(AdapterValidation::new(vec![FieldBinding::required(layout, "packet_uid", ValueType::U64)?]))
        }

        fn adapt(record: &Record, validation: &AdapterValidation) -> Self {
            Uid(validation.fetch_or_default(record, "packet_uid"))
        }
    }

    struct Speed;

    impl RecordAdapter for Speed {
        fn validate_layout(layout: &CompiledLayout) -> Result<AdapterValidation> {
            Ok(AdapterValidation::new(vec![FieldBinding::required(layout, "vehicle_speed", ValueType::F32)?]))
        }

        fn adapt(_record: &Record, _validation: &AdapterValidation) -> Self {
            Speed
        }
    }

    fn datagram(uid: u64) -> Vec<u8> {
        let mut record = Record::new(header_layout());
        record.set("packet_uid", uid).unwrap();
        codec::marshal(&record).unwrap()
    }

    #[tokio::test]
    async fn native_subscription_sees_published_records() {
        let (tx, provider) = ChannelProvider::channel(4, 60.0);
        let connection = TelemetryConnection::new(provider, header_layout());
        let mut uids = connection.subscribe::<Uid>(UpdateRate::Native).unwrap();

        tx.send(datagram(41)).await.unwrap();
        assert_eq!(uids.next().await.unwrap().0, 41);
        tx.send(datagram(42)).await.unwrap();
        assert_eq!(uids.next().await.unwrap().0, 42);

        drop(tx);
        assert!(uids.next().await.is_none());
        assert_eq!(connection.latest().unwrap().get_as::<u64>("packet_uid").unwrap(), 42);
        assert_eq!(connection.stats().decoded(), 2);
    }

    #[tokio::test]
    async fn subscription_validates_the_layout() {
        let (_tx, provider) = ChannelProvider::channel(1, 60.0);
        let connection = TelemetryConnection::new(provider, header_layout());
        let err = connection.subscribe::<Speed>(UpdateRate::Native).err().unwrap();
        assert!(matches!(err, TelemetryError::UnknownChannel { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_with_throttled_subscription() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stage.cap");
        let layout = wrc_layout();

        let mut writer = CaptureWriter::create(&path, Arc::clone(&layout)).unwrap();
        let mut record = Record::new(Arc::clone(&layout));
        for frame in 0..60u64 {
            record.set("game_frame_count", frame).unwrap();
            writer.write_record(&record).unwrap();
        }
        writer.into_inner().unwrap();

        let connection = TelemetryConnection::replay(&path, layout, ReplayOptions::default()).await.unwrap();
        assert!(connection.latest().is_some());
        assert_eq!(connection.source_hz(), 60.0);

        let frames: Vec<u64> = connection
            .subscribe::<Record>(UpdateRate::Max(10))
            .unwrap()
            .map(|r| r.get_as::<u64>("game_frame_count").unwrap())
            .collect()
            .await;

        assert!(!frames.is_empty());
        assert!(frames.len() < 60, "throttled to {} records", frames.len());
        assert!(frames.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(frames.last(), Some(&59));
        assert_eq!(connection.stats().rejected(), 0);
    }

    #[tokio::test]
    async fn dropping_the_connection_stops_the_driver() {
        let (tx, provider) = ChannelProvider::channel(1, 60.0);
        let connection = TelemetryConnection::new(provider, header_layout());
        let stats = Arc::clone(&connection.stats);
        drop(connection);

        while !stats.is_finished() {
            tokio::task::yield_now().await;
        }
        assert!(tx.is_closed());
    }
}
