//! Replay provider for capture files

use std::path::Path;
use tokio::time::{Interval, interval};
use tracing::{debug, info, trace};

use crate::capture::CaptureReader;
use crate::config::ReplayOptions;
use crate::provider::Provider;
use crate::Result;

/// Replays a capture at its recorded rate, scaled by the playback speed.
pub struct ReplayProvider {
    reader: CaptureReader,
    options: ReplayOptions,
    interval: Interval,
}

impl ReplayProvider {
    /// Open a capture of `record_size`-byte records.
    pub fn open<P: AsRef<Path>>(path: P, record_size: usize, options: ReplayOptions) -> Result<Self> {
        Ok(Self::new(CaptureReader::open(path, record_size)?, options))
    }

    pub fn new(reader: CaptureReader, options: ReplayOptions) -> Self {
        info!(
            path = %reader.file_path().display(),
            records = reader.total_records(),
            tick_rate = options.tick_rate,
            speed = options.speed,
            "Replay opened"
        );
        let interval = interval(options.frame_interval());
        Self { reader, options, interval }
    }

    /// Change playback speed; clamped to 0.1..=10.0.
    pub fn set_speed(&mut self, speed: f64) {
        self.options = self.options.with_speed(speed);
        self.interval = interval(self.options.frame_interval());
        debug!(speed = self.options.speed, "Playback speed changed");
    }

    pub fn speed(&self) -> f64 {
        self.options.speed
    }

    /// Jump to a record index.
    pub fn seek(&mut self, record: usize) -> Result<()> {
        self.reader.seek(record)?;
        debug!(record, "Replay seeked");
        Ok(())
    }

    /// Playback position in recording time.
    pub fn current_time(&self) -> f64 {
        self.reader.current_record() as f64 / self.options.tick_rate
    }

    /// Recording length in recording time.
    pub fn duration(&self) -> f64 {
        self.reader.total_records() as f64 / self.options.tick_rate
    }
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>> {
        if self.reader.is_finished() {
            debug!("Reached end of replay");
            return Ok(None);
        }

        self.interval.tick().await;

        let index = self.reader.current_record();
        let datagram = self.reader.read_next().map(<[u8]>::to_vec);
        if let Some(bytes) = &datagram {
            trace!(record = index, total = self.reader.total_records(), len = bytes.len(), "Replayed datagram");
        }
        Ok(datagram)
    }

    fn tick_rate(&self) -> f64 {
        self.options.tick_rate
    }
}
