//! Capture files: recorded telemetry for replay
//!
//! A capture is nothing more than the marshalled records of one layout written
//! back to back, exactly as they arrived on the wire. There is no header; the
//! record size comes from the layout used to read it.
//!
//! ```rust,no_run
//! use codriver::{CaptureReader, TelemetryContext};
//!
//! let context = TelemetryContext::load("telemetry")?;
//! let layout = context.default_layout()?;
//! let mut reader = CaptureReader::open("stage.cap", layout.total_size())?;
//! while let Some(bytes) = reader.read_next() {
//!     let record = codriver::codec::unmarshal(bytes, &layout)?;
//!     println!("{record}");
//! }
//! # Ok::<(), codriver::TelemetryError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::record::Record;
use crate::schema::CompiledLayout;
use crate::{Result, TelemetryError, codec};

/// Sequential and random access over an in-memory capture.
#[derive(Debug, Clone)]
pub struct CaptureReader {
    data: Vec<u8>,
    path: PathBuf,
    record_size: usize,
    total_records: usize,
    current_record: usize,
    remainder_consumed: bool,
}

impl CaptureReader {
    /// Read a capture file fully into memory.
    pub fn open<P: AsRef<Path>>(path: P, record_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;
        Self::with_path(data, record_size, path.to_path_buf())
    }

    /// Wrap capture bytes already in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>, record_size: usize) -> Result<Self> {
        Self::with_path(data.into(), record_size, PathBuf::from("<memory>"))
    }

    fn with_path(data: Vec<u8>, record_size: usize, path: PathBuf) -> Result<Self> {
        if record_size == 0 {
            return Err(TelemetryError::Parse {
                context: "Capture".to_string(),
                details: "record size must be non-zero".to_string(),
            });
        }

        let total_records = data.len() / record_size;
        let trailing = data.len() % record_size;
        if trailing != 0 {
            warn!(
                path = %path.display(),
                trailing,
                record_size,
                "Capture ends with a partial record"
            );
        }
        debug!(path = %path.display(), total_records, record_size, "Capture opened");

        Ok(Self { data, path, record_size, total_records, current_record: 0, remainder_consumed: false })
    }

    /// Number of whole records.
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Index of the record the next [`read_next`](Self::read_next) returns.
    pub fn current_record(&self) -> usize {
        self.current_record
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Trailing bytes that do not form a whole record.
    pub fn remainder(&self) -> &[u8] {
        &self.data[self.total_records * self.record_size..]
    }

    /// Next buffer: whole records in order, then the remainder once if non-empty.
    ///
    /// The remainder is handed out like any other buffer so that consumers see it
    /// and reject it through the codec's size check.
    pub fn read_next(&mut self) -> Option<&[u8]> {
        if self.current_record < self.total_records {
            let start = self.current_record * self.record_size;
            self.current_record += 1;
            return Some(&self.data[start..start + self.record_size]);
        }

        if !self.remainder_consumed {
            self.remainder_consumed = true;
            let start = self.total_records * self.record_size;
            if start < self.data.len() {
                return Some(&self.data[start..]);
            }
        }
        None
    }

    /// Whether every buffer, remainder included, has been read.
    pub fn is_finished(&self) -> bool {
        self.current_record >= self.total_records && (self.remainder_consumed || self.remainder().is_empty())
    }

    /// Position on a whole record; `total_records` positions at the end.
    pub fn seek(&mut self, record: usize) -> Result<()> {
        if record > self.total_records {
            return Err(TelemetryError::Parse {
                context: "Capture seek".to_string(),
                details: format!("record {} out of range (0..={})", record, self.total_records),
            });
        }
        self.current_record = record;
        self.remainder_consumed = false;
        Ok(())
    }

    /// Decode the record at `index` without moving the cursor.
    pub fn decode_at(&self, index: usize, layout: &Arc<CompiledLayout>) -> Result<Record> {
        if index >= self.total_records {
            return Err(TelemetryError::Parse {
                context: "Capture read".to_string(),
                details: format!("record {} out of range (0..{})", index, self.total_records),
            });
        }
        let start = index * self.record_size;
        codec::unmarshal(&self.data[start..start + self.record_size], layout)
    }
}

/// Appends marshalled records of one layout to a writer.
pub struct CaptureWriter<W: Write> {
    writer: W,
    layout: Arc<CompiledLayout>,
    buffer: Vec<u8>,
    records_written: usize,
    path: Option<PathBuf>,
}

impl CaptureWriter<BufWriter<File>> {
    /// Create (or truncate) a capture file.
    pub fn create<P: AsRef<Path>>(path: P, layout: Arc<CompiledLayout>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;
        let mut writer = Self::new(BufWriter::new(file), layout);
        writer.path = Some(path.to_path_buf());
        Ok(writer)
    }
}

impl<W: Write> CaptureWriter<W> {
    pub fn new(writer: W, layout: Arc<CompiledLayout>) -> Self {
        let buffer = Vec::with_capacity(layout.total_size());
        Self { writer, layout, buffer, records_written: 0, path: None }
    }

    /// Marshal and append a record; its layout must be the writer's layout.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if !Arc::ptr_eq(record.layout(), &self.layout) && **record.layout() != *self.layout {
            return Err(TelemetryError::Parse {
                context: "Capture write".to_string(),
                details: "record layout differs from the capture layout".to_string(),
            });
        }

        self.buffer.clear();
        codec::marshal_into(record, &mut self.buffer)?;
        self.writer.write_all(&self.buffer).map_err(|e| self.io_error(e))?;
        self.records_written += 1;
        Ok(())
    }

    /// Append an already-encoded record; its length must match the layout.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.layout.total_size() {
            return Err(TelemetryError::size_mismatch(bytes.len(), self.layout.total_size()));
        }
        self.writer.write_all(bytes).map_err(|e| self.io_error(e))?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Destination file, when created with [`CaptureWriter::create`].
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| self.io_error(e))
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    fn io_error(&self, source: std::io::Error) -> TelemetryError {
        let path = self.path.clone().unwrap_or_else(|| PathBuf::from("<capture writer>"));
        TelemetryError::file_error(path, source)
    }
}
