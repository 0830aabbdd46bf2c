//! Record codec: records to and from little-endian wire bytes.
//!
//! The wire format is a flat buffer with no header, length prefix, padding or
//! checksum. Fields appear in layout order, each encoded at its fixed width:
//!
//! | type    | width | encoding                         |
//! |---------|-------|----------------------------------|
//! | boolean | 1     | `0x00` / `0x01`                  |
//! | uint8   | 1     | raw                              |
//! | uint16  | 2     | little-endian                    |
//! | uint64  | 8     | little-endian                    |
//! | float32 | 4     | little-endian IEEE-754 bits      |
//! | float64 | 8     | little-endian IEEE-754 bits      |
//! | fourcc  | 4     | raw bytes, no terminator         |
//!
//! Decoding is all-or-nothing: a buffer whose length differs from the layout's
//! `total_size` is rejected before any field is read.
//!
//! ```rust
//! use std::sync::Arc;
//! use codriver::{codec, ChannelCatalog, ChannelDescriptor, CompiledLayout, FourCc, Record, ValueType};
//!
//! let catalog: ChannelCatalog = [
//!     ChannelDescriptor::new("packet_4cc", ValueType::FourCc),
//!     ChannelDescriptor::new("packet_uid", ValueType::U64),
//! ]
//! .into_iter()
//! .collect();
//! let layout = Arc::new(CompiledLayout::build(["packet_4cc", "packet_uid"], &catalog)?);
//!
//! let mut record = Record::new(Arc::clone(&layout));
//! record.set("packet_4cc", FourCc::new("ABCD")?)?;
//! record.set("packet_uid", 123456u64)?;
//!
//! let bytes = codec::marshal(&record)?;
//! assert_eq!(bytes, [65, 66, 67, 68, 64, 226, 1, 0, 0, 0, 0, 0]);
//! assert_eq!(codec::unmarshal(&bytes, &layout)?, record);
//! # Ok::<(), codriver::TelemetryError>(())
//! ```

use std::sync::Arc;
use tracing::trace;

use crate::record::Record;
use crate::schema::{CompiledLayout, LayoutField};
use crate::types::{FourCc, Value, ValueType};
use crate::{Result, TelemetryError};

/// Encode a record into a new buffer of exactly `total_size` bytes.
pub fn marshal(record: &Record) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(record.layout().total_size());
    marshal_into(record, &mut out)?;
    Ok(out)
}

/// Append a record's encoding to `out`.
///
/// On error `out` is truncated back to its original length.
pub fn marshal_into(record: &Record, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let expected = record.layout().total_size();
    out.reserve(expected);

    for (field, value) in record.iter() {
        if let Err(e) = encode_value(field, value, out) {
            out.truncate(start);
            return Err(e);
        }
    }

    let written = out.len() - start;
    if written != expected {
        out.truncate(start);
        return Err(TelemetryError::size_mismatch(written, expected));
    }

    trace!(bytes = written, "Record marshalled");
    Ok(())
}

/// Decode a buffer into a new record bound to `layout`.
pub fn unmarshal(bytes: &[u8], layout: &Arc<CompiledLayout>) -> Result<Record> {
    let values = decode_values(bytes, layout)?;
    Ok(Record::from_parts(Arc::clone(layout), values))
}

impl Record {
    /// Decode a buffer into this record, reusing its layout.
    ///
    /// On error the record keeps its previous values.
    pub fn decode_in_place(&mut self, bytes: &[u8]) -> Result<()> {
        let values = decode_values(bytes, self.layout())?;
        self.replace_values(values);
        Ok(())
    }

    /// Encode this record; shorthand for [`marshal`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        marshal(self)
    }
}

fn encode_value(field: &LayoutField, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    if value.value_type() != field.value_type {
        return Err(TelemetryError::TypeMismatch {
            channel: field.id.clone(),
            expected: field.value_type.to_string(),
            found: value.value_type().to_string(),
        });
    }

    match *value {
        Value::Bool(v) => out.push(u8::from(v)),
        Value::U8(v) => out.push(v),
        Value::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::F32(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        Value::F64(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        Value::FourCc(tag) => out.extend_from_slice(&tag.bytes()),
    }
    Ok(())
}

fn decode_values(bytes: &[u8], layout: &CompiledLayout) -> Result<Vec<Value>> {
    if bytes.len() != layout.total_size() {
        return Err(TelemetryError::size_mismatch(bytes.len(), layout.total_size()));
    }

    let mut reader = WireReader::new(bytes);
    let mut values = Vec::with_capacity(layout.len());
    for field in layout.iter() {
        let raw = reader.take(field)?;
        values.push(decode_value(field.value_type, raw));
    }

    trace!(bytes = bytes.len(), fields = values.len(), "Record unmarshalled");
    Ok(values)
}

/// Decode one field from exactly `value_type.size()` bytes.
fn decode_value(value_type: ValueType, raw: &[u8]) -> Value {
    match value_type {
        ValueType::Bool => Value::Bool(raw[0] != 0),
        ValueType::U8 => Value::U8(raw[0]),
        ValueType::U16 => Value::U16(u16::from_le_bytes([raw[0], raw[1]])),
        ValueType::U64 => Value::U64(u64::from_le_bytes(eight(raw))),
        ValueType::F32 => Value::F32(f32::from_bits(u32::from_le_bytes(four(raw)))),
        ValueType::F64 => Value::F64(f64::from_bits(u64::from_le_bytes(eight(raw)))),
        ValueType::FourCc => Value::FourCc(FourCc(four(raw))),
    }
}

fn four(raw: &[u8]) -> [u8; 4] {
    [raw[0], raw[1], raw[2], raw[3]]
}

fn eight(raw: &[u8]) -> [u8; 8] {
    [raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7]]
}

/// Forward-only cursor handing out one field's bytes at a time.
struct WireReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn take(&mut self, field: &LayoutField) -> Result<&'a [u8]> {
        let end = self.position + field.width;
        let slice = self.bytes.get(self.position..end).ok_or_else(|| {
            TelemetryError::TruncatedRead {
                channel: field.id.clone(),
                offset: self.position,
                needed: field.width,
                available: self.bytes.len().saturating_sub(self.position),
            }
        })?;
        self.position = end;
        Ok(slice)
    }
}
