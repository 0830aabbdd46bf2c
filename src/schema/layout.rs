//! Compiled record layouts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

use super::ChannelCatalog;
use crate::{Result, TelemetryError, ValueType};

/// Placement of one channel within a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LayoutField {
    /// Channel id
    pub id: String,
    /// Resolved scalar type
    pub value_type: ValueType,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Byte width, always `value_type.size()`
    pub width: usize,
    /// Units copied from the channel declaration
    pub units: String,
}

/// Byte layout of one record type, derived from an ordered channel id list.
///
/// Fields are contiguous and unpadded: each offset is the previous offset plus the
/// previous width, and `total_size` is the exact length of every valid record.
/// A layout is immutable once built and is shared between records through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLayout {
    fields: Vec<LayoutField>,
    index: HashMap<String, usize>,
    total_size: usize,
}

impl CompiledLayout {
    /// Resolve each channel id against the catalog and assign offsets in order.
    ///
    /// Fails with `UnknownChannel` for an id missing from the catalog and with
    /// `UnknownType` for a channel whose declared type is unsupported. A channel
    /// listed twice is rejected because records are addressed by id.
    pub fn build<I, S>(ids: I, catalog: &ChannelCatalog) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        let mut index = HashMap::new();
        let mut offset = 0usize;

        for id in ids {
            let id = id.as_ref();
            let descriptor = catalog.resolve(id)?;
            let value_type = descriptor.scalar_type()?;
            let width = value_type.size();

            if index.insert(id.to_string(), fields.len()).is_some() {
                return Err(TelemetryError::Parse {
                    context: "Layout compilation".to_string(),
                    details: format!("channel '{}' listed more than once", id),
                });
            }

            trace!(id, %value_type, offset, width, "Placed channel");
            fields.push(LayoutField {
                id: id.to_string(),
                value_type,
                offset,
                width,
                units: descriptor.units.clone(),
            });
            offset += width;
        }

        debug!(fields = fields.len(), total_size = offset, "Layout compiled");
        Ok(Self { fields, index, total_size: offset })
    }

    /// Exact byte length of a record with this layout.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&LayoutField> {
        self.fields.get(index)
    }

    /// Position of a channel in wire order (O(1)).
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Field placement by channel id.
    pub fn get(&self, id: &str) -> Option<&LayoutField> {
        self.index_of(id).and_then(|i| self.fields.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutField> {
        self.fields.iter()
    }

    /// Channel ids in wire order.
    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.id.as_str())
    }

    /// Check the contiguity and size invariants.
    pub fn validate(&self) -> Result<()> {
        let mut expected_offset = 0usize;
        for field in &self.fields {
            if field.offset != expected_offset || field.width != field.value_type.size() {
                return Err(TelemetryError::Parse {
                    context: "Layout validation".to_string(),
                    details: format!(
                        "field '{}' at offset {} width {}, expected offset {} width {}",
                        field.id,
                        field.offset,
                        field.width,
                        expected_offset,
                        field.value_type.size()
                    ),
                });
            }
            expected_offset += field.width;
        }

        if expected_offset != self.total_size {
            return Err(TelemetryError::size_mismatch(expected_offset, self.total_size));
        }
        Ok(())
    }
}
