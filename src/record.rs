//! In-memory telemetry record bound to a compiled layout.
//!
//! A [`Record`] stores one tagged [`Value`] per layout field, in wire order. Name
//! lookups go through the layout's shared id index, so every record of a layout
//! pays for the map once.
//!
//! ```rust
//! use std::sync::Arc;
//! use codriver::{ChannelCatalog, ChannelDescriptor, CompiledLayout, FourCc, Record, ValueType};
//!
//! let catalog: ChannelCatalog = [
//!     ChannelDescriptor::new("packet_4cc", ValueType::FourCc),
//!     ChannelDescriptor::new("packet_uid", ValueType::U64),
//! ]
//! .into_iter()
//! .collect();
//! let layout = Arc::new(CompiledLayout::build(["packet_4cc", "packet_uid"], &catalog)?);
//!
//! let mut record = Record::new(layout);
//! record.set("packet_4cc", FourCc::new("ABCD")?)?;
//! record.set("packet_uid", 123456u64)?;
//! assert_eq!(record.get_as::<u64>("packet_uid")?, 123456);
//! # Ok::<(), codriver::TelemetryError>(())
//! ```

use std::sync::Arc;

use crate::schema::{CompiledLayout, LayoutField};
use crate::types::{FieldValue, Value};
use crate::{Result, TelemetryError};

/// One telemetry packet instance.
#[derive(Debug, Clone)]
pub struct Record {
    layout: Arc<CompiledLayout>,
    values: Vec<Value>,
}

impl Record {
    /// Instantiate with every field zeroed for its type.
    pub fn new(layout: Arc<CompiledLayout>) -> Self {
        let values = layout.iter().map(|field| field.value_type.zero()).collect();
        Self { layout, values }
    }

    /// Assemble from already-typed values; caller guarantees they match the layout.
    pub(crate) fn from_parts(layout: Arc<CompiledLayout>, values: Vec<Value>) -> Self {
        debug_assert_eq!(layout.len(), values.len());
        Self { layout, values }
    }

    pub fn layout(&self) -> &Arc<CompiledLayout> {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a channel.
    pub fn get(&self, id: &str) -> Result<&Value> {
        let index = self.layout.index_of(id).ok_or_else(|| TelemetryError::key_not_found(id))?;
        Ok(&self.values[index])
    }

    /// Typed value of a channel; the Rust type must match the channel's type exactly.
    pub fn get_as<T: FieldValue>(&self, id: &str) -> Result<T> {
        let value = self.get(id)?;
        T::from_value(value).ok_or_else(|| TelemetryError::TypeMismatch {
            channel: id.to_string(),
            expected: T::VALUE_TYPE.to_string(),
            found: value.value_type().to_string(),
        })
    }

    /// Replace the value of a channel. The value's type must match the channel's type.
    pub fn set(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.layout.index_of(id).ok_or_else(|| TelemetryError::key_not_found(id))?;
        self.set_at(index, value)
    }

    /// Value at a layout position.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replace the value at a layout position.
    pub fn set_at(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let field = self
            .layout
            .field(index)
            .ok_or_else(|| TelemetryError::key_not_found(format!("#{index}")))?;

        if field.value_type != value.value_type() {
            return Err(TelemetryError::TypeMismatch {
                channel: field.id.clone(),
                expected: field.value_type.to_string(),
                found: value.value_type().to_string(),
            });
        }

        self.values[index] = value;
        Ok(())
    }

    /// Fields and values in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&LayoutField, &Value)> {
        self.layout.iter().zip(self.values.iter())
    }

    /// Values in layout order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Reset every field to its zero value.
    pub fn clear(&mut self) {
        for (slot, field) in self.values.iter_mut().zip(self.layout.iter()) {
            *slot = field.value_type.zero();
        }
    }

    pub(crate) fn replace_values(&mut self, values: Vec<Value>) {
        debug_assert_eq!(self.values.len(), values.len());
        self.values = values;
    }
}

/// Field-for-field equality; floats compare by bit pattern.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout)
            && self.values == other.values
    }
}

impl Eq for Record {}
