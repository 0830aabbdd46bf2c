//! Validation plans binding adapter fields to layout positions

use std::collections::HashMap;

use crate::record::Record;
use crate::schema::CompiledLayout;
use crate::types::{FieldValue, Value, ValueType};
use crate::{Result, TelemetryError};

/// Pre-computed field bindings built once per subscription.
///
/// Each binding records the layout index of a channel, so `adapt` reads values by
/// position instead of hashing channel names for every record.
#[derive(Debug, Clone, Default)]
pub struct AdapterValidation {
    /// Bindings in adapter order
    pub bindings: Vec<FieldBinding>,
    index_map: HashMap<String, usize>,
}

impl AdapterValidation {
    pub fn new(bindings: Vec<FieldBinding>) -> Self {
        let index_map = bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| (binding.name().to_string(), index))
            .collect();
        Self { bindings, index_map }
    }

    pub fn field_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn has_required_fields(&self) -> bool {
        self.bindings.iter().any(FieldBinding::is_required)
    }

    /// Position of a binding by channel name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_map.get(name).copied()
    }

    pub fn binding(&self, name: &str) -> Option<&FieldBinding> {
        self.index_of(name).and_then(|i| self.bindings.get(i))
    }

    /// Typed value of a bound channel, if present in the record with that type.
    pub fn fetch<T: FieldValue>(&self, record: &Record, name: &str) -> Option<T> {
        let slot = self.binding(name)?.layout_index()?;
        record.value_at(slot).and_then(T::from_value)
    }

    /// Typed value of a bound channel, falling back to the binding's default and
    /// then to `T::default()`.
    pub fn fetch_or_default<T>(&self, record: &Record, name: &str) -> T
    where
        T: FieldValue + Default,
    {
        if let Some(value) = self.fetch(record, name) {
            return value;
        }
        self.binding(name)
            .and_then(FieldBinding::default_value)
            .and_then(|value| T::from_value(&value))
            .unwrap_or_default()
    }
}

/// How one adapter field maps onto the layout.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldBinding {
    /// Channel that must exist with the given type; validation fails otherwise.
    Required { name: String, index: usize, value_type: ValueType },
    /// Channel that may be absent from the layout.
    Optional { name: String, index: Option<usize> },
    /// Channel that may be absent, with a fallback value.
    WithDefault { name: String, index: Option<usize>, default: Value },
}

impl FieldBinding {
    /// Bind a channel that must be present with exactly `value_type`.
    pub fn required(layout: &CompiledLayout, name: &str, value_type: ValueType) -> Result<Self> {
        let index = layout
            .index_of(name)
            .ok_or_else(|| TelemetryError::UnknownChannel { channel: name.to_string() })?;
        let found = layout.fields()[index].value_type;
        if found != value_type {
            return Err(TelemetryError::TypeMismatch {
                channel: name.to_string(),
                expected: value_type.to_string(),
                found: found.to_string(),
            });
        }
        Ok(Self::Required { name: name.to_string(), index, value_type })
    }

    pub fn optional(layout: &CompiledLayout, name: &str) -> Self {
        Self::Optional { name: name.to_string(), index: layout.index_of(name) }
    }

    pub fn with_default(layout: &CompiledLayout, name: &str, default: impl Into<Value>) -> Self {
        Self::WithDefault { name: name.to_string(), index: layout.index_of(name), default: default.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Required { name, .. } | Self::Optional { name, .. } | Self::WithDefault { name, .. } => name,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required { .. })
    }

    /// Index into the record's values, when the channel is in the layout.
    pub fn layout_index(&self) -> Option<usize> {
        match self {
            Self::Required { index, .. } => Some(*index),
            Self::Optional { index, .. } | Self::WithDefault { index, .. } => *index,
        }
    }

    fn default_value(&self) -> Option<Value> {
        match self {
            Self::WithDefault { default, .. } => Some(*default),
            _ => None,
        }
    }
}
