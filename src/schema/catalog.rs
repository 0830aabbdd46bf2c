//! Channel catalog: channel id -> declared type and metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::documents::{ChannelsDocument, Versions};
use crate::{Result, TelemetryError, ValueType};

/// Declaration of one telemetry channel.
///
/// The declared type is kept as written in the document; it is only resolved
/// into a [`ValueType`] when a layout uses the channel, so catalogs that mention
/// types this crate does not know still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelDescriptor {
    /// Channel id, unique within a catalog
    pub id: String,
    /// Type name as declared, e.g. `float32`
    pub declared_type: String,
    /// Units of measurement, e.g. `metre per second`
    pub units: String,
    /// Human-readable description
    pub description: String,
}

impl ChannelDescriptor {
    pub fn new(id: impl Into<String>, value_type: ValueType) -> Self {
        Self::declared(id, value_type.as_str())
    }

    /// Descriptor with a raw, possibly unsupported, type name.
    pub fn declared(id: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            declared_type: declared_type.into(),
            units: String::new(),
            description: String::new(),
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Resolve the declared type into the supported set.
    pub fn scalar_type(&self) -> Result<ValueType> {
        self.declared_type.parse().map_err(|type_name| TelemetryError::UnknownType {
            channel: self.id.clone(),
            type_name,
        })
    }
}

/// Immutable lookup of channel descriptors by id.
#[derive(Debug, Clone, Default)]
pub struct ChannelCatalog {
    channels: HashMap<String, ChannelDescriptor>,
    versions: Versions,
}

impl ChannelCatalog {
    /// Build from a parsed `channels.json`.
    pub fn from_document(document: ChannelsDocument) -> Self {
        let versions = document.versions;
        let descriptors = document.channels.into_iter().map(|entry| ChannelDescriptor {
            id: entry.id,
            declared_type: entry.type_name,
            units: entry.units,
            description: entry.description,
        });

        let mut catalog: Self = descriptors.collect();
        catalog.versions = versions;

        debug!(
            channels = catalog.len(),
            schema = versions.schema,
            data = versions.data,
            "Channel catalog loaded"
        );
        catalog
    }

    /// Parse `channels.json` text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::from_document(ChannelsDocument::from_json(text)?))
    }

    /// Look up a channel, failing with `UnknownChannel` when absent.
    pub fn resolve(&self, id: &str) -> Result<&ChannelDescriptor> {
        self.channels
            .get(id)
            .ok_or_else(|| TelemetryError::UnknownChannel { channel: id.to_string() })
    }

    pub fn get(&self, id: &str) -> Option<&ChannelDescriptor> {
        self.channels.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.channels.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Descriptors in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.channels.values()
    }

    /// Version stamp of the source document.
    pub fn versions(&self) -> Versions {
        self.versions
    }
}

impl FromIterator<ChannelDescriptor> for ChannelCatalog {
    fn from_iter<I: IntoIterator<Item = ChannelDescriptor>>(iter: I) -> Self {
        let mut channels = HashMap::new();
        for descriptor in iter {
            if channels.contains_key(&descriptor.id) {
                warn!(id = %descriptor.id, "Duplicate channel declaration, keeping the last one");
            }
            channels.insert(descriptor.id.clone(), descriptor);
        }
        Self { channels, versions: Versions::default() }
    }
}
