//! Telemetry context: everything decoding needs, loaded once.
//!
//! A [`TelemetryContext`] bundles the channel catalog, the enumeration tables, the
//! compiled packet layouts and the optional game config. It is immutable after
//! construction and cheap to share behind an `Arc`, so any number of tasks can
//! decode against it concurrently.
//!
//! ```rust,no_run
//! use codriver::TelemetryContext;
//!
//! let context = TelemetryContext::load("C:/Users/me/Documents/My Games/WRC/telemetry")?;
//! let layout = context.default_layout()?;
//! println!("{} bytes per record", layout.total_size());
//! # Ok::<(), codriver::TelemetryError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{DEFAULT_STRUCTURE, TelemetryConfig};
use crate::documents::{ChannelsDocument, IdsDocument, StructureDocument};
use crate::lookup::{Descriptions, EnumerationTables};
use crate::record::Record;
use crate::schema::{ChannelCatalog, CompiledLayout, LayoutRegistry};
use crate::{Result, TelemetryError, codec, render};

/// Immutable decoding context for one telemetry directory.
#[derive(Debug, Clone)]
pub struct TelemetryContext {
    catalog: ChannelCatalog,
    enums: EnumerationTables,
    layouts: LayoutRegistry,
    config: Option<TelemetryConfig>,
}

impl TelemetryContext {
    /// Build from already-parsed documents.
    ///
    /// Every packet of `structure` is compiled here; an unknown channel or type in
    /// any of them fails the whole context.
    pub fn from_documents(
        channels: ChannelsDocument,
        ids: &IdsDocument,
        structure: &StructureDocument,
        config: Option<TelemetryConfig>,
    ) -> Result<Self> {
        let catalog = ChannelCatalog::from_document(channels);
        let enums = EnumerationTables::from_document(ids);
        let layouts = LayoutRegistry::compile(structure, &catalog)?;
        Ok(Self { catalog, enums, layouts, config })
    }

    /// Load a telemetry directory laid out the way the game writes it.
    ///
    /// Reads `readme/channels.json`, `readme/ids.json`, `config.json` when present,
    /// and `udp/<structure>.json` for the structure the config selects
    /// (`wrc` without a config).
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        info!(root = %root.display(), "Loading telemetry documents");

        let config = match read_optional(root.join("config.json"))? {
            Some(bytes) => Some(TelemetryConfig::from_json(&crate::text::decode_document_text(&bytes)?)?),
            None => {
                debug!("No config.json, using the default structure");
                None
            }
        };
        let structure_id = config
            .as_ref()
            .and_then(|c| c.select(None))
            .map_or(DEFAULT_STRUCTURE, |p| p.structure.as_str())
            .to_string();

        let channels = read_text(root.join("readme").join("channels.json"))?;
        let channels = ChannelsDocument::from_json(&channels)?;

        let ids = read(root.join("readme").join("ids.json"))?;
        let ids = IdsDocument::from_bytes(&ids)?;

        let structure = read_text(root.join("udp").join(format!("{structure_id}.json")))?;
        let structure = StructureDocument::from_json(&structure)?;

        let context = Self::from_documents(channels, &ids, &structure, config)?;
        info!(
            structure = %structure_id,
            channels = context.catalog.len(),
            packets = context.layouts.len(),
            "Telemetry context ready"
        );
        Ok(context)
    }

    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }

    pub fn enums(&self) -> &EnumerationTables {
        &self.enums
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    pub fn config(&self) -> Option<&TelemetryConfig> {
        self.config.as_ref()
    }

    /// Layout of a packet.
    pub fn layout(&self, packet: &str) -> Result<Arc<CompiledLayout>> {
        self.layouts.require(packet)
    }

    /// Packet the game is configured to send, or the structure's first packet.
    pub fn default_packet(&self) -> Result<&str> {
        let configured = self
            .config
            .as_ref()
            .and_then(|c| c.select(None))
            .map(|p| p.packet.as_str())
            .filter(|packet| self.layouts.get(packet).is_some());

        match configured {
            Some(packet) => Ok(packet),
            None => self.layouts.packet_ids().next().ok_or_else(|| TelemetryError::PacketNotFound {
                packet: format!("<any packet of '{}'>", self.layouts.structure_id()),
            }),
        }
    }

    /// Layout of [`default_packet`](Self::default_packet).
    pub fn default_layout(&self) -> Result<Arc<CompiledLayout>> {
        self.layout(self.default_packet()?)
    }

    /// Zeroed record for a packet.
    pub fn new_record(&self, packet: &str) -> Result<Record> {
        Ok(Record::new(self.layout(packet)?))
    }

    /// Decode one buffer of a packet.
    pub fn decode(&self, packet: &str, bytes: &[u8]) -> Result<Record> {
        codec::unmarshal(bytes, &self.layout(packet)?)
    }

    /// Render a record against this context's catalog.
    pub fn render(&self, record: &Record) -> Result<String> {
        render::render(record, &self.catalog)
    }

    /// Enumeration names for a record's coded fields.
    pub fn describe<'a>(&'a self, record: &'a Record) -> Descriptions<'a> {
        self.enums.describe_record(record)
    }
}

fn read(path: PathBuf) -> Result<Vec<u8>> {
    std::fs::read(&path).map_err(|e| TelemetryError::file_error(path, e))
}

fn read_text(path: PathBuf) -> Result<String> {
    crate::text::decode_document_text(&read(path)?)
}

fn read_optional(path: PathBuf) -> Result<Option<Vec<u8>>> {
    match std::fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TelemetryError::file_error(path, e)),
    }
}
