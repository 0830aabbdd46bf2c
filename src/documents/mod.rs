//! Serde models of the game's telemetry documents.
//!
//! The game describes its UDP output with JSON documents under the telemetry
//! directory:
//!
//! ```text
//! telemetry/
//! ├── config.json              which packets are sent, and where
//! ├── readme/
//! │   ├── channels.json        channel id -> type, units, description
//! │   └── ids.json             id -> name tables (UTF-16)
//! └── udp/
//!     └── wrc.json             packet structures: ordered channel id lists
//! ```
//!
//! These models mirror the documents one to one. Turning them into the immutable
//! catalog, layouts and lookup tables happens in [`crate::schema`] and
//! [`crate::lookup`].

pub mod channels;
pub mod ids;
pub mod structure;

pub use channels::{ChannelEntry, ChannelsDocument, Versions};
pub use ids::{DataVersion, IdsDocument, IdsVersions, NamedEntry, VehicleRecord};
pub use structure::{PacketDefinition, StructureDocument, StructureHeader};

use crate::{Result, TelemetryError};
use serde::de::DeserializeOwned;

/// Deserialize a JSON document, naming it in the error on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(document: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| TelemetryError::document_error(document, e))
}
