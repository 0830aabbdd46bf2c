//! `readme/ids.json`

use serde::{Deserialize, Serialize};

/// Id-to-name tables for every enumerated channel.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsDocument {
    #[serde(default)]
    pub versions: IdsVersions,
    #[serde(default)]
    pub vehicles: Vec<VehicleRecord>,
    #[serde(default)]
    pub vehicle_classes: Vec<NamedEntry>,
    #[serde(default)]
    pub vehicle_manufacturers: Vec<NamedEntry>,
    #[serde(default)]
    pub locations: Vec<NamedEntry>,
    #[serde(default)]
    pub routes: Vec<NamedEntry>,
    #[serde(default)]
    pub vehicle_tyre_state: Vec<NamedEntry>,
    #[serde(default)]
    pub game_mode: Vec<NamedEntry>,
    #[serde(default)]
    pub stage_result_status: Vec<NamedEntry>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsVersions {
    #[serde(default)]
    pub schema: u32,
    #[serde(default)]
    pub data: DataVersion,
}

/// Content version of the id tables; bumps when the game adds vehicles or locations.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataVersion {
    #[serde(default)]
    pub build: u32,
    #[serde(default)]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: u64,
    #[serde(default)]
    pub class: u64,
    #[serde(default)]
    pub manufacturer: u64,
    #[serde(default)]
    pub name: String,
    /// Whether the vehicle is a builder (custom) car
    #[serde(default)]
    pub builder: bool,
}

impl IdsDocument {
    /// Parse from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        super::parse_json("ids", text)
    }

    /// Parse from raw file bytes, which are usually UTF-16 with a BOM.
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let text = crate::text::decode_document_text(bytes)?;
        Self::from_json(&text)
    }
}
