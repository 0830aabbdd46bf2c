//! `udp/<structure>.json`

use serde::{Deserialize, Serialize};

use super::Versions;

/// A packet structure: the ordered channel lists of every packet it defines.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDocument {
    #[serde(default)]
    pub versions: Versions,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub header: StructureHeader,
    #[serde(default)]
    pub packets: Vec<PacketDefinition>,
}

/// Header block; its channel entries are free-form and unused by the codec.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureHeader {
    #[serde(default)]
    pub channels: Vec<serde_json::Value>,
}

/// One packet's wire layout, as an ordered list of channel ids.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketDefinition {
    pub id: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl StructureDocument {
    /// Parse from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        super::parse_json("structure", text)
    }

    /// Find a packet definition by id.
    pub fn packet(&self, id: &str) -> Option<&PacketDefinition> {
        self.packets.iter().find(|p| p.id == id)
    }
}
