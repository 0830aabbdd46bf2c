//! `readme/channels.json`

use serde::{Deserialize, Serialize};

/// Schema and data version stamp carried by channel and structure documents.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub schema: u32,
    #[serde(default)]
    pub data: u32,
}

/// Every channel the game can emit.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelsDocument {
    #[serde(default)]
    pub versions: Versions,
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
}

/// One channel declaration.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: String,
    /// Declared type name, e.g. `float32`
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub description: String,
}

impl ChannelsDocument {
    /// Parse from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        super::parse_json("channels", text)
    }
}
