//! Test utilities: in-memory WRC telemetry fixtures
//!
//! The game's documents are not redistributable, so tests and benches build the
//! catalog, layouts and id tables from the tables below instead of reading a
//! telemetry directory.

#![cfg(any(test, feature = "benchmark"))]

use std::path::Path;
use std::sync::Arc;

use crate::documents::{
    ChannelEntry, ChannelsDocument, DataVersion, IdsDocument, IdsVersions, NamedEntry,
    PacketDefinition, StructureDocument, VehicleRecord, Versions,
};
use crate::schema::{ChannelCatalog, ChannelDescriptor, CompiledLayout};
use crate::types::ValueType;

/// Byte length of a full `session_update` record.
pub const WRC_RECORD_SIZE: usize = 275;

/// Channels of the `session_update` packet in wire order: id, type, units.
pub const WRC_CHANNELS: &[(&str, ValueType, &str)] = &[
    ("packet_4cc", ValueType::FourCc, ""),
    ("packet_uid", ValueType::U64, "uid"),
    ("shiftlights_fraction", ValueType::F32, ""),
    ("shiftlights_rpm_start", ValueType::F32, "revolution per minute"),
    ("shiftlights_rpm_end", ValueType::F32, "revolution per minute"),
    ("shiftlights_rpm_valid", ValueType::Bool, ""),
    ("vehicle_gear_index", ValueType::U8, ""),
    ("vehicle_gear_index_neutral", ValueType::U8, ""),
    ("vehicle_gear_index_reverse", ValueType::U8, ""),
    ("vehicle_gear_maximum", ValueType::U8, ""),
    ("vehicle_speed", ValueType::F32, "metre per second"),
    ("vehicle_transmission_speed", ValueType::F32, "metre per second"),
    ("vehicle_position_x", ValueType::F32, "metre"),
    ("vehicle_position_y", ValueType::F32, "metre"),
    ("vehicle_position_z", ValueType::F32, "metre"),
    ("vehicle_velocity_x", ValueType::F32, "metre per second"),
    ("vehicle_velocity_y", ValueType::F32, "metre per second"),
    ("vehicle_velocity_z", ValueType::F32, "metre per second"),
    ("vehicle_acceleration_x", ValueType::F32, "metre per second squared"),
    ("vehicle_acceleration_y", ValueType::F32, "metre per second squared"),
    ("vehicle_acceleration_z", ValueType::F32, "metre per second squared"),
    ("vehicle_left_direction_x", ValueType::F32, ""),
    ("vehicle_left_direction_y", ValueType::F32, ""),
    ("vehicle_left_direction_z", ValueType::F32, ""),
    ("vehicle_forward_direction_x", ValueType::F32, ""),
    ("vehicle_forward_direction_y", ValueType::F32, ""),
    ("vehicle_forward_direction_z", ValueType::F32, ""),
    ("vehicle_up_direction_x", ValueType::F32, ""),
    ("vehicle_up_direction_y", ValueType::F32, ""),
    ("vehicle_up_direction_z", ValueType::F32, ""),
    ("vehicle_hub_position_bl", ValueType::F32, "metre"),
    ("vehicle_hub_position_br", ValueType::F32, "metre"),
    ("vehicle_hub_position_fl", ValueType::F32, "metre"),
    ("vehicle_hub_position_fr", ValueType::F32, "metre"),
    ("vehicle_hub_velocity_bl", ValueType::F32, "metre per second"),
    ("vehicle_hub_velocity_br", ValueType::F32, "metre per second"),
    ("vehicle_hub_velocity_fl", ValueType::F32, "metre per second"),
    ("vehicle_hub_velocity_fr", ValueType::F32, "metre per second"),
    ("vehicle_cp_forward_speed_bl", ValueType::F32, "metre per second"),
    ("vehicle_cp_forward_speed_br", ValueType::F32, "metre per second"),
    ("vehicle_cp_forward_speed_fl", ValueType::F32, "metre per second"),
    ("vehicle_cp_forward_speed_fr", ValueType::F32, "metre per second"),
    ("vehicle_brake_temperature_bl", ValueType::F32, "degree Celsius"),
    ("vehicle_brake_temperature_br", ValueType::F32, "degree Celsius"),
    ("vehicle_brake_temperature_fl", ValueType::F32, "degree Celsius"),
    ("vehicle_brake_temperature_fr", ValueType::F32, "degree Celsius"),
    ("vehicle_engine_rpm_max", ValueType::F32, "revolution per minute"),
    ("vehicle_engine_rpm_idle", ValueType::F32, "revolution per minute"),
    ("vehicle_engine_rpm_current", ValueType::F32, "revolution per minute"),
    ("vehicle_throttle", ValueType::F32, ""),
    ("vehicle_brake", ValueType::F32, ""),
    ("vehicle_clutch", ValueType::F32, ""),
    ("vehicle_steering", ValueType::F32, ""),
    ("vehicle_handbrake", ValueType::F32, ""),
    ("game_total_time", ValueType::F32, "second"),
    ("game_delta_time", ValueType::F32, "second"),
    ("game_frame_count", ValueType::U64, "count"),
    ("stage_current_time", ValueType::F32, "second"),
    ("stage_previous_split_time", ValueType::F32, "second"),
    ("stage_result_time", ValueType::F32, "second"),
    ("stage_result_time_penalty", ValueType::F32, "second"),
    ("stage_result_status", ValueType::U8, ""),
    ("stage_current_distance", ValueType::F64, "metre"),
    ("stage_length", ValueType::F64, "metre"),
    ("stage_progress", ValueType::F32, ""),
    ("vehicle_tyre_state_bl", ValueType::U8, ""),
    ("vehicle_tyre_state_br", ValueType::U8, ""),
    ("vehicle_tyre_state_fl", ValueType::U8, ""),
    ("vehicle_tyre_state_fr", ValueType::U8, ""),
    ("stage_shakedown", ValueType::Bool, ""),
    ("game_mode", ValueType::U8, ""),
    ("vehicle_id", ValueType::U16, ""),
    ("vehicle_class_id", ValueType::U16, ""),
    ("vehicle_manufacturer_id", ValueType::U16, ""),
    ("location_id", ValueType::U16, ""),
    ("route_id", ValueType::U16, ""),
    ("vehicle_cluster_abs", ValueType::Bool, ""),
];

/// Channel ids of the `session_update` packet in wire order.
pub fn wrc_channel_ids() -> Vec<&'static str> {
    WRC_CHANNELS.iter().map(|(id, _, _)| *id).collect()
}

/// Catalog declaring every WRC channel with its units.
pub fn wrc_catalog() -> ChannelCatalog {
    WRC_CHANNELS
        .iter()
        .map(|(id, value_type, units)| ChannelDescriptor::new(*id, *value_type).with_units(*units))
        .collect()
}

/// Catalog declaring every WRC channel without units.
pub fn wrc_catalog_without_units() -> ChannelCatalog {
    WRC_CHANNELS.iter().map(|(id, value_type, _)| ChannelDescriptor::new(*id, *value_type)).collect()
}

/// Compiled 77-channel, 275-byte `session_update` layout.
pub fn wrc_layout() -> Arc<CompiledLayout> {
    build(wrc_channel_ids(), &wrc_catalog())
}

/// Two-field `packet_4cc` + `packet_uid` layout shared by every WRC packet.
pub fn header_layout() -> Arc<CompiledLayout> {
    build(["packet_4cc", "packet_uid"], &wrc_catalog())
}

fn build<I, S>(ids: I, catalog: &ChannelCatalog) -> Arc<CompiledLayout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match CompiledLayout::build(ids, catalog) {
        Ok(layout) => Arc::new(layout),
        Err(e) => panic!("WRC fixture layout failed to compile: {e}"),
    }
}

/// `readme/channels.json` equivalent of [`wrc_catalog`].
pub fn channels_document() -> ChannelsDocument {
    ChannelsDocument {
        versions: Versions { schema: 1, data: 3 },
        channels: WRC_CHANNELS
            .iter()
            .map(|(id, value_type, units)| ChannelEntry {
                id: id.to_string(),
                type_name: value_type.as_str().to_string(),
                units: units.to_string(),
                description: String::new(),
            })
            .collect(),
    }
}

/// `udp/wrc.json` with the header-only packets and the full `session_update`.
pub fn structure_document() -> StructureDocument {
    let header: Vec<String> = vec!["packet_4cc".into(), "packet_uid".into()];
    let packet = |id: &str, channels: &[String]| PacketDefinition {
        id: id.to_string(),
        channels: channels.to_vec(),
    };
    let update: Vec<String> = wrc_channel_ids().into_iter().map(String::from).collect();

    StructureDocument {
        versions: Versions { schema: 1, data: 3 },
        id: "wrc".to_string(),
        header: Default::default(),
        packets: vec![
            packet("session_update", &update),
            packet("session_start", &header),
            packet("session_pause", &header),
            packet("session_resume", &header),
            packet("session_end", &header),
        ],
    }
}

/// A small but representative `readme/ids.json`.
pub fn ids_document() -> IdsDocument {
    let named = |pairs: &[(u64, &str)]| -> Vec<NamedEntry> {
        pairs.iter().map(|(id, name)| NamedEntry { id: *id, name: name.to_string() }).collect()
    };

    IdsDocument {
        versions: IdsVersions { schema: 1, data: DataVersion { build: 12, major: 1, minor: 4 } },
        vehicles: vec![
            VehicleRecord {
                id: 3,
                class: 2,
                manufacturer: 7,
                name: "Fabia RS Rally2".to_string(),
                builder: false,
            },
            VehicleRecord {
                id: 300,
                class: 9,
                manufacturer: 0,
                name: "Builder Rally1".to_string(),
                builder: true,
            },
        ],
        vehicle_classes: named(&[(2, "WRC2"), (9, "Builder Rally1")]),
        vehicle_manufacturers: named(&[(7, "Škoda")]),
        locations: named(&[(4, "Wales Rally GB")]),
        routes: named(&[(12, "Sweet Lamb"), (1200, "Dyfi")]),
        vehicle_tyre_state: named(&[(0, "Intact"), (1, "Punctured"), (2, "Rim")]),
        game_mode: named(&[(0, "Main Menu"), (1, "Free Roam"), (3, "Championship")]),
        stage_result_status: named(&[(0, "Not Finished"), (1, "Finished"), (300, "Overflow")]),
    }
}

/// `config.json` sending `session_update` with the `wrc` structure.
pub const CONFIG_JSON: &str = r#"{
    "udp": {
        "packets": [
            {
                "structure": "wrc",
                "packet": "session_update",
                "ip": "127.0.0.1",
                "port": 20777,
                "frequencyHz": 60,
                "bEnabled": true
            }
        ]
    }
}"#;

/// Write a complete telemetry directory under `root`.
///
/// `ids.json` is written as UTF-16LE with a BOM, the way the game ships it.
pub fn write_telemetry_dir(root: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(root.join("readme"))?;
    std::fs::create_dir_all(root.join("udp"))?;
    std::fs::write(root.join("readme/channels.json"), to_json(&channels_document()))?;
    std::fs::write(root.join("readme/ids.json"), utf16le_with_bom(&to_json(&ids_document())))?;
    std::fs::write(root.join("udp/wrc.json"), to_json(&structure_document()))?;
    std::fs::write(root.join("config.json"), CONFIG_JSON)?;
    Ok(())
}

/// Encode text as UTF-16LE preceded by a byte order mark.
pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text,
        Err(e) => panic!("fixture document failed to serialize: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrc_layout_matches_known_size() {
        let layout = wrc_layout();
        assert_eq!(layout.len(), 77);
        assert_eq!(layout.total_size(), WRC_RECORD_SIZE);
        layout.validate().unwrap();
    }

    #[test]
    fn header_layout_is_twelve_bytes() {
        assert_eq!(header_layout().total_size(), 12);
    }

    #[test]
    fn documents_round_trip_through_json() {
        let text = serde_json::to_string(&channels_document()).unwrap();
        let catalog = ChannelCatalog::from_json(&text).unwrap();
        assert_eq!(catalog.len(), WRC_CHANNELS.len());

        let text = serde_json::to_string(&structure_document()).unwrap();
        assert_eq!(StructureDocument::from_json(&text).unwrap().packets.len(), 5);
    }

    #[test]
    fn telemetry_dir_is_written() {
        let dir = tempfile::tempdir().unwrap();
        write_telemetry_dir(dir.path()).unwrap();
        let ids = std::fs::read(dir.path().join("readme/ids.json")).unwrap();
        assert_eq!(&ids[..2], &[0xFF, 0xFE]);
        assert_eq!(IdsDocument::from_bytes(&ids).unwrap(), ids_document());
    }
}
