//! End-to-end tests against a telemetry directory laid out like the game's.
//!
//! Documents are written by hand so the loader is exercised on JSON text rather
//! than on re-serialized fixtures.

use std::path::Path;

use codriver::{Codriver, FourCc, Record, TelemetryError, TyrePosition, ValueType, codec};

const CHANNELS: &str = r#"{
    "versions": { "schema": 1, "data": 3 },
    "channels": [
        { "id": "packet_4cc", "type": "fourcc", "description": "Packet type" },
        { "id": "packet_uid", "type": "uint64", "units": "uid" },
        { "id": "vehicle_speed", "type": "float32", "units": "metre per second" },
        { "id": "vehicle_tyre_state_fl", "type": "uint8" },
        { "id": "vehicle_id", "type": "uint16" },
        { "id": "vehicle_class_id", "type": "uint16" },
        { "id": "vehicle_manufacturer_id", "type": "uint16" },
        { "id": "location_id", "type": "uint16" },
        { "id": "stage_current_distance", "type": "float64", "units": "metre" },
        { "id": "stage_shakedown", "type": "boolean" },
        { "id": "vehicle_hud_colour", "type": "rgba8" }
    ]
}"#;

const STRUCTURE: &str = r#"{
    "versions": { "schema": 1, "data": 3 },
    "id": "rally",
    "header": { "channels": [] },
    "packets": [
        { "id": "session_start", "channels": ["packet_4cc", "packet_uid"] },
        {
            "id": "session_update",
            "channels": [
                "packet_4cc", "packet_uid", "vehicle_speed", "vehicle_tyre_state_fl",
                "vehicle_id", "vehicle_class_id", "vehicle_manufacturer_id", "location_id",
                "stage_current_distance", "stage_shakedown"
            ]
        }
    ]
}"#;

const IDS: &str = r#"{
    "versions": { "schema": 1, "data": { "build": 7, "major": 1, "minor": 2 } },
    "vehicles": [ { "id": 3, "class": 2, "manufacturer": 7, "name": "Fabia RS Rally2" } ],
    "vehicle_classes": [ { "id": 2, "name": "WRC2" } ],
    "vehicle_manufacturers": [ { "id": 7, "name": "Škoda" } ],
    "locations": [ { "id": 4, "name": "Wales Rally GB" } ],
    "vehicle_tyre_state": [ { "id": 0, "name": "Intact" }, { "id": 1, "name": "Punctured" } ]
}"#;

const CONFIG: &str = r#"{
    "udp": {
        "packets": [
            { "structure": "rally", "packet": "session_update", "ip": "127.0.0.1", "port": 20777, "frequencyHz": 30, "bEnabled": true }
        ]
    }
}"#;

fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn write_dir(root: &Path, with_config: bool) {
    std::fs::create_dir_all(root.join("readme")).unwrap();
    std::fs::create_dir_all(root.join("udp")).unwrap();
    std::fs::write(root.join("readme/channels.json"), CHANNELS).unwrap();
    std::fs::write(root.join("readme/ids.json"), utf16le_with_bom(IDS)).unwrap();
    if with_config {
        std::fs::write(root.join("udp/rally.json"), STRUCTURE).unwrap();
        std::fs::write(root.join("config.json"), CONFIG).unwrap();
    } else {
        std::fs::write(root.join("udp/wrc.json"), STRUCTURE).unwrap();
    }
}

#[test]
fn loads_decodes_renders_and_describes() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), true);

    let context = Codriver::load(dir.path()).unwrap();
    assert_eq!(context.default_packet().unwrap(), "session_update");
    assert_eq!(context.layouts().structure_id(), "rally");

    let layout = context.default_layout().unwrap();
    // 4 + 8 + 4 + 1 + 2 + 2 + 2 + 2 + 8 + 1
    assert_eq!(layout.total_size(), 34);
    assert_eq!(layout.get("vehicle_speed").unwrap().value_type, ValueType::F32);

    let mut record = Record::new(layout.clone());
    record.set("packet_4cc", FourCc::new("sess").unwrap()).unwrap();
    record.set("packet_uid", 99u64).unwrap();
    record.set("vehicle_speed", 12.5f32).unwrap();
    record.set("vehicle_tyre_state_fl", 1u8).unwrap();
    record.set("vehicle_id", 3u16).unwrap();
    record.set("vehicle_class_id", 2u16).unwrap();
    record.set("vehicle_manufacturer_id", 7u16).unwrap();
    record.set("location_id", 4u16).unwrap();
    record.set("stage_current_distance", 1500.25f64).unwrap();
    record.set("stage_shakedown", true).unwrap();

    let bytes = codec::marshal(&record).unwrap();
    assert_eq!(&bytes[..4], b"sess");
    let decoded = context.decode("session_update", &bytes).unwrap();
    assert_eq!(decoded, record);

    assert_eq!(
        context.render(&decoded).unwrap(),
        "packet_4cc:sess, packet_uid:99, vehicle_speed:12.500000[m/s], vehicle_tyre_state_fl:1, \
         vehicle_id:3, vehicle_class_id:2, vehicle_manufacturer_id:7, location_id:4, \
         stage_current_distance:1500.250000[m], stage_shakedown:true"
    );

    let names = context.describe(&decoded);
    assert_eq!(names.vehicle(), "Fabia RS Rally2");
    assert_eq!(names.vehicle_class(), "WRC2");
    assert_eq!(names.vehicle_manufacturer(), "Škoda");
    assert_eq!(names.location(), "Wales Rally GB");
    assert_eq!(names.tyre_state(TyrePosition::FrontLeft), "Punctured");
    // Channels absent from the layout describe as unknown
    assert_eq!(names.route(), "Unknown");
    assert_eq!(names.game_mode(), "Unknown");
}

#[test]
fn unknown_types_only_fail_layouts_that_use_them() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), true);

    let context = Codriver::load(dir.path()).unwrap();
    assert!(context.catalog().contains("vehicle_hud_colour"));

    let err = codriver::CompiledLayout::build(["packet_4cc", "vehicle_hud_colour"], context.catalog()).unwrap_err();
    assert!(matches!(err, TelemetryError::UnknownType { type_name, .. } if type_name == "rgba8"));
}

#[test]
fn falls_back_to_the_default_structure_without_config() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), false);

    let context = Codriver::load(dir.path()).unwrap();
    assert!(context.config().is_none());
    // First packet of the structure
    assert_eq!(context.default_packet().unwrap(), "session_start");
    assert_eq!(context.default_layout().unwrap().total_size(), 12);
}

#[test]
fn short_and_long_buffers_are_rejected_whole() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), true);
    let context = Codriver::load(dir.path()).unwrap();

    for len in [0usize, 11, 13] {
        let err = context.decode("session_start", &vec![0u8; len]).unwrap_err();
        assert!(
            matches!(err, TelemetryError::SizeMismatch { actual, expected: 12 } if actual == len),
            "{len} bytes gave {err}"
        );
        assert!(err.is_recoverable());
    }
}

#[test]
fn missing_documents_report_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Codriver::load(dir.path()).unwrap_err();
    match err {
        TelemetryError::File { path, .. } => assert!(path.ends_with("readme/channels.json")),
        other => panic!("expected a file error, got {other}"),
    }
}

#[test]
fn unknown_packet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), true);
    let context = Codriver::load(dir.path()).unwrap();

    let err = context.new_record("session_teleport").unwrap_err();
    assert!(matches!(err, TelemetryError::PacketNotFound { packet } if packet == "session_teleport"));
}
