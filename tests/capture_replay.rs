//! Capture files through replay connections and typed subscriptions.

use std::sync::Arc;

use codriver::adapters::{AdapterValidation, FieldBinding, RecordAdapter};
use codriver::providers::ChannelProvider;
use codriver::{
    CaptureReader, CaptureWriter, ChannelCatalog, ChannelDescriptor, CompiledLayout, FourCc, Record, ReplayOptions,
    Result, TelemetryConnection, UpdateRate, ValueType, codec,
};
use futures::StreamExt;

fn layout() -> Arc<CompiledLayout> {
    let catalog: ChannelCatalog = [
        ChannelDescriptor::new("packet_4cc", ValueType::FourCc),
        ChannelDescriptor::new("game_frame_count", ValueType::U64),
        ChannelDescriptor::new("vehicle_speed", ValueType::F32).with_units("metre per second"),
        ChannelDescriptor::new("vehicle_gear_index", ValueType::U8),
    ]
    .into_iter()
    .collect();
    let ids = ["packet_4cc", "game_frame_count", "vehicle_speed", "vehicle_gear_index"];
    Arc::new(CompiledLayout::build(ids, &catalog).unwrap())
}

fn record(layout: &Arc<CompiledLayout>, frame: u64) -> Record {
    let mut record = Record::new(Arc::clone(layout));
    record.set("packet_4cc", FourCc::new("sess").unwrap()).unwrap();
    record.set("game_frame_count", frame).unwrap();
    record.set("vehicle_speed", frame as f32 * 0.5).unwrap();
    record.set("vehicle_gear_index", (frame % 6) as u8).unwrap();
    record
}

#[derive(Debug, PartialEq)]
struct Dash {
    frame: u64,
    speed: f32,
    gear: u8,
}

impl RecordAdapter for Dash {
    fn validate_layout(layout: &CompiledLayout) -> Result<AdapterValidation> {
        Ok(AdapterValidation::new(vec![
            FieldBinding::required(layout, "game_frame_count", ValueType::U64)?,
            FieldBinding::required(layout, "vehicle_speed", ValueType::F32)?,
            FieldBinding::optional(layout, "vehicle_gear_index"),
        ]))
    }

    fn adapt(record: &Record, validation: &AdapterValidation) -> Self {
        Self {
            frame: validation.fetch_or_default(record, "game_frame_count"),
            speed: validation.fetch_or_default(record, "vehicle_speed"),
            gear: validation.fetch_or_default(record, "vehicle_gear_index"),
        }
    }
}

#[test]
fn capture_round_trip_is_byte_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stage.cap");
    let layout = layout();

    let mut writer = CaptureWriter::create(&path, Arc::clone(&layout)).unwrap();
    for frame in 0..5 {
        writer.write_record(&record(&layout, frame)).unwrap();
    }
    assert_eq!(writer.records_written(), 5);
    writer.into_inner().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 5 * layout.total_size());

    let mut reader = CaptureReader::open(&path, layout.total_size()).unwrap();
    assert_eq!(reader.total_records(), 5);
    let mut frames = Vec::new();
    while let Some(chunk) = reader.read_next() {
        let decoded = codec::unmarshal(chunk, &layout).unwrap();
        assert_eq!(codec::marshal(&decoded).unwrap(), chunk);
        frames.push(decoded.get_as::<u64>("game_frame_count").unwrap());
    }
    assert_eq!(frames, vec![0, 1, 2, 3, 4]);
    assert!(reader.is_finished());
}

#[tokio::test(start_paused = true)]
async fn replay_feeds_typed_subscriptions() {
    let _ = tracing_subscriber::fmt::try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stage.cap");
    let layout = layout();

    let mut writer = CaptureWriter::create(&path, Arc::clone(&layout)).unwrap();
    for frame in 0..30 {
        writer.write_record(&record(&layout, frame)).unwrap();
    }
    writer.into_inner().unwrap();

    let options = ReplayOptions::default().with_speed(2.0);
    let connection = TelemetryConnection::replay(&path, Arc::clone(&layout), options).await.unwrap();

    let dashes: Vec<Dash> = connection.subscribe::<Dash>(UpdateRate::Native).unwrap().collect().await;
    assert!(!dashes.is_empty());
    assert!(dashes.windows(2).all(|w| w[0].frame < w[1].frame));
    let last = dashes.last().unwrap();
    assert_eq!(last, &Dash { frame: 29, speed: 14.5, gear: 5 });
    assert_eq!(connection.stats().decoded(), 30);
}

#[tokio::test(start_paused = true)]
async fn trailing_partial_record_is_rejected() {
    let _ = tracing_subscriber::fmt::try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.cap");
    let layout = layout();

    let mut bytes = codec::marshal(&record(&layout, 0)).unwrap();
    bytes.extend(codec::marshal(&record(&layout, 1)).unwrap());
    bytes.extend_from_slice(&[0xAA; 3]);
    std::fs::write(&path, &bytes).unwrap();

    let connection = TelemetryConnection::replay(&path, Arc::clone(&layout), ReplayOptions::default()).await.unwrap();
    let frames: Vec<u64> = connection
        .records()
        .map(|r| r.get_as::<u64>("game_frame_count").unwrap())
        .collect()
        .await;

    assert_eq!(frames.last(), Some(&1));
    assert_eq!(connection.stats().decoded(), 2);
    assert_eq!(connection.stats().rejected(), 1);
}

#[tokio::test]
async fn caller_fed_datagrams_with_mismatched_sizes_are_skipped() {
    let _ = tracing_subscriber::fmt::try_init();
    let layout = layout();
    let (datagrams, provider) = ChannelProvider::channel(8, 60.0);
    let connection = TelemetryConnection::new(provider, Arc::clone(&layout));
    let mut dashes = connection.subscribe::<Dash>(UpdateRate::Native).unwrap();

    datagrams.send(vec![0u8; layout.total_size() + 1]).await.unwrap();
    datagrams.send(codec::marshal(&record(&layout, 7)).unwrap()).await.unwrap();
    drop(datagrams);

    assert_eq!(dashes.next().await.unwrap().frame, 7);
    assert!(dashes.next().await.is_none());
    assert_eq!(connection.stats().rejected(), 1);
}
