//! Benchmarks for record encode/decode on the full WRC session layout
//!
//! Tests:
//! - Allocating decode vs. decoding into a reused record
//! - Encoding into a fresh buffer vs. an existing one
//! - Human-readable rendering
//!
//! Platform: Cross-platform (synthetic records, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use codriver::test_utils::{WRC_RECORD_SIZE, wrc_catalog, wrc_layout};
use codriver::{FourCc, Record, codec, render};
use std::hint::black_box;

/// A record with a plausible mid-stage state.
fn sample_record() -> Record {
    let mut record = Record::new(wrc_layout());
    record.set("packet_4cc", FourCc::new("sess").unwrap()).unwrap();
    record.set("packet_uid", 90_210u64).unwrap();
    record.set("game_total_time", 812.5f32).unwrap();
    record.set("game_frame_count", 48_750u64).unwrap();
    record.set("vehicle_speed", 31.4f32).unwrap();
    record.set("vehicle_engine_rpm_current", 6_200.0f32).unwrap();
    record.set("vehicle_gear_index", 4u8).unwrap();
    record.set("vehicle_id", 3u16).unwrap();
    record.set("stage_current_distance", 4_210.75f64).unwrap();
    record.set("stage_length", 11_800.0f64).unwrap();
    record
}

fn bench_decode(c: &mut Criterion) {
    let layout = wrc_layout();
    let bytes = codec::marshal(&sample_record()).unwrap();
    assert_eq!(bytes.len(), WRC_RECORD_SIZE);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(WRC_RECORD_SIZE as u64));

    group.bench_function("unmarshal", |b| {
        b.iter(|| black_box(codec::unmarshal(black_box(&bytes), &layout).unwrap()))
    });

    group.bench_function("decode_in_place", |b| {
        let mut record = Record::new(layout.clone());
        b.iter(|| {
            record.decode_in_place(black_box(&bytes)).unwrap();
            black_box(record.values().len())
        })
    });

    group.bench_function("rejects_short_datagram", |b| {
        let short = &bytes[..WRC_RECORD_SIZE - 1];
        b.iter(|| black_box(codec::unmarshal(black_box(short), &layout).is_err()))
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let record = sample_record();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(WRC_RECORD_SIZE as u64));

    group.bench_function("marshal", |b| b.iter(|| black_box(codec::marshal(black_box(&record)).unwrap())));

    group.bench_function("marshal_into_reused", |b| {
        let mut buffer = Vec::with_capacity(WRC_RECORD_SIZE);
        b.iter(|| {
            buffer.clear();
            codec::marshal_into(black_box(&record), &mut buffer).unwrap();
            black_box(buffer.len())
        })
    });

    group.finish();
}

fn bench_batch_decode(c: &mut Criterion) {
    let layout = wrc_layout();
    let bytes = codec::marshal(&sample_record()).unwrap();

    let mut group = c.benchmark_group("batch_decode");
    for count in [60usize, 600, 3600] {
        let capture = bytes.repeat(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &capture, |b, capture| {
            let mut record = Record::new(layout.clone());
            b.iter(|| {
                for chunk in capture.chunks_exact(WRC_RECORD_SIZE) {
                    record.decode_in_place(chunk).unwrap();
                }
                black_box(record.values().len())
            })
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let catalog = wrc_catalog();
    let record = sample_record();

    c.bench_function("render_full_record", |b| {
        b.iter(|| black_box(render::render(black_box(&record), &catalog).unwrap()))
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_batch_decode, bench_render);
criterion_main!(benches);
