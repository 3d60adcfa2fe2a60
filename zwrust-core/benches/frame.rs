use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use zwrust_core::{Frame, MessageClass, PayloadCursor, SendData};

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    // Basic Get
    let small = SendData::new(99, vec![0x20, 0x02]).into_frame().unwrap();
    group.throughput(Throughput::Bytes(small.size() as u64));
    group.bench_function("encode_basic_get", |b| {
        b.iter(|| {
            black_box(small.encode());
        });
    });

    // Largest frame the length byte allows
    let large = Frame::request(MessageClass::SendData, vec![0u8; Frame::MAX_PAYLOAD_SIZE]);
    group.throughput(Throughput::Bytes(large.size() as u64));
    group.bench_function("encode_max", |b| {
        b.iter(|| {
            black_box(large.encode());
        });
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    let small = SendData::new(99, vec![0x20, 0x02]).into_frame().unwrap().encode();
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("parse_basic_get", |b| {
        b.iter(|| {
            black_box(Frame::parse(&small).unwrap());
        });
    });

    let large = Frame::request(MessageClass::SendData, vec![0u8; Frame::MAX_PAYLOAD_SIZE]).encode();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("parse_max", |b| {
        b.iter(|| {
            black_box(Frame::parse(&large).unwrap());
        });
    });

    group.finish();
}

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    // Meter Report, 4 byte value plus previous value
    let payload = [0x21, 0x54, 0x00, 0x00, 0x01, 0xB7, 0x00, 0x3C, 0x00, 0x00, 0x01, 0xA0];
    group.bench_function("read_meter_report", |b| {
        b.iter(|| {
            let mut cursor = PayloadCursor::new(black_box(&payload));
            let meter_type = cursor.read_u8().unwrap();
            let pss = cursor.read_u8().unwrap();
            let value = cursor.read_sized(usize::from(pss & 0x07)).unwrap();
            let delta = cursor.read_u16().unwrap();
            let previous = cursor.read_sized(usize::from(pss & 0x07)).unwrap();
            black_box((meter_type, value, delta, previous));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_parse, bench_cursor);
criterion_main!(benches);
