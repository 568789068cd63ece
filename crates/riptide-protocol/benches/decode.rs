//! Decode benchmarks for riptide-protocol.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use riptide_protocol::{envelope, registry, EventKind};

const MESSAGE_CREATE: &str = r#"{"op":0,"s":1042,"t":"MESSAGE_CREATE","d":{
    "id":"900001","channel_id":"800001","guild_id":"700001",
    "author":{"id":"600001","username":"bench"},
    "content":"hello <@600002>, see <#800002>",
    "mentions":[{"id":"600002","username":"other"}],
    "type":0}}"#;

const HEARTBEAT_ACK: &str = r#"{"op":11,"s":null,"t":null,"d":null}"#;

fn bench_envelope_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    group.throughput(Throughput::Bytes(MESSAGE_CREATE.len() as u64));
    group.bench_function("dispatch_frame", |b| {
        b.iter(|| envelope::decode(black_box(MESSAGE_CREATE)))
    });
    group.throughput(Throughput::Bytes(HEARTBEAT_ACK.len() as u64));
    group.bench_function("control_frame", |b| {
        b.iter(|| envelope::decode(black_box(HEARTBEAT_ACK)))
    });
    group.finish();
}

fn bench_body_decode(c: &mut Criterion) {
    let env = envelope::decode(MESSAGE_CREATE).unwrap();
    let body = env.body.unwrap();
    let kind = EventKind::from_tag(env.kind.as_deref().unwrap());

    c.bench_function("decode_body_message_create", |b| {
        b.iter(|| registry::decode_body(black_box(&kind), black_box(Some(&body))))
    });
}

fn bench_two_stage_roundtrip(c: &mut Criterion) {
    c.bench_function("two_stage_decode", |b| {
        b.iter(|| {
            let env = envelope::decode(black_box(MESSAGE_CREATE)).unwrap();
            let kind = EventKind::from_tag(env.kind.as_deref().unwrap());
            registry::decode_body(&kind, env.body.as_deref()).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_envelope_decode,
    bench_body_decode,
    bench_two_stage_roundtrip
);
criterion_main!(benches);
