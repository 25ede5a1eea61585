//! # Settlement Hub Benchmarks
//!
//! | Operation | What is measured |
//! |-----------|------------------|
//! | `end_block` | Finalizing N pending transfers in one pass |
//! | `enqueue` | Admitting N packets |
//! | `reverify` | Re-verifying N queued headers once their update lands |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hub_01_packet_store::PacketType;
use hub_02_state_updates::{BlockDescriptor, StateUpdateProof};
use hub_03_light_client::ClientHeader;
use node_runtime::wiring::canonical_state_root;
use node_runtime::{HubApp, NodeConfig, TransferPacketData};
use shared_types::{InMemoryKVStore, RollappId};

const SIZES: [u64; 3] = [100, 1_000, 5_000];

fn rollapp() -> RollappId {
    RollappId::new("bench_rollapp")
}

fn proof(start: u64, end: u64) -> StateUpdateProof {
    let rollapp = rollapp();
    StateUpdateProof::new(
        (start..=end)
            .map(|h| BlockDescriptor::new(h, canonical_state_root(&rollapp, h), 0))
            .collect(),
    )
}

fn hub_with_packets(count: u64) -> HubApp<InMemoryKVStore> {
    let mut app = HubApp::from_config(InMemoryKVStore::new(), &NodeConfig::for_testing())
        .expect("assemble hub");
    app.register_rollapp(rollapp()).expect("register");
    app.begin_block(0).expect("begin");
    app.submit_state_update(&rollapp(), 1, count, proof(1, count))
        .expect("state update");
    for sequence in 0..count {
        let data = TransferPacketData::new("adym", 1, "alice", format!("bob{}", sequence % 16));
        app.submit_packet(
            rollapp(),
            PacketType::OnRecv,
            sequence + 1,
            sequence,
            data.to_bytes(),
            None,
        )
        .expect("enqueue");
    }
    app.end_block().expect("first block");
    app
}

fn bench_end_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub-04-end-block");
    for size in SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("finalize_pending", size), &size, |b, &size| {
            b.iter_batched(
                || hub_with_packets(size),
                |mut app| black_box(app.produce_block(1_000).expect("end block")),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub-01-enqueue");
    for size in SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("admit", size), &size, |b, &size| {
            b.iter(|| black_box(hub_with_packets(size)))
        });
    }
    group.finish();
}

fn bench_reverify(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub-03-reverify");
    for size in SIZES {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("queued_headers", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut app =
                        HubApp::from_config(InMemoryKVStore::new(), &NodeConfig::for_testing())
                            .expect("assemble hub");
                    app.register_rollapp(rollapp()).expect("register");
                    for height in 1..=size {
                        let root = canonical_state_root(&rollapp(), height);
                        app.submit_header(ClientHeader::new(rollapp(), height, root))
                            .expect("queue header");
                    }
                    app.submit_state_update(&rollapp(), 1, size, proof(1, size))
                        .expect("state update");
                    app
                },
                |mut app| black_box(app.produce_block(1).expect("end block")),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_end_block, bench_enqueue, bench_reverify);
criterion_main!(benches);
