//! # Degree-Ledger Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | shared-crypto | canonical block hash |
//! | dl-01 Chain Store | full-chain verification, append + rewrite |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dl_01_chain_store::{verify_chain, ChainStore, ChainStoreApi, InMemoryLedgerFile};
use shared_crypto::block_hash;
use shared_types::{parse_timestamp, AcademicRecord, LedgerBlock, OwnerId, RecordId, DEFAULT_NONCE};

fn record(id: u64) -> AcademicRecord {
    AcademicRecord {
        id: RecordId(id),
        owner_id: OwnerId::new(format!("S-{id}")),
        degree_name: "BSc Benchmarking".into(),
        institution: "Criterion University".into(),
        field_of_study: "Performance".into(),
        year_awarded: 2025,
        created_at: parse_timestamp("2025-06-01T12:00:00").unwrap(),
    }
}

fn build_chain(len: u64) -> Vec<LedgerBlock> {
    let now = parse_timestamp("2025-06-01T12:00:00").unwrap();
    let mut chain = vec![LedgerBlock::genesis()];
    for i in 1..len {
        let prev = &chain[chain.len() - 1];
        let block = LedgerBlock::build(i, prev.hash.clone(), now, record(i).snapshot(), DEFAULT_NONCE);
        chain.push(block);
    }
    chain
}

fn bench_block_hash(c: &mut Criterion) {
    let data = record(42).snapshot();
    let genesis = LedgerBlock::genesis();

    c.bench_function("shared-crypto/block_hash", |b| {
        b.iter(|| {
            block_hash(
                black_box(1),
                black_box(&genesis.hash),
                black_box("2025-06-01T12:00:00"),
                black_box(&data),
                black_box(0),
            )
        })
    });
}

fn bench_verify_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-01-verify-chain");
    for len in [10u64, 100, 1_000] {
        let chain = build_chain(len);
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &chain, |b, chain| {
            b.iter(|| assert!(verify_chain(black_box(chain))))
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-01-append");
    for len in [10u64, 100, 1_000] {
        let chain = build_chain(len);
        let next = {
            let tip = &chain[chain.len() - 1];
            LedgerBlock::build(
                len,
                tip.hash.clone(),
                parse_timestamp("2025-06-01T12:00:00").unwrap(),
                record(len).snapshot(),
                DEFAULT_NONCE,
            )
        };
        let content = serde_json::to_vec(&chain).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(len), &next, |b, next| {
            b.iter(|| {
                let store = ChainStore::new(InMemoryLedgerFile::with_content(content.clone()));
                store.append(black_box(next.clone())).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_block_hash, bench_verify_chain, bench_append);
criterion_main!(benches);
