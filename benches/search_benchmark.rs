//! Benchmarks for region lookups.
//!
//! Run with: cargo bench
//!
//! Measures per-algorithm lookup throughput and the effect of the result
//! cache, over a synthetic index of contiguous /24 ranges.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ip2region::{CachedRegionSearcher, CachedSearcherConfig, RegionSearcher, SearchAlgorithm};

/// Build an index of `count` /24 blocks starting at 1.0.0.0, with header
/// entries spaced to stay within the 1024-entry table.
fn generate_index(count: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 8 + 8192];
    let interval = (count / 1000).max(64);

    let mut ptrs = Vec::with_capacity(count as usize);
    for i in 0..count {
        let region = format!("CN|0|Province{}|City{}|ISP{}", i % 34, i % 300, i % 5);
        ptrs.push(((4 + region.len() as u32) << 24) | buf.len() as u32);
        buf.extend_from_slice(&i.to_le_bytes());
        buf.extend_from_slice(region.as_bytes());
    }

    let first = buf.len() as u32;
    let mut entry = 0;
    for (i, ptr) in ptrs.iter().enumerate() {
        let start = 0x0100_0000 + ((i as u32) << 8);
        if i as u32 % interval == 0 || i as u32 == count - 1 {
            let at = 8 + entry * 8;
            buf[at..at + 4].copy_from_slice(&start.to_le_bytes());
            let block_ptr = buf.len() as u32;
            buf[at + 4..at + 8].copy_from_slice(&block_ptr.to_le_bytes());
            entry += 1;
        }
        buf.extend_from_slice(&start.to_le_bytes());
        buf.extend_from_slice(&(start + 0xFF).to_le_bytes());
        buf.extend_from_slice(&ptr.to_le_bytes());
    }
    let last = buf.len() as u32 - 12;

    buf[0..4].copy_from_slice(&first.to_le_bytes());
    buf[4..8].copy_from_slice(&last.to_le_bytes());
    buf
}

/// Spread `count` queries across the indexed space, plus some misses.
fn generate_queries(blocks: u32, count: u32) -> Vec<u32> {
    (0..count)
        .map(|i| {
            if i % 10 == 9 {
                0xF000_0000 + i
            } else {
                0x0100_0000 + ((i.wrapping_mul(7919) % blocks) << 8) + (i & 0xFF)
            }
        })
        .collect()
}

/// Benchmark each algorithm over the same queries.
fn bench_algorithms(c: &mut Criterion) {
    let blocks = 50_000;
    let data = generate_index(blocks);
    let queries = generate_queries(blocks, 1000);

    let mut group = c.benchmark_group("algorithms");
    group.throughput(Throughput::Elements(queries.len() as u64));

    for algorithm in SearchAlgorithm::ALL {
        let mut searcher = RegionSearcher::from_bytes(data.clone()).with_algorithm(algorithm);
        searcher.warm_up().unwrap();

        group.bench_function(algorithm.as_str(), |b| {
            b.iter(|| {
                for &ip in &queries {
                    black_box(searcher.find(ip).unwrap());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark lookups through the result cache.
fn bench_cache(c: &mut Criterion) {
    let blocks = 50_000;
    let data = generate_index(blocks);
    let queries = generate_queries(blocks, 1000);

    let mut group = c.benchmark_group("cache");
    group.throughput(Throughput::Elements(queries.len() as u64));

    let uncached = CachedRegionSearcher::from_bytes_with_config(
        data.clone(),
        CachedSearcherConfig::no_cache(),
    )
    .unwrap();
    group.bench_function("no_cache", |b| {
        b.iter(|| {
            for &ip in &queries {
                black_box(uncached.search(ip).unwrap());
            }
        })
    });

    let cached =
        CachedRegionSearcher::from_bytes_with_config(data, CachedSearcherConfig::with_capacity(10_000))
            .unwrap();
    for &ip in &queries {
        let _ = cached.search(ip);
    }
    group.bench_function("cache_hit", |b| {
        b.iter(|| {
            for &ip in &queries {
                black_box(cached.search(ip).unwrap());
            }
        })
    });

    group.finish();
}

/// Benchmark how lookup cost grows with index size.
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for blocks in [1_000u32, 10_000, 100_000] {
        let data = generate_index(blocks);
        let queries = generate_queries(blocks, 100);
        let mut searcher = RegionSearcher::from_bytes(data);
        searcher.warm_up().unwrap();

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::new("btree", blocks), &blocks, |b, _| {
            b.iter(|| {
                for &ip in &queries {
                    black_box(searcher.btree_search(ip).unwrap());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark loading an index into memory.
fn bench_load(c: &mut Criterion) {
    let data = generate_index(100_000);

    c.bench_function("load_100k_blocks", |b| {
        b.iter_batched(
            || data.clone(),
            |data| {
                let searcher = RegionSearcher::from_bytes(data);
                let blocks = searcher.memory().unwrap().total_blocks();
                black_box(blocks)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_algorithms, bench_cache, bench_scalability, bench_load);
criterion_main!(benches);
