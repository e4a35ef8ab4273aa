//! Hit-rate and throughput comparison of every policy under identical
//! key streams.
//!
//! Run with: `cargo bench --bench workloads`
//!
//! Hit rates are printed once per workload before timing starts, so a run
//! doubles as a quick policy report.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use evictkit::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 1024;
const UNIVERSE: u64 = 8_192;
const OPS: usize = 50_000;
const SEED: u64 = 42;

const POLICIES: [CachePolicy; 4] = [
    CachePolicy::Lru,
    CachePolicy::Slru {
        protected_percent: 80,
    },
    CachePolicy::Clock,
    CachePolicy::Fifo,
];

// ============================================================================
// Key streams
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Workload {
    /// Uniform keys in `[0, UNIVERSE)`.
    Uniform,
    /// `hot_prob` of accesses land in the first `hot_fraction` of the universe.
    HotSet { hot_fraction: f64, hot_prob: f64 },
    /// Hot set interleaved with one-shot sequential scans.
    ScanMix { scan_every: usize, scan_len: u64 },
}

fn workloads() -> [(&'static str, Workload); 3] {
    [
        ("uniform", Workload::Uniform),
        (
            "hotset_90_10",
            Workload::HotSet {
                hot_fraction: 0.1,
                hot_prob: 0.9,
            },
        ),
        (
            "scan_mix",
            Workload::ScanMix {
                scan_every: 2_000,
                scan_len: 2 * CAPACITY as u64,
            },
        ),
    ]
}

fn key_stream(workload: Workload) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let hot_keys = UNIVERSE / 10;
    let mut keys = Vec::with_capacity(OPS);
    let mut scan_base = UNIVERSE;

    while keys.len() < OPS {
        match workload {
            Workload::Uniform => keys.push(rng.gen_range(0..UNIVERSE)),
            Workload::HotSet {
                hot_fraction,
                hot_prob,
            } => {
                let hot = ((UNIVERSE as f64 * hot_fraction) as u64).clamp(1, UNIVERSE);
                let key = if rng.gen_bool(hot_prob) || hot == UNIVERSE {
                    rng.gen_range(0..hot)
                } else {
                    rng.gen_range(hot..UNIVERSE)
                };
                keys.push(key);
            },
            Workload::ScanMix {
                scan_every,
                scan_len,
            } => {
                if keys.len() % scan_every == scan_every - 1 {
                    // Scan keys never repeat.
                    keys.extend(scan_base..scan_base + scan_len);
                    scan_base += scan_len;
                } else {
                    keys.push(rng.gen_range(0..hot_keys));
                }
            },
        }
    }
    keys.truncate(OPS);
    keys
}

/// Lookup, then insert on miss. Returns the number of hits.
fn replay(cache: &Cache<u64, u64>, keys: &[u64]) -> usize {
    let mut hits = 0;
    for &key in keys {
        if cache.get_with(&key, |v| black_box(*v)).is_some() {
            hits += 1;
        } else {
            cache.set(key, key);
        }
    }
    hits
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_workloads(c: &mut Criterion) {
    for (name, workload) in workloads() {
        let keys = key_stream(workload);

        for policy in POLICIES {
            let cache = CacheBuilder::new(CAPACITY).policy(policy).build::<u64, u64>();
            let hits = replay(&cache, &keys);
            println!(
                "{name:>14} {:>8}: hit rate {:.2}%",
                policy.to_string(),
                100.0 * hits as f64 / keys.len() as f64
            );
        }

        let mut group = c.benchmark_group(format!("workload_{name}"));
        group.throughput(Throughput::Elements(keys.len() as u64));
        for policy in POLICIES {
            group.bench_with_input(BenchmarkId::from_parameter(policy), &keys, |b, keys| {
                b.iter(|| {
                    let cache = CacheBuilder::new(CAPACITY).policy(policy).build::<u64, u64>();
                    black_box(replay(&cache, keys))
                })
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_workloads);
criterion_main!(benches);
