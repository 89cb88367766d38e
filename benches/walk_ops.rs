//! Benchmarks for walk generation and corruption.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::SeedableRng;
use std::hint::black_box;
use walker::{
    all_nodes, corrupted_from_pool, corrupted_uniform, walk_node2vec, walk_restart, walk_uniform,
    CorruptionConfig, CsrGraph, WalkConfig,
};

/// Owned CSR buffers built from adjacency lists with `1 / degree` row weights.
#[derive(Debug, Clone)]
struct CsrBuf {
    row_start: Vec<u32>,
    columns: Vec<u32>,
    weights: Vec<f32>,
}

impl CsrBuf {
    fn from_adj(adj: Vec<Vec<u32>>) -> Self {
        let mut row_start = Vec::with_capacity(adj.len() + 1);
        let mut columns = Vec::new();
        let mut weights = Vec::new();
        row_start.push(0);
        for mut nbrs in adj {
            nbrs.sort_unstable();
            nbrs.dedup();
            let w = 1.0 / nbrs.len().max(1) as f32;
            weights.extend(std::iter::repeat(w).take(nbrs.len()));
            columns.extend(nbrs);
            row_start.push(columns.len() as u32);
        }
        Self {
            row_start,
            columns,
            weights,
        }
    }

    fn graph(&self) -> CsrGraph<'_> {
        CsrGraph::new(&self.row_start, &self.columns, &self.weights).expect("valid CSR")
    }

    fn ring(n: usize) -> Self {
        let n32 = n as u32;
        let adj = (0..n32)
            .map(|i| vec![(i + 1) % n32, (i + n32 - 1) % n32])
            .collect();
        Self::from_adj(adj)
    }

    /// Preferential attachment graph (Barabási–Albert) with `m` edges per new node.
    ///
    /// Heavy-tailed degrees are where the node2vec neighbor scan gets expensive.
    fn barabasi_albert(n: usize, m: usize, seed: u64) -> Self {
        assert!(n >= m.max(2));
        assert!(m >= 1);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut adj: Vec<Vec<u32>> = vec![Vec::new(); n];

        // Start with a clique of size m+1.
        let init = m + 1;
        let mut targets: Vec<usize> = Vec::new(); // node ids repeated by degree
        for i in 0..init {
            for j in (i + 1)..init {
                adj[i].push(j as u32);
                adj[j].push(i as u32);
            }
        }
        for i in 0..init {
            for _ in 0..adj[i].len() {
                targets.push(i);
            }
        }

        for v in init..n {
            let mut chosen: Vec<usize> = Vec::with_capacity(m);
            while chosen.len() < m {
                let u = targets[rng.random_range(0..targets.len())];
                if u != v && !chosen.contains(&u) {
                    chosen.push(u);
                }
            }
            for &u in &chosen {
                adj[v].push(u as u32);
                adj[u].push(v as u32);
                targets.push(u);
                targets.push(v);
            }
        }

        Self::from_adj(adj)
    }

    /// Simple stochastic block model: `blocks` equal-sized communities.
    fn sbm(n: usize, blocks: usize, p_in: f64, p_out: f64, seed: u64) -> Self {
        assert!(blocks >= 2);
        assert!(n >= blocks);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut adj: Vec<Vec<u32>> = vec![Vec::new(); n];
        let bsz = n.div_ceil(blocks);

        for i in 0..n {
            let bi = (i / bsz).min(blocks - 1);
            for j in (i + 1)..n {
                let bj = (j / bsz).min(blocks - 1);
                let p = if bi == bj { p_in } else { p_out };
                if rng.random::<f64>() < p {
                    adj[i].push(j as u32);
                    adj[j].push(i as u32);
                }
            }
        }

        Self::from_adj(adj)
    }
}

fn bench_walk_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_generation");

    for n in [1_000usize, 10_000] {
        let graphs = [
            ("ring", CsrBuf::ring(n)),
            ("ba_m4", CsrBuf::barabasi_albert(n, 4, 123)),
            ("sbm4", CsrBuf::sbm(n, 4, 0.02, 0.002, 123)),
        ];

        // Keep total work bounded.
        let cfg = WalkConfig {
            n_walks: 2,
            walk_len: 40,
            seed: 123,
        };

        for (name, buf) in &graphs {
            let g = buf.graph();
            let starts = all_nodes(&g);

            group.bench_with_input(BenchmarkId::new(format!("{name}/uniform"), n), &n, |b, _| {
                b.iter(|| black_box(walk_uniform(black_box(&g), &starts, black_box(cfg))))
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}/restart"), n), &n, |b, _| {
                b.iter(|| black_box(walk_restart(black_box(&g), &starts, black_box(cfg), 0.15)))
            });

            group.bench_with_input(
                BenchmarkId::new(format!("{name}/node2vec"), n),
                &n,
                |b, _| {
                    b.iter(|| {
                        black_box(walk_node2vec(black_box(&g), &starts, black_box(cfg), 0.5, 2.0))
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_corruption(c: &mut Criterion) {
    let mut group = c.benchmark_group("corruption");

    let buf = CsrBuf::barabasi_albert(10_000, 4, 7);
    let g = buf.graph();
    let cfg = WalkConfig {
        n_walks: 2,
        walk_len: 40,
        seed: 7,
    };
    let walks = walk_uniform(&g, &all_nodes(&g), cfg).expect("walks");
    let pool: Vec<u32> = (0..1_000).collect();

    for rate in [0.05f32, 0.2] {
        let ccfg = CorruptionConfig { rate, seed: 7 };
        group.bench_with_input(BenchmarkId::new("uniform", rate), &rate, |b, _| {
            b.iter(|| black_box(corrupted_uniform(black_box(&walks), 10_000, ccfg)))
        });
        group.bench_with_input(BenchmarkId::new("pool", rate), &rate, |b, _| {
            b.iter(|| black_box(corrupted_from_pool(black_box(&walks), &pool, 10_000, ccfg)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_walk_generation, bench_corruption);
criterion_main!(benches);
