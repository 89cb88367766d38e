//! End-to-end sketch: node2vec walks → hard-negative pool → corrupted batch + mask.
//!
//! The pool is the highest-degree nodes of the graph: substituting hubs into a
//! walk gives negatives that are locally plausible, which is the usual reason
//! to prefer pool corruption over uniform corruption.
//!
//! RUST_LOG=walker=debug cargo run --example corrupted_walks

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use walker::{
    all_nodes, corrupted_from_pool, walk_node2vec, CorruptionConfig, CsrGraph, WalkConfig,
    WeightedGraphRef,
};

#[derive(Debug, Clone)]
struct Adj {
    adj: Vec<Vec<u32>>,
}

impl Adj {
    fn sbm_two_block(n: usize, p_in: f64, p_out: f64, seed: u64) -> Self {
        assert!(n >= 4);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut adj = vec![Vec::new(); n];
        let half = n / 2;
        for i in 0..n {
            for j in (i + 1)..n {
                let same = (i < half) == (j < half);
                let p = if same { p_in } else { p_out };
                if rng.random::<f64>() < p {
                    adj[i].push(j as u32);
                    adj[j].push(i as u32);
                }
            }
        }
        Self { adj }
    }

    /// Load an undirected edge list (two whitespace-separated node ids per line).
    ///
    /// Lines starting with `#` are ignored.
    fn from_undirected_edgelist(path: &Path) -> Result<Self, String> {
        let txt = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let mut edges: Vec<(u32, u32)> = Vec::new();
        let mut max_node = 0u32;
        for (line_no, line) in txt.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut it = line.split_whitespace();
            let (Some(a), Some(b)) = (it.next(), it.next()) else {
                return Err(format!("line {}: expected two node ids", line_no + 1));
            };
            let u: u32 = a
                .parse()
                .map_err(|e| format!("line {}: bad src '{a}': {e}", line_no + 1))?;
            let v: u32 = b
                .parse()
                .map_err(|e| format!("line {}: bad dst '{b}': {e}", line_no + 1))?;
            max_node = max_node.max(u).max(v);
            edges.push((u, v));
        }

        let mut adj = vec![Vec::new(); max_node as usize + 1];
        for (u, v) in edges {
            if u == v {
                continue;
            }
            adj[u as usize].push(v);
            adj[v as usize].push(u);
        }
        Ok(Self { adj })
    }

    /// Row-normalized CSR buffers `(row_start, columns, weights)`.
    fn to_csr(&self) -> (Vec<u32>, Vec<u32>, Vec<f32>) {
        let mut row_start = vec![0u32];
        let mut columns = Vec::new();
        let mut weights = Vec::new();
        for nbrs in &self.adj {
            let mut nbrs = nbrs.clone();
            nbrs.sort_unstable();
            nbrs.dedup();
            let w = 1.0 / nbrs.len().max(1) as f32;
            weights.extend(std::iter::repeat(w).take(nbrs.len()));
            columns.extend(nbrs);
            row_start.push(columns.len() as u32);
        }
        (row_start, columns, weights)
    }
}

fn main() -> walker::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // WALKER_EDGELIST=/path/to/edges.txt cargo run --example corrupted_walks
    let adj = match std::env::var("WALKER_EDGELIST") {
        Ok(path) => Adj::from_undirected_edgelist(Path::new(&path))
            .unwrap_or_else(|e| panic!("failed to load WALKER_EDGELIST: {e}")),
        Err(_) => Adj::sbm_two_block(500, 0.02, 0.002, 123),
    };
    let (row_start, columns, weights) = adj.to_csr();
    let g = CsrGraph::new(&row_start, &columns, &weights)?;
    let n = g.node_count();

    let cfg = WalkConfig {
        n_walks: 4,
        walk_len: 20,
        seed: 9,
    };
    let walks = walk_node2vec(&g, &all_nodes(&g), cfg, 0.5, 2.0)?;

    // Hard-negative pool: top 5% of nodes by degree.
    let mut by_degree: Vec<u32> = all_nodes(&g);
    by_degree.sort_by(|&a, &b| g.out_degree(b).cmp(&g.out_degree(a)).then(a.cmp(&b)));
    let pool: Vec<u32> = by_degree.into_iter().take((n / 20).max(1)).collect();

    let out = corrupted_from_pool(
        &walks,
        &pool,
        n as u32,
        CorruptionConfig {
            rate: 0.1,
            seed: 9,
        },
    )?;

    let broken = out.mask.iter().filter(|&&m| !m).count();
    println!("graph: n={n}, edges={}", g.edge_count());
    println!("walks: {:?}, pool size {}", walks.dim(), pool.len());
    println!(
        "mask: {:?}, {broken} of {} edges broken",
        out.mask.dim(),
        out.mask.len()
    );
    println!();
    println!("first walk, original vs corrupted:");
    println!("  {}", walks.row(0));
    println!("  {}", out.walks.row(0));
    Ok(())
}
