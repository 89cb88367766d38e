//! `walker`: random walk batches over CSR graphs, plus walk corruption for
//! contrastive training data.
//!
//! Walk policies:
//! - [`walk_uniform`]: first-order weighted walks
//! - [`walk_restart`]: weighted walks that jump back to the start node with probability `alpha`
//! - [`walk_node2vec`]: second-order walks biased by return (`p`) and in-out (`q`) parameters
//!
//! Corruption ([`corrupt_uniform`], [`corrupt_from_pool`], [`corrupt_adjacency_aware`])
//! overwrites random cells of an existing batch and reports what survived in a
//! boolean similarity mask.
//!
//! Public invariants (must not drift):
//! - **Batch layout**: row `i` of a `(n_walks * m, walk_len)` batch starts at
//!   `start_nodes[i % m]`; column 0 is always the start node.
//! - **Sinks absorb**: a walk that reaches a node with no out-edges repeats it.
//! - **Determinism**: every operation is a pure function of its inputs and seed,
//!   independent of Rayon thread count.
//! - **No silent normalization**: rows are assumed row-stochastic; weights are
//!   never rescaled.
//!
//! Swappable (allowed to change without breaking the contract):
//! - iteration strategy (serial vs parallel)
//! - internal buffers and RNG stream derivation (so long as determinism holds)

pub mod corrupt;
pub mod graph;
pub mod node2vec;
pub(crate) mod parallel;
pub mod random_walk;
pub mod rng;
pub mod sample;

pub use corrupt::{
    corrupt_adjacency_aware, corrupt_from_pool, corrupt_uniform, corrupted_from_pool,
    corrupted_uniform, corruption_count, Corruption, CorruptionConfig,
};
pub use graph::{all_nodes, CsrGraph, WeightedGraphRef};
pub use node2vec::walk_node2vec;
pub use random_walk::{generate_walks, walk_restart, walk_uniform, WalkConfig, WalkPolicy};
pub use sample::{sample_index, sample_scaled};

/// Dense `(rows, walk_len)` matrix of node ids.
pub type WalkBatch = ndarray::Array2<u32>;

/// Dense boolean matrix: `true` where a walk was left unchanged.
pub type SimilarityMask = ndarray::Array2<bool>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("node {node} out of range for {node_count} nodes")]
    NodeOutOfRange { node: u32, node_count: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("batch shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, Error>;
