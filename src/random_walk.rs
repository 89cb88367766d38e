//! Random walk batches: uniform, restart-biased, and the dispatcher shared with node2vec.

use crate::graph::{check_nodes, WeightedGraphRef};
use crate::node2vec::node2vec_walk;
use crate::parallel::fill_rows;
use crate::rng::walk_rng;
use crate::sample::sample_index;
use crate::{Error, Result, WalkBatch};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkConfig {
    /// Walks generated per start node.
    pub n_walks: usize,
    /// Nodes per walk, start node included.
    pub walk_len: usize,
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            n_walks: 10,
            walk_len: 80,
            seed: 42,
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.walk_len == 0 {
            return Err(Error::InvalidParameter(
                "walk_len must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Transition rule applied at every step of a walk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkPolicy {
    /// First-order weighted walk.
    Uniform,
    /// Weighted walk that jumps back to its start node with probability `alpha`.
    Restart { alpha: f32 },
    /// Second-order node2vec walk with return parameter `p` and in-out parameter `q`.
    Node2Vec { p: f32, q: f32 },
}

impl WalkPolicy {
    /// Pick a policy from loose front-end parameters.
    ///
    /// Any of `p`/`q` selects node2vec (the other defaults to 1). Otherwise a
    /// positive `alpha` selects restart walks, and everything else is uniform.
    pub fn from_params(alpha: f32, p: Option<f32>, q: Option<f32>) -> Self {
        if p.is_some() || q.is_some() {
            WalkPolicy::Node2Vec {
                p: p.unwrap_or(1.0),
                q: q.unwrap_or(1.0),
            }
        } else if alpha > 0.0 {
            WalkPolicy::Restart { alpha }
        } else {
            WalkPolicy::Uniform
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            WalkPolicy::Uniform => Ok(()),
            WalkPolicy::Restart { alpha } => {
                if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
                    return Err(Error::InvalidParameter(format!(
                        "alpha must be in [0,1], got {alpha}"
                    )));
                }
                Ok(())
            }
            // Below `f32::MIN_POSITIVE`, `w / p` can overflow to infinity.
            WalkPolicy::Node2Vec { p, q } => {
                if !p.is_finite() || p < f32::MIN_POSITIVE {
                    return Err(Error::InvalidParameter(format!(
                        "p must be finite and >= f32::MIN_POSITIVE, got {p}"
                    )));
                }
                if !q.is_finite() || q < f32::MIN_POSITIVE {
                    return Err(Error::InvalidParameter(format!(
                        "q must be finite and >= f32::MIN_POSITIVE, got {q}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Weighted first-order walks.
///
/// Returns a `(n_walks * start_nodes.len(), walk_len)` batch whose row `i` starts
/// at `start_nodes[i % start_nodes.len()]`. Sinks repeat until the row is full.
pub fn walk_uniform<G>(graph: &G, start_nodes: &[u32], config: WalkConfig) -> Result<WalkBatch>
where
    G: WeightedGraphRef + Sync,
{
    generate_walks(graph, start_nodes, config, WalkPolicy::Uniform)
}

/// Weighted walks with restart probability `alpha` at every non-sink step.
pub fn walk_restart<G>(
    graph: &G,
    start_nodes: &[u32],
    config: WalkConfig,
    alpha: f32,
) -> Result<WalkBatch>
where
    G: WeightedGraphRef + Sync,
{
    generate_walks(graph, start_nodes, config, WalkPolicy::Restart { alpha })
}

/// Generate a walk batch under `policy`.
///
/// Invariant: output is stable for a fixed `config.seed`, independent of Rayon
/// thread count. Each row draws from its own stream keyed by the row index.
pub fn generate_walks<G>(
    graph: &G,
    start_nodes: &[u32],
    config: WalkConfig,
    policy: WalkPolicy,
) -> Result<WalkBatch>
where
    G: WeightedGraphRef + Sync,
{
    config.validate()?;
    policy.validate()?;
    check_nodes(start_nodes, graph.node_count())?;

    let m = start_nodes.len();
    let rows = config
        .n_walks
        .checked_mul(m)
        .filter(|rows| rows.checked_mul(config.walk_len).is_some())
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "batch of {} x {m} walks of length {} overflows",
                config.n_walks, config.walk_len
            ))
        })?;

    let mut data = vec![0u32; rows * config.walk_len];
    fill_rows(&mut data, config.walk_len, |i, walk| {
        let mut rng = walk_rng(config.seed, i);
        walk[0] = start_nodes[i % m];
        match policy {
            WalkPolicy::Uniform => weighted_walk(graph, walk, None, &mut rng),
            WalkPolicy::Restart { alpha } => weighted_walk(graph, walk, Some(alpha), &mut rng),
            WalkPolicy::Node2Vec { p, q } => node2vec_walk(graph, walk, p, q, &mut rng),
        }
    });

    tracing::debug!(
        ?policy,
        rows,
        walk_len = config.walk_len,
        seed = config.seed,
        "generated walk batch"
    );
    Ok(WalkBatch::from_shape_vec((rows, config.walk_len), data)?)
}

/// Fill `walk[1..]` starting from `walk[0]`.
///
/// All `walk.len() - 1` step draws are taken up front; restart coins come after
/// them, so `restart = Some(0.0)` reproduces the plain walk exactly.
fn weighted_walk<G: WeightedGraphRef, R: Rng>(
    graph: &G,
    walk: &mut [u32],
    restart: Option<f32>,
    rng: &mut R,
) {
    let start = walk[0];
    let draws: Vec<f32> = (1..walk.len()).map(|_| rng.random::<f32>()).collect();

    let mut curr = start;
    for k in 1..walk.len() {
        let (nbrs, wts) = graph.row(curr);
        if !nbrs.is_empty() {
            curr = match restart {
                Some(alpha) if rng.random::<f32>() < alpha => start,
                _ => nbrs[sample_index(wts, draws[k - 1])],
            };
        }
        walk[k] = curr;
    }
}
