//! Second-order (node2vec) biased walks over CSR rows.
//!
//! At step `k >= 2`, with `prev = walk[k - 2]` and candidate edge `cur -> x`:
//! - `x == prev`: weight divided by the return parameter `p`
//! - `x` is a neighbor of `prev`: weight unchanged
//! - otherwise: weight divided by the in-out parameter `q`
//!
//! The step draw is then matched against the cumulative sum of the transformed
//! weights. The first transition has no second-order context and samples the
//! raw row. Membership in `prev`'s row is a linear scan, so a step costs
//! `O(deg(cur) * deg(prev))`.

use crate::graph::WeightedGraphRef;
use crate::random_walk::{generate_walks, WalkConfig, WalkPolicy};
use crate::sample::{sample_index, sample_scaled};
use crate::{Result, WalkBatch};
use rand::Rng;

/// Node2vec walks with return parameter `p` and in-out parameter `q`.
///
/// `p = q = 1` leaves every weight untouched and samples like [`crate::walk_uniform`].
pub fn walk_node2vec<G>(
    graph: &G,
    start_nodes: &[u32],
    config: WalkConfig,
    p: f32,
    q: f32,
) -> Result<WalkBatch>
where
    G: WeightedGraphRef + Sync,
{
    generate_walks(graph, start_nodes, config, WalkPolicy::Node2Vec { p, q })
}

pub(crate) fn node2vec_walk<G: WeightedGraphRef, R: Rng>(
    graph: &G,
    walk: &mut [u32],
    p: f32,
    q: f32,
    rng: &mut R,
) {
    let draws: Vec<f32> = (1..walk.len()).map(|_| rng.random::<f32>()).collect();
    let mut buf: Vec<f32> = Vec::new();

    let mut curr = walk[0];
    for k in 1..walk.len() {
        let (nbrs, wts) = graph.row(curr);
        if !nbrs.is_empty() {
            let draw = draws[k - 1];
            let idx = if k >= 2 {
                fill_node2vec_weights(graph, walk[k - 2], nbrs, wts, p, q, &mut buf);
                sample_scaled(&buf, draw)
            } else {
                sample_index(wts, draw)
            };
            curr = nbrs[idx];
        }
        walk[k] = curr;
    }
}

fn fill_node2vec_weights<G: WeightedGraphRef>(
    graph: &G,
    prev: u32,
    nbrs: &[u32],
    wts: &[f32],
    p: f32,
    q: f32,
    buf: &mut Vec<f32>,
) {
    debug_assert_eq!(nbrs.len(), wts.len());
    let (prev_nbrs, _) = graph.row(prev);

    buf.clear();
    buf.extend(nbrs.iter().zip(wts).map(|(&x, &w)| {
        if x == prev {
            w / p
        } else if prev_nbrs.contains(&x) {
            w
        } else {
            w / q
        }
    }));
}
