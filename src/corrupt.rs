//! Walk corruption: random node substitutions plus a mask of what survived.
//!
//! Corruption events are drawn in parallel (one cheap xorshift stream per event)
//! and then applied in event order. Two events landing on the same cell resolve
//! to the later event, so a given seed always produces the same batch.
//!
//! Column 0 (the start node) is never corrupted.

use crate::graph::WeightedGraphRef;
use crate::parallel::map_tasks;
use crate::rng::{fast_rng, FastRng};
use crate::{Error, Result, SimilarityMask, WalkBatch};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorruptionConfig {
    /// Fraction of batch cells to corrupt; `floor(rows * walk_len * rate)` events.
    pub rate: f32,
    pub seed: u64,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            rate: 0.1,
            seed: 42,
        }
    }
}

impl CorruptionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.rate.is_finite() || !(0.0..=1.0).contains(&self.rate) {
            return Err(Error::InvalidParameter(format!(
                "corruption rate must be in [0,1], got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

/// A corrupted copy of a walk batch together with its similarity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Corruption {
    pub walks: WalkBatch,
    pub mask: SimilarityMask,
}

/// Number of corruption events for a `(rows, walk_len)` batch.
///
/// Evaluated in `f32`: `rate = 0.7` over 10 cells gives 7 events, not 6.
pub fn corruption_count(rows: usize, walk_len: usize, rate: f32) -> usize {
    let cells = rows.saturating_mul(walk_len) as f32;
    (cells * rate).floor() as usize
}

#[derive(Debug, Clone, Copy)]
struct Event {
    row: usize,
    col: usize,
    node: u32,
}

/// Draw all events for a batch. Empty when no cell is corruptible.
fn draw_events<F>(rows: usize, walk_len: usize, config: CorruptionConfig, pick: F) -> Vec<Event>
where
    F: Fn(&mut FastRng) -> u32 + Sync + Send,
{
    if rows == 0 || walk_len < 2 {
        return Vec::new();
    }
    let n = corruption_count(rows, walk_len, config.rate);
    map_tasks(n, |t| {
        let mut rng = fast_rng(config.seed, t);
        let row = rng.random_range(0..rows);
        let col = rng.random_range(1..walk_len);
        let node = pick(&mut rng);
        Event { row, col, node }
    })
}

/// Whether any event would be drawn for this batch.
fn has_work(rows: usize, walk_len: usize, rate: f32) -> bool {
    rows > 0 && walk_len >= 2 && corruption_count(rows, walk_len, rate) > 0
}

/// Replace random cells of `walks` with uniform node ids in `[0, n_nodes)`.
///
/// Mutates `walks` in place. The returned mask has the batch's shape and is
/// `false` exactly at the corrupted cells.
pub fn corrupt_uniform(
    walks: &mut WalkBatch,
    n_nodes: u32,
    config: CorruptionConfig,
) -> Result<SimilarityMask> {
    config.validate()?;
    let (rows, walk_len) = walks.dim();
    if n_nodes == 0 && has_work(rows, walk_len, config.rate) {
        return Err(Error::InvalidParameter(
            "n_nodes must be > 0 to draw replacement nodes".to_string(),
        ));
    }

    let events = draw_events(rows, walk_len, config, |rng| rng.random_range(0..n_nodes));
    let mut mask = SimilarityMask::from_elem((rows, walk_len), true);
    for e in &events {
        walks[[e.row, e.col]] = e.node;
        mask[[e.row, e.col]] = false;
    }

    tracing::debug!(
        rows,
        walk_len,
        events = events.len(),
        "applied uniform corruption"
    );
    Ok(mask)
}

/// Replace random cells of `walks` with ids drawn uniformly from `candidates`.
///
/// Mutates `walks` in place. The mask has `walk_len - 1` columns, one per walk
/// edge: `mask[[x, j]]` covers the step `walks[[x, j]] -> walks[[x, j + 1]]`.
/// Corrupting cell `(x, y)` breaks the edge into it (`j = y - 1`) and, unless
/// `y` is the last column, the edge out of it (`j = y`).
pub fn corrupt_from_pool(
    walks: &mut WalkBatch,
    candidates: &[u32],
    n_nodes: u32,
    config: CorruptionConfig,
) -> Result<SimilarityMask> {
    config.validate()?;
    let (rows, walk_len) = walks.dim();
    if let Some(&node) = candidates.iter().find(|&&c| c >= n_nodes) {
        return Err(Error::NodeOutOfRange {
            node,
            node_count: n_nodes as usize,
        });
    }
    if candidates.is_empty() && has_work(rows, walk_len, config.rate) {
        return Err(Error::InvalidParameter(
            "candidate pool is empty".to_string(),
        ));
    }

    let events = draw_events(rows, walk_len, config, |rng| {
        candidates[rng.random_range(0..candidates.len())]
    });
    let mut mask = SimilarityMask::from_elem((rows, walk_len.saturating_sub(1)), true);
    for e in &events {
        walks[[e.row, e.col]] = e.node;
        mask[[e.row, e.col - 1]] = false;
        if e.col + 1 < walk_len {
            mask[[e.row, e.col]] = false;
        }
    }

    tracing::debug!(
        rows,
        walk_len,
        pool = candidates.len(),
        events = events.len(),
        "applied candidate-pool corruption"
    );
    Ok(mask)
}

/// Replace random cells with uniform node ids and re-check the touched edges
/// against `graph`.
///
/// The mask has `walk_len - 1` columns like [`corrupt_from_pool`]. Edges next to a
/// corrupted cell are `true` only if they are still a step a walk could take
/// (an edge of `graph`, or a sink repeating itself). Untouched edges stay `true`.
pub fn corrupt_adjacency_aware<G: WeightedGraphRef>(
    walks: &mut WalkBatch,
    graph: &G,
    config: CorruptionConfig,
) -> Result<SimilarityMask> {
    config.validate()?;
    let node_count = graph.node_count();
    let (rows, walk_len) = walks.dim();
    if let Some(&node) = walks.iter().find(|&&v| v as usize >= node_count) {
        return Err(Error::NodeOutOfRange { node, node_count });
    }
    if node_count == 0 && has_work(rows, walk_len, config.rate) {
        return Err(Error::InvalidParameter(
            "graph has no nodes to draw replacements from".to_string(),
        ));
    }
    // `CsrGraph::new` guarantees this; custom adapters may not.
    let n_nodes = u32::try_from(node_count).map_err(|_| {
        Error::InvalidGraph(format!("{node_count} nodes do not fit in u32 ids"))
    })?;

    let events = draw_events(rows, walk_len, config, |rng| rng.random_range(0..n_nodes));
    for e in &events {
        walks[[e.row, e.col]] = e.node;
    }

    let mut mask = SimilarityMask::from_elem((rows, walk_len.saturating_sub(1)), true);
    for e in &events {
        let into = e.col - 1;
        mask[[e.row, into]] = is_walk_step(graph, walks[[e.row, into]], walks[[e.row, e.col]]);
        if e.col + 1 < walk_len {
            mask[[e.row, e.col]] =
                is_walk_step(graph, walks[[e.row, e.col]], walks[[e.row, e.col + 1]]);
        }
    }

    tracing::debug!(
        rows,
        walk_len,
        events = events.len(),
        "applied adjacency-aware corruption"
    );
    Ok(mask)
}

fn is_walk_step<G: WeightedGraphRef>(graph: &G, from: u32, to: u32) -> bool {
    if graph.is_sink(from) {
        from == to
    } else {
        graph.has_edge(from, to)
    }
}

/// Like [`corrupt_uniform`], but leaves `walks` untouched and returns a corrupted copy.
pub fn corrupted_uniform(
    walks: &WalkBatch,
    n_nodes: u32,
    config: CorruptionConfig,
) -> Result<Corruption> {
    let mut walks = walks.clone();
    let mask = corrupt_uniform(&mut walks, n_nodes, config)?;
    Ok(Corruption { walks, mask })
}

/// Like [`corrupt_from_pool`], but leaves `walks` untouched and returns a corrupted copy.
pub fn corrupted_from_pool(
    walks: &WalkBatch,
    candidates: &[u32],
    n_nodes: u32,
    config: CorruptionConfig,
) -> Result<Corruption> {
    let mut walks = walks.clone();
    let mask = corrupt_from_pool(&mut walks, candidates, n_nodes, config)?;
    Ok(Corruption { walks, mask })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CsrGraph;
    use ndarray::array;

    #[test]
    fn count_floors_the_product() {
        assert_eq!(corruption_count(10, 10, 0.0), 0);
        assert_eq!(corruption_count(10, 10, 0.1), 10);
        assert_eq!(corruption_count(3, 5, 0.1), 1);
        assert_eq!(corruption_count(3, 5, 1.0), 15);
        // Rates that round below their decimal value in f32.
        assert_eq!(corruption_count(1, 10, 0.7), 7);
        assert_eq!(corruption_count(1, 10, 0.9), 9);
        assert_eq!(corruption_count(10, 10, 0.7), 70);
    }

    #[test]
    fn events_stay_off_column_zero() {
        let cfg = CorruptionConfig {
            rate: 1.0,
            seed: 11,
        };
        let events = draw_events(7, 4, cfg, |rng| rng.random_range(0..100));
        assert_eq!(events.len(), 28);
        for e in events {
            assert!(e.row < 7);
            assert!((1..4).contains(&e.col));
            assert!(e.node < 100);
        }
    }

    #[test]
    fn single_column_batches_are_left_alone() {
        let mut walks = array![[3u32], [4]];
        let cfg = CorruptionConfig {
            rate: 1.0,
            seed: 0,
        };
        let mask = corrupt_uniform(&mut walks, 0, cfg).unwrap();
        assert_eq!(walks, array![[3u32], [4]]);
        assert!(mask.iter().all(|&m| m));

        let mask = corrupt_from_pool(&mut walks, &[], 0, cfg).unwrap();
        assert_eq!(mask.dim(), (2, 0));
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut walks = array![[0u32, 1, 2]];
        let cfg = CorruptionConfig {
            rate: 1.0,
            seed: 0,
        };
        assert!(matches!(
            corrupt_uniform(&mut walks, 0, cfg),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            corrupt_from_pool(&mut walks, &[], 3, cfg),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            corrupt_from_pool(&mut walks, &[1, 9], 3, cfg),
            Err(Error::NodeOutOfRange { node: 9, .. })
        ));
        let bad_rate = CorruptionConfig { rate: 1.5, seed: 0 };
        assert!(corrupt_uniform(&mut walks, 3, bad_rate).is_err());
        assert_eq!(walks, array![[0u32, 1, 2]]);
    }

    #[test]
    fn adjacency_mask_rechecks_touched_edges() {
        // Complete directed graph on 3 nodes without self loops, plus sink 3.
        let row_start = [0u32, 2, 4, 6, 6];
        let columns = [1u32, 2, 0, 2, 0, 1];
        let weights = [0.5f32; 6];
        let g = CsrGraph::new(&row_start, &columns, &weights).unwrap();

        let original = array![[0u32, 1, 2, 0, 1, 2], [1, 2, 0, 1, 2, 0]];
        let mut walks = original.clone();
        let cfg = CorruptionConfig {
            rate: 0.5,
            seed: 5,
        };
        let mask = corrupt_adjacency_aware(&mut walks, &g, cfg).unwrap();
        assert_eq!(mask.dim(), (2, 5));

        for x in 0..2 {
            for j in 0..5 {
                let (a, b) = (walks[[x, j]], walks[[x, j + 1]]);
                let step_ok = is_walk_step(&g, a, b);
                if mask[[x, j]] {
                    // Either untouched (still an original step) or re-checked and valid.
                    assert!(step_ok, "masked-true edge {a} -> {b} is not a walk step");
                } else {
                    assert!(!step_ok, "masked-false edge {a} -> {b} is a walk step");
                }
            }
        }
        assert_eq!(walks.column(0), original.column(0));
    }

    #[test]
    fn sink_repeats_count_as_walk_steps() {
        let row_start = [0u32, 1, 1];
        let columns = [1u32];
        let weights = [1.0f32];
        let g = CsrGraph::new(&row_start, &columns, &weights).unwrap();
        assert!(is_walk_step(&g, 0, 1));
        assert!(is_walk_step(&g, 1, 1));
        assert!(!is_walk_step(&g, 0, 0));
        assert!(!is_walk_step(&g, 1, 0));
    }
}
