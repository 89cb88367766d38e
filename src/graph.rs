//! CSR graph view and adapter trait.

use crate::{Error, Result};

/// A weighted graph view that can return **borrowed** neighbor + weight slices.
///
/// This is the CSR-style shape every walk policy consumes: a node has a
/// contiguous neighbor list and a contiguous weight list, with matching indices.
pub trait WeightedGraphRef {
    fn node_count(&self) -> usize;

    /// Return `(neighbors, weights)` for a node.
    ///
    /// Requirements:
    /// - `neighbors.len() == weights.len()`
    /// - every neighbor id is `< node_count()`
    /// - weights of a row are non-negative and (for unbiased sampling) sum to ~1
    fn row(&self, node: u32) -> (&[u32], &[f32]);

    fn out_degree(&self, node: u32) -> usize {
        self.row(node).0.len()
    }

    fn is_sink(&self, node: u32) -> bool {
        self.out_degree(node) == 0
    }

    /// Whether `target` appears in `source`'s row (linear scan).
    fn has_edge(&self, source: u32, target: u32) -> bool {
        self.row(source).0.iter().any(|&x| x == target)
    }
}

/// Read-only view over a compressed sparse row adjacency structure.
///
/// Row `v` occupies `columns[row_start[v]..row_start[v + 1]]` and the matching
/// range of `weights`. A row with `row_start[v] == row_start[v + 1]` is a sink.
#[derive(Debug, Clone, Copy)]
pub struct CsrGraph<'a> {
    row_start: &'a [u32],
    columns: &'a [u32],
    weights: &'a [f32],
}

impl<'a> CsrGraph<'a> {
    /// Validate and wrap CSR buffers.
    ///
    /// Structure is checked once here so the walk loops can index freely.
    /// Row-stochasticity of `weights` is assumed, not checked.
    pub fn new(row_start: &'a [u32], columns: &'a [u32], weights: &'a [f32]) -> Result<Self> {
        let Some((&first, _)) = row_start.split_first() else {
            return Err(Error::InvalidGraph(
                "row_start must have length node_count + 1".to_string(),
            ));
        };
        if first != 0 {
            return Err(Error::InvalidGraph(format!(
                "row_start[0] must be 0, got {first}"
            )));
        }
        if columns.len() != weights.len() {
            return Err(Error::InvalidGraph(format!(
                "columns and weights differ in length ({} vs {})",
                columns.len(),
                weights.len()
            )));
        }
        if let Some(i) = row_start.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidGraph(format!(
                "row_start decreases at row {i}"
            )));
        }
        let nnz = row_start[row_start.len() - 1] as usize;
        if nnz != columns.len() {
            return Err(Error::InvalidGraph(format!(
                "row_start ends at {nnz} but there are {} edges",
                columns.len()
            )));
        }
        let n = row_start.len() - 1;
        if u32::try_from(n).is_err() {
            return Err(Error::InvalidGraph(format!(
                "{n} nodes do not fit in u32 ids"
            )));
        }
        if let Some(&c) = columns.iter().find(|&&c| c as usize >= n) {
            return Err(Error::NodeOutOfRange {
                node: c,
                node_count: n,
            });
        }

        Ok(Self {
            row_start,
            columns,
            weights,
        })
    }

    pub fn edge_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_start(&self) -> &'a [u32] {
        self.row_start
    }

    pub fn columns(&self) -> &'a [u32] {
        self.columns
    }

    pub fn weights(&self) -> &'a [f32] {
        self.weights
    }
}

impl WeightedGraphRef for CsrGraph<'_> {
    fn node_count(&self) -> usize {
        self.row_start.len() - 1
    }

    fn row(&self, node: u32) -> (&[u32], &[f32]) {
        let v = node as usize;
        let start = self.row_start[v] as usize;
        let end = self.row_start[v + 1] as usize;
        (&self.columns[start..end], &self.weights[start..end])
    }
}

/// Every node id of `graph`, in order. The default start set for a full pass.
pub fn all_nodes<G: WeightedGraphRef>(graph: &G) -> Vec<u32> {
    (0..graph.node_count() as u32).collect()
}

/// Check that every id in `nodes` is a valid row of a graph with `node_count` nodes.
pub(crate) fn check_nodes(nodes: &[u32], node_count: usize) -> Result<()> {
    match nodes.iter().find(|&&v| v as usize >= node_count) {
        Some(&node) => Err(Error::NodeOutOfRange { node, node_count }),
        None => Ok(()),
    }
}
