//! Inverse-CDF next-step selection over a CSR row.

/// Index of the first weight whose running sum reaches `draw`.
///
/// Falls back to the last index when rounding keeps the running sum below
/// `draw` for the whole row. `weights` must be non-empty.
#[inline]
pub fn sample_index(weights: &[f32], draw: f32) -> usize {
    debug_assert!(!weights.is_empty(), "sampler called on a sink row");
    let mut cumsum = 0.0f32;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if draw <= cumsum {
            return i;
        }
    }
    weights.len() - 1
}

/// Like [`sample_index`], but for unnormalized weights: `draw` in `[0, 1)` is
/// scaled by the row total before the scan.
#[inline]
pub fn sample_scaled(weights: &[f32], draw: f32) -> usize {
    let total = weights.iter().copied().sum::<f32>();
    sample_index(weights, draw * total)
}
