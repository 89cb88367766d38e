//! Bulk independent tasks over rayon (or serially without the `parallel` feature).
//!
//! Tasks never share mutable state: each one either owns a disjoint row of the
//! output buffer or returns a value that the caller applies afterwards.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Run `f(row_index, row)` for every `row_len`-sized row of `out`.
pub(crate) fn fill_rows<T, F>(out: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));
}

/// Compute `f(task)` for `task in 0..n`, returned in task order.
pub(crate) fn map_tasks<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}
