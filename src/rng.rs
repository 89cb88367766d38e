//! Per-task random streams.
//!
//! Every task (one walk row, or one corruption event) gets its own generator,
//! derived from the call-level seed and the task index. Output is therefore a
//! pure function of `(inputs, seed)` and does not depend on how tasks are
//! scheduled across threads.
//!
//! Two generator grades are used:
//! - [`WalkRng`] (ChaCha8) for walk-step decisions, where stream quality matters.
//! - [`FastRng`] (xorshift) for corruption position/target picks, where it does not.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_xorshift::XorShiftRng;

pub type WalkRng = ChaCha8Rng;
pub type FastRng = XorShiftRng;

/// Stream tags keep walk and corruption seeds apart even when callers reuse a seed.
pub(crate) const WALK_STREAM: u64 = 0x5741_4c4b_0000_0001;
pub(crate) const CORRUPT_STREAM: u64 = 0x434f_5252_0000_0002;

/// SplitMix64 finalizer.
pub(crate) fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

pub(crate) fn task_seed(seed: u64, stream: u64, task: usize) -> u64 {
    mix64(mix64(seed ^ stream) ^ (task as u64).wrapping_mul(0x9e3779b97f4a7c15))
}

pub(crate) fn walk_rng(seed: u64, task: usize) -> WalkRng {
    WalkRng::seed_from_u64(task_seed(seed, WALK_STREAM, task))
}

pub(crate) fn fast_rng(seed: u64, task: usize) -> FastRng {
    FastRng::seed_from_u64(task_seed(seed, CORRUPT_STREAM, task))
}
