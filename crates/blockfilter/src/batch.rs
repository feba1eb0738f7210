//! Batch-probe engine.
//!
//! [`batch_contains`] is the throughput-oriented entry point: given a
//! caller-owned `keys` array and an `out` buffer at least as large, it
//! writes the positions of hitting keys, in input order, and returns how
//! many it wrote. The inner loop never branches on the per-key hit/miss
//! result:
//!
//! ```text
//! let hit = contains(key_j);
//! out[writer] = j + out_offset;
//! writer += hit as usize;   // 0 or 1, no data-dependent jump
//! ```
//!
//! Keys are processed in fixed 16-key mini-batches with a scalar tail for
//! the `< 16`-key remainder, and each mini-batch is itself walked in groups
//! of `unroll_factor` keys — `0`/`1` is the one-key-at-a-time scalar path,
//! `{2, 4, 8}` evaluate that many `contains` calls before writing any of
//! them out, in the spirit of a gathered SIMD compare-and-compress-store.
//! Every grouping produces byte-identical output — this module is built to
//! satisfy that by construction rather than by testing luck.

use crate::dispatch::FilterHandle;
use crate::hash::{PrimaryHash, SecondaryHash};
use crate::word::Word;

/// Fixed mini-batch tile size.
const MINI_BATCH: usize = 16;

/// Maximum supported unroll factor; also the largest lane-group
/// `run_mini_batched` ever buffers hits for.
const MAX_LANES: usize = 8;

/// Tests every key in `keys` against `handle`'s filter and writes the
/// indices (offset by `out_offset`) of the ones reported contained into
/// `out`, in increasing input order. Returns the number written.
///
/// `out` must be at least `keys.len()` long. Duplicate keys that both hit
/// produce two consecutive output entries.
pub fn batch_contains<W: Word, P: PrimaryHash, S: SecondaryHash>(
    handle: &FilterHandle<W, P, S>,
    data: &[W],
    keys: &[u32],
    out: &mut [usize],
    out_offset: usize,
) -> usize {
    let unroll_factor = handle.unroll_factor();
    match handle {
        FilterHandle::Bloom { filter, .. } => {
            run_mini_batched(unroll_factor, keys, out, out_offset, |k| filter.contains(data, k))
        }
        FilterHandle::Cuckoo { filter, .. } => {
            run_mini_batched(unroll_factor, keys, out, out_offset, |k| filter.contains(data, k))
        }
    }
}

/// The mini-batched, lane-grouped branchless writer, independent of which
/// filter family `contains` closes over. Exposed `pub(crate)` so
/// [`crate::dispatch::tune_with_clock`] can time it directly against each
/// candidate unroll factor without going through a [`FilterHandle`].
pub(crate) fn run_mini_batched<F: FnMut(u32) -> bool>(
    unroll_factor: u32,
    keys: &[u32],
    out: &mut [usize],
    out_offset: usize,
    mut contains: F,
) -> usize {
    let lanes = lanes_for(unroll_factor);
    let mut writer = 0usize;
    let mut chunks = keys.chunks_exact(MINI_BATCH);
    for (chunk_idx, mini) in chunks.by_ref().enumerate() {
        writer = probe_tile(lanes, mini, chunk_idx * MINI_BATCH, out, out_offset, writer, &mut contains);
    }
    let remainder = chunks.remainder();
    let base = keys.len() - remainder.len();
    writer = probe_tile(lanes, remainder, base, out, out_offset, writer, &mut contains);
    writer
}

/// Number of keys grouped per simulated SIMD iteration for a given unroll
/// factor. `0` and `1` both mean scalar.
#[inline]
fn lanes_for(unroll_factor: u32) -> usize {
    match unroll_factor {
        0 | 1 => 1,
        n => (n as usize).min(MAX_LANES),
    }
}

/// Processes one tile (a full 16-key mini-batch or the trailing remainder)
/// in groups of `lanes` keys: evaluate `contains` for the whole group
/// first (the "gather" step a real SIMD kernel would do with a vector
/// load + compare), then perform the branchless writes for the group in
/// order. Grouping never changes which positions get written or their
/// order, only how many `contains` calls are issued before the next batch
/// of writes — the externally observable output is identical for every
/// `lanes` value.
#[inline]
fn probe_tile<F: FnMut(u32) -> bool>(
    lanes: usize,
    tile: &[u32],
    base_j: usize,
    out: &mut [usize],
    out_offset: usize,
    writer_start: usize,
    contains: &mut F,
) -> usize {
    let mut writer = writer_start;
    let mut i = 0;
    while i < tile.len() {
        let width = lanes.min(tile.len() - i);
        let mut hits = [false; MAX_LANES];
        for (l, hit) in hits.iter_mut().enumerate().take(width) {
            *hit = contains(tile[i + l]);
        }
        for (l, &hit) in hits.iter().enumerate().take(width) {
            let j = base_j + i + l;
            out[writer] = j + out_offset;
            writer += hit as usize;
        }
        i += width;
    }
    writer
}
