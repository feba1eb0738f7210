//! Per-block insertion and containment kernels — the hardest, highest-share
//! part of this crate.
//!
//! Both families share one framing: a block is a contiguous run of
//! [`crate::word::Word`]s, a key contributes a 32-bit hash, and the kernel
//! derives one or more in-block positions from the bits of that hash the
//! block-addressing layer ([`crate::addressing`]) did not already consume
//! for the block index itself.

pub mod bloom;
pub mod cuckoo;

use crate::util::ceil_log2_u32;

/// Whether a kernel needing `needed_bits` in-block hash bits can draw them
/// straight from a 32-bit hash after `addressing_bits` were already spent on
/// the block index, or must fall back to a secondary hash. This check is a
/// hot-path decision lifted entirely out of the probe loop: it runs once at
/// construction, not per key.
#[inline]
pub(crate) fn needs_secondary_hash(addressing_bits: u32, needed_bits: u32) -> bool {
    addressing_bits + needed_bits > 32
}

/// Bits needed to pick one value uniformly out of `choices` options.
#[inline]
pub(crate) fn bits_to_address(choices: u32) -> u32 {
    ceil_log2_u32(choices)
}

/// `bits`-wide mask of `1`s, saturating at `u32::MAX` for `bits >= 32`.
#[inline]
pub(crate) fn low_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
