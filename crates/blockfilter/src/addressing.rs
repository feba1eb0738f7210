//! Block-addressing logic.
//!
//! Maps a 32-bit hash value to a block index, either by masking the high
//! bits of a power-of-two block count (`POW2`) or by a magic-multiply
//! reciprocal that supports an arbitrary block count (`MAGIC`). Either way,
//! addressing consumes the *high* bits of the hash, leaving the low bits
//! free for in-block addressing by the block kernels (`crate::block`).

use crate::config::AddrMode;
use crate::util::ceil_log2_usize;

/// An immutable, precomputed hash-to-block-index mapping.
///
/// Built once per filter (in [`crate::dispatch::construct`]) and then used
/// on every insert/contains call. `get_block_idx` is pure, deterministic,
/// and involves no division instruction at all in the `Magic` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingDescriptor {
    /// Power-of-two block count; indexing is a right-shift of the hash.
    Pow2 {
        /// Number of blocks, a power of two (or zero bits -> exactly 1 block).
        block_cnt: usize,
        /// `ceil(log2(block_cnt))`, also the shift amount's complement.
        bits: u32,
    },
    /// Arbitrary block count; indexing is a magic-multiply/shift in place
    /// of a division instruction.
    Magic {
        /// Number of blocks (any positive integer).
        block_cnt: usize,
        /// `ceil(log2(block_cnt))`, reserved for the in-block hash budget.
        bits: u32,
    },
}

impl AddressingDescriptor {
    /// Builds a descriptor for `addr_mode` that fits within `desired_block_cnt`
    /// blocks (at most, never more).
    ///
    /// For `Pow2`, `block_cnt` is the largest power of two `<= desired_block_cnt`
    /// (at least 1). For `Magic`, `block_cnt` is `desired_block_cnt` itself
    /// (at least 1) — it need not be a power of two.
    pub fn new(addr_mode: AddrMode, desired_block_cnt: usize) -> Self {
        let desired = desired_block_cnt.max(1);
        match addr_mode {
            AddrMode::Pow2 => {
                let block_cnt = prev_power_of_two(desired);
                let bits = block_cnt.trailing_zeros();
                AddressingDescriptor::Pow2 { block_cnt, bits }
            }
            AddrMode::Magic => {
                let block_cnt = desired;
                let bits = ceil_log2_usize(block_cnt);
                AddressingDescriptor::Magic { block_cnt, bits }
            }
        }
    }

    /// Number of blocks this descriptor addresses.
    pub fn block_cnt(&self) -> usize {
        match self {
            AddressingDescriptor::Pow2 { block_cnt, .. } => *block_cnt,
            AddressingDescriptor::Magic { block_cnt, .. } => *block_cnt,
        }
    }

    /// Hash bits consumed by addressing; the remaining `32 - bits` bits are
    /// available to the block kernel for in-block positions.
    pub fn addressing_bits(&self) -> u32 {
        match self {
            AddressingDescriptor::Pow2 { bits, .. } => *bits,
            AddressingDescriptor::Magic { bits, .. } => *bits,
        }
    }

    /// Maps a 32-bit hash to a block index in `[0, block_cnt())`.
    ///
    /// Branchless after construction: both arms are a handful of integer
    /// ops with no data-dependent control flow.
    #[inline]
    pub fn get_block_idx(&self, h: u32) -> usize {
        match self {
            AddressingDescriptor::Pow2 { bits, .. } => {
                if *bits == 0 {
                    0
                } else {
                    (h >> (32 - bits)) as usize
                }
            }
            AddressingDescriptor::Magic { block_cnt, .. } => {
                // i = floor(h * block_cnt / 2^32): the multiplier is
                // `block_cnt` itself and the shift is a fixed 32, which is
                // exact (no rounding) because the shift amount is a power
                // of two, unlike a true Granlund-Moller reciprocal for an
                // arbitrary runtime divisor. Widen to u128 before the
                // shift so this stays exact even at block_cnt close to
                // 2^32, where the u64 product would otherwise overflow.
                ((h as u128 * *block_cnt as u128) >> 32) as usize
            }
        }
    }
}

/// Largest power of two `<= n` (`n >= 1`).
fn prev_power_of_two(n: usize) -> usize {
    if n.is_power_of_two() {
        n
    } else {
        1usize << (usize::BITS - 1 - n.leading_zeros())
    }
}

#[cfg(test)]
mod tests;
