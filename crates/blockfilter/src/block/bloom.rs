//! Bloom block kernel.
//!
//! A block is `word_cnt_per_block` contiguous [`Word`]s, partitioned into
//! `sector_cnt` equal sectors. Each of the `k` hash functions sets (or
//! tests) one bit, drawn from a disjoint slice of the in-block hash bits so
//! consecutive picks are statistically independent, and assigned to its
//! sector round-robin (bit `i` goes to sector `i mod sector_cnt`).

use crate::config::BloomParams;
use crate::word::Word;

use super::{bits_to_address, low_mask};

/// Stateless per-block logic for a fixed `(word_width, word_cnt_per_block,
/// sector_cnt, k)` tuple. Cheap to construct; holds no filter data itself.
#[derive(Debug, Clone, Copy)]
pub struct BloomBlockKernel {
    word_width: u32,
    sector_cnt: u32,
    sector_bits: u32,
    k: u32,
    pick_bits: u32,
    sector_sel_bits: u32,
}

impl BloomBlockKernel {
    /// Builds the kernel for `params`. Does not validate `params` itself —
    /// call [`crate::config::Config::validate`] first.
    pub fn new(params: &BloomParams) -> Self {
        let word_width = params.word_width.bits();
        let block_bits = params.word_cnt_per_block * word_width;
        let sector_bits = block_bits / params.sector_cnt;
        let sector_sel_bits = bits_to_address(params.sector_cnt);
        let within_sector_bits = bits_to_address(sector_bits);
        Self {
            word_width,
            sector_cnt: params.sector_cnt,
            sector_bits,
            k: params.k,
            pick_bits: sector_sel_bits + within_sector_bits,
            sector_sel_bits,
        }
    }

    /// Bits of in-block hash budget this kernel needs to derive all `k`
    /// positions from a single hash value.
    pub fn in_block_bits_needed(&self) -> u32 {
        self.k * self.pick_bits
    }

    /// One bit position (`word index`, `bit within word`) for pick `i`
    /// (`0 <= i < k`), drawn from bits `[i * pick_bits, (i+1) * pick_bits)`
    /// of `source`.
    #[inline]
    fn position(&self, source: u32, i: u32) -> (usize, u32) {
        let shift = i * self.pick_bits;
        let slice = if self.pick_bits == 0 {
            0
        } else {
            (source >> shift) & low_mask(self.pick_bits)
        };
        let sector = if self.sector_cnt == 1 {
            0
        } else {
            (slice & low_mask(self.sector_sel_bits)) % self.sector_cnt
        };
        let within_sector = if self.sector_bits == 1 {
            0
        } else {
            (slice >> self.sector_sel_bits) % self.sector_bits
        };
        let bit_global = sector * self.sector_bits + within_sector;
        let word_idx = (bit_global / self.word_width) as usize;
        let bit_in_word = bit_global % self.word_width;
        (word_idx, bit_in_word)
    }

    /// Sets the `k` bits derived from `source` in `block`.
    ///
    /// `source` must already be the in-block hash value the caller has
    /// chosen — either the low `32 - addressing_bits` bits of the primary
    /// hash, or a full secondary hash, per
    /// [`super::needs_secondary_hash`].
    pub fn insert<W: Word>(&self, block: &mut [W], source: u32) {
        for i in 0..self.k {
            let (word_idx, bit) = self.position(source, i);
            block[word_idx] |= W::bit(bit);
        }
    }

    /// Returns `true` iff all `k` bits derived from `source` are set.
    ///
    /// Branchless: every pick contributes a `0`/`1` term to a running sum
    /// with no conditional early return, and the sum is compared to `k`
    /// only once at the end.
    pub fn contains<W: Word>(&self, block: &[W], source: u32) -> bool {
        let mut hits = 0u32;
        for i in 0..self.k {
            let (word_idx, bit) = self.position(source, i);
            hits += (block[word_idx].and(W::bit(bit)) != W::zero()) as u32;
        }
        hits == self.k
    }
}

/// In-block hash bits a Bloom kernel with these raw parameters would need —
/// used by [`crate::config::Config::validate`] to reject configs whose `k`
/// cannot be satisfied even with a full 32-bit fresh hash (i.e. no amount of
/// falling back to a secondary hash would help).
pub(crate) fn pick_bits_for(sector_cnt: u32, sector_bits: u32) -> u32 {
    bits_to_address(sector_cnt) + bits_to_address(sector_bits)
}
