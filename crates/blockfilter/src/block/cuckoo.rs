//! Cuckoo block kernel.
//!
//! A block holds a flat fingerprint table packed with as many buckets as
//! [`crate::config::buckets_per_block`] fits — this is what makes the
//! filter "blocked": both of a key's two candidate buckets (`b1`, and
//! `b2 = b1 XOR ...`) are chosen from among that block's own buckets, so
//! `contains` never touches more than one block even though the block may
//! hold many buckets' worth of fingerprints. Slots are packed bitfields of
//! `bits_per_tag` bits, which may straddle a word boundary (e.g.
//! `bits_per_tag = 10` in 32-bit words), so positions are addressed by bit
//! offset rather than by word-aligned index.

use crate::config::{buckets_per_block, CuckooParams};
use crate::error::FilterError;
use crate::hash::fingerprint_from_hash;
use crate::word::Word;

use super::{bits_to_address, low_mask};

/// Cuckoo relocation gives up and reports the block full after this many
/// displacement attempts.
const MAX_KICKS: u32 = 500;

/// Odd multiplier mixed into a fingerprint to derive its alternate bucket;
/// borrowed from MurmurHash2's constant, used here purely as a cheap
/// avalanche step rather than a full hash.
const MIXING_CONSTANT: u32 = 0x5BD1_E995;

/// Stateless per-block logic for a fixed `(bits_per_tag, tags_per_bucket)`
/// pair. Cheap to construct; holds no filter data itself.
#[derive(Debug, Clone, Copy)]
pub struct CuckooBlockKernel {
    bits_per_tag: u32,
    tags_per_bucket: u32,
    bucket_cnt: u32,
    b1_sel_bits: u32,
}

impl CuckooBlockKernel {
    /// Builds the kernel for `params`. Does not validate `params` itself —
    /// call [`crate::config::Config::validate`] first.
    pub fn new(params: &CuckooParams) -> Self {
        let bucket_cnt = buckets_per_block(
            params.word_cnt_per_block,
            params.word_width,
            params.bits_per_tag,
            params.tags_per_bucket,
        );
        Self {
            bits_per_tag: params.bits_per_tag,
            tags_per_bucket: params.tags_per_bucket,
            bucket_cnt,
            b1_sel_bits: bits_to_address(bucket_cnt),
        }
    }

    /// Bits of in-block hash budget this kernel needs: one selector for the
    /// home bucket plus the full fingerprint width.
    pub fn in_block_bits_needed(&self) -> u32 {
        self.b1_sel_bits + self.bits_per_tag
    }

    /// Derives the home bucket and fingerprint from an in-block hash value.
    #[inline]
    fn derive(&self, source: u32) -> (u32, u32) {
        let b1 = if self.bucket_cnt <= 1 {
            0
        } else {
            (source & low_mask(self.b1_sel_bits)) % self.bucket_cnt
        };
        let fp_low = (source >> self.b1_sel_bits) & low_mask(self.bits_per_tag);
        let fp = fingerprint_from_hash(fp_low << (32 - self.bits_per_tag), self.bits_per_tag);
        (b1, fp)
    }

    /// The alternate bucket for a fingerprint currently sitting in `bucket`,
    /// via `b2 = b1 XOR (fp * mixing_constant) mod bucket_cnt` — applying it
    /// twice returns the original bucket, the invariant a cuckoo table's
    /// relocation relies on.
    #[inline]
    fn alt_bucket(&self, bucket: u32, fp: u32) -> u32 {
        if self.bucket_cnt <= 1 {
            return bucket;
        }
        let mix = fp.wrapping_mul(MIXING_CONSTANT);
        bucket ^ (mix % self.bucket_cnt)
    }

    #[inline]
    fn slot_offset(&self, bucket: u32, slot: u32) -> u32 {
        (bucket * self.tags_per_bucket + slot) * self.bits_per_tag
    }

    /// Returns `true` iff `fp` occupies some slot of `source`'s two
    /// candidate buckets.
    ///
    /// Branchless: every slot in both buckets contributes a `0`/`1` term to
    /// a running sum with no early return.
    pub fn contains<W: Word>(&self, block: &[W], source: u32) -> bool {
        let (b1, fp) = self.derive(source);
        let b2 = self.alt_bucket(b1, fp);
        let mut hits = 0u32;
        for bucket in [b1, b2] {
            for slot in 0..self.tags_per_bucket {
                let v = get_bits(block, self.slot_offset(bucket, slot), self.bits_per_tag);
                hits += (v == fp) as u32;
            }
        }
        hits > 0
    }

    /// Writes `fp` into the first empty (`== 0`) slot of `bucket`, if any.
    fn try_place_empty<W: Word>(&self, block: &mut [W], bucket: u32, fp: u32) -> bool {
        for slot in 0..self.tags_per_bucket {
            let off = self.slot_offset(bucket, slot);
            if get_bits(block, off, self.bits_per_tag) == 0 {
                set_bits(block, off, self.bits_per_tag, fp);
                return true;
            }
        }
        false
    }

    /// Inserts `source`'s fingerprint into its home bucket, its alternate
    /// bucket, or — if both are full — by bounded cuckoo relocation.
    ///
    /// Relocation picks a uniformly random slot in the current bucket (the
    /// PRNG is deterministically seeded from `fp`/`source` so a given
    /// `(block-state, source)` pair always relocates the same way), evicts
    /// whatever fingerprint is there, and keeps going from that
    /// fingerprint's alternate bucket. If [`MAX_KICKS`] displacements all
    /// fail to land an empty slot, the last evicted fingerprint is dropped
    /// on the floor rather than written back — silently turning its
    /// original key into a false negative — and this call reports
    /// [`FilterError::CuckooInsertFull`] so the caller knows the block is
    /// over capacity.
    pub fn insert<W: Word>(&self, block: &mut [W], source: u32) -> Result<(), FilterError> {
        let (b1, fp) = self.derive(source);
        if self.try_place_empty(block, b1, fp) {
            return Ok(());
        }
        let b2 = self.alt_bucket(b1, fp);
        if self.try_place_empty(block, b2, fp) {
            return Ok(());
        }

        let rng = fastrand::Rng::with_seed(u64::from(fp) ^ (u64::from(source) << 32));
        let mut bucket = if rng.bool() { b1 } else { b2 };
        let mut cur_fp = fp;
        for _ in 0..MAX_KICKS {
            let slot = rng.u32(0..self.tags_per_bucket);
            let off = self.slot_offset(bucket, slot);
            let evicted = get_bits(block, off, self.bits_per_tag);
            set_bits(block, off, self.bits_per_tag, cur_fp);
            cur_fp = evicted;
            bucket = self.alt_bucket(bucket, cur_fp);
            if self.try_place_empty(block, bucket, cur_fp) {
                return Ok(());
            }
        }
        Err(FilterError::CuckooInsertFull)
    }
}

/// Reads a `width`-bit (`<= 16`) field starting at bit `bit_offset` of a
/// block, straddling at most one word boundary.
#[inline]
fn get_bits<W: Word>(block: &[W], bit_offset: u32, width: u32) -> u32 {
    let word_bits = W::BITS;
    let word_idx = (bit_offset / word_bits) as usize;
    let bit_in_word = bit_offset % word_bits;
    let low_width = (word_bits - bit_in_word).min(width);
    let low_part = (block[word_idx].to_u64() >> bit_in_word) & mask64(low_width);
    if low_width == width {
        low_part as u32
    } else {
        let high_width = width - low_width;
        let high_part = block[word_idx + 1].to_u64() & mask64(high_width);
        (low_part | (high_part << low_width)) as u32
    }
}

/// Writes a `width`-bit (`<= 16`) field starting at bit `bit_offset` of a
/// block, straddling at most one word boundary.
#[inline]
fn set_bits<W: Word>(block: &mut [W], bit_offset: u32, width: u32, value: u32) {
    let word_bits = W::BITS;
    let word_idx = (bit_offset / word_bits) as usize;
    let bit_in_word = bit_offset % word_bits;
    let value = u64::from(value) & mask64(width);
    let low_width = (word_bits - bit_in_word).min(width);
    let low_mask = mask64(low_width);
    let low_part = value & low_mask;
    let cleared_low = block[word_idx].to_u64() & !(low_mask << bit_in_word);
    block[word_idx] = W::from_u64(cleared_low | (low_part << bit_in_word));
    if low_width < width {
        let high_width = width - low_width;
        let high_mask = mask64(high_width);
        let high_part = (value >> low_width) & high_mask;
        let cleared_high = block[word_idx + 1].to_u64() & !high_mask;
        block[word_idx + 1] = W::from_u64(cleared_high | high_part);
    }
}

#[inline]
fn mask64(bits: u32) -> u64 {
    if bits == 0 {
        0
    } else if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[cfg(test)]
mod tests;
