//! Filter configuration: the immutable value that selects a block-kernel
//! instantiation.
//!
//! A `Config` is one of two closed families — [`BloomParams`] (sectored
//! k-bit-set blocks) or [`CuckooParams`] (fingerprint-table blocks) — plus
//! the shared [`AddrMode`] choice of block-addressing strategy. Configs are
//! cheap, `Copy` value types; nothing about them is mutated after
//! construction.

use crate::error::FilterError;

/// Cache-line-ish block size used when a caller asks for "the default" — 64
/// bytes, matching the common x86/ARM cache line.
pub const DEFAULT_BLOCK_BYTES: usize = 64;

/// Block-to-block index mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// `block_cnt` is rounded down to a power of two; indexing is a shift
    /// of the high hash bits.
    Pow2,
    /// `block_cnt` may be any positive integer; indexing uses a
    /// magic-multiply reciprocal in place of a division instruction.
    Magic,
}

/// Word width of the backing storage array, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth {
    /// 32-bit storage words.
    W32,
    /// 64-bit storage words.
    W64,
}

impl WordWidth {
    /// Bit width as a plain integer, for arithmetic against block sizes.
    pub fn bits(self) -> u32 {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
        }
    }
}

/// Parameters for a blocked Bloom filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BloomParams {
    /// Storage word width.
    pub word_width: WordWidth,
    /// Words per block; must be a power of two in `{1, 2, 4, 8, 16}`.
    pub word_cnt_per_block: u32,
    /// Sectors per block; must divide the block evenly and satisfy
    /// `1 <= sector_cnt <= word_cnt_per_block`.
    pub sector_cnt: u32,
    /// Hash functions per key (bits set per insert/tested per contains).
    pub k: u32,
    /// Block-addressing strategy.
    pub addr_mode: AddrMode,
}

/// Parameters for a blocked cuckoo filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CuckooParams {
    /// Storage word width.
    pub word_width: WordWidth,
    /// Words per block; must be a power of two in `{1, 2, 4, 8, 16}`.
    pub word_cnt_per_block: u32,
    /// Fingerprint width in bits; one of `{8, 10, 12, 16}`.
    pub bits_per_tag: u32,
    /// Slots per bucket; one of `{2, 4, 6, 8}`.
    pub tags_per_bucket: u32,
    /// Block-addressing strategy.
    pub addr_mode: AddrMode,
}

/// The filter family plus its layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Config {
    /// Blocked Bloom filter configuration.
    Bloom(BloomParams),
    /// Blocked cuckoo filter configuration.
    Cuckoo(CuckooParams),
}

impl Config {
    /// Convenience constructor for a Bloom configuration.
    pub fn bloom(
        word_width: WordWidth,
        word_cnt_per_block: u32,
        sector_cnt: u32,
        k: u32,
        addr_mode: AddrMode,
    ) -> Self {
        Config::Bloom(BloomParams {
            word_width,
            word_cnt_per_block,
            sector_cnt,
            k,
            addr_mode,
        })
    }

    /// Convenience constructor for a cuckoo configuration.
    pub fn cuckoo(
        word_width: WordWidth,
        word_cnt_per_block: u32,
        bits_per_tag: u32,
        tags_per_bucket: u32,
        addr_mode: AddrMode,
    ) -> Self {
        Config::Cuckoo(CuckooParams {
            word_width,
            word_cnt_per_block,
            bits_per_tag,
            tags_per_bucket,
            addr_mode,
        })
    }

    /// The addressing mode shared by both families.
    pub fn addr_mode(&self) -> AddrMode {
        match self {
            Config::Bloom(p) => p.addr_mode,
            Config::Cuckoo(p) => p.addr_mode,
        }
    }

    /// Storage word width shared by both families.
    pub fn word_width(&self) -> WordWidth {
        match self {
            Config::Bloom(p) => p.word_width,
            Config::Cuckoo(p) => p.word_width,
        }
    }

    /// Words per block shared by both families.
    pub fn word_cnt_per_block(&self) -> u32 {
        match self {
            Config::Bloom(p) => p.word_cnt_per_block,
            Config::Cuckoo(p) => p.word_cnt_per_block,
        }
    }

    /// Total bits in a single block: `word_cnt_per_block * word_width`.
    pub fn block_bits(&self) -> usize {
        self.word_cnt_per_block() as usize * self.word_width().bits() as usize
    }

    /// Validates this config's field ranges and hash-bit budget.
    ///
    /// This checks the *general* validity domain only (field ranges and the
    /// `k` hash-bit budget). Whether a precompiled kernel instantiation
    /// actually exists for an otherwise-valid config is determined later, at
    /// [`crate::dispatch::construct`] time, and reported as
    /// [`FilterError::UnsupportedConfig`] rather than here.
    pub fn validate(&self) -> Result<(), FilterError> {
        let invalid = |reason: String| FilterError::InvalidConfig { reason };

        if !matches!(self.word_cnt_per_block(), 1 | 2 | 4 | 8 | 16) {
            return Err(invalid(format!(
                "word_cnt_per_block must be a power of two in {{1,2,4,8,16}}, got {}",
                self.word_cnt_per_block()
            )));
        }

        match self {
            Config::Bloom(p) => {
                if p.sector_cnt == 0 || p.sector_cnt > p.word_cnt_per_block {
                    return Err(invalid(format!(
                        "sector_cnt must be in 1..={}, got {}",
                        p.word_cnt_per_block, p.sector_cnt
                    )));
                }
                if p.word_cnt_per_block % p.sector_cnt != 0 {
                    return Err(invalid(format!(
                        "sector_cnt {} must divide word_cnt_per_block {} evenly",
                        p.sector_cnt, p.word_cnt_per_block
                    )));
                }
                if p.k == 0 || p.k > 16 {
                    return Err(invalid(format!("k must be in 1..=16, got {}", p.k)));
                }
                let budget = (p.word_cnt_per_block as u64 * p.word_width.bits() as u64)
                    / p.sector_cnt as u64;
                if (p.k as u64) > budget {
                    return Err(invalid(format!(
                        "k={} exceeds the per-sector bit budget ({} bits/word * {} words / {} sectors = {})",
                        p.k, p.word_width.bits(), p.word_cnt_per_block, p.sector_cnt, budget
                    )));
                }
                let pick_bits = crate::block::bloom::pick_bits_for(p.sector_cnt, budget as u32);
                let needed = p.k * pick_bits;
                if needed > 32 {
                    return Err(invalid(format!(
                        "k={} positions each need {} in-block hash bits ({} total), which exceeds the 32-bit hash budget even with a fresh secondary hash",
                        p.k, pick_bits, needed
                    )));
                }
                Ok(())
            }
            Config::Cuckoo(p) => {
                if !matches!(p.bits_per_tag, 8 | 10 | 12 | 16) {
                    return Err(invalid(format!(
                        "bits_per_tag must be one of {{8,10,12,16}}, got {}",
                        p.bits_per_tag
                    )));
                }
                if !matches!(p.tags_per_bucket, 2 | 4 | 6 | 8) {
                    return Err(invalid(format!(
                        "tags_per_bucket must be one of {{2,4,6,8}}, got {}",
                        p.tags_per_bucket
                    )));
                }
                let block_bits = p.word_cnt_per_block as u64 * p.word_width.bits() as u64;
                let bucket_bits = p.bits_per_tag as u64 * p.tags_per_bucket as u64;
                if bucket_bits > block_bits {
                    return Err(invalid(format!(
                        "bits_per_tag={} * tags_per_bucket={} does not fit one block ({} bits available)",
                        p.bits_per_tag, p.tags_per_bucket, block_bits
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Number of cuckoo buckets that fit in one block.
///
/// A "bucket" is the slot group a single `b1`/`b2` index selects; the block
/// kernel picks its two candidate buckets for a key from among all of
/// them (`b2 = b1 XOR ...`), so packing the whole block with as many
/// buckets as fit — rather than just the two a single key touches — is
/// what lets every block carry a full table's worth of fingerprints.
/// Rounded down to a power of two so the `XOR`-based alternate-bucket
/// derivation never walks outside `[0, bucket_cnt)`.
pub(crate) fn buckets_per_block(
    word_cnt_per_block: u32,
    word_width: WordWidth,
    bits_per_tag: u32,
    tags_per_bucket: u32,
) -> u32 {
    let block_bits = word_cnt_per_block * word_width.bits();
    let bucket_bits = bits_per_tag * tags_per_bucket;
    let capacity = (block_bits / bucket_bits).max(1);
    prev_power_of_two(capacity)
}

/// Largest power of two `<= n` (`n >= 1`).
fn prev_power_of_two(n: u32) -> u32 {
    if n.is_power_of_two() {
        n
    } else {
        1u32 << (u32::BITS - 1 - n.leading_zeros())
    }
}

#[cfg(test)]
mod tests;
