//! Collaborator hash interfaces.
//!
//! The primary/secondary hash functions are an external collaborator the
//! core is built on top of, not part of its contract. We still need *some*
//! concrete implementation to make the crate buildable, testable, and
//! benchmarkable on its own, so this module defines the two traits the rest
//! of the crate is written against plus a default pair of integer mixers
//! (`knuth_mix`/`knuth_mix_secondary`) modeled on the `knuth_32_alt` hasher
//! the original `dtl::blocked_cuckoofilter` template is instantiated with.
//! Callers who already have a fast 32-bit hash can implement
//! [`PrimaryHash`]/[`SecondaryHash`] for their own type instead.

/// A uniform, deterministic `u32 -> u32` hash used to derive block indices
/// and in-block bit/fingerprint positions from a key's primary hash.
pub trait PrimaryHash {
    /// Hashes `key` to a 32-bit value.
    fn hash(key: u32) -> u32;
}

/// A second hash, independent of [`PrimaryHash`], consulted when the
/// in-block hash-bit budget after addressing is insufficient to derive the
/// positions a block kernel needs.
pub trait SecondaryHash {
    /// Hashes `key` to a 32-bit value independent of [`PrimaryHash::hash`].
    fn hash(key: u32) -> u32;
}

/// The default primary hash: a Knuth multiplicative mix, the same family
/// the original source's `knuth_32_alt` hasher uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrimaryHash;

impl PrimaryHash for DefaultPrimaryHash {
    #[inline]
    fn hash(key: u32) -> u32 {
        knuth_mix(key, 0x9E37_79B9)
    }
}

/// The default secondary hash: the same mixer with a different odd
/// multiplier, so it is statistically independent of [`DefaultPrimaryHash`]
/// without requiring a second hash family.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSecondaryHash;

impl SecondaryHash for DefaultSecondaryHash {
    #[inline]
    fn hash(key: u32) -> u32 {
        knuth_mix(key, 0x85EB_CA6B)
    }
}

/// Multiplicative integer mix: `(key * odd_constant)` folded with a few
/// xor-shifts, in the spirit of Knuth's multiplicative hashing and the
/// finalizer step of MurmurHash3's 32-bit avalanche.
#[inline]
fn knuth_mix(key: u32, multiplier: u32) -> u32 {
    let mut x = key.wrapping_mul(multiplier);
    x ^= x >> 15;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 13;
    x = x.wrapping_mul(multiplier);
    x ^= x >> 16;
    x
}

/// Derives a nonzero `bits`-wide fingerprint from a hash value, forcing a
/// zero result to `1` since fingerprint `0` denotes an empty cuckoo slot.
#[inline]
pub fn fingerprint_from_hash(h: u32, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 16);
    // Draw from the high bits of h, which addressing does not consume.
    let fp = h >> (32 - bits);
    if fp == 0 {
        1
    } else {
        fp
    }
}
