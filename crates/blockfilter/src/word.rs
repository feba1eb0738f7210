//! The backing integer type used for filter storage words.
//!
//! [`Config::word_width`](crate::config::Config::word_width) selects between
//! 32-bit and 64-bit words at runtime; the block kernels are written once
//! against the [`Word`] trait rather than duplicated per width. This mirrors
//! how the original `dtl` templates parameterize `blocked_bloomfilter` on a
//! `word_t` type, but keeps the crate monomorphized over a closed pair of
//! concrete types (`u32`, `u64`) instead of an open template parameter.

use std::ops::{BitAndAssign, BitOrAssign};

/// A fixed-width unsigned integer usable as a filter storage word.
pub trait Word:
    Copy + Default + BitOrAssign + BitAndAssign + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Bit width of the word (32 or 64).
    const BITS: u32;

    /// The zero word.
    fn zero() -> Self;

    /// A word with only bit `pos` set (`pos < Self::BITS`).
    fn bit(pos: u32) -> Self;

    /// Bitwise AND.
    fn and(self, rhs: Self) -> Self;

    /// Number of set bits.
    fn count_ones(self) -> u32;

    /// Widen to `u64` for arithmetic shared across word widths.
    fn to_u64(self) -> u64;

    /// Narrow from `u64`, truncating to `Self::BITS`.
    fn from_u64(v: u64) -> Self;
}

impl Word for u32 {
    const BITS: u32 = 32;

    fn zero() -> Self {
        0
    }

    fn bit(pos: u32) -> Self {
        1u32 << pos
    }

    fn and(self, rhs: Self) -> Self {
        self & rhs
    }

    fn count_ones(self) -> u32 {
        u32::count_ones(self)
    }

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64(v: u64) -> Self {
        v as u32
    }
}

impl Word for u64 {
    const BITS: u32 = 64;

    fn zero() -> Self {
        0
    }

    fn bit(pos: u32) -> Self {
        1u64 << pos
    }

    fn and(self, rhs: Self) -> Self {
        self & rhs
    }

    fn count_ones(self) -> u32 {
        u64::count_ones(self)
    }

    fn to_u64(self) -> u64 {
        self
    }

    fn from_u64(v: u64) -> Self {
        v
    }
}
