//! Error kinds surfaced by the filter construction and dispatch paths.
//!
//! `contains` and `batch_contains` never fail once a filter has been
//! successfully constructed (see [`crate::dispatch::construct`]); every
//! error variant here is produced either at construction/tuning time or
//! by a cuckoo insert that exhausted its relocation budget.

use thiserror::Error;

/// Errors returned by [`crate::config::Config::validate`],
/// [`crate::dispatch::construct`], [`crate::dispatch::tune`], and cuckoo
/// insertion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The supplied [`crate::config::Config`] falls outside the validity
    /// domain [`crate::config::Config::validate`] checks (out-of-range
    /// field, or `k` too large for the available per-block hash-bit
    /// budget).
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// Human-readable explanation of which check failed.
        reason: String,
    },

    /// The config is valid but no precompiled kernel instantiation matches
    /// it (e.g. a cuckoo `(bits_per_tag, tags_per_bucket)` pair outside the
    /// small set the block kernel specializes for).
    #[error("unsupported config: {reason}")]
    UnsupportedConfig {
        /// Human-readable explanation of the missing instantiation.
        reason: String,
    },

    /// The requested bit length is smaller than a single block.
    #[error("requested bit length {requested} is smaller than one block ({block_bits} bits)")]
    SizeTooSmall {
        /// The bit length the caller asked for.
        requested: usize,
        /// The size of a single block, in bits.
        block_bits: usize,
    },

    /// The tuner's clock malfunctioned, or no unroll factor completed a
    /// timed run.
    #[error("tuning failed: {reason}")]
    TuningFailed {
        /// Human-readable explanation.
        reason: String,
    },

    /// A cuckoo insert exceeded `MAX_KICKS` relocation attempts. Reported,
    /// not fatal: the filter remains consistent and usable, but `contains`
    /// may now return `false` for the evicted key.
    #[error("cuckoo insert exceeded the kick budget; the filter block is full")]
    CuckooInsertFull,
}
