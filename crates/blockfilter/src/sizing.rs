//! Capacity planning: `bits_required(config, n, target_fpr)`.
//!
//! These formulas size a filter for `n` expected keys at a target false
//! positive rate, then round up to a whole number of blocks so the caller's
//! word array lines up with [`crate::addressing::AddressingDescriptor`].

use crate::config::Config;

/// Conservative maximum load factor per cuckoo associativity, used to size
/// cuckoo filters so that a bulk build can reach the target fill ratio
/// without triggering [`crate::error::FilterError::CuckooInsertFull`] under
/// typical random insert orders. These match the commonly cited figures for
/// blocked cuckoo filters (higher associativity tolerates higher load).
fn max_load_factor(tags_per_bucket: u32) -> f64 {
    match tags_per_bucket {
        2 => 0.84,
        4 => 0.95,
        6 => 0.96,
        8 => 0.98,
        _ => 0.90,
    }
}

/// Computes the minimum bit length needed to hold `n` keys at
/// `target_fpr`, rounded up to a whole number of blocks for `config`.
///
/// For Bloom configs this uses the standard optimal-bits formula
/// `m = ceil(-n * ln(p) / ln(2)^2)`. For cuckoo configs it sizes the table
/// so that `n` tags fit within [`max_load_factor`] of capacity.
///
/// # Panics
///
/// Panics if `n == 0` or `target_fpr` is not in `(0, 1)` — mirroring the
/// panic-on-misuse convention the teacher crate uses for its own
/// `BloomFilter::new` invariants.
pub fn bits_required(config: &Config, n: usize, target_fpr: f64) -> usize {
    assert!(n > 0, "n must be > 0");
    assert!(
        target_fpr > 0.0 && target_fpr < 1.0,
        "target_fpr must be in (0, 1)"
    );

    let raw_bits = match config {
        Config::Bloom(_) => {
            let n = n as f64;
            (-(n * target_fpr.ln()) / std::f64::consts::LN_2.powi(2)).ceil() as usize
        }
        Config::Cuckoo(p) => {
            let load = max_load_factor(p.tags_per_bucket);
            ((n as f64) * (p.bits_per_tag as f64) / load).ceil() as usize
        }
    };

    let block_bits = config.block_bits();
    let blocks = raw_bits.div_ceil(block_bits).max(1);
    blocks * block_bits
}

#[cfg(test)]
mod tests;
