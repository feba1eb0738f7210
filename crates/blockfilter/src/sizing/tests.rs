use super::*;
use crate::config::{AddrMode, WordWidth};

#[test]
fn bloom_sizing_rounds_up_to_block_multiple() {
    let cfg = Config::bloom(WordWidth::W32, 8, 8, 7, AddrMode::Pow2);
    let bits = bits_required(&cfg, 10_000, 0.01);
    assert_eq!(bits % cfg.block_bits(), 0);
    // Theoretical optimum for n=10_000, p=0.01 is ~95851 bits; we must be >= that.
    assert!(bits >= 95_851);
}

#[test]
fn bloom_sizing_monotone_in_n() {
    let cfg = Config::bloom(WordWidth::W32, 8, 8, 7, AddrMode::Pow2);
    let small = bits_required(&cfg, 1_000, 0.01);
    let large = bits_required(&cfg, 100_000, 0.01);
    assert!(large > small);
}

#[test]
fn bloom_sizing_monotone_in_fpr() {
    let cfg = Config::bloom(WordWidth::W32, 8, 8, 7, AddrMode::Pow2);
    let loose = bits_required(&cfg, 10_000, 0.1);
    let tight = bits_required(&cfg, 10_000, 0.001);
    assert!(tight > loose);
}

#[test]
fn cuckoo_sizing_rounds_up_to_block_multiple() {
    let cfg = Config::cuckoo(WordWidth::W64, 8, 16, 4, AddrMode::Pow2);
    let bits = bits_required(&cfg, 10_000, 0.01);
    assert_eq!(bits % cfg.block_bits(), 0);
}

#[test]
#[should_panic(expected = "n must be > 0")]
fn rejects_zero_n() {
    let cfg = Config::bloom(WordWidth::W32, 1, 1, 1, AddrMode::Pow2);
    bits_required(&cfg, 0, 0.01);
}
