use super::*;

#[test]
fn bloom_default_shapes_are_valid() {
    let cfg = Config::bloom(WordWidth::W32, 1, 1, 1, AddrMode::Pow2);
    assert!(cfg.validate().is_ok());

    let cfg = Config::bloom(WordWidth::W64, 8, 8, 3, AddrMode::Pow2);
    assert!(cfg.validate().is_ok());
}

#[test]
fn bloom_rejects_non_power_of_two_word_cnt() {
    let cfg = Config::bloom(WordWidth::W32, 3, 1, 1, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));
}

#[test]
fn bloom_rejects_sector_cnt_not_dividing_block() {
    // word_cnt_per_block=8, sector_cnt=3 does not divide evenly.
    let cfg = Config::bloom(WordWidth::W32, 8, 3, 1, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));
}

#[test]
fn bloom_rejects_k_exceeding_budget() {
    // 1 word * 32 bits / 1 sector = 32-bit budget; k=33 cannot fit (also k>16 anyway).
    let cfg = Config::bloom(WordWidth::W32, 1, 1, 17, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));

    // unsectored block: 1 word * 32 bits / 1 sector = 32-bit budget, k=6 fits comfortably.
    let cfg = Config::bloom(WordWidth::W32, 1, 1, 6, AddrMode::Pow2);
    assert!(cfg.validate().is_ok());
}

#[test]
fn bloom_rejects_k_exceeding_hash_bit_budget() {
    // sector_cnt=8, sector_bits=32 -> pick_bits=3+5=8 bits/pick; k=5 needs 40 > 32.
    let cfg = Config::bloom(WordWidth::W32, 8, 8, 5, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));

    // same shape at k=4 needs exactly 32 bits, which fits.
    let cfg = Config::bloom(WordWidth::W32, 8, 8, 4, AddrMode::Pow2);
    assert!(cfg.validate().is_ok());
}

#[test]
fn cuckoo_default_shape_is_valid() {
    let cfg = Config::cuckoo(WordWidth::W64, 8, 16, 4, AddrMode::Magic);
    assert!(cfg.validate().is_ok());
}

#[test]
fn cuckoo_rejects_bad_bits_per_tag() {
    let cfg = Config::cuckoo(WordWidth::W64, 8, 9, 4, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));
}

#[test]
fn cuckoo_rejects_bad_tags_per_bucket() {
    let cfg = Config::cuckoo(WordWidth::W64, 8, 16, 3, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));
}

#[test]
fn cuckoo_rejects_table_larger_than_block() {
    // 1 word of 32 bits cannot hold 2 buckets * 8 slots * 16 bits each.
    let cfg = Config::cuckoo(WordWidth::W32, 1, 16, 8, AddrMode::Pow2);
    assert!(matches!(
        cfg.validate(),
        Err(FilterError::InvalidConfig { .. })
    ));
}

#[test]
fn block_bits_matches_word_cnt_times_width() {
    let cfg = Config::bloom(WordWidth::W64, 4, 1, 1, AddrMode::Pow2);
    assert_eq!(cfg.block_bits(), 4 * 64);
}
