use super::*;
use crate::config::AddrMode;

#[test]
fn pow2_rounds_down_to_power_of_two() {
    let d = AddressingDescriptor::new(AddrMode::Pow2, 1000);
    assert_eq!(d.block_cnt(), 512);
    assert_eq!(d.addressing_bits(), 9);
}

#[test]
fn pow2_exact_power_of_two_is_unchanged() {
    let d = AddressingDescriptor::new(AddrMode::Pow2, 1024);
    assert_eq!(d.block_cnt(), 1024);
    assert_eq!(d.addressing_bits(), 10);
}

#[test]
fn pow2_single_block_has_zero_addressing_bits() {
    let d = AddressingDescriptor::new(AddrMode::Pow2, 1);
    assert_eq!(d.block_cnt(), 1);
    assert_eq!(d.addressing_bits(), 0);
    for h in [0u32, 1, u32::MAX, 0x8000_0000] {
        assert_eq!(d.get_block_idx(h), 0);
    }
}

#[test]
fn magic_allows_non_power_of_two_block_cnt() {
    let d = AddressingDescriptor::new(AddrMode::Magic, 1000);
    assert_eq!(d.block_cnt(), 1000);
    assert_eq!(d.addressing_bits(), 10);
}

#[test]
fn addressing_range_is_always_in_bounds() {
    for &mode in &[AddrMode::Pow2, AddrMode::Magic] {
        for &desired in &[1usize, 2, 3, 7, 100, 1000, 12345, 70_000] {
            let d = AddressingDescriptor::new(mode, desired);
            let cnt = d.block_cnt();
            // sample across the hash space, not exhaustively
            for h in [0u32, 1, 2, u32::MAX, u32::MAX / 2, 0x1234_5678, 0xFFFF_0000] {
                let idx = d.get_block_idx(h);
                assert!(idx < cnt, "idx {idx} out of bounds for block_cnt {cnt}");
            }
        }
    }
}

#[test]
fn magic_distribution_is_roughly_uniform() {
    let d = AddressingDescriptor::new(AddrMode::Magic, 1000);
    let mut counts = vec![0u32; d.block_cnt()];
    let mut rng = fastrand::Rng::with_seed(42);
    let trials = 1_000_000u32;
    for _ in 0..trials {
        let h = rng.u32(..);
        counts[d.get_block_idx(h)] += 1;
    }
    let expected = trials as f64 / d.block_cnt() as f64;
    for (i, &c) in counts.iter().enumerate() {
        let deviation = (c as f64 - expected).abs() / expected;
        assert!(
            deviation < 0.25,
            "block {i} count {c} deviates {deviation:.3} from expected {expected:.1}"
        );
    }
}

#[test]
fn pow2_monotone_boundary_low_index_wins() {
    // At the boundary between two blocks, floor division means the lower
    // index wins -- verify no off-by-one at an exact block boundary.
    let d = AddressingDescriptor::new(AddrMode::Pow2, 4);
    assert_eq!(d.addressing_bits(), 2);
    // Block width is 2^30 for 4 blocks with 32-bit hash.
    let block_width = 1u32 << 30;
    assert_eq!(d.get_block_idx(0), 0);
    assert_eq!(d.get_block_idx(block_width - 1), 0);
    assert_eq!(d.get_block_idx(block_width), 1);
}
