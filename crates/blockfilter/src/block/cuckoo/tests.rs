use super::*;
use crate::config::WordWidth;
use crate::hash::DefaultPrimaryHash;

fn kernel_64(bits_per_tag: u32, tags_per_bucket: u32) -> CuckooBlockKernel {
    CuckooBlockKernel::new(&CuckooParams {
        word_width: WordWidth::W64,
        word_cnt_per_block: 8,
        bits_per_tag,
        tags_per_bucket,
        addr_mode: crate::config::AddrMode::Pow2,
    })
}

#[test]
fn bitfield_round_trips_within_one_word() {
    let mut block = [0u64; 8];
    set_bits(&mut block, 3, 10, 777);
    assert_eq!(get_bits(&block, 3, 10), 777);
}

#[test]
fn bitfield_round_trips_across_word_boundary() {
    let mut block = [0u32; 8];
    // Bit offset 28 with width 10 straddles word 0 (bits 28..32) and word 1
    // (bits 0..6).
    set_bits(&mut block, 28, 10, 0x2F1);
    assert_eq!(get_bits(&block, 28, 10), 0x2F1);
    // Neighboring fields are untouched.
    assert_eq!(get_bits(&block, 0, 28), 0);
}

#[test]
fn bitfield_writes_do_not_clobber_neighbors() {
    let mut block = [0u64; 8];
    set_bits(&mut block, 0, 12, 4000);
    set_bits(&mut block, 12, 12, 1);
    set_bits(&mut block, 24, 12, 4095);
    assert_eq!(get_bits(&block, 0, 12), 4000);
    assert_eq!(get_bits(&block, 12, 12), 1);
    assert_eq!(get_bits(&block, 24, 12), 4095);
}

#[test]
fn inserted_key_is_always_contained() {
    let kernel = kernel_64(16, 4);
    let mut block = [0u64; 8];
    for key in 0..6u32 {
        let source = DefaultPrimaryHash::hash(key);
        kernel.insert(&mut block, source).expect("block has plenty of room for 6 keys");
        assert!(kernel.contains(&block, source), "key {key} missing right after insert");
    }
}

#[test]
fn empty_block_never_reports_contains() {
    let kernel = kernel_64(16, 4);
    let block = [0u64; 8];
    for key in 0..200u32 {
        assert!(!kernel.contains(&block, DefaultPrimaryHash::hash(key)));
    }
}

#[test]
fn no_false_negatives_up_to_table_capacity() {
    let kernel = kernel_64(16, 4);
    let mut block = [0u64; 8];
    let mut sources = Vec::new();
    for key in 0..8u32 {
        let source = DefaultPrimaryHash::hash(key);
        if kernel.insert(&mut block, source).is_ok() {
            sources.push(source);
        }
    }
    for source in sources {
        assert!(kernel.contains(&block, source));
    }
}

#[test]
fn insert_reports_full_once_capacity_is_exhausted() {
    // 1 word * 32 bits, bits_per_tag=8, tags_per_bucket=2 -> exactly 4 slots
    // (2 buckets * 2 tags), fully saturating the block.
    let kernel = CuckooBlockKernel::new(&CuckooParams {
        word_width: WordWidth::W32,
        word_cnt_per_block: 1,
        bits_per_tag: 8,
        tags_per_bucket: 2,
        addr_mode: crate::config::AddrMode::Pow2,
    });
    let mut block = [0u32; 1];
    let mut saw_full = false;
    for key in 0..200u32 {
        let source = DefaultPrimaryHash::hash(key);
        if kernel.insert(&mut block, source).is_err() {
            saw_full = true;
            break;
        }
    }
    assert!(saw_full, "expected a saturated 4-slot block to eventually reject an insert");
}

#[test]
fn alt_bucket_is_its_own_inverse() {
    let kernel = kernel_64(16, 4);
    for fp in [1u32, 7, 255, 65535] {
        let b2 = kernel.alt_bucket(0, fp);
        assert_eq!(kernel.alt_bucket(b2, fp), 0, "alt_bucket should be an involution");
    }
}
