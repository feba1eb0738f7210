use super::*;
use crate::config::{AddrMode, WordWidth};

fn bloom_params() -> BloomParams {
    BloomParams {
        word_width: WordWidth::W64,
        word_cnt_per_block: 8,
        sector_cnt: 1,
        k: 4,
        addr_mode: AddrMode::Pow2,
    }
}

fn cuckoo_params() -> CuckooParams {
    CuckooParams {
        word_width: WordWidth::W64,
        word_cnt_per_block: 8,
        bits_per_tag: 16,
        tags_per_bucket: 4,
        addr_mode: AddrMode::Magic,
    }
}

#[test]
fn bloom_filter_no_false_negatives_across_blocks() {
    let filter: BloomFilter<u64> = BloomFilter::new(bloom_params(), 64);
    let mut data = vec![0u64; filter.word_cnt()];
    let keys: Vec<u32> = (0..5_000u32).collect();
    for &key in &keys {
        filter.insert(&mut data, key);
    }
    for &key in &keys {
        assert!(filter.contains(&data, key), "false negative for key {key}");
    }
}

#[test]
fn bloom_filter_empty_storage_contains_nothing() {
    let filter: BloomFilter<u64> = BloomFilter::new(bloom_params(), 64);
    let data = vec![0u64; filter.word_cnt()];
    for key in 0..1_000u32 {
        assert!(!filter.contains(&data, key));
    }
}

#[test]
fn bloom_filter_batch_insert_matches_sequential_insert() {
    let filter: BloomFilter<u64> = BloomFilter::new(bloom_params(), 32);
    let keys: Vec<u32> = (0..500u32).collect();

    let mut sequential = vec![0u64; filter.word_cnt()];
    for &key in &keys {
        filter.insert(&mut sequential, key);
    }

    let mut batched = vec![0u64; filter.word_cnt()];
    filter.batch_insert(&mut batched, &keys);

    assert_eq!(sequential, batched);
}

#[test]
fn cuckoo_filter_no_false_negatives_below_capacity() {
    let filter: CuckooFilter<u64> = CuckooFilter::new(cuckoo_params(), 64);
    let mut data = vec![0u64; filter.word_cnt()];
    let keys: Vec<u32> = (0..300u32).collect();
    for &key in &keys {
        filter.insert(&mut data, key).expect("well under capacity");
    }
    for &key in &keys {
        assert!(filter.contains(&data, key), "false negative for key {key}");
    }
}

#[test]
fn cuckoo_filter_empty_storage_contains_nothing() {
    let filter: CuckooFilter<u64> = CuckooFilter::new(cuckoo_params(), 64);
    let data = vec![0u64; filter.word_cnt()];
    for key in 0..1_000u32 {
        assert!(!filter.contains(&data, key));
    }
}

#[test]
fn cuckoo_filter_word_cnt_matches_addressing() {
    let filter: CuckooFilter<u64> = CuckooFilter::new(cuckoo_params(), 100);
    assert_eq!(filter.word_cnt(), filter.block_cnt() * 8);
}
