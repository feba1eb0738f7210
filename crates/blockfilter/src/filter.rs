//! Filter wrapper types.
//!
//! [`BloomFilter`] and [`CuckooFilter`] compose one [`AddressingDescriptor`]
//! with one block kernel. Neither owns its backing storage: every method
//! takes the caller's `&mut [W]` / `&[W]` slice — the core never allocates.
//! Most callers should go through [`crate::dispatch::construct`] rather than
//! building these directly, since it also validates the config and rounds
//! the requested size up to a whole number of blocks.

use std::marker::PhantomData;

use crate::addressing::AddressingDescriptor;
use crate::block::bloom::BloomBlockKernel;
use crate::block::cuckoo::CuckooBlockKernel;
use crate::block::needs_secondary_hash;
use crate::config::{BloomParams, CuckooParams};
use crate::error::FilterError;
use crate::hash::{DefaultPrimaryHash, DefaultSecondaryHash, PrimaryHash, SecondaryHash};
use crate::word::Word;

/// A blocked Bloom filter over a caller-owned `&mut [W]` array.
///
/// `P`/`S` are the primary/secondary hash collaborators; defaulted to the
/// crate's built-in Knuth mixers so callers who don't care can ignore them
/// entirely.
#[derive(Debug, Clone, Copy)]
pub struct BloomFilter<W: Word, P: PrimaryHash = DefaultPrimaryHash, S: SecondaryHash = DefaultSecondaryHash> {
    addressing: AddressingDescriptor,
    kernel: BloomBlockKernel,
    word_cnt_per_block: usize,
    _hashers: PhantomData<(W, P, S)>,
}

impl<W: Word, P: PrimaryHash, S: SecondaryHash> BloomFilter<W, P, S> {
    /// Builds a filter addressing `block_cnt` blocks of `params`'s shape.
    ///
    /// Does not validate `params`; callers going through
    /// [`crate::dispatch::construct`] get that for free.
    pub fn new(params: BloomParams, block_cnt: usize) -> Self {
        Self {
            addressing: AddressingDescriptor::new(params.addr_mode, block_cnt),
            kernel: BloomBlockKernel::new(&params),
            word_cnt_per_block: params.word_cnt_per_block as usize,
            _hashers: PhantomData,
        }
    }

    /// Number of blocks this filter addresses.
    pub fn block_cnt(&self) -> usize {
        self.addressing.block_cnt()
    }

    /// Words of backing storage this filter needs (`block_cnt * word_cnt_per_block`).
    pub fn word_cnt(&self) -> usize {
        self.block_cnt() * self.word_cnt_per_block
    }

    #[inline]
    fn block_of<'a>(&self, data: &'a [W], block_idx: usize) -> &'a [W] {
        let start = block_idx * self.word_cnt_per_block;
        &data[start..start + self.word_cnt_per_block]
    }

    #[inline]
    fn block_of_mut<'a>(&self, data: &'a mut [W], block_idx: usize) -> &'a mut [W] {
        let start = block_idx * self.word_cnt_per_block;
        &mut data[start..start + self.word_cnt_per_block]
    }

    /// Derives the block index and in-block hash source for `key`, falling
    /// back to the secondary hash when the primary hash's leftover bits
    /// after addressing don't cover the kernel's needs.
    #[inline]
    fn locate(&self, key: u32) -> (usize, u32) {
        let h = P::hash(key);
        let block_idx = self.addressing.get_block_idx(h);
        let source = if needs_secondary_hash(self.addressing.addressing_bits(), self.kernel.in_block_bits_needed()) {
            S::hash(key)
        } else {
            h
        };
        (block_idx, source)
    }

    /// Inserts `key`. Infallible: a Bloom filter never runs out of room to
    /// set a bit, unlike cuckoo's `CuckooInsertFull`.
    pub fn insert(&self, data: &mut [W], key: u32) {
        let (block_idx, source) = self.locate(key);
        self.kernel.insert(self.block_of_mut(data, block_idx), source);
    }

    /// Inserts every key in `keys`, in order. A thin sequential loop; the
    /// throughput-oriented entry point is [`crate::batch`]'s batch-probe
    /// engine, which this type does not implement itself (inserts are not
    /// the hot path this crate optimizes for).
    pub fn batch_insert(&self, data: &mut [W], keys: &[u32]) {
        for &key in keys {
            self.insert(data, key);
        }
    }

    /// Tests membership of `key`. Never a false negative for a previously
    /// inserted key.
    pub fn contains(&self, data: &[W], key: u32) -> bool {
        let (block_idx, source) = self.locate(key);
        self.kernel.contains(self.block_of(data, block_idx), source)
    }
}

/// A blocked cuckoo filter over a caller-owned `&mut [W]` array.
#[derive(Debug, Clone, Copy)]
pub struct CuckooFilter<W: Word, P: PrimaryHash = DefaultPrimaryHash, S: SecondaryHash = DefaultSecondaryHash> {
    addressing: AddressingDescriptor,
    kernel: CuckooBlockKernel,
    word_cnt_per_block: usize,
    _hashers: PhantomData<(W, P, S)>,
}

impl<W: Word, P: PrimaryHash, S: SecondaryHash> CuckooFilter<W, P, S> {
    /// Builds a filter addressing `block_cnt` blocks of `params`'s shape.
    ///
    /// Does not validate `params`; callers going through
    /// [`crate::dispatch::construct`] get that for free.
    pub fn new(params: CuckooParams, block_cnt: usize) -> Self {
        Self {
            addressing: AddressingDescriptor::new(params.addr_mode, block_cnt),
            kernel: CuckooBlockKernel::new(&params),
            word_cnt_per_block: params.word_cnt_per_block as usize,
            _hashers: PhantomData,
        }
    }

    /// Number of blocks this filter addresses.
    pub fn block_cnt(&self) -> usize {
        self.addressing.block_cnt()
    }

    /// Words of backing storage this filter needs (`block_cnt * word_cnt_per_block`).
    pub fn word_cnt(&self) -> usize {
        self.block_cnt() * self.word_cnt_per_block
    }

    #[inline]
    fn block_of<'a>(&self, data: &'a [W], block_idx: usize) -> &'a [W] {
        let start = block_idx * self.word_cnt_per_block;
        &data[start..start + self.word_cnt_per_block]
    }

    #[inline]
    fn block_of_mut<'a>(&self, data: &'a mut [W], block_idx: usize) -> &'a mut [W] {
        let start = block_idx * self.word_cnt_per_block;
        &mut data[start..start + self.word_cnt_per_block]
    }

    #[inline]
    fn locate(&self, key: u32) -> (usize, u32) {
        let h = P::hash(key);
        let block_idx = self.addressing.get_block_idx(h);
        let source = if needs_secondary_hash(self.addressing.addressing_bits(), self.kernel.in_block_bits_needed()) {
            S::hash(key)
        } else {
            h
        };
        (block_idx, source)
    }

    /// Inserts `key`. May return [`FilterError::CuckooInsertFull`] if the
    /// key's block is saturated and relocation couldn't find room within
    /// the kick budget; the filter remains usable afterward, but the
    /// evicted fingerprint's original key may now yield a false negative.
    pub fn insert(&self, data: &mut [W], key: u32) -> Result<(), FilterError> {
        let (block_idx, source) = self.locate(key);
        self.kernel.insert(self.block_of_mut(data, block_idx), source)
    }

    /// Inserts every key in `keys`, in order, swallowing individual
    /// [`FilterError::CuckooInsertFull`] failures with a cold-path log
    /// rather than aborting the batch — callers who need per-key
    /// success/failure should call `insert` directly.
    pub fn batch_insert(&self, data: &mut [W], keys: &[u32]) {
        for &key in keys {
            if self.insert(data, key).is_err() {
                log::warn!("cuckoo batch_insert: block saturated, a fingerprint was evicted and lost");
            }
        }
    }

    /// Tests membership of `key`. May return a false positive, and may
    /// return a false negative for a key whose fingerprint was evicted and
    /// lost by a prior saturated insert — never otherwise.
    pub fn contains(&self, data: &[W], key: u32) -> bool {
        let (block_idx, source) = self.locate(key);
        self.kernel.contains(self.block_of(data, block_idx), source)
    }
}

#[cfg(test)]
mod tests;
