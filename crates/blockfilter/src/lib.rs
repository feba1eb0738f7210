//! # blockfilter
//!
//! Blocked Bloom and blocked cuckoo filters for analytical batch-probe
//! workloads: no false negatives, a tunable false-positive rate, and a
//! design built entirely around cache-line-resident blocks and branchless
//! batch probing rather than around the single-key case.
//!
//! ## Architecture
//!
//! ```text
//!                         caller-owned &mut/& [W] word array
//!                                        |
//!  construct(config, bits) -> FilterHandle
//!                                        |
//!        ┌───────────────────────────────┼───────────────────────────────┐
//!        v                                                               v
//! ┌──────────────┐   block_idx    ┌───────────────┐   insert/contains  ┌─────────────┐
//! │  addressing  │ -------------> │  FilterHandle │ -----------------> │    block    │
//! │ (POW2/MAGIC) │                │ (Bloom/Cuckoo)│                    │ (bloom/     │
//! └──────────────┘                └───────────────┘                    │  cuckoo)    │
//!                                        ^                              └─────────────┘
//!                                        |
//!                              batch_contains (16-key mini-batches,
//!                              branchless match writer, unroll_factor
//!                              from the dispatch tuning table)
//! ```
//!
//! ## Module responsibilities
//!
//! | Module | Purpose |
//! |---|---|
//! | [`config`] | `Config`/`BloomParams`/`CuckooParams`/`AddrMode`/`WordWidth`, plus `validate()` |
//! | [`addressing`] | Hash -> block index, POW2 mask or MAGIC multiply-shift |
//! | [`block`] | Per-block insert/contains kernels: `block::bloom`, `block::cuckoo` |
//! | [`filter`] | `BloomFilter`/`CuckooFilter`: one addressing descriptor + one block kernel over caller data |
//! | [`batch`] | Branchless, mini-batched, unroll-aware `batch_contains` |
//! | [`dispatch`] | `construct`/`tune`: selects a `FilterHandle` and its unroll factor |
//! | [`sizing`] | `bits_required`: capacity planning for a target false-positive rate |
//! | [`hash`] | `PrimaryHash`/`SecondaryHash` collaborator traits plus a default pair |
//! | [`error`] | `FilterError` — the crate's only error type |
//!
//! ## Usage
//!
//! ```rust
//! use blockfilter::{Config, WordWidth, AddrMode, construct, batch_contains};
//!
//! let config = Config::bloom(WordWidth::W64, 8, 2, 6, AddrMode::Pow2);
//! let handle: blockfilter::FilterHandle<u64> = construct(config, 1 << 20).expect("valid config");
//!
//! let mut data = vec![0u64; handle.word_cnt()];
//! handle.batch_insert(&mut data, &[1, 2, 3]);
//!
//! assert!(handle.contains(&data, 2));
//!
//! let probes = [1u32, 2, 3, 999];
//! let mut out = vec![0usize; probes.len()];
//! let hits = batch_contains(&handle, &data, &probes, &mut out, 0);
//! assert!(hits >= 3);
//! ```
//!
//! ## Non-goals
//!
//! Deletion from Bloom filters, persistence/serialization (the wire layout
//! is documented for callers who want to roll their own), cryptographic
//! security, key widths other than 32 bits, and exact set semantics are all
//! out of scope for this crate.

pub mod addressing;
pub mod batch;
pub mod block;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod hash;
pub mod sizing;
mod util;
pub mod word;

pub use batch::batch_contains;
pub use config::{AddrMode, BloomParams, Config, CuckooParams, WordWidth};
pub use dispatch::{construct, tune, Clock, FilterHandle, SystemClock};
pub use error::FilterError;
pub use filter::{BloomFilter, CuckooFilter};
pub use hash::{DefaultPrimaryHash, DefaultSecondaryHash, PrimaryHash, SecondaryHash};
pub use sizing::bits_required;
pub use word::Word;
