//! Benchmark-only crate for `blockfilter`.
//!
//! Mirrors the teacher workspace's `cli` crate pattern of keeping
//! `criterion` benches in a sibling crate rather than inside the library
//! under benchmark (construction, single-key, and batch-probe paths are
//! exercised from `benches/blockfilter_bench.rs`). Holds no runtime code of
//! its own.
