//! Benchmark helpers for slabkit.

pub mod utils;
