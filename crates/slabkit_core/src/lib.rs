//! # slabkit Core
//!
//! Segmented record store for metadata repair.
//!
//! Scanning a volume's allocation structures can produce hundreds of
//! millions of fixed-size records. This crate accumulates them without one
//! huge contiguous buffer, sorts them in parallel, and hands them back in
//! globally sorted order.
//!
//! This crate provides:
//! - [`Slab`] - append-only store of fixed-size records in growing segments
//! - [`SortedSlab`] - a slab whose segments are each sorted, produced by [`Slab::sort_by`]
//! - [`SlabCursor`] - single-pass reader in append order or k-way merge order
//! - [`Bag`] - unordered collection with O(1) removal
//! - [`FixedRecord`] - typed encoding for records
//!
//! ## Example
//!
//! ```rust
//! use slabkit_core::Slab;
//!
//! let mut slab = Slab::for_record::<u64>().unwrap();
//! for block in [40u64, 10, 30, 20] {
//!     slab.push_record(&block).unwrap();
//! }
//!
//! let sorted = slab.sort_by(|a: &[u8], b: &[u8]| a.cmp(b));
//! let mut cursor = sorted.cursor().unwrap();
//! let mut blocks = Vec::new();
//! while let Some(block) = cursor.pop_record::<u64>().unwrap() {
//!     blocks.push(block);
//! }
//! assert_eq!(blocks, vec![10, 20, 30, 40]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bag;
mod config;
mod error;
mod record;
mod slab;
mod stats;

pub use bag::{Bag, MIN_BAG_SIZE};
pub use config::{SlabConfig, MAX_SEGMENT_BYTES, MIN_CAPACITY, PARALLEL_THRESHOLD};
pub use error::{SlabError, SlabResult};
pub use record::FixedRecord;
pub use slab::{
    Compare, CursorMode, Slab, SlabCursor, SortMode, SortReport, SortedSlab,
};
pub use stats::SlabStats;

pub use slabkit_storage::{AllocError, BudgetAllocator, SegmentAllocator, SystemAllocator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
