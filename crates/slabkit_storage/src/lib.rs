//! # slabkit Storage
//!
//! Segment memory providers for slabkit.
//!
//! This crate provides the lowest-level memory abstraction for the slab
//! engine. Allocators hand out **opaque byte regions** - they do not know
//! anything about record sizes, segments or sort order.
//!
//! ## Design Principles
//!
//! - An allocation either succeeds with the full region or fails with an
//!   error; it never aborts the process
//! - Every byte handed out is accounted for until it is released
//! - Must be `Send + Sync` so stores can move between producer threads
//!
//! ## Available Allocators
//!
//! - [`SystemAllocator`] - Fallible allocation from the global heap
//! - [`BudgetAllocator`] - Wrapper that enforces a byte limit
//!
//! ## Example
//!
//! ```rust
//! use slabkit_storage::{SegmentAllocator, SystemAllocator};
//!
//! let allocator = SystemAllocator::new();
//! let region = allocator.allocate(4096).unwrap();
//! assert!(region.capacity() >= 4096);
//! assert_eq!(allocator.allocated(), 4096);
//!
//! allocator.release(4096);
//! assert_eq!(allocator.allocated(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
mod budget;
mod error;
mod system;

pub use allocator::SegmentAllocator;
pub use budget::BudgetAllocator;
pub use error::{AllocError, AllocResult};
pub use system::SystemAllocator;
