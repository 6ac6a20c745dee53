//! # slabkit Testkit
//!
//! Test utilities for slabkit.
//!
//! This crate provides:
//! - Record fixtures shaped like real repair records
//! - Property-based test generators using proptest
//! - A harness that tracks appended records and verifies cursor output
//! - Multi-producer stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use slabkit_testkit::prelude::*;
//!
//! let mut harness = SlabHarness::<PairRecord>::new();
//! harness.push(PairRecord::new(2, 0));
//! harness.push(PairRecord::new(1, 0));
//! harness.verify_sorted(PairRecord::compare_keys);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
