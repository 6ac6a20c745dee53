//! Segment allocator trait definition.

use crate::error::AllocResult;
use std::fmt::Debug;

/// A provider of fixed-size byte regions for slab segments.
///
/// Allocators are **opaque memory sources**. The slab engine asks for a
/// region once per segment, fills it by appending records, and hands the
/// byte count back through [`release`](Self::release) when the segment is
/// dropped. Allocators never see record contents.
///
/// # Invariants
///
/// - `allocate(n)` returns an empty `Vec` whose capacity is at least `n`
/// - a failed `allocate` leaves the accounting unchanged
/// - `allocated()` equals the sum of successful requests minus releases
/// - Allocators must be `Send + Sync` so a store can move to another thread
///
/// # Implementors
///
/// - [`super::SystemAllocator`] - Global heap
/// - [`super::BudgetAllocator`] - Limit enforcement over another allocator
pub trait SegmentAllocator: Send + Sync + Debug {
    /// Reserves a region able to hold `bytes` bytes.
    ///
    /// The returned vector is empty; callers append into it without
    /// exceeding the reserved capacity, so it never reallocates.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory cannot be reserved.
    fn allocate(&self, bytes: usize) -> AllocResult<Vec<u8>>;

    /// Returns `bytes` previously obtained from [`allocate`](Self::allocate).
    fn release(&self, bytes: usize);

    /// Returns the number of bytes currently handed out.
    fn allocated(&self) -> usize;
}
