//! Memory-limited allocator wrapper.
//!
//! Repair runs are usually told how much memory they may use. This module
//! provides a [`BudgetAllocator`] that wraps any other allocator and refuses
//! requests that would push the outstanding total past a fixed limit. A
//! refused request is an ordinary error, so the store that asked for the
//! segment stays intact and the caller decides what to do next.

use crate::allocator::SegmentAllocator;
use crate::error::{AllocError, AllocResult};
use crate::system::SystemAllocator;
use parking_lot::Mutex;

/// An allocator that enforces a byte limit over another allocator.
///
/// # Example
///
/// ```rust
/// use slabkit_storage::{AllocError, BudgetAllocator, SegmentAllocator};
///
/// let allocator = BudgetAllocator::with_system(1024);
/// let _region = allocator.allocate(1000).unwrap();
///
/// let refused = allocator.allocate(100).unwrap_err();
/// assert!(matches!(refused, AllocError::BudgetExceeded { .. }));
/// ```
#[derive(Debug)]
pub struct BudgetAllocator {
    inner: Box<dyn SegmentAllocator>,
    limit: usize,
    /// Bytes charged against the limit.
    in_use: Mutex<usize>,
}

impl BudgetAllocator {
    /// Creates a budget of `limit` bytes over the given allocator.
    pub fn new(inner: Box<dyn SegmentAllocator>, limit: usize) -> Self {
        Self {
            inner,
            limit,
            in_use: Mutex::new(0),
        }
    }

    /// Creates a budget of `limit` bytes over the global heap.
    #[must_use]
    pub fn with_system(limit: usize) -> Self {
        Self::new(Box::new(SystemAllocator::new()), limit)
    }

    /// Returns the configured limit in bytes.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the bytes that can still be handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(*self.in_use.lock())
    }
}

impl SegmentAllocator for BudgetAllocator {
    fn allocate(&self, bytes: usize) -> AllocResult<Vec<u8>> {
        // Hold the lock across the inner call so two threads cannot both
        // squeeze into the last free bytes.
        let mut in_use = self.in_use.lock();
        let wanted = in_use.checked_add(bytes);
        if wanted.map_or(true, |total| total > self.limit) {
            tracing::warn!(
                requested = bytes,
                in_use = *in_use,
                limit = self.limit,
                "segment allocation refused by memory budget"
            );
            return Err(AllocError::BudgetExceeded {
                requested: bytes,
                in_use: *in_use,
                limit: self.limit,
            });
        }

        let region = self.inner.allocate(bytes)?;
        *in_use += bytes;
        Ok(region)
    }

    fn release(&self, bytes: usize) {
        let mut in_use = self.in_use.lock();
        *in_use = in_use.saturating_sub(bytes);
        self.inner.release(bytes);
    }

    fn allocated(&self) -> usize {
        *self.in_use.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn allocates_within_limit() {
        let allocator = BudgetAllocator::with_system(4096);
        let region = allocator.allocate(4096).unwrap();
        assert!(region.capacity() >= 4096);
        assert_eq!(allocator.allocated(), 4096);
        assert_eq!(allocator.remaining(), 0);
    }

    #[test]
    fn refuses_past_limit() {
        let allocator = BudgetAllocator::with_system(100);
        let _first = allocator.allocate(60).unwrap();

        let err = allocator.allocate(41).unwrap_err();
        assert_eq!(
            err,
            AllocError::BudgetExceeded {
                requested: 41,
                in_use: 60,
                limit: 100,
            }
        );
        assert_eq!(err.requested(), 41);
        // Refusal does not change the accounting
        assert_eq!(allocator.allocated(), 60);
    }

    #[test]
    fn release_frees_budget() {
        let allocator = BudgetAllocator::with_system(100);
        let _first = allocator.allocate(100).unwrap();
        assert!(allocator.allocate(1).is_err());

        allocator.release(100);
        assert_eq!(allocator.remaining(), 100);
        assert!(allocator.allocate(50).is_ok());
    }

    #[test]
    fn release_reaches_inner_allocator() {
        let allocator = BudgetAllocator::with_system(1000);
        let _region = allocator.allocate(300).unwrap();
        assert_eq!(allocator.inner.allocated(), 300);

        allocator.release(300);
        assert_eq!(allocator.inner.allocated(), 0);
    }

    #[test]
    fn overflowing_request_is_refused() {
        let allocator = BudgetAllocator::with_system(usize::MAX);
        let _region = allocator.allocate(16).unwrap();
        assert!(matches!(
            allocator.allocate(usize::MAX),
            Err(AllocError::BudgetExceeded { .. })
        ));
    }

    #[test]
    fn limit_is_reported() {
        let allocator = BudgetAllocator::with_system(12345);
        assert_eq!(allocator.limit(), 12345);
    }

    proptest! {
        #[test]
        fn never_exceeds_limit(requests in prop::collection::vec(0usize..512, 0..64)) {
            let allocator = BudgetAllocator::with_system(2048);
            for bytes in requests {
                let _ = allocator.allocate(bytes);
                prop_assert!(allocator.allocated() <= allocator.limit());
            }
        }
    }
}
