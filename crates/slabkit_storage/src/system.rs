//! Heap-backed segment allocator.

use crate::allocator::SegmentAllocator;
use crate::error::{AllocError, AllocResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// An allocator that reserves segment memory from the global heap.
///
/// Reservation goes through [`Vec::try_reserve_exact`], so a request the
/// heap cannot satisfy comes back as [`AllocError::OutOfMemory`] instead of
/// aborting the process.
///
/// # Thread Safety
///
/// The outstanding byte count is atomic; the allocator can be shared by
/// every store in the process.
///
/// # Example
///
/// ```rust
/// use slabkit_storage::{SegmentAllocator, SystemAllocator};
///
/// let allocator = SystemAllocator::new();
/// let region = allocator.allocate(64).unwrap();
/// assert!(region.is_empty());
/// assert_eq!(allocator.allocated(), 64);
/// ```
#[derive(Debug, Default)]
pub struct SystemAllocator {
    in_use: AtomicUsize,
}

impl SystemAllocator {
    /// Creates a new allocator with nothing outstanding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SegmentAllocator for SystemAllocator {
    fn allocate(&self, bytes: usize) -> AllocResult<Vec<u8>> {
        let mut region = Vec::new();
        region
            .try_reserve_exact(bytes)
            .map_err(|_| AllocError::OutOfMemory { requested: bytes })?;
        self.in_use.fetch_add(bytes, Ordering::Relaxed);
        Ok(region)
    }

    fn release(&self, bytes: usize) {
        self.in_use.fetch_sub(bytes, Ordering::Relaxed);
    }

    fn allocated(&self) -> usize {
        self.in_use.load(Ordering::Relaxed)
    }
}
