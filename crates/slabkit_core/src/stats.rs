//! Slab size and memory statistics.
//!
//! # Usage
//!
//! ```rust
//! use slabkit_core::Slab;
//!
//! let mut slab = Slab::new(8).unwrap();
//! slab.append(&[0u8; 8]).unwrap();
//!
//! let stats = slab.stats();
//! assert_eq!(stats.record_count, 1);
//! assert_eq!(stats.capacity, 4096);
//! println!("{stats}");
//! ```

use std::fmt;

/// A point-in-time snapshot of a slab's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlabStats {
    /// Fixed record size in bytes.
    pub item_size: usize,
    /// Segments allocated.
    pub segment_count: usize,
    /// Records appended.
    pub record_count: u64,
    /// Record slots across all segments.
    pub capacity: u64,
    /// Bytes reserved for segment data.
    pub bytes_reserved: usize,
}

impl SlabStats {
    /// Returns the fraction of reserved slots holding records (1.0 when empty).
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.record_count as f64 / self.capacity as f64
    }

    /// Returns the bytes actually occupied by records.
    #[must_use]
    pub fn bytes_used(&self) -> u64 {
        self.record_count * self.item_size as u64
    }
}

impl fmt::Display for SlabStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records of {} bytes in {} segments ({} bytes reserved, {:.1}% used)",
            self.record_count,
            self.item_size,
            self.segment_count,
            self.bytes_reserved,
            self.utilization() * 100.0
        )
    }
}
