//! Append-only slab store.

use crate::config::SlabConfig;
use crate::error::{SlabError, SlabResult};
use crate::record::FixedRecord;
use crate::slab::cursor::SlabCursor;
use crate::slab::segment::Segment;
use crate::slab::sort::{sort_segments, SortReport};
use crate::stats::SlabStats;
use slabkit_storage::{SegmentAllocator, SystemAllocator};
use std::cmp::Ordering;
use std::sync::Arc;

/// A growable, append-only array of fixed-size records.
///
/// Records live in a list of segments of increasing size. When the newest
/// segment fills up another is allocated, twice as large as the last but
/// never bigger than [`SlabConfig::max_segment_bytes`]. Existing records are
/// never moved by growth.
///
/// Records cannot be removed or addressed by index. Reading goes through a
/// [`SlabCursor`], either in append order ([`Slab::cursor`]) or, after
/// [`Slab::sort_by`], in global sorted order ([`SortedSlab::cursor`]).
///
/// # Concurrency
///
/// `append` takes `&mut self`, so a single store cannot be filled from two
/// threads at once. The store is `Send`: give each producer thread its own
/// store and merge the results after every producer is done.
///
/// # Example
///
/// ```rust
/// use slabkit_core::Slab;
///
/// let mut slab = Slab::new(4).unwrap();
/// for value in [3u32, 1, 2] {
///     slab.append(&value.to_be_bytes()).unwrap();
/// }
/// assert_eq!(slab.record_count(), 3);
///
/// let sorted = slab.sort_by(|a: &[u8], b: &[u8]| a.cmp(b));
/// let values: Vec<u32> = sorted
///     .cursor()
///     .unwrap()
///     .map(|r| u32::from_be_bytes([r[0], r[1], r[2], r[3]]))
///     .collect();
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
pub struct Slab {
    item_size: usize,
    config: SlabConfig,
    allocator: Arc<dyn SegmentAllocator>,
    /// Segments in creation order; the last one takes appends.
    segments: Vec<Segment>,
    records: u64,
}

impl Slab {
    /// Creates an empty store for records of `item_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::InvalidItemSize`] if `item_size` is zero.
    pub fn new(item_size: usize) -> SlabResult<Self> {
        Self::with_config(item_size, SlabConfig::default())
    }

    /// Creates an empty store with explicit growth and sort settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `item_size` is zero or the configuration is invalid.
    pub fn with_config(item_size: usize, config: SlabConfig) -> SlabResult<Self> {
        Self::with_allocator(item_size, config, Arc::new(SystemAllocator::new()))
    }

    /// Creates an empty store that takes its segment memory from `allocator`.
    ///
    /// Several stores may share one allocator, for example to hold all
    /// producers of a repair pass to a single memory budget.
    ///
    /// # Errors
    ///
    /// Returns an error if `item_size` is zero or the configuration is invalid.
    pub fn with_allocator(
        item_size: usize,
        config: SlabConfig,
        allocator: Arc<dyn SegmentAllocator>,
    ) -> SlabResult<Self> {
        if item_size == 0 {
            return Err(SlabError::InvalidItemSize { size: item_size });
        }
        config.validate()?;

        Ok(Self {
            item_size,
            config,
            allocator,
            segments: Vec::new(),
            records: 0,
        })
    }

    /// Creates an empty store sized for the typed record `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::InvalidItemSize`] if `T::SIZE` is zero.
    pub fn for_record<T: FixedRecord>() -> SlabResult<Self> {
        Self::new(T::SIZE)
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::RecordSizeMismatch`] if `record` is not exactly
    /// `item_size` bytes, or an allocation error if a new segment was needed
    /// and could not be reserved. On error the store is unchanged.
    pub fn append(&mut self, record: &[u8]) -> SlabResult<()> {
        if record.len() != self.item_size {
            return Err(SlabError::record_size_mismatch(self.item_size, record.len()));
        }
        self.writable_segment()?.push(record);
        self.records += 1;
        Ok(())
    }

    /// Encodes and appends a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::RecordSizeMismatch`] if `T::SIZE` differs from
    /// the store's item size, or an allocation error.
    pub fn push_record<T: FixedRecord>(&mut self, record: &T) -> SlabResult<()> {
        if T::SIZE != self.item_size {
            return Err(SlabError::record_size_mismatch(self.item_size, T::SIZE));
        }
        self.writable_segment()?.push_with(|slot| record.encode(slot));
        self.records += 1;
        Ok(())
    }

    /// Returns the tail segment, allocating a new one if it is full or missing.
    fn writable_segment(&mut self) -> SlabResult<&mut Segment> {
        let needs_segment = self.segments.last().map_or(true, Segment::is_full);
        if needs_segment {
            let previous = self.segments.last().map(Segment::capacity);
            let capacity = self.config.segment_capacity(self.item_size, previous);
            let bytes = capacity as usize * self.item_size;
            let region = self.allocator.allocate(bytes)?;
            if let Err(err) = self.segments.try_reserve(1) {
                self.allocator.release(bytes);
                tracing::warn!(error = %err, "segment list could not grow");
                return Err(SlabError::OutOfMemory {
                    requested: self.segments.len() + 1,
                });
            }

            tracing::debug!(
                segment = self.segments.len(),
                capacity,
                bytes,
                item_size = self.item_size,
                "allocated slab segment"
            );
            self.segments.push(Segment::new(region, self.item_size, capacity));
        }

        // The branch above guarantees a tail segment with room.
        self.segments
            .last_mut()
            .ok_or(SlabError::OutOfMemory { requested: 1 })
    }

    /// Returns the number of records appended so far.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Returns `true` if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Returns the fixed record size in bytes.
    #[must_use]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Returns the number of segments allocated.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns each segment's slot count in creation order.
    pub fn segment_capacities(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.iter().map(Segment::capacity)
    }

    /// Returns the number of records written to each segment, in creation order.
    pub fn segment_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().map(Segment::used)
    }

    /// Returns the growth and sort settings.
    #[must_use]
    pub fn config(&self) -> &SlabConfig {
        &self.config
    }

    /// Returns a snapshot of the store's size and memory use.
    #[must_use]
    pub fn stats(&self) -> SlabStats {
        SlabStats {
            item_size: self.item_size,
            segment_count: self.segments.len(),
            record_count: self.records,
            capacity: self
                .segments
                .iter()
                .map(|s| u64::from(s.capacity()))
                .sum(),
            bytes_reserved: self.segments.iter().map(Segment::reserved_bytes).sum(),
        }
    }

    /// Opens a cursor that yields records in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor's per-segment state cannot be allocated.
    pub fn cursor(&self) -> SlabResult<SlabCursor<'_>> {
        SlabCursor::open(&self.segments, self.item_size, None)
    }

    /// Sorts every segment by `compare` and returns the sorted view.
    ///
    /// Each segment is ordered independently; [`SortedSlab::cursor`] merges
    /// them into one globally sorted stream. Stores with more than
    /// [`SlabConfig::parallel_threshold`] segments are sorted on a worker
    /// pool with one job per segment, and this call blocks until every job
    /// has finished.
    ///
    /// Taking `self` by value means no cursor can be open while the bytes
    /// are being reordered.
    pub fn sort_by<F>(mut self, compare: F) -> SortedSlab<F>
    where
        F: Fn(&[u8], &[u8]) -> Ordering + Sync,
    {
        let report = sort_segments(&mut self.segments, &compare, &self.config, self.records);
        SortedSlab {
            slab: self,
            compare,
            report,
        }
    }
}

impl Drop for Slab {
    fn drop(&mut self) {
        for segment in self.segments.drain(..) {
            self.allocator.release(segment.reserved_bytes());
        }
    }
}

impl std::fmt::Debug for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slab")
            .field("item_size", &self.item_size)
            .field("segment_count", &self.segments.len())
            .field("record_count", &self.records)
            .finish_non_exhaustive()
    }
}

/// A slab whose segments are each sorted by a known comparator.
///
/// Produced by [`Slab::sort_by`]. Merge cursors opened here always use the
/// comparator the segments were sorted with.
pub struct SortedSlab<F> {
    slab: Slab,
    compare: F,
    report: SortReport,
}

impl<F> SortedSlab<F>
where
    F: Fn(&[u8], &[u8]) -> Ordering + Sync,
{
    /// Opens a cursor that yields every record in sorted order.
    ///
    /// Each call to [`SlabCursor::peek`] scans the head of every segment, so
    /// a step costs O(segments); segment counts grow logarithmically with the
    /// number of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor's per-segment state cannot be allocated.
    pub fn cursor(&self) -> SlabResult<SlabCursor<'_>> {
        SlabCursor::open(&self.slab.segments, self.slab.item_size, Some(&self.compare))
    }

    /// Opens a cursor that yields records in physical order.
    ///
    /// Within a segment this is sorted order; segments follow each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor's per-segment state cannot be allocated.
    pub fn inorder_cursor(&self) -> SlabResult<SlabCursor<'_>> {
        self.slab.cursor()
    }

    /// Returns the underlying store for inspection.
    #[must_use]
    pub fn slab(&self) -> &Slab {
        &self.slab
    }

    /// Returns the number of records.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        self.slab.record_count()
    }

    /// Returns the comparator the segments were sorted with.
    #[must_use]
    pub fn comparator(&self) -> &F {
        &self.compare
    }

    /// Returns how the sort was carried out.
    #[must_use]
    pub fn report(&self) -> &SortReport {
        &self.report
    }

    /// Gives the store back so more records can be appended.
    ///
    /// Appending breaks the per-segment order; sort again before merging.
    #[must_use]
    pub fn into_slab(self) -> Slab {
        self.slab
    }
}

impl<F> std::fmt::Debug for SortedSlab<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedSlab")
            .field("slab", &self.slab)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}
