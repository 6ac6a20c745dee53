//! Slab configuration.

/// Default number of record slots in the first segment.
pub const MIN_CAPACITY: u32 = 4096;

/// Default byte cap for a single segment (128 MiB).
pub const MAX_SEGMENT_BYTES: usize = 128 * 1024 * 1024;

/// Default segment count at or below which sorting stays on the caller's thread.
pub const PARALLEL_THRESHOLD: usize = 4;

/// Growth and sorting parameters for a slab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabConfig {
    /// Record slots in the first segment.
    pub min_capacity: u32,

    /// Upper bound on the bytes of any one segment.
    pub max_segment_bytes: usize,

    /// Stores with this many segments or fewer are sorted sequentially.
    pub parallel_threshold: usize,

    /// Worker threads for parallel sorting (`None` = available parallelism).
    pub sort_threads: Option<usize>,
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            max_segment_bytes: MAX_SEGMENT_BYTES,
            parallel_threshold: PARALLEL_THRESHOLD,
            sort_threads: None,
        }
    }
}

impl SlabConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first segment's slot count.
    #[must_use]
    pub const fn min_capacity(mut self, slots: u32) -> Self {
        self.min_capacity = slots;
        self
    }

    /// Sets the per-segment byte cap.
    #[must_use]
    pub const fn max_segment_bytes(mut self, bytes: usize) -> Self {
        self.max_segment_bytes = bytes;
        self
    }

    /// Sets the sequential sort threshold.
    #[must_use]
    pub const fn parallel_threshold(mut self, segments: usize) -> Self {
        self.parallel_threshold = segments;
        self
    }

    /// Sets the worker thread count for parallel sorting.
    #[must_use]
    pub const fn sort_threads(mut self, threads: usize) -> Self {
        self.sort_threads = Some(threads);
        self
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::InvalidConfig`](crate::SlabError::InvalidConfig)
    /// for a zero first capacity, a zero byte cap or zero sort threads.
    pub fn validate(&self) -> crate::SlabResult<()> {
        if self.min_capacity == 0 {
            return Err(crate::SlabError::invalid_config(
                "min_capacity must be at least one record",
            ));
        }
        if self.max_segment_bytes == 0 {
            return Err(crate::SlabError::invalid_config(
                "max_segment_bytes must be non-zero",
            ));
        }
        if self.sort_threads == Some(0) {
            return Err(crate::SlabError::invalid_config(
                "sort_threads must be at least one",
            ));
        }
        Ok(())
    }

    /// Returns the slot count of the segment that follows one of `previous` slots.
    ///
    /// The first segment (`previous == None`) gets `min_capacity`; each later
    /// one doubles its predecessor. Both are capped so a segment never exceeds
    /// `max_segment_bytes`, and never drop below one slot.
    #[must_use]
    pub fn segment_capacity(&self, item_size: usize, previous: Option<u32>) -> u32 {
        let max_slots = self.max_segment_bytes / item_size.max(1);
        let wanted = match previous {
            Some(slots) => (slots as usize).saturating_mul(2),
            None => self.min_capacity as usize,
        };
        let slots = wanted.min(max_slots).max(1);
        u32::try_from(slots).unwrap_or(u32::MAX)
    }

    /// Returns the capacities of the segments needed to hold `records` items.
    #[must_use]
    pub fn capacity_plan(&self, item_size: usize, records: u64) -> Vec<u32> {
        let mut plan = Vec::new();
        let mut covered = 0u64;
        let mut previous = None;
        while covered < records {
            let slots = self.segment_capacity(item_size, previous);
            plan.push(slots);
            covered += u64::from(slots);
            previous = Some(slots);
        }
        plan
    }

    /// Returns the number of sort worker threads to spawn.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.sort_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}
