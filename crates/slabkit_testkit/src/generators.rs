//! Property-based test generators using proptest.
//!
//! Provides strategies for generating records and slab configurations.
//! Key ranges are kept small on purpose in some strategies so that equal
//! keys show up often.

use crate::fixtures::{PairRecord, RmapRecord};
use proptest::prelude::*;
use slabkit_core::SlabConfig;

/// Strategy for a pair record with any key.
pub fn pair_record_strategy() -> impl Strategy<Value = PairRecord> {
    (any::<u32>(), any::<u32>()).prop_map(|(key, value)| PairRecord::new(key, value))
}

/// Strategy for pair record lists with many duplicate keys.
pub fn pair_records_with_ties(max_len: usize) -> impl Strategy<Value = Vec<PairRecord>> {
    prop::collection::vec((0u32..16, any::<u32>()), 0..max_len).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(key, value)| PairRecord::new(key, value))
            .collect()
    })
}

/// Strategy for reverse-mapping records inside a small block range.
pub fn rmap_record_strategy() -> impl Strategy<Value = RmapRecord> {
    (0u32..1024, 1u32..64, 0u64..32, 0u64..4096).prop_map(|(start, count, owner, offset)| {
        RmapRecord::new(start, count, owner, offset)
    })
}

/// Strategy for slab configurations with small segments.
///
/// Capacities start between 1 and 16 slots and are capped between 1 and
/// 128 records of `item_size` bytes, so generated inputs span many segments.
pub fn small_config_strategy(item_size: usize) -> impl Strategy<Value = SlabConfig> {
    (1u32..16, 1usize..128, 0usize..6).prop_map(move |(min, max_records, threshold)| {
        SlabConfig::new()
            .min_capacity(min)
            .max_segment_bytes(max_records * item_size)
            .parallel_threshold(threshold)
            .sort_threads(2)
    })
}
