//! End-to-end slab scenarios: append, sort, merge.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slabkit_core::{
    Bag, BudgetAllocator, FixedRecord, SegmentAllocator, Slab, SlabConfig, SortMode, SortedSlab,
};
use slabkit_testkit::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn increasing_keys_fill_two_segments() {
    let mut slab = Slab::new(8).unwrap();
    for key in 0..5000u32 {
        slab.push_record(&PairRecord::new(key, key ^ 0xFFFF)).unwrap();
    }

    assert_eq!(slab.record_count(), 5000);
    assert_eq!(slab.segment_count(), 2);
    assert_eq!(slab.segment_lengths().collect::<Vec<_>>(), vec![4096, 904]);
    assert_eq!(slab.segment_capacities().collect::<Vec<_>>(), vec![4096, 8192]);

    let sorted = slab.sort_by(PairRecord::compare_keys);
    let mut cursor = sorted.cursor().unwrap();
    let mut previous: Option<u32> = None;
    let mut popped = 0;
    while let Some(record) = cursor.pop_record::<PairRecord>().unwrap() {
        if let Some(prev) = previous {
            assert!(record.key > prev, "{} did not follow {}", record.key, prev);
        }
        previous = Some(record.key);
        popped += 1;
    }
    assert_eq!(popped, 5000);
    assert_eq!(previous, Some(4999));
}

#[test]
fn empty_slab_pops_nothing() {
    let slab = Slab::new(8).unwrap();
    let mut cursor = slab.cursor().unwrap();
    assert!(cursor.pop().is_none());
    assert!(cursor.pop().is_none());
    cursor.close();

    let sorted = slab.sort_by(PairRecord::compare_keys);
    assert_eq!(sorted.report().mode, SortMode::Sequential);
    assert!(sorted.cursor().unwrap().pop().is_none());
}

#[test]
fn three_producers_each_sort_their_own_slab() {
    let config = ProducerConfig {
        records: 10_000,
        producers: 3,
        ..ProducerConfig::default()
    };
    let run = run_producers(&config).unwrap();
    assert_eq!(run.slabs.len(), 3);
    assert_eq!(run.total_records(), 10_000);

    for (producer, slab) in run.slabs.into_iter().enumerate() {
        let before: Vec<Vec<u8>> = drain(slab.cursor().unwrap());
        let sorted = slab.sort_by(PairRecord::compare_keys);
        let after = drain(sorted.cursor().unwrap());

        assert_eq!(after.len(), producer_share(10_000, 3, producer));
        assert_non_decreasing(&after, PairRecord::compare_keys);
        assert!(same_multiset(&before, &after));
        assert!(after
            .iter()
            .all(|r| PairRecord::decode(r).value == producer as u32));
    }
}

#[test]
fn many_segments_sort_on_worker_pool() {
    let config = SlabConfig::new().min_capacity(16).sort_threads(4);
    let mut harness = SlabHarness::with_config(config);
    let mut rng = StdRng::seed_from_u64(11);
    // 16 + 32 + ... + 2048 = 4080 slots, so 8 segments
    for i in 0..4000u32 {
        harness.push(PairRecord::new(rng.gen_range(0..500), i));
    }
    assert_eq!(harness.slab().segment_count(), 8);

    let sorted = harness.verify_sorted(PairRecord::compare_keys);
    assert_eq!(sorted.report().mode, SortMode::Parallel { threads: 4 });
    assert_eq!(sorted.report().segments, 8);
}

#[test]
fn equal_keys_come_out_in_append_order() {
    let mut harness = SlabHarness::with_config(tiny_segments());
    for i in 0..300u32 {
        harness.push(PairRecord::new(i % 3, i));
    }
    let sorted = harness.verify_sorted(PairRecord::compare_keys);

    let records: Vec<PairRecord> = drain(sorted.cursor().unwrap())
        .iter()
        .map(|r| PairRecord::decode(r))
        .collect();
    for key in 0..3 {
        let values: Vec<u32> = records
            .iter()
            .filter(|r| r.key == key)
            .map(|r| r.value)
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn shared_budget_stops_growth_without_losing_records() {
    // Room for two first segments plus one second segment.
    let budget = Arc::new(BudgetAllocator::with_system(4096 * 8 + 8192 * 8));
    let allocator: Arc<dyn SegmentAllocator> = budget.clone();
    let mut first = Slab::with_allocator(8, SlabConfig::default(), allocator.clone()).unwrap();
    let mut second = Slab::with_allocator(8, SlabConfig::default(), allocator).unwrap();

    for key in 0..4096u32 {
        first.push_record(&PairRecord::new(key, 0)).unwrap();
        second.push_record(&PairRecord::new(key, 1)).unwrap();
    }
    assert_eq!(budget.remaining(), 4096 * 8);

    // The next segment would be 8192 slots; half of that is left.
    let err = first.push_record(&PairRecord::new(0, 0)).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(first.record_count(), 4096);
    assert_eq!(first.segment_count(), 1);

    drop(second);
    assert_eq!(budget.remaining(), 8192 * 8);
    first.push_record(&PairRecord::new(0, 0)).unwrap();
    assert_eq!(first.record_count(), 4097);
    assert_eq!(budget.remaining(), 0);
}

/// Sweeps rmaps sorted by start block and reports runs of blocks owned more
/// than once as `(start, length, owners)`.
fn shared_extents<F>(sorted: &SortedSlab<F>) -> Vec<(u32, u32, usize)>
where
    F: Fn(&[u8], &[u8]) -> Ordering + Sync,
{
    let mut cursor = sorted.cursor().unwrap();
    let mut active: Bag<RmapRecord> = Bag::new();
    let mut next = cursor.pop_record::<RmapRecord>().unwrap();
    let mut extents: Vec<(u32, u32, usize)> = Vec::new();
    let mut pos = 0u32;

    loop {
        if active.is_empty() {
            match next {
                Some(rmap) => pos = rmap.start_block,
                None => break,
            }
        }
        while let Some(rmap) = next.filter(|r| r.start_block == pos) {
            active.add(rmap).unwrap();
            next = cursor.pop_record::<RmapRecord>().unwrap();
        }

        let mut boundary = active.iter().map(RmapRecord::end_block).min().unwrap();
        if let Some(rmap) = next {
            boundary = boundary.min(rmap.start_block);
        }

        let owners = active.len();
        if owners >= 2 {
            match extents.last_mut() {
                Some((start, len, count)) if *start + *len == pos && *count == owners => {
                    *len += boundary - pos;
                }
                _ => extents.push((pos, boundary - pos, owners)),
            }
        }

        pos = boundary;
        active.retain(|r| r.end_block() > pos);
    }
    extents
}

/// The same answer computed one block at a time.
fn shared_extents_by_block(rmaps: &[RmapRecord]) -> Vec<(u32, u32, usize)> {
    let mut owners: BTreeMap<u32, usize> = BTreeMap::new();
    for rmap in rmaps {
        for block in rmap.start_block..rmap.end_block() {
            *owners.entry(block).or_default() += 1;
        }
    }

    let mut extents: Vec<(u32, u32, usize)> = Vec::new();
    for (&block, &count) in owners.iter().filter(|(_, &count)| count >= 2) {
        match extents.last_mut() {
            Some((start, len, c)) if *start + *len == block && *c == count => *len += 1,
            _ => extents.push((block, 1, count)),
        }
    }
    extents
}

#[test]
fn rmap_sweep_finds_shared_blocks() {
    let rmaps = vec![
        RmapRecord::new(10, 10, 1, 0),
        RmapRecord::new(15, 10, 2, 0),
        RmapRecord::new(40, 5, 3, 0),
        RmapRecord::new(15, 2, 4, 100),
        RmapRecord::new(44, 1, 5, 0),
    ];
    let slab = slab_with(tiny_segments(), &rmaps);
    let sorted = slab.sort_by(RmapRecord::compare);

    assert_eq!(
        shared_extents(&sorted),
        vec![(15, 2, 3), (17, 3, 2), (44, 1, 2)]
    );
}

#[test]
fn rmap_sweep_matches_block_counts() {
    let mut rng = StdRng::seed_from_u64(99);
    let rmaps: Vec<RmapRecord> = (0..2000)
        .map(|i| RmapRecord::new(rng.gen_range(0..5000), rng.gen_range(1..40), i, 0))
        .collect();
    let slab = slab_with(SlabConfig::new().min_capacity(32), &rmaps);
    assert!(slab.segment_count() > 4);
    let sorted = slab.sort_by(RmapRecord::compare);

    assert_eq!(shared_extents(&sorted), shared_extents_by_block(&rmaps));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn record_count_matches_appends(
        records in pair_records_with_ties(500),
        config in small_config_strategy(8),
    ) {
        let mut slab = slab_for::<PairRecord>(config);
        for (i, record) in records.iter().enumerate() {
            slab.push_record(record).unwrap();
            prop_assert_eq!(slab.record_count(), i as u64 + 1);
        }
        let stats = slab.stats();
        prop_assert_eq!(stats.record_count, records.len() as u64);
        prop_assert!(stats.capacity >= stats.record_count);
    }

    #[test]
    fn capacities_follow_growth_law(
        records in 0usize..3000,
        config in small_config_strategy(8),
    ) {
        let mut slab = slab_for::<PairRecord>(config.clone());
        for i in 0..records {
            slab.push_record(&PairRecord::new(i as u32, 0)).unwrap();
        }
        let capacities: Vec<u32> = slab.segment_capacities().collect();
        prop_assert_eq!(&capacities, &config.capacity_plan(8, records as u64));

        let cap = (config.max_segment_bytes / 8).max(1) as u32;
        if let Some(&first) = capacities.first() {
            prop_assert_eq!(first, config.min_capacity.min(cap).max(1));
        }
        for pair in capacities.windows(2) {
            prop_assert_eq!(pair[1], (pair[0] * 2).min(cap).max(1));
        }
    }

    #[test]
    fn append_order_survives_any_segmentation(
        records in pair_records_with_ties(400),
        config in small_config_strategy(8),
    ) {
        let mut harness = SlabHarness::with_config(config);
        for record in records {
            harness.push(record);
        }
        harness.verify_append_order();
    }

    #[test]
    fn merge_is_sorted_and_complete(
        records in prop::collection::vec(pair_record_strategy(), 0..400),
        config in small_config_strategy(8),
    ) {
        let mut harness = SlabHarness::with_config(config);
        for record in records {
            harness.push(record);
        }
        harness.verify_sorted(PairRecord::compare);
    }

    #[test]
    fn rmap_merge_is_sorted(
        rmaps in prop::collection::vec(rmap_record_strategy(), 0..300),
    ) {
        let mut harness = SlabHarness::with_config(SlabConfig::new().min_capacity(3));
        for rmap in rmaps {
            harness.push(rmap);
        }
        harness.verify_sorted(RmapRecord::compare);
    }
}
