//! Stress helpers for slabkit.
//!
//! These helpers drive the one-store-per-producer pattern: several threads
//! each fill their own slab, and the results are sorted and checked after
//! every producer has finished.

use crate::fixtures::PairRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slabkit_core::{Slab, SlabConfig, SlabResult};
use std::time::{Duration, Instant};

/// Configuration for a multi-producer run.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Total records across all producers.
    pub records: usize,
    /// Number of producer threads, each with its own slab.
    pub producers: usize,
    /// Seed for the record generator; producer `i` uses `seed + i`.
    pub seed: u64,
    /// Slab configuration for every producer.
    pub slab: SlabConfig,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            records: 10_000,
            producers: 3,
            seed: 0x5eed,
            slab: SlabConfig::default(),
        }
    }
}

/// Result of a multi-producer run.
#[derive(Debug)]
pub struct ProducerRun {
    /// One slab per producer, in producer order.
    pub slabs: Vec<Slab>,
    /// Time spent appending.
    pub duration: Duration,
}

impl ProducerRun {
    /// Total records across all slabs.
    pub fn total_records(&self) -> u64 {
        self.slabs.iter().map(Slab::record_count).sum()
    }
}

/// Number of records producer `index` appends when `total` is split `producers` ways.
///
/// The remainder goes to the first producers, one extra each.
pub fn producer_share(total: usize, producers: usize, index: usize) -> usize {
    let base = total / producers;
    base + usize::from(index < total % producers)
}

/// Fills one slab per producer thread with random [`PairRecord`]s.
///
/// Each record's `value` is the producer index.
///
/// # Errors
///
/// Returns the first slab error any producer hit.
pub fn run_producers(config: &ProducerConfig) -> SlabResult<ProducerRun> {
    let producers = config.producers.max(1);
    let start = Instant::now();

    let results: Vec<SlabResult<Slab>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..producers)
            .map(|index| {
                let count = producer_share(config.records, producers, index);
                let seed = config.seed.wrapping_add(index as u64);
                let slab_config = config.slab.clone();
                scope.spawn(move || fill_random(slab_config, count, seed, index as u32))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("producer thread panicked"))
            .collect()
    });

    let slabs = results.into_iter().collect::<SlabResult<Vec<_>>>()?;
    Ok(ProducerRun {
        slabs,
        duration: start.elapsed(),
    })
}

/// Builds one slab of `count` random pair records tagged with `producer`.
///
/// # Errors
///
/// Returns an error if the slab cannot be created or grown.
pub fn fill_random(config: SlabConfig, count: usize, seed: u64, producer: u32) -> SlabResult<Slab> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut slab = Slab::with_config(8, config)?;
    for _ in 0..count {
        slab.push_record(&PairRecord::new(rng.gen(), producer))?;
    }
    Ok(slab)
}
