//! Benchmark utilities.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slabkit_core::{Slab, SlabConfig};
use slabkit_testkit::PairRecord;

/// Generate `count` pair records with random keys.
pub fn random_pairs(count: usize, seed: u64) -> Vec<PairRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| PairRecord::new(rng.gen(), i as u32))
        .collect()
}

/// Build a slab holding `records`, in order.
pub fn filled_slab(config: SlabConfig, records: &[PairRecord]) -> Slab {
    let mut slab = Slab::with_config(8, config).expect("valid bench config");
    for record in records {
        slab.push_record(record).expect("bench append failed");
    }
    slab
}
