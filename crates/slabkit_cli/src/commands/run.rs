//! Run command implementation.
//!
//! Fills one slab per producer thread with random keyed records, sorts each
//! slab, drains the merge cursor and checks that every record came back in
//! order.

use super::{millis, Format};
use crate::error::{CliError, CliResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use slabkit_core::{FixedRecord, Slab, SlabConfig, SortMode};
use slabkit_storage::{BudgetAllocator, SegmentAllocator, SystemAllocator};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Parameters for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Total records across all producers.
    pub records: usize,
    /// Producer threads, each with its own slab.
    pub producers: usize,
    /// Generator seed; producer `i` uses `seed + i`.
    pub seed: u64,
    /// Byte budget shared by every slab, if any.
    pub memory_limit: Option<usize>,
    /// Slab configuration.
    pub config: SlabConfig,
}

/// What happened to one producer's slab.
#[derive(Debug, Serialize)]
pub struct ProducerResult {
    /// Producer index.
    pub producer: usize,
    /// Records appended and popped back.
    pub records: u64,
    /// Segments allocated.
    pub segments: usize,
    /// Bytes reserved for segment data.
    pub bytes_reserved: usize,
    /// Fraction of reserved slots in use.
    pub utilization: f64,
    /// `sequential` or `parallel`.
    pub sort_mode: &'static str,
    /// Threads used by the sort.
    pub sort_threads: usize,
    /// Time spent sorting.
    pub sort_ms: f64,
    /// Time spent draining the merge cursor.
    pub merge_ms: f64,
}

/// Outcome of a run.
#[derive(Debug, Serialize)]
pub struct RunResult {
    /// Records across all producers.
    pub total_records: u64,
    /// Time spent appending, all producers together.
    pub append_ms: f64,
    /// Bytes held by the allocator once every producer finished.
    pub reserved_bytes: usize,
    /// Per-producer results, in producer order.
    pub producers: Vec<ProducerResult>,
}

/// Records are a big-endian `u64`: a random key in the high half and the
/// producer index in the low half, so byte order is numeric order.
fn compare_records(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

fn producer_share(total: usize, producers: usize, index: usize) -> usize {
    total / producers + usize::from(index < total % producers)
}

fn fill(
    config: SlabConfig,
    allocator: Arc<dyn SegmentAllocator>,
    count: usize,
    seed: u64,
    producer: u32,
) -> CliResult<Slab> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut slab = Slab::with_allocator(<u64 as FixedRecord>::SIZE, config, allocator)?;
    for _ in 0..count {
        let record = (u64::from(rng.gen::<u32>()) << 32) | u64::from(producer);
        slab.push_record(&record)?;
    }
    Ok(slab)
}

/// Sorts one producer's slab and verifies the merged output.
fn sort_and_verify(producer: usize, slab: Slab) -> CliResult<ProducerResult> {
    let stats = slab.stats();
    let sorted = slab.sort_by(compare_records);
    let report = *sorted.report();

    let start = Instant::now();
    let mut cursor = sorted.cursor()?;
    let mut previous: Option<u64> = None;
    let mut popped = 0u64;
    while let Some(record) = cursor.pop_record::<u64>()? {
        if previous.is_some_and(|prev| prev > record) {
            return Err(CliError::verification(
                producer,
                format!("record {popped} is smaller than its predecessor"),
            ));
        }
        if record & u64::from(u32::MAX) != producer as u64 {
            return Err(CliError::verification(
                producer,
                format!("record {popped} belongs to another producer"),
            ));
        }
        previous = Some(record);
        popped += 1;
    }
    let merge_elapsed = start.elapsed();

    if popped != stats.record_count {
        return Err(CliError::verification(
            producer,
            format!("appended {} records, popped {popped}", stats.record_count),
        ));
    }
    info!(producer, records = popped, "Producer output verified");

    let (sort_mode, sort_threads) = match report.mode {
        SortMode::Sequential => ("sequential", 1),
        SortMode::Parallel { threads } => ("parallel", threads),
    };
    Ok(ProducerResult {
        producer,
        records: popped,
        segments: stats.segment_count,
        bytes_reserved: stats.bytes_reserved,
        utilization: stats.utilization(),
        sort_mode,
        sort_threads,
        sort_ms: millis(report.elapsed),
        merge_ms: millis(merge_elapsed),
    })
}

/// Appends, sorts and verifies without printing anything.
///
/// # Errors
///
/// Returns an error if a slab cannot grow, a producer panics or the merged
/// output is wrong.
pub fn execute(options: &RunOptions) -> CliResult<RunResult> {
    options.config.validate()?;
    let allocator: Arc<dyn SegmentAllocator> = match options.memory_limit {
        Some(limit) => Arc::new(BudgetAllocator::with_system(limit)),
        None => Arc::new(SystemAllocator::new()),
    };
    let producers = options.producers.max(1);

    let start = Instant::now();
    let slabs = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..producers)
            .map(|index| {
                let count = producer_share(options.records, producers, index);
                let seed = options.seed.wrapping_add(index as u64);
                let config = options.config.clone();
                let allocator = Arc::clone(&allocator);
                scope.spawn(move || fill(config, allocator, count, seed, index as u32))
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(CliError::ProducerPanicked { index }))
            })
            .collect::<CliResult<Vec<Slab>>>()
    })?;
    let append_elapsed = start.elapsed();
    let reserved_bytes = allocator.allocated();
    info!(
        producers,
        records = options.records,
        bytes = reserved_bytes,
        "Appends finished"
    );

    let results = slabs
        .into_iter()
        .enumerate()
        .map(|(producer, slab)| sort_and_verify(producer, slab))
        .collect::<CliResult<Vec<_>>>()?;

    Ok(RunResult {
        total_records: results.iter().map(|r| r.records).sum(),
        append_ms: millis(append_elapsed),
        reserved_bytes,
        producers: results,
    })
}

/// Runs the run command.
pub fn run(options: &RunOptions, format: Format) -> CliResult<()> {
    let result = execute(options)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => {
            println!(
                "Appended {} records across {} producers in {:.1} ms ({} bytes reserved)",
                result.total_records,
                result.producers.len(),
                result.append_ms,
                result.reserved_bytes
            );
            println!();
            for p in &result.producers {
                println!(
                    "Producer {}: {} records in {} segments ({:.1}% used)",
                    p.producer,
                    p.records,
                    p.segments,
                    p.utilization * 100.0
                );
                println!(
                    "  sorted {} ({} threads) in {:.1} ms, merged in {:.1} ms",
                    p.sort_mode, p.sort_threads, p.sort_ms, p.merge_ms
                );
            }
            println!();
            println!("✓ Merged output verified");
        }
    }

    Ok(())
}
