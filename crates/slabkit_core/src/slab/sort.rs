//! Per-segment sorting.
//!
//! Every segment is sorted on its own; nothing here produces a single
//! globally ordered sequence. The merge cursor turns the sorted segments
//! into one ordered stream.
//!
//! Small stores are sorted on the calling thread. Larger ones get a worker
//! pool with one job per segment; jobs touch only their own segment, so the
//! only synchronization is the join at the end of the pool scope.

use crate::config::SlabConfig;
use crate::slab::segment::Segment;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// How a sort was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// All segments were sorted on the calling thread.
    Sequential,
    /// Segments were sorted as independent jobs on a worker pool.
    Parallel {
        /// Worker threads in the pool.
        threads: usize,
    },
}

/// Summary of a completed sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortReport {
    /// Execution strategy used.
    pub mode: SortMode,
    /// Number of segments sorted.
    pub segments: usize,
    /// Number of records sorted.
    pub records: u64,
    /// Wall-clock time spent sorting.
    pub elapsed: Duration,
}

/// Sorts each segment in place and blocks until all of them are done.
pub(crate) fn sort_segments<F>(
    segments: &mut [Segment],
    compare: &F,
    config: &SlabConfig,
    records: u64,
) -> SortReport
where
    F: Fn(&[u8], &[u8]) -> Ordering + Sync,
{
    let start = Instant::now();
    let mode = if segments.len() <= config.parallel_threshold {
        sort_sequential(segments, compare);
        SortMode::Sequential
    } else {
        sort_parallel(segments, compare, config.worker_threads())
    };

    let report = SortReport {
        mode,
        segments: segments.len(),
        records,
        elapsed: start.elapsed(),
    };
    tracing::debug!(
        segments = report.segments,
        records = report.records,
        mode = ?report.mode,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "sorted slab segments"
    );
    report
}

fn sort_sequential<F>(segments: &mut [Segment], compare: &F)
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    for segment in segments.iter_mut() {
        segment.sort_by(compare);
    }
}

fn sort_parallel<F>(segments: &mut [Segment], compare: &F, threads: usize) -> SortMode
where
    F: Fn(&[u8], &[u8]) -> Ordering + Sync,
{
    let threads = threads.clamp(1, segments.len().max(1));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("slab-sort-{index}"))
        .build();

    let pool = match pool {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(
                error = %err,
                segments = segments.len(),
                "could not start sort workers, sorting on the calling thread"
            );
            sort_sequential(segments, compare);
            return SortMode::Sequential;
        }
    };

    tracing::debug!(threads, segments = segments.len(), "sorting segments in parallel");
    pool.scope(|scope| {
        for segment in segments.iter_mut() {
            scope.spawn(move |_| segment.sort_by(compare));
        }
    });

    SortMode::Parallel { threads }
}
