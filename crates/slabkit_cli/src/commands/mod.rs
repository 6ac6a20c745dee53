//! CLI command implementations.

pub mod plan;
pub mod run;

use clap::{Args, ValueEnum};
use slabkit_core::SlabConfig;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Slab tuning flags shared by `run` and `plan`.
#[derive(Debug, Clone, Default, Args)]
pub struct SlabArgs {
    /// Record slots in the first segment
    #[arg(long)]
    pub min_capacity: Option<u32>,

    /// Upper bound on the bytes of one segment
    #[arg(long)]
    pub max_segment_bytes: Option<usize>,

    /// Sort on the calling thread at or below this many segments
    #[arg(long)]
    pub parallel_threshold: Option<usize>,

    /// Worker threads for parallel sorting
    #[arg(long)]
    pub threads: Option<usize>,
}

impl SlabArgs {
    /// Applies the flags that were given on top of the default configuration.
    pub fn to_config(&self) -> SlabConfig {
        let mut config = SlabConfig::new();
        if let Some(slots) = self.min_capacity {
            config = config.min_capacity(slots);
        }
        if let Some(bytes) = self.max_segment_bytes {
            config = config.max_segment_bytes(bytes);
        }
        if let Some(segments) = self.parallel_threshold {
            config = config.parallel_threshold(segments);
        }
        if let Some(threads) = self.threads {
            config = config.sort_threads(threads);
        }
        config
    }
}

/// Converts a duration to fractional milliseconds for reports.
fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
