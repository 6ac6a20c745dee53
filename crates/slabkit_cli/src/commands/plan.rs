//! Plan command implementation.

use super::Format;
use crate::error::CliResult;
use serde::Serialize;
use slabkit_core::{SlabConfig, SlabError};

/// One planned segment.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Record slots.
    pub capacity: u32,
    /// Bytes reserved for the segment.
    pub bytes: u64,
    /// Records placed in this segment.
    pub records: u64,
}

/// Segment layout for a given record count.
#[derive(Debug, Serialize)]
pub struct PlanResult {
    /// Record size in bytes.
    pub item_size: usize,
    /// Records to hold.
    pub records: u64,
    /// Segments in allocation order.
    pub segments: Vec<SegmentPlan>,
    /// Slots across all segments.
    pub total_capacity: u64,
    /// Bytes across all segments.
    pub total_bytes: u64,
}

/// Computes the segments a slab would allocate for `records` items.
///
/// # Errors
///
/// Returns an error if the record size or configuration is invalid.
pub fn plan(config: &SlabConfig, item_size: usize, records: u64) -> CliResult<PlanResult> {
    if item_size == 0 {
        return Err(SlabError::InvalidItemSize { size: item_size }.into());
    }
    config.validate()?;

    let mut left = records;
    let segments: Vec<SegmentPlan> = config
        .capacity_plan(item_size, records)
        .into_iter()
        .map(|capacity| {
            let placed = left.min(u64::from(capacity));
            left -= placed;
            SegmentPlan {
                capacity,
                bytes: u64::from(capacity) * item_size as u64,
                records: placed,
            }
        })
        .collect();

    Ok(PlanResult {
        item_size,
        records,
        total_capacity: segments.iter().map(|s| u64::from(s.capacity)).sum(),
        total_bytes: segments.iter().map(|s| s.bytes).sum(),
        segments,
    })
}

/// Runs the plan command.
pub fn run(
    config: &SlabConfig,
    item_size: usize,
    records: u64,
    format: Format,
) -> CliResult<()> {
    let result = plan(config, item_size, records)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => {
            println!(
                "{} records of {} bytes need {} segments",
                result.records,
                result.item_size,
                result.segments.len()
            );
            println!();
            println!("{:>5}  {:>12}  {:>12}  {:>14}", "#", "capacity", "records", "bytes");
            for (index, segment) in result.segments.iter().enumerate() {
                println!(
                    "{:>5}  {:>12}  {:>12}  {:>14}",
                    index, segment.capacity, segment.records, segment.bytes
                );
            }
            println!();
            println!(
                "Total: {} slots, {} bytes",
                result.total_capacity, result.total_bytes
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn plan_matches_default_growth() {
        let result = plan(&SlabConfig::default(), 8, 5000).unwrap();
        let capacities: Vec<u32> = result.segments.iter().map(|s| s.capacity).collect();
        assert_eq!(capacities, vec![4096, 8192]);
        assert_eq!(result.segments[1].records, 904);
        assert_eq!(result.total_capacity, 12288);
        assert_eq!(result.total_bytes, 12288 * 8);
    }

    #[test]
    fn plan_respects_byte_cap() {
        let config = SlabConfig::new().min_capacity(4).max_segment_bytes(80);
        let result = plan(&config, 8, 40).unwrap();
        let capacities: Vec<u32> = result.segments.iter().map(|s| s.capacity).collect();
        assert_eq!(capacities, vec![4, 8, 10, 10, 10]);
        assert_eq!(result.segments.last().unwrap().records, 8);
    }

    #[test]
    fn empty_plan_has_no_segments() {
        let result = plan(&SlabConfig::default(), 8, 0).unwrap();
        assert!(result.segments.is_empty());
        assert_eq!(result.total_bytes, 0);
    }

    #[test]
    fn zero_item_size_is_rejected() {
        let err = plan(&SlabConfig::default(), 0, 10).unwrap_err();
        assert!(matches!(
            err,
            CliError::Slab(SlabError::InvalidItemSize { size: 0 })
        ));
    }
}
