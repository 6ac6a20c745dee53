//! Record fixtures and slab helpers.
//!
//! Records here mimic what repair actually feeds the slab: small
//! little-endian structs whose comparators decode fields instead of
//! comparing raw bytes.

use slabkit_core::{FixedRecord, Slab, SlabConfig};
use std::cmp::Ordering;

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}

/// An 8-byte record of two 4-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairRecord {
    /// Sort key.
    pub key: u32,
    /// Payload; often used to tag the producer or append position.
    pub value: u32,
}

impl PairRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(key: u32, value: u32) -> Self {
        Self { key, value }
    }

    /// Orders encoded records by `key` only.
    pub fn compare_keys(a: &[u8], b: &[u8]) -> Ordering {
        read_u32(a, 0).cmp(&read_u32(b, 0))
    }

    /// Orders encoded records by `key`, then `value`.
    pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
        Self::compare_keys(a, b).then_with(|| read_u32(a, 4).cmp(&read_u32(b, 4)))
    }
}

impl FixedRecord for PairRecord {
    const SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.key.to_le_bytes());
        buf[4..8].copy_from_slice(&self.value.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            key: read_u32(buf, 0),
            value: read_u32(buf, 4),
        }
    }
}

/// A 24-byte reverse-mapping record: which owner holds which blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RmapRecord {
    /// First block of the extent.
    pub start_block: u32,
    /// Length of the extent in blocks.
    pub block_count: u32,
    /// Owning inode or metadata owner code.
    pub owner: u64,
    /// Logical offset of the extent within the owner.
    pub offset: u64,
}

impl RmapRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(start_block: u32, block_count: u32, owner: u64, offset: u64) -> Self {
        Self {
            start_block,
            block_count,
            owner,
            offset,
        }
    }

    /// One past the last block of the extent.
    #[must_use]
    pub const fn end_block(&self) -> u32 {
        self.start_block + self.block_count
    }

    /// Orders encoded records by start block, owner, then offset.
    pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
        read_u32(a, 0)
            .cmp(&read_u32(b, 0))
            .then_with(|| read_u64(a, 8).cmp(&read_u64(b, 8)))
            .then_with(|| read_u64(a, 16).cmp(&read_u64(b, 16)))
    }
}

impl FixedRecord for RmapRecord {
    const SIZE: usize = 24;

    fn encode(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.start_block.to_le_bytes());
        buf[4..8].copy_from_slice(&self.block_count.to_le_bytes());
        buf[8..16].copy_from_slice(&self.owner.to_le_bytes());
        buf[16..24].copy_from_slice(&self.offset.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            start_block: read_u32(buf, 0),
            block_count: read_u32(buf, 4),
            owner: read_u64(buf, 8),
            offset: read_u64(buf, 16),
        }
    }
}

/// A configuration with tiny segments so small tests cross many boundaries.
#[must_use]
pub fn tiny_segments() -> SlabConfig {
    SlabConfig::new().min_capacity(4).max_segment_bytes(64 * 8)
}

/// Creates a slab for `T` with the given configuration.
pub fn slab_for<T: FixedRecord>(config: SlabConfig) -> Slab {
    Slab::with_config(T::SIZE, config).expect("Failed to create slab")
}

/// Creates a slab for `T` and appends every record.
pub fn slab_with<T: FixedRecord>(config: SlabConfig, records: &[T]) -> Slab {
    let mut slab = slab_for::<T>(config);
    for record in records {
        slab.push_record(record).expect("Failed to append record");
    }
    slab
}

/// Encodes a typed record into a fresh buffer.
pub fn encode<T: FixedRecord>(record: &T) -> Vec<u8> {
    let mut buf = vec![0u8; T::SIZE];
    record.encode(&mut buf);
    buf
}
