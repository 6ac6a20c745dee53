//! Cross-crate integration test helpers.
//!
//! Provides a harness that mirrors every appended record so cursor output
//! can be checked against what went in, plus free-standing checks for
//! order and multiset equality.

use slabkit_core::{FixedRecord, Slab, SlabConfig, SlabCursor, SortedSlab};
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::fixtures::{encode, slab_for};

/// A slab plus a shadow copy of everything appended to it.
pub struct SlabHarness<T> {
    slab: Slab,
    expected: Vec<T>,
}

impl<T: FixedRecord + PartialEq + Debug> SlabHarness<T> {
    /// Creates a harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(SlabConfig::default())
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: SlabConfig) -> Self {
        Self {
            slab: slab_for::<T>(config),
            expected: Vec::new(),
        }
    }

    /// Appends a record and remembers it.
    pub fn push(&mut self, record: T) {
        self.slab
            .push_record(&record)
            .expect("Failed to append record");
        self.expected.push(record);
    }

    /// Returns the slab under test.
    pub fn slab(&self) -> &Slab {
        &self.slab
    }

    /// Returns the records appended so far, in order.
    pub fn expected(&self) -> &[T] {
        &self.expected
    }

    /// Checks that an append-order cursor reproduces the appended sequence.
    pub fn verify_append_order(&self) {
        let mut cursor = self.slab.cursor().expect("Failed to open cursor");
        let mut seen = Vec::with_capacity(self.expected.len());
        while let Some(record) = cursor.pop_record::<T>().expect("Record size mismatch") {
            seen.push(record);
        }
        assert_eq!(seen, self.expected, "append order not preserved");
        assert_eq!(self.slab.record_count(), self.expected.len() as u64);
    }

    /// Sorts the slab and checks the merge cursor's output.
    ///
    /// The output must be non-decreasing under `compare` and hold exactly
    /// the appended records. Returns the sorted slab for further checks.
    pub fn verify_sorted<F>(self, compare: F) -> SortedSlab<F>
    where
        F: Fn(&[u8], &[u8]) -> Ordering + Sync + Clone,
    {
        let appended: Vec<Vec<u8>> = self.expected.iter().map(encode).collect();
        let sorted = self.slab.sort_by(compare.clone());

        let popped = drain(sorted.cursor().expect("Failed to open cursor"));
        assert_non_decreasing(&popped, &compare);
        assert!(
            same_multiset(&popped, &appended),
            "merge lost or duplicated records"
        );
        sorted
    }
}

impl<T: FixedRecord + PartialEq + Debug> Default for SlabHarness<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pops every remaining record into owned buffers.
pub fn drain(cursor: SlabCursor<'_>) -> Vec<Vec<u8>> {
    cursor.map(<[u8]>::to_vec).collect()
}

/// Panics if any adjacent pair is out of order under `compare`.
pub fn assert_non_decreasing<R, F>(records: &[R], compare: F)
where
    R: AsRef<[u8]>,
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    for (index, pair) in records.windows(2).enumerate() {
        assert_ne!(
            compare(pair[0].as_ref(), pair[1].as_ref()),
            Ordering::Greater,
            "records {} and {} are out of order",
            index,
            index + 1
        );
    }
}

/// Returns `true` if both lists hold the same records with the same counts.
pub fn same_multiset<A, B>(left: &[A], right: &[B]) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    if left.len() != right.len() {
        return false;
    }
    let mut left: Vec<&[u8]> = left.iter().map(AsRef::as_ref).collect();
    let mut right: Vec<&[u8]> = right.iter().map(AsRef::as_ref).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{tiny_segments, PairRecord};

    #[test]
    fn harness_tracks_appends() {
        let mut harness = SlabHarness::with_config(tiny_segments());
        for i in (0..50).rev() {
            harness.push(PairRecord::new(i, i * 2));
        }
        assert_eq!(harness.expected().len(), 50);
        harness.verify_append_order();
        let sorted = harness.verify_sorted(PairRecord::compare_keys);
        assert_eq!(sorted.record_count(), 50);
    }

    #[test]
    fn multiset_detects_duplicates() {
        let a = vec![vec![1u8], vec![2], vec![2]];
        let b = vec![vec![2u8], vec![1], vec![2]];
        let c = vec![vec![1u8], vec![1], vec![2]];
        assert!(same_multiset(&a, &b));
        assert!(!same_multiset(&a, &c));
        assert!(!same_multiset(&a, &b[..2]));
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn order_check_catches_inversions() {
        let records = vec![vec![1u8], vec![3], vec![2]];
        assert_non_decreasing(&records, |a: &[u8], b: &[u8]| a.cmp(b));
    }
}
