//! Single-pass slab cursor.
//!
//! A cursor keeps one read offset per segment (a sub-cursor) and walks the
//! store in one of two modes:
//!
//! - **Append order** (no comparator): segments are drained one after the
//!   other, reproducing the order records were appended in.
//! - **Merge** (comparator): every step scans the head record of each
//!   segment and yields the smallest, a k-way merge over segments that were
//!   each sorted beforehand. Ties go to the earliest segment.
//!
//! `peek` remembers which sub-cursor produced the record it returned;
//! `advance` moves exactly that sub-cursor forward and forgets it. An
//! `advance` without a pending `peek` is rejected instead of moving an
//! arbitrary sub-cursor.
//!
//! Once every sub-cursor is drained the cursor is exhausted for good;
//! further `peek`/`pop` calls keep returning `None`.

use crate::error::{SlabError, SlabResult};
use crate::record::FixedRecord;
use crate::slab::segment::Segment;
use std::cmp::Ordering;

/// Comparator shape accepted by merge cursors.
pub type Compare<'a> = &'a (dyn Fn(&[u8], &[u8]) -> Ordering + Sync);

/// How a cursor orders the records it yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Records come out in the order they were appended.
    AppendOrder,
    /// Records come out in comparator order.
    Merge,
}

/// A forward-only reader over a slab's records.
///
/// Obtained from [`Slab::cursor`](crate::Slab::cursor) or
/// [`SortedSlab::cursor`](crate::SortedSlab::cursor). The cursor borrows the
/// store, so the store can be neither appended to nor re-sorted while the
/// cursor is alive. Any number of cursors may read the same store at once.
///
/// # Example
///
/// ```rust
/// use slabkit_core::Slab;
///
/// let mut slab = Slab::new(1).unwrap();
/// slab.append(&[7]).unwrap();
///
/// let mut cursor = slab.cursor().unwrap();
/// assert_eq!(cursor.peek(), Some(&[7u8][..]));
/// cursor.advance().unwrap();
/// assert_eq!(cursor.pop(), None);
/// assert!(cursor.advance().is_err());
/// ```
pub struct SlabCursor<'a> {
    /// The store's segments; sub-cursor `i` reads `segments[i]`.
    segments: &'a [Segment],
    /// Next unread slot of each sub-cursor.
    offsets: Vec<usize>,
    compare: Option<Compare<'a>>,
    /// Sub-cursor that produced the last peeked record.
    producer: Option<usize>,
    /// Sub-cursors before this index are drained (append order only).
    first_live: usize,
    item_size: usize,
    remaining: u64,
}

impl<'a> SlabCursor<'a> {
    pub(crate) fn open(
        segments: &'a [Segment],
        item_size: usize,
        compare: Option<Compare<'a>>,
    ) -> SlabResult<Self> {
        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(segments.len())
            .map_err(|_| SlabError::OutOfMemory {
                requested: segments.len(),
            })?;
        offsets.resize(segments.len(), 0);

        let remaining = segments.iter().map(|s| s.used() as u64).sum();
        let cursor = Self {
            segments,
            offsets,
            compare,
            producer: None,
            first_live: 0,
            item_size,
            remaining,
        };
        tracing::trace!(
            mode = ?cursor.mode(),
            sub_cursors = segments.len(),
            remaining,
            "opened slab cursor"
        );
        Ok(cursor)
    }

    /// Returns the ordering this cursor yields records in.
    #[must_use]
    pub fn mode(&self) -> CursorMode {
        if self.compare.is_some() {
            CursorMode::Merge
        } else {
            CursorMode::AppendOrder
        }
    }

    /// Returns the next record without consuming it.
    ///
    /// The sub-cursor that produced the record is remembered so that a
    /// following [`advance`](Self::advance) consumes exactly this record.
    /// Returns `None` once every segment has been drained.
    pub fn peek(&mut self) -> Option<&'a [u8]> {
        self.producer = None;
        let segments = self.segments;

        let Some(compare) = self.compare else {
            while self.first_live < segments.len() {
                let index = self.first_live;
                if let Some(record) = segments[index].record(self.offsets[index]) {
                    self.producer = Some(index);
                    return Some(record);
                }
                self.first_live += 1;
            }
            return None;
        };

        let mut best: Option<(usize, &'a [u8])> = None;
        for (index, segment) in segments.iter().enumerate() {
            let Some(record) = segment.record(self.offsets[index]) else {
                continue;
            };
            match best {
                Some((_, current)) if compare(current, record) != Ordering::Greater => {}
                _ => best = Some((index, record)),
            }
        }

        let (index, record) = best?;
        self.producer = Some(index);
        Some(record)
    }

    /// Consumes the record returned by the preceding [`peek`](Self::peek).
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::CursorNotPositioned`] if there is no pending
    /// peeked record: `peek` was never called, returned `None`, or its record
    /// was already consumed.
    pub fn advance(&mut self) -> SlabResult<()> {
        let index = self.producer.take().ok_or(SlabError::CursorNotPositioned)?;
        self.step(index);
        Ok(())
    }

    /// Returns the next record and consumes it.
    pub fn pop(&mut self) -> Option<&'a [u8]> {
        let record = self.peek()?;
        if let Some(index) = self.producer.take() {
            self.step(index);
        }
        Some(record)
    }

    /// Pops the next record and decodes it as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::RecordSizeMismatch`] if `T::SIZE` differs from
    /// the store's item size.
    pub fn pop_record<T: FixedRecord>(&mut self) -> SlabResult<Option<T>> {
        if T::SIZE != self.item_size {
            return Err(SlabError::record_size_mismatch(self.item_size, T::SIZE));
        }
        Ok(self.pop().map(T::decode))
    }

    /// Returns the number of records not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns `true` once every record has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Releases the cursor. The store and its segments are not affected.
    pub fn close(self) {}

    fn step(&mut self, index: usize) {
        self.offsets[index] += 1;
        self.remaining -= 1;
    }
}

impl<'a> Iterator for SlabCursor<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl std::fmt::Debug for SlabCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlabCursor")
            .field("mode", &self.mode())
            .field("sub_cursors", &self.offsets.len())
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
