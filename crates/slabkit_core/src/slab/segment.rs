//! Fixed-capacity record segments.

use std::cmp::Ordering;

/// One contiguous block of fixed-size records.
///
/// The byte region is reserved once at creation with room for exactly
/// `capacity` records and is never reallocated: appends copy into the
/// reserved tail, and sorting permutes records inside the region.
#[derive(Debug)]
pub(crate) struct Segment {
    /// Record bytes; `data.len()` is `used * item_size`.
    data: Vec<u8>,
    item_size: usize,
    capacity: u32,
}

impl Segment {
    /// Wraps a freshly allocated region holding `capacity` records.
    pub(crate) fn new(region: Vec<u8>, item_size: usize, capacity: u32) -> Self {
        debug_assert!(region.is_empty());
        debug_assert!(region.capacity() >= item_size * capacity as usize);
        Self {
            data: region,
            item_size,
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of records written.
    pub(crate) fn used(&self) -> usize {
        self.data.len() / self.item_size
    }

    pub(crate) fn is_full(&self) -> bool {
        self.used() >= self.capacity as usize
    }

    /// Bytes reserved for this segment.
    pub(crate) fn reserved_bytes(&self) -> usize {
        self.capacity as usize * self.item_size
    }

    /// Copies a record into the next free slot.
    ///
    /// The caller guarantees the segment is not full and `record` is one item.
    pub(crate) fn push(&mut self, record: &[u8]) {
        debug_assert!(!self.is_full());
        debug_assert_eq!(record.len(), self.item_size);
        self.data.extend_from_slice(record);
    }

    /// Lets `fill` write the next free slot in place.
    ///
    /// The caller guarantees the segment is not full.
    pub(crate) fn push_with<F: FnOnce(&mut [u8])>(&mut self, fill: F) {
        debug_assert!(!self.is_full());
        let start = self.data.len();
        self.data.resize(start + self.item_size, 0);
        fill(&mut self.data[start..]);
    }

    /// Returns the record in slot `index`, if it has been written.
    pub(crate) fn record(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.item_size)?;
        self.data.get(start..start.checked_add(self.item_size)?)
    }

    /// Sorts the written records in place.
    ///
    /// Equal records keep their append order.
    pub(crate) fn sort_by<F>(&mut self, compare: &F)
    where
        F: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let used = self.used();
        if used < 2 {
            return;
        }

        let size = self.item_size;
        let data = &self.data;
        // Slot counts always fit in u32, so the permutation stays compact.
        let mut order: Vec<u32> = (0..used as u32).collect();
        order.sort_by(|&a, &b| {
            let a = a as usize * size;
            let b = b as usize * size;
            compare(&data[a..a + size], &data[b..b + size])
        });

        apply_permutation(&mut self.data, size, &mut order);
    }
}

/// Rearranges `data` so that slot `i` receives the record that was in slot `order[i]`.
///
/// Walks each cycle of the permutation once, parking a single record in a
/// scratch buffer. `order` is left as the identity.
fn apply_permutation(data: &mut [u8], size: usize, order: &mut [u32]) {
    let mut scratch = vec![0u8; size];

    for start in 0..order.len() {
        if order[start] as usize == start {
            continue;
        }

        scratch.copy_from_slice(&data[start * size..(start + 1) * size]);
        let mut dst = start;
        loop {
            let src = order[dst] as usize;
            order[dst] = dst as u32;
            if src == start {
                data[dst * size..(dst + 1) * size].copy_from_slice(&scratch);
                break;
            }
            data.copy_within(src * size..(src + 1) * size, dst * size);
            dst = src;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_with(records: &[[u8; 2]]) -> Segment {
        let capacity = records.len() as u32;
        let mut segment = Segment::new(Vec::with_capacity(records.len() * 2), 2, capacity);
        for record in records {
            segment.push(record);
        }
        segment
    }

    fn contents(segment: &Segment) -> Vec<[u8; 2]> {
        (0..segment.used())
            .map(|i| {
                let r = segment.record(i).unwrap();
                [r[0], r[1]]
            })
            .collect()
    }

    #[test]
    fn push_fills_to_capacity() {
        let mut segment = Segment::new(Vec::with_capacity(6), 2, 3);
        assert_eq!(segment.used(), 0);
        assert!(!segment.is_full());

        segment.push(&[1, 1]);
        segment.push(&[2, 2]);
        segment.push(&[3, 3]);
        assert_eq!(segment.used(), 3);
        assert!(segment.is_full());
        assert_eq!(segment.reserved_bytes(), 6);
    }

    #[test]
    fn record_past_used_is_none() {
        let segment = segment_with(&[[1, 0]]);
        assert_eq!(segment.record(0), Some(&[1u8, 0][..]));
        assert!(segment.record(1).is_none());
        assert!(segment.record(usize::MAX).is_none());
    }

    #[test]
    fn sort_orders_records() {
        let mut segment = segment_with(&[[5, 0], [1, 0], [4, 0], [2, 0], [3, 0]]);
        segment.sort_by(&|a: &[u8], b: &[u8]| a[0].cmp(&b[0]));
        assert_eq!(contents(&segment), vec![[1, 0], [2, 0], [3, 0], [4, 0], [5, 0]]);
    }

    #[test]
    fn sort_keeps_ties_in_append_order() {
        // Second byte records append position; sort only by the first.
        let mut segment = segment_with(&[[2, 0], [1, 1], [2, 2], [1, 3], [2, 4]]);
        segment.sort_by(&|a: &[u8], b: &[u8]| a[0].cmp(&b[0]));
        assert_eq!(contents(&segment), vec![[1, 1], [1, 3], [2, 0], [2, 2], [2, 4]]);
    }

    #[test]
    fn sort_reversed_input() {
        let records: Vec<[u8; 2]> = (0..200u8).rev().map(|i| [i, 255 - i]).collect();
        let mut segment = segment_with(&records);
        segment.sort_by(&|a: &[u8], b: &[u8]| a.cmp(b));
        let sorted = contents(&segment);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.len(), 200);
    }

    #[test]
    fn permutation_follows_cycles() {
        let mut data = vec![b'a', b'b', b'c', b'd'];
        let mut order = vec![2, 0, 3, 1];
        apply_permutation(&mut data, 1, &mut order);
        assert_eq!(data, vec![b'c', b'a', b'd', b'b']);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
