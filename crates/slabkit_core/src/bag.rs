//! Unordered bags.
//!
//! A bag is the slab's companion collection: items can be added and removed
//! in any order, and the current contents iterated. Repair uses one to hold
//! the reverse mappings that overlap the block being processed while the
//! sorted mapping stream is turned into reference counts.
//!
//! Removal swaps the last item into the vacated slot, so it is O(1) and
//! does not preserve order.

use crate::error::{SlabError, SlabResult};

/// Slots reserved by the first growth of a bag.
pub const MIN_BAG_SIZE: usize = 4096;

/// An unordered collection with fallible growth.
///
/// # Example
///
/// ```rust
/// use slabkit_core::Bag;
///
/// let mut bag = Bag::new();
/// bag.add(10u32).unwrap();
/// bag.add(20).unwrap();
/// bag.add(30).unwrap();
///
/// assert_eq!(bag.remove(0), Some(10));
/// assert_eq!(bag.len(), 2);
/// // The last item moved into the freed slot.
/// assert_eq!(bag.get(0), Some(&30));
/// ```
#[derive(Debug, Clone)]
pub struct Bag<T> {
    items: Vec<T>,
}

impl<T> Default for Bag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bag<T> {
    /// Creates an empty bag. Nothing is allocated until the first add.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds an item.
    ///
    /// When full the bag doubles, starting from [`MIN_BAG_SIZE`] slots.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::OutOfMemory`] if the bag could not grow. The
    /// bag is unchanged.
    pub fn add(&mut self, item: T) -> SlabResult<()> {
        if self.items.len() == self.items.capacity() {
            let grow = self.items.capacity().max(MIN_BAG_SIZE);
            self.items
                .try_reserve_exact(grow)
                .map_err(|_| SlabError::OutOfMemory {
                    requested: self.items.len().saturating_add(grow),
                })?;
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes the item at `index`, moving the last item into its place.
    ///
    /// Returns `None` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.swap_remove(index))
    }

    /// Keeps only the items for which `keep` returns `true`.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the bag holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes every item, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a Bag<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bag_is_empty() {
        let bag: Bag<u64> = Bag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.len(), 0);
        assert!(bag.get(0).is_none());
    }

    #[test]
    fn first_add_reserves_minimum() {
        let mut bag = Bag::new();
        bag.add(1u8).unwrap();
        assert!(bag.items.capacity() >= MIN_BAG_SIZE);
    }

    #[test]
    fn grows_past_minimum() {
        let mut bag = Bag::new();
        for i in 0..(MIN_BAG_SIZE * 3) {
            bag.add(i).unwrap();
        }
        assert_eq!(bag.len(), MIN_BAG_SIZE * 3);
        assert_eq!(bag.get(MIN_BAG_SIZE * 2), Some(&(MIN_BAG_SIZE * 2)));
    }

    #[test]
    fn remove_swaps_in_last() {
        let mut bag = Bag::new();
        for i in 0..5 {
            bag.add(i).unwrap();
        }
        assert_eq!(bag.remove(1), Some(1));
        let items: Vec<i32> = bag.iter().copied().collect();
        assert_eq!(items, vec![0, 4, 2, 3]);
    }

    #[test]
    fn remove_out_of_range() {
        let mut bag = Bag::new();
        bag.add('a').unwrap();
        assert_eq!(bag.remove(1), None);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn retain_and_clear() {
        let mut bag = Bag::new();
        for i in 0..10 {
            bag.add(i).unwrap();
        }
        bag.retain(|&i| i % 2 == 0);
        assert_eq!(bag.len(), 5);
        assert!((&bag).into_iter().all(|i| i % 2 == 0));

        bag.clear();
        assert!(bag.is_empty());
    }
}
