//! Slab arrays.
//!
//! A slab is a growable linear array of fixed-size records stored as a list
//! of segments of increasing size. Segments are sorted individually, so the
//! whole array is always read through a cursor, in append order or merged
//! into sorted order.
//!
//! ## Growth
//!
//! ```text
//! segment 0: min_capacity slots
//! segment n: min(2 * slots(n - 1), max_segment_bytes / item_size) slots, at least 1
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Slab::new --append*--> Slab --sort_by--> SortedSlab --cursor--> SlabCursor (merge)
//!                          \--cursor--> SlabCursor (append order)
//! ```

mod cursor;
mod segment;
mod sort;
mod store;

pub use cursor::{Compare, CursorMode, SlabCursor};
pub use sort::{SortMode, SortReport};
pub use store::{Slab, SortedSlab};
