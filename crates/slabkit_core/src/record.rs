//! Fixed-size record encoding.
//!
//! The slab stores opaque byte records. Producers that work with typed
//! values implement [`FixedRecord`] to write them into a slot, and consumers
//! decode them on the way out of a cursor.
//!
//! The integer impls use big-endian encoding, so comparing encoded records
//! byte-wise gives the same order as comparing the numbers.

/// A value with a fixed-size binary encoding.
pub trait FixedRecord: Sized {
    /// Encoded size in bytes. Must be non-zero.
    const SIZE: usize;

    /// Writes the value into `buf`, which is exactly [`Self::SIZE`] bytes.
    fn encode(&self, buf: &mut [u8]);

    /// Reads a value from `buf`, which is exactly [`Self::SIZE`] bytes.
    fn decode(buf: &[u8]) -> Self;
}

macro_rules! be_integer_record {
    ($($ty:ty),*) => {$(
        impl FixedRecord for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn encode(&self, buf: &mut [u8]) {
                buf.copy_from_slice(&self.to_be_bytes());
            }

            fn decode(buf: &[u8]) -> Self {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(buf);
                <$ty>::from_be_bytes(bytes)
            }
        }
    )*};
}

be_integer_record!(u16, u32, u64, u128);

impl<const N: usize> FixedRecord for [u8; N] {
    const SIZE: usize = N;

    fn encode(&self, buf: &mut [u8]) {
        buf.copy_from_slice(self);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(buf);
        bytes
    }
}
