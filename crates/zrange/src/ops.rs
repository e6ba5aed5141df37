//! Support operations for curve calculation.
//!
//! Everything here is generic over [`CurveWord`], so each shift is done in
//! the width of the address type itself rather than in some narrower
//! intermediate integer.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr},
};

/// Keeps [`CurveWord`] closed to the unsigned types implemented below.
mod sealed {
    /// Marker implemented for every supported word type.
    pub trait Sealed {}
}

/// Unsigned integer used for both curve addresses and coordinates.
///
/// Implemented for `u16`, `u32`, `u64` and `u128`. A curve stored in a word of
/// `W` bits can hold at most `W / 2` bits per axis.
pub trait CurveWord:
    sealed::Sealed
    + Copy
    + Default
    + Ord
    + Hash
    + Debug
    + Display
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Width of the word in bits.
    const BITS: u32;
    /// All bits clear.
    const ZERO: Self;
    /// Only the lowest bit set.
    const ONE: Self;
    /// All bits set.
    const MAX: Self;

    /// Widen to `u128`, used for point and length accounting.
    fn to_u128(self) -> u128;
}

/// Implement [`CurveWord`] for primitive unsigned integers.
macro_rules! impl_curve_word {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl CurveWord for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn to_u128(self) -> u128 {
                    self as u128
                }
            }
        )*
    };
}

impl_curve_word!(u16, u32, u64, u128);

/// Mask selecting the `bits` low-order bits: `0000...0011`.
#[inline]
pub fn low_mask<T: CurveWord>(bits: u32) -> T {
    match bits {
        0 => T::ZERO,
        b if b >= T::BITS => T::MAX,
        b => !(T::MAX << b),
    }
}

/// Mask with an alternating striped pattern: `...00110011` for `stripe == 2`.
///
/// `stripe` must be a power of two smaller than the word width.
#[inline]
pub fn striped_mask<T: CurveWord>(stripe: u32) -> T {
    debug_assert!(
        stripe.is_power_of_two() && stripe < T::BITS,
        "invalid stripe length {stripe}"
    );
    let mut stripes = low_mask::<T>(stripe);
    let mut width = 2 * stripe;
    while width < T::BITS {
        stripes = stripes | (stripes << width);
        width *= 2;
    }
    stripes
}

/// Single set bit at `position`, or `None` if the word is too narrow.
#[inline]
pub fn bit<T: CurveWord>(position: u32) -> Option<T> {
    (position < T::BITS).then(|| T::ONE << position)
}

/// Spreads the low half of a word so that there is one zero between each bit.
/// (e.g., 1011 -> 1000101)
///
/// Bits in the upper half of the input are discarded.
#[inline]
pub fn spread<T: CurveWord>(value: T) -> T {
    let mut n = value & low_mask(T::BITS / 2);
    let mut shift = T::BITS / 4;
    while shift > 0 {
        n = (n ^ (n << shift)) & striped_mask(shift);
        shift /= 2;
    }
    n
}

/// Compresses the even bits of a word into its low half.
/// Inverse of [`spread`]; odd bits of the input are ignored.
#[inline]
pub fn compact<T: CurveWord>(value: T) -> T {
    let mut n = value & striped_mask(1);
    let mut shift = 1;
    while shift < T::BITS / 2 {
        n = (n ^ (n >> shift)) & striped_mask(2 * shift);
        shift *= 2;
    }
    n
}
