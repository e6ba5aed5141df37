//! The 2D Z-order (Morton) coordinate codec.

use crate::{
    decompose::{
        Classification, Decomposer, Decomposition, FragmentVisitor, JumpVisitor, Resume,
    },
    error::{Error, Result},
    fragment::{Fragment, QueryRect, Rect},
    ops::{self, CurveWord},
};

/// A 2D Z-order curve over `2^bits × 2^bits` points, addressed by `T`.
///
/// Bit `2k` of an address is bit `k` of `x`; bit `2k + 1` is bit `k` of `y`.
/// Coordinates wider than `bits` are masked to their low-order bits rather
/// than rejected, so `decode(encode(x, y)) == (x mod N, y mod N)`.
///
/// The codec holds nothing beyond its bit width and derived masks. It is
/// `Copy` and can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZCurve<T> {
    /// Bits per axis.
    bits: u32,
    /// Low `bits` bits set: valid coordinate range.
    coord_mask: T,
    /// Low `2 * bits` bits set: valid address range.
    address_mask: T,
    /// Even bit positions below `2 * bits`.
    mask_x: T,
    /// Odd bit positions below `2 * bits`.
    mask_y: T,
}

impl<T: CurveWord> ZCurve<T> {
    /// Largest supported bits-per-axis for this address word.
    pub const MAX_BITS: u32 = T::BITS / 2;

    /// Construct a codec with `bits` bits per axis.
    ///
    /// Fails unless `1 <= bits <= T::BITS / 2`; the width is never clamped.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(Error::InvalidBitWidth {
                bits,
                max: Self::MAX_BITS,
            });
        }
        let address_mask = ops::low_mask::<T>(2 * bits);
        let mask_x = ops::striped_mask::<T>(1) & address_mask;
        Ok(Self {
            bits,
            coord_mask: ops::low_mask(bits),
            address_mask,
            mask_x,
            mask_y: mask_x << 1,
        })
    }

    /// Bits per axis.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of values per axis, `N = 2^bits`.
    pub fn domain_size(&self) -> T {
        T::ONE << self.bits
    }

    /// Last address on the curve, `N² - 1`.
    pub fn max_address(&self) -> T {
        self.address_mask
    }

    /// Mask applied to coordinates, `N - 1`.
    pub fn coord_mask(&self) -> T {
        self.coord_mask
    }

    /// Mask applied to addresses, `N² - 1`.
    pub fn address_mask(&self) -> T {
        self.address_mask
    }

    /// Address bits carrying `x`.
    pub fn mask_x(&self) -> T {
        self.mask_x
    }

    /// Address bits carrying `y`.
    pub fn mask_y(&self) -> T {
        self.mask_y
    }

    /// Interleave `(x, y)` into a curve address.
    #[inline]
    pub fn encode(&self, x: T, y: T) -> T {
        ops::spread(x & self.coord_mask) | (ops::spread(y & self.coord_mask) << 1)
    }

    /// Split a curve address back into `(x, y)`.
    ///
    /// Address bits above `2 * bits` are ignored.
    #[inline]
    pub fn decode(&self, d: T) -> (T, T) {
        let d = d & self.address_mask;
        (ops::compact(d), ops::compact(d >> 1))
    }

    /// Build a rectangle query, masking each corner into the domain.
    ///
    /// Masking happens before validation, so a range that wraps past `N`
    /// (for example `xlo = 3, xhi = 5` with `N = 4`) is reported as inverted.
    pub fn query(&self, xlo: T, ylo: T, xhi: T, yhi: T) -> Result<QueryRect<T>> {
        let rect = Rect {
            xlo: xlo & self.coord_mask,
            ylo: ylo & self.coord_mask,
            xhi: xhi & self.coord_mask,
            yhi: yhi & self.coord_mask,
        };
        if rect.xlo > rect.xhi || rect.ylo > rect.yhi {
            return Err(Error::InvalidRectangle {
                xlo: rect.xlo.to_u128(),
                ylo: rect.ylo.to_u128(),
                xhi: rect.xhi.to_u128(),
                yhi: rect.yhi.to_u128(),
            });
        }
        let bounds = Fragment::new_unchecked(
            self.encode(rect.xlo, rect.ylo),
            self.encode(rect.xhi, rect.yhi),
        );
        Ok(QueryRect::from_parts(rect, bounds))
    }

    /// Query covering the whole domain.
    pub fn full_query(&self) -> QueryRect<T> {
        let rect = Rect {
            xlo: T::ZERO,
            ylo: T::ZERO,
            xhi: self.coord_mask,
            yhi: self.coord_mask,
        };
        QueryRect::from_parts(rect, self.full_fragment())
    }

    /// The fragment spanning the entire curve.
    pub fn full_fragment(&self) -> Fragment<T> {
        Fragment::new_unchecked(T::ZERO, self.address_mask)
    }

    /// Decode the endpoints of a fragment into a coordinate box.
    ///
    /// For dyadic fragments this is the exact bounding box of every address in
    /// the interval. For other fragments it is only the box spanned by the two
    /// endpoints.
    pub fn fragment_box(&self, fragment: Fragment<T>) -> Rect<T> {
        let (xlo, ylo) = self.decode(fragment.lo());
        let (xhi, yhi) = self.decode(fragment.hi());
        Rect { xlo, ylo, xhi, yhi }
    }

    /// Decompose `query` into curve fragments, handing each to `visitor`.
    ///
    /// Fragments are pairwise disjoint and together cover exactly the points of
    /// the rectangle. Returns the number of decision nodes examined, which is
    /// always at least one.
    pub fn decompose<V>(&self, query: &QueryRect<T>, visitor: &mut V) -> u64
    where
        V: FragmentVisitor<T> + ?Sized,
    {
        Decomposer::new(self, query).walk(|fragment| {
            visitor.visit(fragment);
            Resume::Next
        })
    }

    /// Decompose `query`, letting the visitor skip ahead or stop early.
    ///
    /// See [`Resume`] for how jump targets interact with pending nodes.
    /// Returns the number of decision nodes examined.
    pub fn decompose_jump<V>(&self, query: &QueryRect<T>, visitor: &mut V) -> u64
    where
        V: JumpVisitor<T> + ?Sized,
    {
        Decomposer::new(self, query).walk(|fragment| visitor.visit(fragment))
    }

    /// Collect every fragment of `query` into a [`Decomposition`].
    pub fn fragments(&self, query: &QueryRect<T>) -> Decomposition<T> {
        let mut fragments = Vec::new();
        let visits = self.decompose(query, &mut |fragment: Fragment<T>| fragments.push(fragment));
        Decomposition { fragments, visits }
    }

    /// Classify a dyadic fragment against a query.
    pub fn classify(&self, query: &QueryRect<T>, fragment: Fragment<T>) -> Classification {
        Decomposer::new(self, query).classify(fragment, T::ZERO)
    }
}
