//! Curve intervals, coordinate boxes and query descriptors.

use std::fmt;

use crate::{
    error::{Error, Result},
    ops::{self, CurveWord},
};

/// Closed interval `[lo, hi]` of curve addresses, with `lo <= hi`.
///
/// Fragments produced by decomposition are dyadic: they fix a run of
/// high-order bit pairs and leave the low-order bits free, so their decoded
/// endpoints bound an exact box in coordinate space. An arbitrary fragment
/// built with [`Fragment::new`] carries no such guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fragment<T> {
    /// Lowest address in the interval.
    lo: T,
    /// Highest address in the interval.
    hi: T,
}

impl<T: CurveWord> Fragment<T> {
    /// Construct a fragment, rejecting `lo > hi`.
    pub fn new(lo: T, hi: T) -> Result<Self> {
        if lo > hi {
            return Err(Error::InvalidFragment {
                lo: lo.to_u128(),
                hi: hi.to_u128(),
            });
        }
        Ok(Self { lo, hi })
    }

    /// Construct a fragment whose ordering the caller already guarantees.
    pub(crate) fn new_unchecked(lo: T, hi: T) -> Self {
        debug_assert!(lo <= hi, "fragment [{lo}, {hi}] is inverted");
        Self { lo, hi }
    }

    /// A fragment holding a single address.
    pub fn point(d: T) -> Self {
        Self { lo: d, hi: d }
    }

    /// Lowest address.
    pub fn lo(&self) -> T {
        self.lo
    }

    /// Highest address.
    pub fn hi(&self) -> T {
        self.hi
    }

    /// Number of addresses covered, `hi - lo + 1`.
    pub fn size(&self) -> u128 {
        // A full u128 domain would overflow here; saturate instead.
        (self.hi.to_u128() - self.lo.to_u128()).saturating_add(1)
    }

    /// Does the interval cover exactly one address?
    pub fn is_point(&self) -> bool {
        self.lo == self.hi
    }

    /// Does the interval include `d`?
    pub fn contains(&self, d: T) -> bool {
        self.lo <= d && d <= self.hi
    }

    /// Do the two intervals share at least one address?
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    /// Split a dyadic fragment at address bit `level`.
    ///
    /// The left half clears that bit in `hi`, the right half sets it in `lo`.
    /// Returns `None` if `level` is outside the word or the fragment has no
    /// free bit there.
    pub fn split_at(&self, level: u32) -> Option<(Self, Self)> {
        let bit = ops::bit::<T>(level)?;
        let left_hi = self.hi() & !bit;
        let right_lo = self.lo() | bit;
        if left_hi < self.lo() || right_lo > self.hi() {
            return None;
        }
        Some((
            Self::new_unchecked(self.lo(), left_hi),
            Self::new_unchecked(right_lo, self.hi()),
        ))
    }
}

impl<T: fmt::Display> fmt::Display for Fragment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lo, self.hi)
    }
}

/// Inclusive axis-aligned box in coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect<T> {
    /// Smallest x.
    pub xlo: T,
    /// Smallest y.
    pub ylo: T,
    /// Largest x.
    pub xhi: T,
    /// Largest y.
    pub yhi: T,
}

impl<T: CurveWord> Rect<T> {
    /// Is `other` entirely inside this box?
    pub fn contains(&self, other: &Self) -> bool {
        self.xlo <= other.xlo && self.ylo <= other.ylo && other.xhi <= self.xhi && other.yhi <= self.yhi
    }

    /// Do the boxes share no point?
    pub fn is_disjoint(&self, other: &Self) -> bool {
        other.xhi < self.xlo || other.yhi < self.ylo || other.xlo > self.xhi || other.ylo > self.yhi
    }

    /// Is the point `(x, y)` inside the box?
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.xlo <= x && x <= self.xhi && self.ylo <= y && y <= self.yhi
    }

    /// Number of lattice points inside the box.
    pub fn point_count(&self) -> u128 {
        let width = (self.xhi.to_u128() - self.xlo.to_u128()).saturating_add(1);
        let height = (self.yhi.to_u128() - self.ylo.to_u128()).saturating_add(1);
        width.saturating_mul(height)
    }
}

/// A validated rectangle query together with its curve-address bounds.
///
/// Built by [`ZCurve::query`](crate::ZCurve::query), which masks the corners
/// into the curve domain, checks their ordering and precomputes
/// `encode(xlo, ylo)` and `encode(xhi, yhi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryRect<T> {
    /// Query box in coordinate space.
    rect: Rect<T>,
    /// Curve addresses of the lower and upper corners.
    bounds: Fragment<T>,
}

impl<T: CurveWord> QueryRect<T> {
    /// Assemble a query from parts the codec has already validated.
    pub(crate) fn from_parts(rect: Rect<T>, bounds: Fragment<T>) -> Self {
        Self { rect, bounds }
    }

    /// The query box.
    pub fn rect(&self) -> &Rect<T> {
        &self.rect
    }

    /// Curve addresses of the lower-left and upper-right corners.
    ///
    /// Every address of a point inside the box lies within these bounds.
    pub fn bounds(&self) -> Fragment<T> {
        self.bounds
    }

    /// Number of lattice points inside the query.
    pub fn point_count(&self) -> u128 {
        self.rect.point_count()
    }
}

impl<T: fmt::Display> fmt::Display for QueryRect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}:{},{};{},{}]",
            self.rect.xlo, self.rect.ylo, self.rect.xhi, self.rect.yhi, self.bounds.lo, self.bounds.hi
        )
    }
}
