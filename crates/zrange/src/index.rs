//! A sorted in-memory index of curve keys.
//!
//! Every stored key that falls inside an accepted fragment is inside the
//! query rectangle, so range counts need one binary search per fragment and
//! never re-check coordinates.

use crate::{
    codec::ZCurve,
    decompose::Resume,
    fragment::{Fragment, QueryRect},
    ops::CurveWord,
};

/// Outcome of a range count against a [`ZIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeCount {
    /// Stored keys inside the query.
    pub matches: u64,
    /// Fragments reported by the decomposition.
    pub fragments: u64,
    /// Decision nodes examined by the decomposition.
    pub visits: u64,
}

impl RangeCount {
    /// Fraction of `total` stored keys that matched; `0.0` when nothing is
    /// stored.
    pub fn selectivity(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.matches as f64 / total as f64
    }
}

/// Immutable sorted multiset of Z-order keys.
#[derive(Debug, Clone)]
pub struct ZIndex<T> {
    /// Codec used to build the keys and decompose queries.
    curve: ZCurve<T>,
    /// Keys in ascending order; duplicates are kept.
    keys: Vec<T>,
}

impl<T: CurveWord> ZIndex<T> {
    /// Index a set of points, encoding each through `curve`.
    pub fn from_points<I>(curve: ZCurve<T>, points: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let keys = points.into_iter().map(|(x, y)| curve.encode(x, y));
        Self::sorted(curve, keys.collect())
    }

    /// Index pre-encoded keys. Bits above the curve domain are dropped.
    pub fn from_keys<I>(curve: ZCurve<T>, keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mask = curve.address_mask();
        let keys = keys.into_iter().map(|k| k & mask);
        Self::sorted(curve, keys.collect())
    }

    /// Sort `keys` and wrap them.
    fn sorted(curve: ZCurve<T>, mut keys: Vec<T>) -> Self {
        keys.sort_unstable();
        Self { curve, keys }
    }

    /// The codec behind this index.
    pub fn curve(&self) -> &ZCurve<T> {
        &self.curve
    }

    /// Stored keys in ascending order.
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of the first key above `d`.
    fn after(&self, d: T) -> usize {
        self.keys.partition_point(|&k| k <= d)
    }

    /// Number of keys inside `fragment`.
    fn count_in(&self, fragment: Fragment<T>) -> usize {
        let start = self.keys.partition_point(|&k| k < fragment.lo());
        self.after(fragment.hi()) - start
    }

    /// Count the keys inside `query`, walking every fragment.
    pub fn count(&self, query: &QueryRect<T>) -> RangeCount {
        let (mut fragments, mut matches) = (0, 0);
        let visits = self.curve.decompose(query, &mut |fragment: Fragment<T>| {
            fragments += 1;
            matches += self.count_in(fragment) as u64;
        });
        RangeCount {
            matches,
            fragments,
            visits,
        }
    }

    /// Count the keys inside `query`, jumping over empty stretches of the key
    /// space.
    ///
    /// After each fragment the walk resumes at the next stored key, and stops
    /// once no key is left. The result has the same `matches` as
    /// [`count`](Self::count).
    pub fn count_skipping(&self, query: &QueryRect<T>) -> RangeCount {
        let (mut fragments, mut matches) = (0, 0);
        let visits = self.curve.decompose_jump(query, &mut |fragment: Fragment<T>| {
            fragments += 1;
            matches += self.count_in(fragment) as u64;
            match self.keys.get(self.after(fragment.hi())) {
                Some(&next) => Resume::At(next),
                None => Resume::Stop,
            }
        });
        RangeCount {
            matches,
            fragments,
            visits,
        }
    }

    /// Fraction of stored keys inside `query`; `0.0` for an empty index.
    ///
    /// Runs a skipping count; use [`RangeCount::selectivity`] when the count
    /// is already at hand.
    pub fn selectivity(&self, query: &QueryRect<T>) -> f64 {
        self.count_skipping(query).selectivity(self.keys.len())
    }
}
