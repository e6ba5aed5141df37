//! Rectangle decomposition into Z-order curve fragments.
//!
//! A query rectangle is answered by walking the implicit binary tree of dyadic
//! curve intervals. The root is the whole curve; each split fixes one more
//! address bit, alternating between `y` and `x`. Every node is classified
//! against the query: empty nodes are dropped, contained nodes are reported
//! whole, and overlapping nodes are split in two. Single addresses are always
//! either contained or empty, so the walk terminates after at most `2B`
//! levels.
//!
//! The walk keeps an explicit stack and always finishes the left (lower)
//! child before the right one, so a given query yields the same fragment
//! sequence on every run.

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::{
    codec::ZCurve,
    fragment::{Fragment, QueryRect},
    ops::CurveWord,
};

/// Frames kept inline before the traversal stack spills to the heap.
///
/// The stack holds at most one pending sibling per level plus the current
/// pair, `2B + 1` frames in total, so curves of up to 31 bits per axis never
/// allocate.
const INLINE_FRAMES: usize = 64;

/// Receives every fragment accepted by [`ZCurve::decompose`].
///
/// Implemented for any `FnMut(Fragment<T>)` closure.
pub trait FragmentVisitor<T> {
    /// Accept one fragment whose addresses all lie inside the query.
    fn visit(&mut self, fragment: Fragment<T>);
}

impl<T, F> FragmentVisitor<T> for F
where
    F: FnMut(Fragment<T>),
{
    fn visit(&mut self, fragment: Fragment<T>) {
        self(fragment)
    }
}

/// What a [`JumpVisitor`] wants the traversal to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resume<T> {
    /// Carry on with the next pending node.
    Next,
    /// Report nothing below this address from now on.
    ///
    /// Pending nodes that end below the target are dropped, including
    /// siblings already waiting on the stack. Nodes that straddle it are split
    /// until their pieces fall on one side. Targets at or behind an earlier
    /// target have no effect.
    At(T),
    /// Abandon the traversal.
    Stop,
}

/// Receives fragments from [`ZCurve::decompose_jump`] and steers the walk.
///
/// Implemented for any `FnMut(Fragment<T>) -> Resume<T>` closure.
pub trait JumpVisitor<T> {
    /// Accept one fragment and say where to resume.
    fn visit(&mut self, fragment: Fragment<T>) -> Resume<T>;
}

impl<T, F> JumpVisitor<T> for F
where
    F: FnMut(Fragment<T>) -> Resume<T>,
{
    fn visit(&mut self, fragment: Fragment<T>) -> Resume<T> {
        self(fragment)
    }
}

/// How a node of the decomposition relates to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The fragment's address range misses the query's curve bounds.
    EmptyByOrder,
    /// The fragment's bounding box misses the query rectangle.
    EmptyByBox,
    /// Every address of the fragment is inside the query.
    Contained,
    /// Partial overlap; the fragment must be split.
    Overlap,
}

/// All fragments of one decomposition, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decomposition<T> {
    /// Accepted fragments.
    pub fragments: Vec<Fragment<T>>,
    /// Number of decision nodes examined.
    pub visits: u64,
}

impl<T: CurveWord> Decomposition<T> {
    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True when no fragment was accepted.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Total number of addresses covered by the fragments.
    pub fn point_count(&self) -> u128 {
        self.fragments.iter().map(Fragment::size).sum()
    }

    /// Iterate over the fragments.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment<T>> {
        self.fragments.iter()
    }
}

/// A pending node: a dyadic fragment and the number of its free low bits.
#[derive(Debug, Clone, Copy)]
struct Frame<T> {
    /// Interval under consideration.
    fragment: Fragment<T>,
    /// Low-order address bits not yet fixed; the next split is at `free - 1`.
    free: u32,
}

/// One query being decomposed against one curve.
///
/// Shared by plain and jump traversal; the public entry points live on
/// [`ZCurve`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decomposer<'a, T> {
    /// Codec used to decode node bounding boxes.
    curve: &'a ZCurve<T>,
    /// Validated query.
    query: &'a QueryRect<T>,
}

impl<'a, T: CurveWord> Decomposer<'a, T> {
    /// Pair a curve with a query built from it.
    pub(crate) fn new(curve: &'a ZCurve<T>, query: &'a QueryRect<T>) -> Self {
        Self { curve, query }
    }

    /// Classify a fragment, treating addresses below `floor` as outside.
    pub(crate) fn classify(&self, fragment: Fragment<T>, floor: T) -> Classification {
        let bounds = self.query.bounds();
        let lower = bounds.lo().max(floor);
        if bounds.hi() < fragment.lo() || fragment.hi() < lower || bounds.hi() < lower {
            return Classification::EmptyByOrder;
        }

        let bbox = self.curve.fragment_box(fragment);
        let rect = self.query.rect();
        if rect.is_disjoint(&bbox) {
            return Classification::EmptyByBox;
        }
        if rect.contains(&bbox) && floor <= fragment.lo() {
            Classification::Contained
        } else {
            Classification::Overlap
        }
    }

    /// Depth-first walk; `accept` sees every contained node and steers the
    /// rest of the traversal. Returns the number of nodes examined.
    pub(crate) fn walk<F>(&self, mut accept: F) -> u64
    where
        F: FnMut(Fragment<T>) -> Resume<T>,
    {
        let mut stack: SmallVec<[Frame<T>; INLINE_FRAMES]> = smallvec![Frame {
            fragment: self.curve.full_fragment(),
            free: 2 * self.curve.bits(),
        }];
        let mut floor = T::ZERO;
        let mut visits = 0u64;
        let mut accepted = 0u64;
        let mut halted = false;

        while let Some(Frame { fragment, free }) = stack.pop() {
            visits += 1;
            let class = self.classify(fragment, floor);
            trace!(%fragment, free, ?class, "node");

            match class {
                Classification::EmptyByOrder | Classification::EmptyByBox => {}
                Classification::Contained => {
                    accepted += 1;
                    match accept(fragment) {
                        Resume::Next => {}
                        Resume::At(target) => floor = floor.max(target),
                        Resume::Stop => {
                            halted = true;
                            break;
                        }
                    }
                }
                Classification::Overlap => {
                    // A single address is always contained or empty, so an
                    // overlapping node has a free bit left to split on.
                    let Some((level, (left, right))) = free
                        .checked_sub(1)
                        .and_then(|level| Some((level, fragment.split_at(level)?)))
                    else {
                        unreachable!("overlapping node {fragment} has no free bit");
                    };
                    stack.push(Frame {
                        fragment: right,
                        free: level,
                    });
                    stack.push(Frame {
                        fragment: left,
                        free: level,
                    });
                }
            }
        }

        debug!(query = %self.query, visits, fragments = accepted, halted, "decomposed");
        visits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    /// Fragments of a `B = 2` query as `(lo, hi)` pairs, plus the visit count.
    fn decompose2(xlo: u32, ylo: u32, xhi: u32, yhi: u32) -> Result<(Vec<(u32, u32)>, u64)> {
        let z = ZCurve::<u32>::new(2)?;
        let d = z.fragments(&z.query(xlo, ylo, xhi, yhi)?);
        Ok((d.iter().map(|f| (f.lo(), f.hi())).collect(), d.visits))
    }

    #[test]
    fn full_domain() -> Result<()> {
        assert_eq!(decompose2(0, 0, 3, 3)?, (vec![(0, 15)], 1));
        Ok(())
    }

    #[test]
    fn aligned_quadrant() -> Result<()> {
        assert_eq!(decompose2(0, 0, 1, 1)?, (vec![(0, 3)], 5));
        Ok(())
    }

    #[test]
    fn worst_case_fragmentation() -> Result<()> {
        let (fragments, visits) = decompose2(1, 1, 2, 2)?;
        assert_eq!(fragments, vec![(3, 3), (6, 6), (9, 9), (12, 12)]);
        assert_eq!(visits, 23);
        Ok(())
    }

    #[test]
    fn column_query() -> Result<()> {
        assert_eq!(decompose2(0, 0, 1, 3)?, (vec![(0, 3), (8, 11)], 7));
        Ok(())
    }

    #[test]
    fn single_point() -> Result<()> {
        let (fragments, _) = decompose2(3, 0, 3, 0)?;
        assert_eq!(fragments, vec![(5, 5)]);
        Ok(())
    }

    #[test]
    fn split_halves() -> Result<()> {
        let f = Fragment::new(0u32, 15)?;
        assert_eq!(
            f.split_at(3),
            Some((Fragment::new(0, 7)?, Fragment::new(8, 15)?))
        );
        assert_eq!(f.split_at(32), None);
        assert_eq!(Fragment::point(4u32).split_at(0), None);
        Ok(())
    }

    #[test]
    fn classification() -> Result<()> {
        let z = ZCurve::<u32>::new(2)?;
        let q = z.query(0, 0, 1, 1)?;
        assert_eq!(z.classify(&q, Fragment::new(0, 15)?), Classification::Overlap);
        assert_eq!(z.classify(&q, Fragment::new(0, 3)?), Classification::Contained);
        assert_eq!(z.classify(&q, Fragment::new(4, 7)?), Classification::EmptyByBox);
        assert_eq!(z.classify(&q, Fragment::new(8, 15)?), Classification::EmptyByOrder);
        Ok(())
    }

    #[test]
    fn single_addresses_never_overlap() -> Result<()> {
        let z = ZCurve::<u32>::new(3)?;
        let queries = [
            z.query(1, 1, 2, 2)?,
            z.query(0, 3, 7, 4)?,
            z.query(5, 0, 5, 7)?,
            z.full_query(),
        ];
        for q in &queries {
            let walker = Decomposer::new(&z, q);
            for d in 0..=z.max_address() {
                for floor in [0, d, d + 1, 40] {
                    let class = walker.classify(Fragment::point(d), floor);
                    assert_ne!(class, Classification::Overlap, "{d} at floor {floor} in {q}");
                }
            }
        }
        Ok(())
    }

    #[test]
    fn wide_words() -> Result<()> {
        let z = ZCurve::<u128>::new(64)?;
        let d = z.fragments(&z.full_query());
        assert_eq!(d.fragments, vec![Fragment::new(0, u128::MAX)?]);

        let z = ZCurve::<u64>::new(32)?;
        let top = u64::from(u32::MAX);
        let d = z.fragments(&z.query(top - 1, top - 1, top, top)?);
        assert_eq!(d.fragments, vec![Fragment::new(u64::MAX - 3, u64::MAX)?]);
        Ok(())
    }

    #[test]
    fn deterministic() -> Result<()> {
        let z = ZCurve::<u32>::new(5)?;
        let q = z.query(3, 7, 29, 18)?;
        let first = z.fragments(&q);
        let second = z.fragments(&q);
        assert_eq!(first, second);
        assert_eq!(first.point_count(), q.point_count());
        Ok(())
    }

    #[test]
    fn jump_next_matches_plain() -> Result<()> {
        let z = ZCurve::<u32>::new(4)?;
        let q = z.query(2, 3, 13, 9)?;
        let plain = z.fragments(&q);
        let mut seen = Vec::new();
        let visits = z.decompose_jump(&q, &mut |f: Fragment<u32>| {
            seen.push(f);
            Resume::Next
        });
        assert_eq!(seen, plain.fragments);
        assert_eq!(visits, plain.visits);
        Ok(())
    }

    #[test]
    fn jump_stop() -> Result<()> {
        let z = ZCurve::<u32>::new(2)?;
        let q = z.query(1, 1, 2, 2)?;
        let mut seen = Vec::new();
        z.decompose_jump(&q, &mut |f: Fragment<u32>| {
            seen.push(f);
            Resume::Stop
        });
        assert_eq!(seen, vec![Fragment::point(3)]);
        Ok(())
    }

    #[test]
    fn jump_skips_siblings() -> Result<()> {
        let z = ZCurve::<u32>::new(2)?;
        let q = z.query(1, 1, 2, 2)?;
        let mut seen = Vec::new();
        z.decompose_jump(&q, &mut |f: Fragment<u32>| {
            seen.push(f);
            Resume::At(10)
        });
        assert_eq!(seen, vec![Fragment::point(3), Fragment::point(12)]);
        Ok(())
    }

    #[test]
    fn jump_splits_straddling_fragment() -> Result<()> {
        let z = ZCurve::<u32>::new(2)?;
        let q = z.query(0, 0, 1, 3)?;
        let mut seen = Vec::new();
        z.decompose_jump(&q, &mut |f: Fragment<u32>| {
            seen.push(f);
            if f.lo() == 0 { Resume::At(9) } else { Resume::Next }
        });
        assert_eq!(
            seen,
            vec![
                Fragment::new(0, 3)?,
                Fragment::point(9),
                Fragment::new(10, 11)?
            ]
        );
        Ok(())
    }

    #[test]
    fn jump_backwards_is_ignored() -> Result<()> {
        let z = ZCurve::<u32>::new(3)?;
        let q = z.query(1, 2, 6, 5)?;
        let plain = z.fragments(&q);
        let mut seen = Vec::new();
        z.decompose_jump(&q, &mut |f: Fragment<u32>| {
            seen.push(f);
            Resume::At(0)
        });
        assert_eq!(seen, plain.fragments);
        Ok(())
    }
}
