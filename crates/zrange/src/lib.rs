//! Z-order (Morton) range decomposition for two-dimensional keys.
//!
//! A [`ZCurve`] maps `(x, y)` coordinates to a single curve address by bit
//! interleaving. Given a rectangle query, [`ZCurve::decompose`] enumerates the
//! maximal dyadic curve intervals that exactly cover it, which is what a
//! spatial index keyed by Z-order needs to turn a rectangle into range scans.
//!
//! ```
//! use zrange::{Fragment, ZCurve};
//!
//! let curve = ZCurve::<u32>::new(2)?;
//! let query = curve.query(0, 0, 1, 1)?;
//! let found = curve.fragments(&query);
//! assert_eq!(found.fragments, vec![Fragment::new(0, 3)?]);
//! # Ok::<(), zrange::error::Error>(())
//! ```

/// The coordinate codec.
mod codec;
/// Rectangle decomposition and the visitor contracts.
pub mod decompose;
/// Error types used across the crate.
pub mod error;
/// Curve intervals, boxes and query descriptors.
mod fragment;
/// Sorted key index built on the decomposer.
pub mod index;
/// Internal bit operations shared by the codec and decomposer.
#[doc(hidden)]
pub mod ops;

pub use crate::{
    codec::ZCurve,
    decompose::{Classification, Decomposition, FragmentVisitor, JumpVisitor, Resume},
    fragment::{Fragment, QueryRect, Rect},
    index::{RangeCount, ZIndex},
    ops::CurveWord,
};
