//! Error types for curve construction and query validation.

use std::result;

use thiserror::Error;

/// Errors reported by the codec and the query constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The bits-per-axis parameter does not fit the address word.
    #[error("invalid bit width {bits}: must be between 1 and {max}")]
    InvalidBitWidth {
        /// Requested bits per axis.
        bits: u32,
        /// Largest width the address word supports.
        max: u32,
    },

    /// A query rectangle whose lower corner lies above or right of its upper
    /// corner (after masking).
    #[error("invalid rectangle ({xlo}, {ylo})-({xhi}, {yhi}): lower bound exceeds upper bound")]
    InvalidRectangle {
        /// Lower x bound.
        xlo: u128,
        /// Lower y bound.
        ylo: u128,
        /// Upper x bound.
        xhi: u128,
        /// Upper y bound.
        yhi: u128,
    },

    /// A curve interval with `lo > hi`.
    #[error("invalid fragment [{lo}, {hi}]: lo exceeds hi")]
    InvalidFragment {
        /// Lower curve address.
        lo: u128,
        /// Upper curve address.
        hi: u128,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
