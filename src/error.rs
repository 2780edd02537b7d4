//! The error type shared by every fallible operation in the crate.

/// Errors from format construction, block encode/decode, and palette resolution.
///
/// Every variant carries enough context to report the failure without the caller
/// having to recompute sizes or bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// A source or destination buffer is smaller than the size the operation requires.
    #[error("{what} too small: need {expected}, got {actual}")]
    SizeMismatch {
        /// The buffer that was too small.
        what: &'static str,
        /// The required length.
        expected: usize,
        /// The length that was provided.
        actual: usize,
    },

    /// A coordinate, channel position, or capacity lies outside its valid range.
    #[error("{what} {value} out of range (bound {bound})")]
    OutOfRange {
        /// What the offending value describes.
        what: &'static str,
        /// The offending value.
        value: u64,
        /// The exclusive upper bound the value had to stay below.
        bound: u64,
    },

    /// A channel layout or numeric kind that cannot be rescaled.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(&'static str),
}

impl CodecError {
    /// Returns an error if `actual < expected`.
    pub(crate) fn check_size(
        what: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), Self> {
        if actual < expected {
            Err(Self::SizeMismatch { what, expected, actual })
        } else {
            Ok(())
        }
    }

    /// Returns an error if `value >= bound`.
    pub(crate) fn check_range(what: &'static str, value: usize, bound: usize) -> Result<(), Self> {
        if value < bound {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                what,
                value: value as u64,
                bound: bound as u64,
            })
        }
    }
}
