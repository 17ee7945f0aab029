//! Error types for plot construction and emission

use thiserror::Error;

/// Convenient result alias for plotting operations.
pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    /// Malformed hex code, unrecognized color name, or a non-string color value.
    #[error("invalid color: {0}")]
    InvalidColorKind(String),

    /// A symbol shape other than `o`, `+` or `x`.
    #[error("symbol '{0}' is not implemented (expected 'o', '+' or 'x')")]
    InvalidSymbolKind(String),

    /// Parallel list arguments of differing length.
    #[error("`{name}` has {actual} item(s) but {expected} were expected")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A keyword value had the wrong type or was out of range.
    #[error("invalid value for `{name}`: expected {expected}")]
    InvalidArgument { name: String, expected: String },

    /// The geocoding lookup failed or returned no usable result.
    #[error("geocoding failed: {0}")]
    Geocoding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlotError {
    /// Create a length mismatch error
    pub fn length_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            expected: expected.into(),
        }
    }
}

/// Fail with [`PlotError::LengthMismatch`] unless `lats` and `lngs` agree.
pub(crate) fn check_lengths(lats: &[f64], lngs: &[f64]) -> Result<()> {
    if lats.len() != lngs.len() {
        return Err(PlotError::length_mismatch("lngs", lats.len(), lngs.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = PlotError::length_mismatch("color", 3, 2);
        assert_eq!(
            err.to_string(),
            "`color` has 2 item(s) but 3 were expected"
        );
    }

    #[test]
    fn test_check_lengths() {
        assert!(check_lengths(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        let err = check_lengths(&[1.0, 2.0], &[3.0]).unwrap_err();
        assert!(matches!(
            err,
            PlotError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }
}
