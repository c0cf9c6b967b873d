// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural edits.

use thiserror::Error;

/// Errors returned by index-based node and child operations.
///
/// A failed operation leaves the structure exactly as it was. Searches that
/// find nothing are not errors; they return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FigureError {
    /// An index was outside the valid range for the requested operation.
    ///
    /// `len` is the exclusive upper bound the index was checked against.
    #[error("index {index} out of range (valid indices are below {len})")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The exclusive upper bound.
        len: usize,
    },
}

impl FigureError {
    /// Check `index < len`.
    #[inline]
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), FigureError> {
        if index < len {
            Ok(())
        } else {
            Err(FigureError::IndexOutOfRange { index, len })
        }
    }

    /// Check `index <= len`, the range for insertion.
    #[inline]
    pub(crate) fn check_insert(index: usize, len: usize) -> Result<(), FigureError> {
        Self::check_index(index, len + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::FigureError;

    #[test]
    fn index_checks() {
        assert!(FigureError::check_index(0, 1).is_ok());
        assert_eq!(
            FigureError::check_index(1, 1),
            Err(FigureError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(FigureError::check_insert(1, 1).is_ok());
        assert!(FigureError::check_insert(2, 1).is_err());
    }

    #[test]
    fn message() {
        let err = FigureError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 7 out of range (valid indices are below 3)"
        );
    }
}
