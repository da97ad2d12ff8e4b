//! Independent brute-force re-verification of a completed grid.
//!
//! This deliberately avoids the constructor's canonical-code shortcut
//! and re-checks both invariants with the plain rotation primitives, so
//! it can confirm the constructor's output without sharing its
//! machinery or its search order.

use crate::grid::Grid;

/// First invariant violation found, with the offending coordinates.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("grid still contains unknown cells")]
    IncompleteGrid,
    #[error("window at ({row}, {col}) is rotation invariant")]
    RotationInvariantWindow { row: usize, col: usize },
    #[error("window at ({row_a}, {col_a}) matches window at ({row_b}, {col_b}) under rotation")]
    DuplicateWindows {
        row_a: usize,
        col_a: usize,
        row_b: usize,
        col_b: usize,
    },
}

/// Check every window for rotation asymmetry and every pair of distinct
/// windows for rotation uniqueness. Stops at the first violation.
pub fn validate(grid: &Grid) -> Result<(), ValidationError> {
    if !grid.is_complete() {
        return Err(ValidationError::IncompleteGrid);
    }

    for ((row, col), patch) in grid.windows() {
        if patch.is_rotation_invariant() {
            return Err(ValidationError::RotationInvariantWindow { row, col });
        }
        for ((row_b, col_b), other) in grid.windows() {
            if (row_b, col_b) == (row, col) {
                continue;
            }
            if patch.equal_under_rotation(&other) {
                return Err(ValidationError::DuplicateWindows {
                    row_a: row,
                    col_a: col,
                    row_b,
                    col_b,
                });
            }
        }
    }

    Ok(())
}

/// True iff [`validate`] finds no violation.
pub fn is_valid(grid: &Grid) -> bool {
    validate(grid).is_ok()
}
