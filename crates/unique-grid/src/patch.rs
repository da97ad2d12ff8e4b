//! Square cell patches and their rotation primitives.

use serde::{Deserialize, Serialize};

/// State of one grid cell.
///
/// `Unknown` exists only while the constructor is still filling a grid;
/// a finished grid contains only `Zero` and `One`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Zero,
    One,
    Unknown,
}

impl Cell {
    /// True for `Zero` and `One`.
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, Cell::Unknown)
    }
}

/// Shape violations when building a [`Patch`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PatchError {
    #[error("patch side must be >= 2, got {size}")]
    TooSmall { size: usize },
    #[error("patch of side {size} needs {expected} cells, got {actual}")]
    CellCountMismatch {
        size: usize,
        expected: usize,
        actual: usize,
    },
    #[error("patch rows do not form a square")]
    NotSquare,
}

/// An owned square block of cells, row-major.
///
/// Windows cut from a grid are patches, and so are the candidate window
/// completions the constructor enumerates. Squareness and the minimum
/// side of 2 are enforced at construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patch {
    size: usize,
    cells: Vec<Cell>,
}

impl Patch {
    /// Build a patch from row-major cells.
    pub fn new(size: usize, cells: Vec<Cell>) -> Result<Self, PatchError> {
        if size < 2 {
            return Err(PatchError::TooSmall { size });
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(PatchError::CellCountMismatch {
                size,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Build a patch from nested rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, PatchError> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(PatchError::NotSquare);
        }
        Self::new(size, rows.into_iter().flatten().collect())
    }

    /// Caller guarantees `size >= 2` and `cells.len() == size * size`.
    pub(crate) fn from_parts(size: usize, cells: Vec<Cell>) -> Self {
        debug_assert!(size >= 2);
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `(r, c)`. Panics if out of range.
    #[inline]
    pub fn cell(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.size + c]
    }

    /// True if no cell is `Unknown`.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.is_known())
    }

    /// The patch rotated by `turns * 90` degrees.
    ///
    /// The rotation direction is fixed; every comparison in this crate
    /// goes through this one remap, so only self-consistency matters.
    pub fn rotated(&self, turns: u8) -> Patch {
        let turns = turns & 3;
        if turns == 0 {
            return self.clone();
        }
        let n = self.size;
        let mut cells = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                let (sr, sc) = match turns {
                    1 => (n - 1 - c, r),
                    2 => (n - 1 - r, n - 1 - c),
                    _ => (c, n - 1 - r),
                };
                cells.push(self.cells[sr * n + sc]);
            }
        }
        Patch { size: n, cells }
    }

    /// True iff `self` equals `other` rotated by 0, 90, 180, or 270 degrees.
    pub fn equal_under_rotation(&self, other: &Patch) -> bool {
        if self.size != other.size {
            return false;
        }
        if self == other {
            return true;
        }
        (1..4).any(|t| *self == other.rotated(t))
    }

    /// True iff the patch equals its own rotation by 90 or 180 degrees.
    ///
    /// Checking turns 1 and 2 is sufficient: invariance under 270
    /// degrees follows from invariance under 90. A window accepted into
    /// a grid must *fail* this test, otherwise it cannot convey
    /// orientation.
    pub fn is_rotation_invariant(&self) -> bool {
        (1..=2).any(|t| *self == self.rotated(t))
    }

    /// Row-major packed bits, `One` = 1, cell `(0, 0)` in the lowest bit.
    ///
    /// Defined for complete patches of side <= 8 (64 bits).
    pub(crate) fn code(&self) -> u64 {
        debug_assert!(self.size <= 8, "patch side {} exceeds code width", self.size);
        debug_assert!(self.is_complete(), "codes are defined on complete patches");
        let mut code = 0u64;
        for (idx, cell) in self.cells.iter().enumerate() {
            if *cell == Cell::One {
                code |= 1 << idx;
            }
        }
        code
    }

    /// Minimum code over the four rotations.
    ///
    /// Two complete patches are equal under rotation iff their canonical
    /// codes are equal, which turns duplicate lookups into set membership.
    pub(crate) fn canonical_code(&self) -> u64 {
        let mut key = self.code();
        for t in 1..4u8 {
            key = key.min(self.rotated(t).code());
        }
        key
    }

    /// Row-major positions of `Unknown` cells.
    pub(crate) fn unknown_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_known())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Copy of `self` with `fill[i]` written at position `slots[i]`.
    pub(crate) fn completed(&self, slots: &[usize], fill: &[Cell]) -> Patch {
        debug_assert_eq!(slots.len(), fill.len());
        let mut out = self.clone();
        for (&idx, &cell) in slots.iter().zip(fill) {
            out.cells[idx] = cell;
        }
        out
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
