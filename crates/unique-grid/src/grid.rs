//! Grid entity, window enumeration, and the content fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::patch::{Cell, Patch};

/// Requested grid shape.
///
/// `rows`/`cols` count grid cells; `patch_size` is the side length of
/// the square windows that must stay unique under rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub patch_size: usize,
}

/// Parameter violations, rejected before any search starts.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GridSpecError {
    #[error("patch_size must be >= 2, got {patch_size}")]
    PatchTooSmall { patch_size: usize },
    #[error("patch_size must be <= 8 so a window packs into a 64-bit code, got {patch_size}")]
    PatchTooLarge { patch_size: usize },
    #[error("{rows}x{cols} grid cannot hold {patch_size}x{patch_size} windows")]
    GridSmallerThanPatch {
        rows: usize,
        cols: usize,
        patch_size: usize,
    },
}

impl GridSpec {
    /// Check the construction preconditions.
    pub fn validate(&self) -> Result<(), GridSpecError> {
        if self.patch_size < 2 {
            return Err(GridSpecError::PatchTooSmall {
                patch_size: self.patch_size,
            });
        }
        if self.patch_size > 8 {
            return Err(GridSpecError::PatchTooLarge {
                patch_size: self.patch_size,
            });
        }
        if self.rows < self.patch_size || self.cols < self.patch_size {
            return Err(GridSpecError::GridSmallerThanPatch {
                rows: self.rows,
                cols: self.cols,
                patch_size: self.patch_size,
            });
        }
        Ok(())
    }

    /// Number of window anchor rows / cols in raster order.
    #[inline]
    pub(crate) fn window_rows(&self) -> usize {
        self.rows - self.patch_size + 1
    }

    #[inline]
    pub(crate) fn window_cols(&self) -> usize {
        self.cols - self.patch_size + 1
    }
}

/// Errors from rebuilding a grid out of stored cells.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error(transparent)]
    Spec(#[from] GridSpecError),
    #[error("{rows}x{cols} grid needs {expected} cells, got {actual}")]
    CellCountMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
}

/// Fingerprint failures.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("grid still contains unknown cells")]
    IncompleteGrid,
    #[error("grid has {cells} cells, fingerprint packs at most {max} bits")]
    GridTooLarge { cells: usize, max: usize },
}

/// A `rows x cols` cell array with its construction parameters.
///
/// During search every candidate is an independent full clone; a grid
/// returned by [`construct`](crate::construct) is complete and is not
/// mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Grid {
    spec: GridSpec,
    cells: Vec<Cell>,
}

impl Grid {
    /// The all-`Unknown` seed grid for a validated spec.
    pub fn unknown(spec: GridSpec) -> Result<Self, GridSpecError> {
        spec.validate()?;
        Ok(Self {
            cells: vec![Cell::Unknown; spec.rows * spec.cols],
            spec,
        })
    }

    /// Rebuild a grid from row-major cells, e.g. loaded from storage.
    pub fn from_cells(spec: GridSpec, cells: Vec<Cell>) -> Result<Self, GridError> {
        spec.validate()?;
        let expected = spec.rows * spec.cols;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                rows: spec.rows,
                cols: spec.cols,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { spec, cells })
    }

    #[inline]
    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.spec.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.spec.cols
    }

    #[inline]
    pub fn patch_size(&self) -> usize {
        self.spec.patch_size
    }

    /// Cell at `(r, c)`. Panics if out of range.
    #[inline]
    pub fn cell(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.spec.cols + c]
    }

    /// True if no cell is `Unknown`.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.is_known())
    }

    /// The `patch_size x patch_size` window anchored at `(r, c)`, or
    /// `None` if the anchor is out of range.
    pub fn window(&self, r: usize, c: usize) -> Option<Patch> {
        if r < self.spec.window_rows() && c < self.spec.window_cols() {
            Some(self.window_at(r, c))
        } else {
            None
        }
    }

    /// All windows with their anchors, in raster order.
    pub fn windows(&self) -> impl Iterator<Item = ((usize, usize), Patch)> + '_ {
        (0..self.spec.window_rows()).flat_map(move |r| {
            (0..self.spec.window_cols()).map(move |c| ((r, c), self.window_at(r, c)))
        })
    }

    /// Row-major bits as one unsigned integer, most significant first.
    pub fn fingerprint(&self) -> Result<u128, FingerprintError> {
        let cells = self.cells.len();
        if cells > 128 {
            return Err(FingerprintError::GridTooLarge { cells, max: 128 });
        }
        let mut acc: u128 = 0;
        for cell in &self.cells {
            let bit = match cell {
                Cell::Zero => 0,
                Cell::One => 1,
                Cell::Unknown => return Err(FingerprintError::IncompleteGrid),
            };
            acc = (acc << 1) | bit;
        }
        Ok(acc)
    }

    fn window_at(&self, r: usize, c: usize) -> Patch {
        let ps = self.spec.patch_size;
        let mut cells = Vec::with_capacity(ps * ps);
        for wr in 0..ps {
            let start = (r + wr) * self.spec.cols + c;
            cells.extend_from_slice(&self.cells[start..start + ps]);
        }
        Patch::from_parts(ps, cells)
    }

    /// Copy of `self` with `patch` written at window anchor `(r, c)`.
    pub(crate) fn with_window(&self, r: usize, c: usize, patch: &Patch) -> Grid {
        debug_assert_eq!(patch.size(), self.spec.patch_size);
        let ps = patch.size();
        let mut out = self.clone();
        for wr in 0..ps {
            let start = (r + wr) * self.spec.cols + c;
            out.cells[start..start + ps].copy_from_slice(&patch.cells()[wr * ps..(wr + 1) * ps]);
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.spec.rows {
            for c in 0..self.spec.cols {
                let ch = match self.cell(r, c) {
                    Cell::Zero => '0',
                    Cell::One => '1',
                    Cell::Unknown => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{One, Unknown, Zero};

    fn cells(bits: &[u8]) -> Vec<Cell> {
        bits.iter()
            .map(|&b| if b == 1 { One } else { Zero })
            .collect()
    }

    #[test]
    fn rejects_undersized_patch_size() {
        let spec = GridSpec {
            rows: 4,
            cols: 4,
            patch_size: 1,
        };
        assert_eq!(
            spec.validate().unwrap_err(),
            GridSpecError::PatchTooSmall { patch_size: 1 }
        );
    }

    #[test]
    fn rejects_oversized_patch_size() {
        let spec = GridSpec {
            rows: 12,
            cols: 12,
            patch_size: 9,
        };
        assert_eq!(
            spec.validate().unwrap_err(),
            GridSpecError::PatchTooLarge { patch_size: 9 }
        );
    }

    #[test]
    fn rejects_grid_smaller_than_patch() {
        let spec = GridSpec {
            rows: 2,
            cols: 4,
            patch_size: 3,
        };
        assert_eq!(
            spec.validate().unwrap_err(),
            GridSpecError::GridSmallerThanPatch {
                rows: 2,
                cols: 4,
                patch_size: 3
            }
        );
    }

    #[test]
    fn seed_grid_is_all_unknown() {
        let grid = Grid::unknown(GridSpec {
            rows: 3,
            cols: 4,
            patch_size: 2,
        })
        .expect("valid spec");
        assert!(!grid.is_complete());
        assert_eq!(grid.cell(2, 3), Unknown);
    }

    #[test]
    fn from_cells_checks_count() {
        let spec = GridSpec {
            rows: 2,
            cols: 2,
            patch_size: 2,
        };
        let err = Grid::from_cells(spec, cells(&[1, 0])).unwrap_err();
        assert_eq!(
            err,
            GridError::CellCountMismatch {
                rows: 2,
                cols: 2,
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn window_extracts_sub_block() {
        let spec = GridSpec {
            rows: 2,
            cols: 3,
            patch_size: 2,
        };
        let grid = Grid::from_cells(spec, cells(&[1, 0, 1, 0, 1, 1])).expect("grid");
        let w = grid.window(0, 1).expect("in range");
        assert_eq!(w.cell(0, 0), Zero);
        assert_eq!(w.cell(0, 1), One);
        assert_eq!(w.cell(1, 0), One);
        assert_eq!(w.cell(1, 1), One);
        assert!(grid.window(0, 2).is_none());
        assert!(grid.window(1, 0).is_none());
    }

    #[test]
    fn windows_iterate_in_raster_order() {
        let grid = Grid::unknown(GridSpec {
            rows: 3,
            cols: 4,
            patch_size: 2,
        })
        .expect("valid spec");
        let anchors: Vec<(usize, usize)> = grid.windows().map(|(anchor, _)| anchor).collect();
        assert_eq!(
            anchors,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn fingerprint_packs_row_major_msb_first() {
        let spec = GridSpec {
            rows: 2,
            cols: 2,
            patch_size: 2,
        };
        let grid = Grid::from_cells(spec, cells(&[1, 0, 0, 1])).expect("grid");
        assert_eq!(grid.fingerprint(), Ok(0b1001));
    }

    #[test]
    fn fingerprint_requires_complete_grid() {
        let grid = Grid::unknown(GridSpec {
            rows: 2,
            cols: 2,
            patch_size: 2,
        })
        .expect("valid spec");
        assert_eq!(grid.fingerprint(), Err(FingerprintError::IncompleteGrid));
    }

    #[test]
    fn fingerprint_tracks_cell_changes() {
        let spec = GridSpec {
            rows: 2,
            cols: 2,
            patch_size: 2,
        };
        let a = Grid::from_cells(spec, cells(&[1, 0, 0, 1])).expect("grid");
        let b = Grid::from_cells(spec, cells(&[1, 0, 1, 1])).expect("grid");
        let c = Grid::from_cells(spec, cells(&[1, 0, 0, 1])).expect("grid");
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn display_marks_unknown_cells() {
        let spec = GridSpec {
            rows: 2,
            cols: 2,
            patch_size: 2,
        };
        let grid = Grid::from_cells(spec, vec![One, Zero, Unknown, One]).expect("grid");
        assert_eq!(grid.to_string(), "10\n.1\n");
    }

    #[test]
    fn spec_serde_round_trip() {
        let spec = GridSpec {
            rows: 6,
            cols: 5,
            patch_size: 3,
        };
        let json = serde_json::to_string(&spec).expect("serialize");
        let back: GridSpec = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(spec, back);
    }
}
