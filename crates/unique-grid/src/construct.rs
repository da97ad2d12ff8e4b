//! Backtracking construction of rotation-unique grids.
//!
//! The search keeps a last-in-first-out work list of owned grid
//! snapshots. Each step pops a snapshot, finds its first window (in
//! raster order) that still contains an `Unknown` cell, enumerates every
//! completion of that window, filters out completions that are
//! rotation-invariant or collide under rotation with an already-fixed
//! window, and pushes the survivors. A window with no surviving
//! completion leaves its branch without successors; backtracking is
//! implicit in the pop order, with no undo log because every snapshot
//! owns its cells.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, GridSpec, GridSpecError};
use crate::patch::Cell;

/// Optional bounds on the search.
///
/// The default is unbounded: the search runs until it finds a complete
/// grid or exhausts the tree, which for infeasible parameters can be
/// combinatorially expensive.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Stop after this many snapshot expansions.
    ///
    /// The bound is deterministic, unlike a wall-clock deadline, so
    /// bounded runs stay reproducible. A bounded search that stops early
    /// reports [`ConstructError::BudgetExceeded`] and never a partial
    /// grid.
    pub max_expansions: Option<u64>,
}

/// Construction failures.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConstructError {
    #[error(transparent)]
    InvalidSpec(#[from] GridSpecError),
    #[error(
        "no grid satisfies rows={rows} cols={cols} patch_size={patch_size}; \
         retry with a larger patch_size"
    )]
    Exhausted {
        rows: usize,
        cols: usize,
        patch_size: usize,
    },
    #[error("search budget of {budget} expansions exhausted without a complete grid")]
    BudgetExceeded { budget: u64 },
}

/// Build a grid in which every `patch_size x patch_size` window is
/// rotation-asymmetric and no two windows match under rotation.
///
/// Deterministic: equal specs produce bit-identical grids. Fails with
/// [`ConstructError::Exhausted`] when the full search tree contains no
/// solution; the caller may retry with a larger `patch_size`.
pub fn construct(spec: GridSpec) -> Result<Grid, ConstructError> {
    construct_with(spec, &SearchLimits::default())
}

/// [`construct`] with explicit search limits.
pub fn construct_with(spec: GridSpec, limits: &SearchLimits) -> Result<Grid, ConstructError> {
    let seed = Grid::unknown(spec)?;
    log::debug!(
        "constructing {}x{} grid with patch_size {}",
        spec.rows,
        spec.cols,
        spec.patch_size
    );

    let mut stack = vec![seed];
    let mut expansions: u64 = 0;

    while let Some(grid) = stack.pop() {
        if grid.is_complete() {
            log::debug!("complete grid found after {expansions} expansions");
            return Ok(grid);
        }

        if let Some(budget) = limits.max_expansions {
            if expansions >= budget {
                log::debug!("stopping after {expansions} expansions (budget {budget})");
                return Err(ConstructError::BudgetExceeded { budget });
            }
        }
        expansions += 1;

        let open = first_open_window(&grid).expect("an incomplete grid has an open window");
        match expand(&grid, &open) {
            Expansion::Advanced(candidates) => {
                log::trace!(
                    "window ({}, {}): {} candidate completions",
                    open.row,
                    open.col,
                    candidates.len()
                );
                // Pushed in ascending completion-index order, so the
                // highest surviving index is explored first.
                stack.extend(candidates);
            }
            Expansion::DeadEnd { row, col } => {
                log::trace!("window ({row}, {col}) admits no completion, dropping branch");
            }
        }
    }

    log::debug!("search exhausted after {expansions} expansions");
    Err(ConstructError::Exhausted {
        rows: spec.rows,
        cols: spec.cols,
        patch_size: spec.patch_size,
    })
}

/// First window (raster order) with an `Unknown` cell, plus the
/// canonical codes of every fully determined window before it.
struct OpenWindow {
    row: usize,
    col: usize,
    used: HashSet<u64>,
}

/// Outcome of expanding one snapshot at its open window.
enum Expansion {
    /// Surviving completions, ascending by completion index.
    Advanced(Vec<Grid>),
    /// No completion survived the filters.
    DeadEnd { row: usize, col: usize },
}

fn first_open_window(grid: &Grid) -> Option<OpenWindow> {
    let mut used = HashSet::new();
    for ((row, col), patch) in grid.windows() {
        if patch.is_complete() {
            used.insert(patch.canonical_code());
        } else {
            return Some(OpenWindow { row, col, used });
        }
    }
    None
}

fn expand(grid: &Grid, open: &OpenWindow) -> Expansion {
    let base = grid
        .window(open.row, open.col)
        .expect("open window anchor is in range");
    let slots = base.unknown_positions();

    // Completion index bits are assigned most-significant-first to the
    // unknown positions in window raster order; `next_fill` advances the
    // vector like a binary counter, so candidates are visited in
    // ascending index order.
    let mut fill = vec![Cell::Zero; slots.len()];
    let mut seen = open.used.clone();
    let mut candidates = Vec::new();

    loop {
        let patch = base.completed(&slots, &fill);
        // `seen` also accumulates accepted completions of this window,
        // so rotation-duplicates within the enumeration are rejected
        // alongside collisions with already-fixed windows.
        if !patch.is_rotation_invariant() && seen.insert(patch.canonical_code()) {
            candidates.push(grid.with_window(open.row, open.col, &patch));
        }
        if !next_fill(&mut fill) {
            break;
        }
    }

    if candidates.is_empty() {
        Expansion::DeadEnd {
            row: open.row,
            col: open.col,
        }
    } else {
        Expansion::Advanced(candidates)
    }
}

/// Advance the fill vector as a binary counter, last cell least
/// significant. Returns false once the counter wraps.
fn next_fill(fill: &mut [Cell]) -> bool {
    for cell in fill.iter_mut().rev() {
        if *cell == Cell::Zero {
            *cell = Cell::One;
            return true;
        }
        *cell = Cell::Zero;
    }
    false
}
