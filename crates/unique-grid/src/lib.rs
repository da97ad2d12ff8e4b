//! Rotation-unique binary grids for self-identifying calibration targets.
//!
//! A printable chessboard- or dot-board-style target is only useful for
//! localizing a *partially visible, possibly rotated* photograph if every
//! local view pins down where on the board it came from and which way is
//! up. This crate constructs binary grids with exactly that property:
//! every `patch_size × patch_size` window is rotation-asymmetric, and no
//! two windows match under any 90° rotation.
//!
//! ## Quickstart
//!
//! ```
//! use unique_grid::{construct, is_valid, GridSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = construct(GridSpec { rows: 4, cols: 4, patch_size: 3 })?;
//! assert!(is_valid(&grid));
//! println!("fingerprint = {}", grid.fingerprint()?);
//! # Ok(())
//! # }
//! ```
//!
//! Construction is an exhaustive depth-first search over window
//! completions and can fail for tight parameters; callers are expected
//! to retry with a larger `patch_size` (the `unique-grid` binary does
//! this with `--max-patch-size`). The search is fully deterministic:
//! equal specs always produce bit-identical grids.

mod construct;
mod grid;
mod logger;
mod patch;
mod validate;

pub use construct::{construct, construct_with, ConstructError, SearchLimits};
pub use grid::{FingerprintError, Grid, GridError, GridSpec, GridSpecError};
pub use patch::{Cell, Patch, PatchError};
pub use validate::{is_valid, validate, ValidationError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
