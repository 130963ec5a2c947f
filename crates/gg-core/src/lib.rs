//! Character grid, glyph classification and binary record for glyphgrid.
//!
//! This crate holds everything with a correctness obligation: the grid and
//! its resize algorithms, the coordinate → glyph rule, the validators and
//! the byte layout. Input loops and process handling live in `gg-app`.

pub mod config;
pub mod error;
pub mod glyph;
pub mod grid;
pub mod record;
pub mod storage;
pub mod validate;

pub use config::SessionConfig;
pub use error::{Axis, GridError};
pub use glyph::{Glyph, classify};
pub use grid::Grid;
pub use storage::{BoundedStorage, CellStorage, InlineStorage, SliceStorage};
pub use validate::{Attributes, CoordinatePair, parse_attributes};
