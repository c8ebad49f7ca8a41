//! Geometry and the immutable board state.
//!
//! - [`Tetromino`], [`Orientation`] and [`Point`] - the static shape tables
//! - [`Placement`] - an active piece (shape, orientation and location)
//! - [`Grid`] - the locked blocks, bottom row first
//! - [`GameState`] - the single source of truth passed from frame to frame

pub use self::{grid::*, piece::*, placement::*, state::*};

mod grid;
mod piece;
mod placement;
mod state;
