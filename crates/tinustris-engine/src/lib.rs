//! Frame-stepped single-player Tetris engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - geometry, the playing field and the immutable [`GameState`] value
//! - [`engine`] - content generators, input model, speed curves, level systems,
//!   rule presets and the per-frame [`OnePlayerEngine`]
//!
//! # Example
//!
//! ```
//! use tinustris_engine::{Behavior, GameConfig, GeneratorSeed, Input, InputState, OnePlayerEngine};
//!
//! let config = GameConfig {
//!     behavior: Behavior::Nes,
//!     tetromino_seed: Some(GeneratorSeed::new(42)),
//!     gap_seed: Some(GeneratorSeed::new(7)),
//!     ..GameConfig::default()
//! };
//! let engine = OnePlayerEngine::from_config(&config);
//!
//! let mut state = engine.init_game_state();
//! let input = InputState::from_iter([Input::HardDrop]);
//! state = engine.compute_next_state(&state, &input);
//! assert_eq!(state.block_counter(), 0);
//! assert!(state.active().is_none());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid dimensions or contents passed when constructing a [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameStateError {
    #[display("grid width {width} is below the minimum of {min}")]
    WidthTooSmall { width: usize, min: usize },
    #[display("grid height {height} is below the minimum of {min}")]
    HeightTooSmall { height: usize, min: usize },
    #[display("grid of {len} cells is not a multiple of width {width}")]
    GridNotMultipleOfWidth { len: usize, width: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown behavior: {name}")]
pub struct ParseBehaviorError {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed: expected 16 hex characters, got {input:?}")]
pub struct ParseSeedError {
    pub input: String,
}
