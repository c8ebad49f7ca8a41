//! Game rules and the per-frame simulation.
//!
//! - [`Generator`] - index-addressable content sources ([`TetrominoGenerator`],
//!   [`GapGenerator`]) seeded by a [`GeneratorSeed`]
//! - [`Input`], [`InputState`] and [`InputHistory`] - what the player holds each frame
//! - [`SpeedCurve`] - gravity, lock delay, appearance delay and line clear delay
//! - [`LevelSystem`] - how the level follows from pieces and lines
//! - [`Behavior`] and [`GameConfig`] - named rule presets and game settings
//! - [`OnePlayerEngine`] - the frame transition function
//!
//! # Frame Flow
//!
//! Every call to [`OnePlayerEngine::compute_next_state`]:
//!
//! 1. Returns a finished game unchanged
//! 2. Records the input and advances the frame counters
//! 3. Removes completed rows when their clear delay runs out
//! 4. Spawns the next piece once the appearance delay has passed, then
//!    injects pending garbage rows
//! 5. Applies gravity, player actions and lock delay to the active piece
//! 6. Recomputes the level

pub use self::{behavior::*, generator::*, input::*, level::*, one_player::*, speed_curve::*};

mod behavior;
mod generator;
mod input;
mod level;
mod one_player;
mod speed_curve;
