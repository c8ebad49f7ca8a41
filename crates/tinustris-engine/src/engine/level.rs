use std::fmt;

use crate::GameState;

/// Computes the level of a freshly simulated frame.
pub trait LevelSystem: fmt::Debug + Send + Sync {
    /// Level for `state`, the frame that followed `previous`.
    ///
    /// `state` carries every change of its frame except the level itself.
    fn compute_level(&self, previous: &GameState, state: &GameState) -> u32;
}

/// One level per ten cleared lines, never below the starting level.
///
/// # Example
///
/// ```
/// use tinustris_engine::{ClassicLevelSystem, GameState, LevelSystem as _};
///
/// let levels = ClassicLevelSystem::new(5);
/// let state = GameState::builder().lines(89).build();
/// assert_eq!(levels.compute_level(&state, &state), 8);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassicLevelSystem {
    start_level: u32,
}

impl ClassicLevelSystem {
    #[must_use]
    pub const fn new(start_level: u32) -> Self {
        Self { start_level }
    }

    #[must_use]
    pub const fn start_level(&self) -> u32 {
        self.start_level
    }
}

impl LevelSystem for ClassicLevelSystem {
    fn compute_level(&self, _previous: &GameState, state: &GameState) -> u32 {
        self.start_level.max(state.lines() / 10)
    }
}

/// Arcade-style leveling: one level per spawned piece and one per cleared line.
///
/// Spawns stop at the section stops (`x99` and 998); only line clears move
/// the level past a stop. The level never exceeds 999.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TheGrandMasterLevelSystem;

impl TheGrandMasterLevelSystem {
    pub const MAX_LEVEL: u32 = 999;

    const fn section_stop(level: u32) -> u32 {
        if level < 900 {
            level / 100 * 100 + 99
        } else {
            Self::MAX_LEVEL - 1
        }
    }
}

impl LevelSystem for TheGrandMasterLevelSystem {
    fn compute_level(&self, previous: &GameState, state: &GameState) -> u32 {
        let pieces = state.block_counter().saturating_sub(previous.block_counter());
        let lines = state.lines().saturating_sub(previous.lines());

        let mut level = previous.level();
        if pieces > 0 {
            let stop = Self::section_stop(level);
            if level < stop {
                let pieces = u32::try_from(pieces).unwrap_or(u32::MAX);
                level = level.saturating_add(pieces).min(stop);
            }
        }
        level.saturating_add(lines).min(Self::MAX_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classic {
        use super::*;

        fn level(start_level: u32, lines: u32) -> u32 {
            let state = GameState::builder().lines(lines).build();
            ClassicLevelSystem::new(start_level).compute_level(&state, &state)
        }

        #[test]
        fn test_from_level_0() {
            for lines in 0..10 {
                assert_eq!(level(0, lines), 0, "{lines} lines");
            }
            assert_eq!(level(0, 10), 1);
            assert_eq!(level(0, 11), 1);
            assert_eq!(level(0, 21), 2);
            assert_eq!(level(0, 65), 6);
            assert_eq!(level(0, 99), 9);
            assert_eq!(level(0, 999), 99);
        }

        #[test]
        fn test_from_level_5() {
            assert_eq!(level(5, 0), 5);
            assert_eq!(level(5, 34), 5);
            assert_eq!(level(5, 59), 5);
            assert_eq!(level(5, 60), 6);
            assert_eq!(level(5, 89), 8);
        }
    }

    mod the_grand_master {
        use super::*;

        fn state(block_counter: usize, lines: u32, level: u32) -> GameState {
            GameState::builder()
                .block_counter(block_counter)
                .lines(lines)
                .level(level)
                .build()
        }

        fn level(previous: (usize, u32, u32), next: (usize, u32)) -> u32 {
            let previous = state(previous.0, previous.1, previous.2);
            let next = state(next.0, next.1, 0);
            TheGrandMasterLevelSystem.compute_level(&previous, &next)
        }

        #[test]
        fn test_spawn_advances_level() {
            assert_eq!(level((0, 0, 0), (1, 0)), 1);
            assert_eq!(level((0, 0, 1), (1, 0)), 2);
        }

        #[test]
        fn test_line_advances_level() {
            assert_eq!(level((0, 0, 0), (0, 1)), 1);
            assert_eq!(level((85, 7, 123), (86, 10)), 127);
        }

        #[test]
        fn test_nothing_happened() {
            assert_eq!(level((0, 0, 0), (0, 0)), 0);
            assert_eq!(level((12, 3, 40), (12, 3)), 40);
        }

        #[test]
        fn test_section_stop() {
            assert_eq!(level((103, 7, 98), (104, 7)), 99);
            assert_eq!(level((103, 7, 99), (104, 7)), 99);
            assert_eq!(level((103, 7, 199), (104, 7)), 199);
            assert_eq!(level((103, 7, 199), (104, 8)), 200);
            assert_eq!(level((400, 7, 997), (401, 7)), 998);
            assert_eq!(level((400, 7, 998), (401, 7)), 998);
        }

        #[test]
        fn test_capped_at_999() {
            assert_eq!(level((400, 7, 998), (401, 11)), 999);
            assert_eq!(level((400, 7, 999), (400, 8)), 999);
        }
    }
}
