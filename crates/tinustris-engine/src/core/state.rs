use std::fmt;

use arrayvec::ArrayVec;
use serde::Serialize;

use super::{
    grid::Grid,
    piece::{Block, Point, Tetromino},
    placement::Placement,
};
use crate::{GameStateError, InputHistory, InputSnapshot};

/// Coarse phase of a [`GameState`], derived from its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    /// An active piece is present.
    Falling,
    /// Completed rows are still visible and waiting to disappear.
    Clearing,
    /// Waiting out the appearance delay before the next spawn.
    Spawning,
    /// The board is topped out; no further frame changes anything.
    GameOver,
}

/// Complete state of a one-player game at a single frame.
///
/// States are values: the engine derives every new frame from a copy of the
/// previous one and never changes a state another caller holds. Use
/// [`GameState::builder`] to construct one directly.
///
/// # Example
///
/// ```
/// use tinustris_engine::{GameState, Point, Tetromino};
///
/// let state = GameState::builder()
///     .active_at_spawn(Tetromino::T)
///     .next(Tetromino::I)
///     .build();
///
/// assert_eq!(state.width(), 10);
/// assert_eq!(state.height(), 22);
/// assert_eq!(state.active().map(|a| a.location()), Some(Point::new(3, 16)));
/// assert!(!state.is_game_over());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    grid: Grid,
    active: Option<Placement>,
    next: Tetromino,
    frames_since_last_down_move: u32,
    frames_since_last_lock: u32,
    frames_since_last_move: u32,
    frames_until_lines_disappear: u32,
    input_history: InputHistory,
    block_counter: usize,
    lines: u32,
    level: u32,
    garbage_lines: u32,
    total_garbage: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GameState {
    #[must_use]
    pub fn builder() -> GameStateBuilder {
        GameStateBuilder::new()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The active piece, absent while rows clear or the next piece waits to spawn.
    #[must_use]
    pub fn active(&self) -> Option<Placement> {
        self.active
    }

    #[must_use]
    pub fn next(&self) -> Tetromino {
        self.next
    }

    #[must_use]
    pub fn frames_since_last_down_move(&self) -> u32 {
        self.frames_since_last_down_move
    }

    #[must_use]
    pub fn frames_since_last_lock(&self) -> u32 {
        self.frames_since_last_lock
    }

    /// Frames since the active piece last moved or rotated.
    #[must_use]
    pub fn frames_since_last_move(&self) -> u32 {
        self.frames_since_last_move
    }

    #[must_use]
    pub fn frames_until_lines_disappear(&self) -> u32 {
        self.frames_until_lines_disappear
    }

    #[must_use]
    pub fn input_history(&self) -> &InputHistory {
        &self.input_history
    }

    /// Number of pieces spawned so far, not counting the first one.
    #[must_use]
    pub fn block_counter(&self) -> usize {
        self.block_counter
    }

    #[must_use]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Garbage rows waiting to be injected on the next spawn.
    #[must_use]
    pub fn garbage_lines(&self) -> u32 {
        self.garbage_lines
    }

    /// Garbage rows injected so far.
    #[must_use]
    pub fn total_garbage(&self) -> usize {
        self.total_garbage
    }

    /// Copy of this state with `garbage_lines` pending garbage rows.
    #[must_use]
    pub fn with_garbage_lines(&self, garbage_lines: u32) -> Self {
        Self {
            garbage_lines,
            ..self.clone()
        }
    }

    /// Location at which new pieces appear: centered, with the bounding box
    /// just below the vanish zone.
    #[must_use]
    pub fn spawn_location(&self) -> Point {
        spawn_location(self.width(), self.height())
    }

    /// Grid cells covered by the active piece; empty without one.
    #[must_use]
    pub fn active_cells(&self) -> ArrayVec<Point, 4> {
        self.active.map(|a| a.cells()).unwrap_or_default()
    }

    /// Whether the vanish zone is occupied or the active piece overlaps a locked block.
    #[must_use]
    pub fn is_topped(&self) -> bool {
        self.grid.is_vanish_zone_occupied()
            || self
                .active_cells()
                .iter()
                .any(|&cell| self.grid.is_occupied(cell))
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_topped()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_game_over() {
            Phase::GameOver
        } else if self.active.is_some() {
            Phase::Falling
        } else if self.frames_until_lines_disappear > 0 {
            Phase::Clearing
        } else {
            Phase::Spawning
        }
    }

    /// Whether every cell of the active piece lies inside the grid.
    ///
    /// # Panics
    ///
    /// Panics if there is no active piece.
    #[must_use]
    pub fn is_active_within_bounds(&self) -> bool {
        let active = self.expect_active();
        active.cells().iter().all(|&cell| self.grid.contains(cell))
    }

    #[must_use]
    pub fn can_move_left(&self) -> bool {
        self.can_move(-1, 0)
    }

    #[must_use]
    pub fn can_move_right(&self) -> bool {
        self.can_move(1, 0)
    }

    #[must_use]
    pub fn can_move_down(&self) -> bool {
        self.can_move(0, -1)
    }

    /// Whether the active piece fits after moving it by `(dx, dy)`.
    ///
    /// # Panics
    ///
    /// Panics if there is no active piece.
    #[must_use]
    pub fn can_move(&self, dx: i32, dy: i32) -> bool {
        let active = self.expect_active();
        self.fits(active.translated(dx, dy))
    }

    fn fits(&self, placement: Placement) -> bool {
        placement
            .cells()
            .iter()
            .all(|&cell| self.grid.contains(cell) && !self.grid.is_occupied(cell))
    }

    fn expect_active(&self) -> Placement {
        self.active
            .expect("operation requires an active piece, but there is none")
    }

    /// Where the active piece would land if dropped straight down.
    #[must_use]
    pub fn ghost(&self) -> Option<Placement> {
        let mut ghost = self.active?;
        while self.fits(ghost.translated(0, -1)) {
            ghost = ghost.translated(0, -1);
        }
        Some(ghost)
    }

    #[must_use]
    pub fn ghost_location(&self) -> Option<Point> {
        self.ghost().map(|ghost| ghost.location())
    }

    #[must_use]
    pub fn ghost_cells(&self) -> ArrayVec<Point, 4> {
        self.ghost().map(|ghost| ghost.cells()).unwrap_or_default()
    }

    pub(crate) fn advance_frame<I>(&mut self, input: &I)
    where
        I: InputSnapshot + ?Sized,
    {
        self.input_history = self.input_history.next(input);
        self.frames_since_last_down_move = self.frames_since_last_down_move.saturating_add(1);
        self.frames_since_last_lock = self.frames_since_last_lock.saturating_add(1);
        self.frames_since_last_move = self.frames_since_last_move.saturating_add(1);
        self.frames_until_lines_disappear = self.frames_until_lines_disappear.saturating_sub(1);
    }

    pub(crate) fn remove_full_rows(&mut self) {
        self.grid.remove_full_rows();
    }

    /// Spawns `next` at the spawn location and queues `upcoming` behind it.
    pub(crate) fn spawn(&mut self, upcoming: Tetromino) {
        self.active = Some(Placement::new(self.next, self.spawn_location()));
        self.next = upcoming;
        self.block_counter += 1;
        self.frames_since_last_down_move = 0;
        self.frames_since_last_move = 0;
        self.frames_until_lines_disappear = 0;
    }

    pub(crate) fn inject_garbage_row(&mut self, gap: usize) {
        self.grid.push_garbage_row(gap);
        self.garbage_lines -= 1;
        self.total_garbage += 1;
    }

    pub(crate) fn set_active(&mut self, placement: Placement) {
        self.active = Some(placement);
    }

    pub(crate) fn set_next(&mut self, next: Tetromino) {
        self.next = next;
    }

    pub(crate) fn reset_down_move_counter(&mut self) {
        self.frames_since_last_down_move = 0;
    }

    pub(crate) fn reset_move_counter(&mut self) {
        self.frames_since_last_move = 0;
    }

    /// Paints the active piece into the grid and adds its full rows to the
    /// line count.
    ///
    /// Full rows stay in place until [`GameState::remove_full_rows`] runs.
    pub(crate) fn lock(&mut self, line_clear_delay: impl FnOnce(&Self) -> u32) {
        let active = self.expect_active();
        self.grid.paint(active.cells(), active.tetromino().block());
        let scored = self.grid.full_row_count();
        self.frames_until_lines_disappear = if scored > 0 {
            line_clear_delay(self)
        } else {
            0
        };
        self.lines = self
            .lines
            .saturating_add(u32::try_from(scored).unwrap_or(u32::MAX));
        self.active = None;
        self.frames_since_last_down_move = 0;
        self.frames_since_last_lock = 0;
        self.frames_since_last_move = 0;
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

fn spawn_location(width: usize, height: usize) -> Point {
    let x = i32::try_from(width / 2).expect("grid width fits in i32") - 2;
    let y = i32::try_from(height - 4 - Grid::VANISH_ZONE_HEIGHT).expect("grid height fits in i32");
    Point::new(x, y)
}

/// ASCII rendering: locked blocks and the active piece by letter, the ghost
/// piece as `_`, garbage as `G`.
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_cells();
        let ghost = self.ghost_cells();
        let active_char = self.active.map(|a| a.tetromino().as_char());
        let border = "-".repeat(self.width());

        writeln!(f, "+{border}+")?;
        for (y, row) in self.grid.rows().enumerate().rev() {
            f.write_str("|")?;
            for (x, cell) in row.iter().enumerate() {
                let point = Point::new(
                    i32::try_from(x).map_err(|_| fmt::Error)?,
                    i32::try_from(y).map_err(|_| fmt::Error)?,
                );
                let c = match (cell, active_char) {
                    (_, Some(c)) if active.contains(&point) => c,
                    (Some(block), _) => block.as_char(),
                    (None, _) if ghost.contains(&point) => '_',
                    (None, _) => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "+{border}+")
    }
}

/// Builder for [`GameState`].
///
/// Every field defaults to the state at game start: an empty 10×22 grid, no
/// active piece and all counters at zero.
#[derive(Debug, Clone)]
pub struct GameStateBuilder {
    width: usize,
    height: usize,
    cells: Option<Vec<Option<Block>>>,
    blocks: Vec<(Point, Block)>,
    active: PendingActive,
    next: Tetromino,
    frames_since_last_down_move: u32,
    frames_since_last_lock: u32,
    frames_since_last_move: u32,
    frames_until_lines_disappear: u32,
    input_history: InputHistory,
    block_counter: usize,
    lines: u32,
    level: u32,
    garbage_lines: u32,
    total_garbage: usize,
}

#[derive(Debug, Clone, Copy)]
enum PendingActive {
    None,
    AtSpawn(Tetromino),
    Placed(Placement),
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: Grid::DEFAULT_WIDTH,
            height: Grid::DEFAULT_HEIGHT,
            cells: None,
            blocks: vec![],
            active: PendingActive::None,
            next: Tetromino::I,
            frames_since_last_down_move: 0,
            frames_since_last_lock: 0,
            frames_since_last_move: 0,
            frames_until_lines_disappear: 0,
            input_history: InputHistory::default(),
            block_counter: 0,
            lines: 0,
            level: 0,
            garbage_lines: 0,
            total_garbage: 0,
        }
    }

    /// Dimensions of an empty grid. Ignored when [`Self::cells`] is given.
    #[must_use]
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Explicit grid contents, bottom row first; the height follows from the length.
    #[must_use]
    pub fn cells(mut self, width: usize, cells: Vec<Option<Block>>) -> Self {
        self.width = width;
        self.cells = Some(cells);
        self
    }

    /// Places a single locked block.
    #[must_use]
    pub fn block(mut self, x: i32, y: i32, block: Block) -> Self {
        self.blocks.push((Point::new(x, y), block));
        self
    }

    #[must_use]
    pub fn active(mut self, placement: Placement) -> Self {
        self.active = PendingActive::Placed(placement);
        self
    }

    /// Places `tetromino` at the spawn location of the final grid.
    #[must_use]
    pub fn active_at_spawn(mut self, tetromino: Tetromino) -> Self {
        self.active = PendingActive::AtSpawn(tetromino);
        self
    }

    #[must_use]
    pub fn next(mut self, next: Tetromino) -> Self {
        self.next = next;
        self
    }

    #[must_use]
    pub fn frames_since_last_down_move(mut self, frames: u32) -> Self {
        self.frames_since_last_down_move = frames;
        self
    }

    #[must_use]
    pub fn frames_since_last_lock(mut self, frames: u32) -> Self {
        self.frames_since_last_lock = frames;
        self
    }

    #[must_use]
    pub fn frames_since_last_move(mut self, frames: u32) -> Self {
        self.frames_since_last_move = frames;
        self
    }

    #[must_use]
    pub fn frames_until_lines_disappear(mut self, frames: u32) -> Self {
        self.frames_until_lines_disappear = frames;
        self
    }

    #[must_use]
    pub fn input_history(mut self, input_history: InputHistory) -> Self {
        self.input_history = input_history;
        self
    }

    #[must_use]
    pub fn block_counter(mut self, block_counter: usize) -> Self {
        self.block_counter = block_counter;
        self
    }

    #[must_use]
    pub fn lines(mut self, lines: u32) -> Self {
        self.lines = lines;
        self
    }

    #[must_use]
    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn garbage_lines(mut self, garbage_lines: u32) -> Self {
        self.garbage_lines = garbage_lines;
        self
    }

    #[must_use]
    pub fn total_garbage(mut self, total_garbage: usize) -> Self {
        self.total_garbage = total_garbage;
        self
    }

    /// Validates the dimensions and builds the state.
    ///
    /// # Panics
    ///
    /// Panics if a block set with [`Self::block`] lies outside the grid.
    pub fn try_build(self) -> Result<GameState, GameStateError> {
        let mut grid = match self.cells {
            Some(cells) => Grid::from_cells(self.width, cells)?,
            None => Grid::empty(self.width, self.height)?,
        };
        for (point, block) in self.blocks {
            grid.paint([point], block);
        }
        let active = match self.active {
            PendingActive::None => None,
            PendingActive::AtSpawn(tetromino) => Some(Placement::new(
                tetromino,
                spawn_location(grid.width(), grid.height()),
            )),
            PendingActive::Placed(placement) => Some(placement),
        };
        Ok(GameState {
            grid,
            active,
            next: self.next,
            frames_since_last_down_move: self.frames_since_last_down_move,
            frames_since_last_lock: self.frames_since_last_lock,
            frames_since_last_move: self.frames_since_last_move,
            frames_until_lines_disappear: self.frames_until_lines_disappear,
            input_history: self.input_history,
            block_counter: self.block_counter,
            lines: self.lines,
            level: self.level,
            garbage_lines: self.garbage_lines,
            total_garbage: self.total_garbage,
        })
    }

    /// Like [`Self::try_build`], but invalid dimensions are a programming error.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are invalid.
    #[must_use]
    pub fn build(self) -> GameState {
        match self.try_build() {
            Ok(state) => state,
            Err(e) => panic!("invalid game state: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Input, InputState, Orientation};

    fn full_row(state: GameStateBuilder, y: i32, gaps: &[i32]) -> GameStateBuilder {
        (0..10)
            .filter(|x| !gaps.contains(x))
            .fold(state, |state, x| state.block(x, y, Block::Garbage))
    }

    #[test]
    fn test_default_state() {
        let state = GameState::default();
        assert_eq!(state.width(), Grid::DEFAULT_WIDTH);
        assert_eq!(state.height(), Grid::DEFAULT_HEIGHT);
        assert_eq!(state.grid().block_count(), 0);
        assert!(state.active().is_none());
        assert_eq!(state.block_counter(), 0);
        assert_eq!(state.phase(), Phase::Spawning);
    }

    #[test]
    fn test_spawn_location() {
        let state = GameState::builder().dimensions(4, 6).build();
        assert_eq!(state.spawn_location(), Point::new(0, 0));
        let state = GameState::builder().dimensions(15, 30).build();
        assert_eq!(state.spawn_location(), Point::new(5, 24));
    }

    #[test]
    #[should_panic(expected = "grid width 2 is below the minimum of 4")]
    fn test_build_rejects_narrow_grid() {
        let _ = GameState::builder().dimensions(2, 22).build();
    }

    #[test]
    fn test_try_build_rejects_ragged_grid() {
        let result = GameState::builder().cells(10, vec![None; 225]).try_build();
        assert_eq!(
            result,
            Err(GameStateError::GridNotMultipleOfWidth {
                len: 225,
                width: 10
            })
        );
    }

    #[test]
    #[should_panic(expected = "requires an active piece")]
    fn test_movement_predicate_without_active_panics() {
        let _ = GameState::default().can_move_down();
    }

    #[test]
    fn test_movement_predicates() {
        let state = GameState::builder()
            .active(Placement::new(Tetromino::O, Point::new(-1, -1)))
            .build();
        assert!(!state.can_move_left());
        assert!(state.can_move_right());
        assert!(!state.can_move_down());
        assert!(state.is_active_within_bounds());

        let state = GameState::builder()
            .active(Placement::new(Tetromino::O, Point::new(3, 5)))
            .block(4, 5, Block::J)
            .block(2, 6, Block::J)
            .build();
        assert!(!state.can_move_down());
        assert!(state.can_move_left());
        assert!(!state.can_move(-2, 0));
    }

    #[test]
    fn test_topped() {
        let state = GameState::builder().block(0, 20, Block::S).build();
        assert!(state.is_topped());
        assert!(state.phase().is_game_over());

        let state = GameState::builder()
            .block(3, 18, Block::S)
            .active_at_spawn(Tetromino::I)
            .build();
        assert!(state.is_topped());

        let state = GameState::builder()
            .block(3, 19, Block::S)
            .active_at_spawn(Tetromino::I)
            .build();
        assert!(!state.is_topped());
        assert!(state.phase().is_falling());
    }

    #[test]
    fn test_topped_with_active_outside_grid() {
        let state = GameState::builder()
            .active(Placement::with_orientation(
                Tetromino::I,
                Orientation::FlatUp,
                Point::new(-3, 4),
            ))
            .build();
        assert!(!state.is_topped());
        assert!(!state.is_active_within_bounds());
    }

    #[test]
    fn test_ghost() {
        let state = full_row(GameState::builder(), 0, &[4])
            .active(Placement::new(Tetromino::I, Point::new(3, 10)))
            .build();
        assert_eq!(state.ghost_location(), Some(Point::new(3, -1)));
        assert_eq!(
            state.ghost_cells().as_slice(),
            &[
                Point::new(3, 1),
                Point::new(4, 1),
                Point::new(5, 1),
                Point::new(6, 1)
            ]
        );
        assert_eq!(GameState::default().ghost_location(), None);
    }

    #[test]
    fn test_lock_counts_rows_and_keeps_them() {
        let mut state = full_row(GameState::builder(), 0, &[4, 5])
            .active(Placement::new(Tetromino::O, Point::new(3, -1)))
            .next(Tetromino::T)
            .frames_since_last_move(7)
            .build();
        state.lock(|_| 25);

        assert_eq!(state.lines(), 1);
        assert_eq!(state.frames_until_lines_disappear(), 25);
        assert!(state.active().is_none());
        assert_eq!(state.next(), Tetromino::T);
        assert_eq!(state.frames_since_last_move(), 0);
        assert!(state.grid().is_full_row(0));
        assert_eq!(state.phase(), Phase::Clearing);

        state.remove_full_rows();
        assert_eq!(state.grid().block_count(), 2);
    }

    #[test]
    fn test_advance_frame() {
        let mut state = GameState::builder()
            .frames_until_lines_disappear(1)
            .frames_since_last_lock(4)
            .build();
        state.advance_frame(&InputState::from_iter([Input::Hold]));
        assert_eq!(state.frames_since_last_lock(), 5);
        assert_eq!(state.frames_since_last_down_move(), 1);
        assert_eq!(state.frames_until_lines_disappear(), 0);
        assert_eq!(state.input_history().frames_held(Input::Hold), 1);

        state.advance_frame(&InputState::NONE);
        assert_eq!(state.frames_until_lines_disappear(), 0);
        assert_eq!(state.input_history().frames_held(Input::Hold), 0);
    }

    #[test]
    fn test_display() {
        let state = GameState::builder()
            .dimensions(4, 6)
            .block(0, 0, Block::Garbage)
            .block(1, 0, Block::Z)
            .active(Placement::new(Tetromino::O, Point::new(1, 1)))
            .build();
        let expected = "\
+----+
|....|
|....|
|..OO|
|..OO|
|..__|
|GZ__|
+----+";
        assert_eq!(state.to_string(), expected);
    }
}
