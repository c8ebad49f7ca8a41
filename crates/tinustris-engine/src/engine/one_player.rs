use std::{fmt, sync::Arc};

use crate::{
    Action, GameConfig, GameState, GapGenerator, Generator, Grid, Input, InputSnapshot,
    LevelSystem, SpeedCurve, Tetromino, TetrominoGenerator,
};

/// Consecutive garbage rows sharing one gap column.
const ALIGNED_GARBAGE_LINES: usize = 9;

/// Held inputs repeat every this many frames.
const INPUT_REPEAT_FRAMES: u32 = 10;

/// Frame-stepped simulation of a single player's board.
///
/// The engine itself is stateless: [`OnePlayerEngine::compute_next_state`]
/// derives each frame from the previous one. Only the generators remember
/// what they have drawn.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use tinustris_engine::{
///     ClassicLevelSystem, ConstantCurve, InputState, OnePlayerEngine, Tetromino,
/// };
///
/// let engine = OnePlayerEngine::new(
///     Arc::new(|_: usize| Tetromino::O),
///     Arc::new(|_: usize| 0_usize),
///     Box::new(ConstantCurve::default()),
///     Box::new(ClassicLevelSystem::new(0)),
/// );
/// let mut state = engine.init_game_state();
/// for _ in 0..64 {
///     state = engine.compute_next_state(&state, &InputState::NONE);
/// }
/// assert_eq!(state.active().unwrap().location().y(), 15);
/// ```
pub struct OnePlayerEngine {
    tetrominoes: Arc<dyn Generator<Tetromino>>,
    gaps: Arc<dyn Generator<usize>>,
    speed_curve: Box<dyn SpeedCurve>,
    level_system: Box<dyn LevelSystem>,
}

impl fmt::Debug for OnePlayerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnePlayerEngine")
            .field("speed_curve", &self.speed_curve)
            .field("level_system", &self.level_system)
            .finish_non_exhaustive()
    }
}

impl OnePlayerEngine {
    #[must_use]
    pub fn new(
        tetrominoes: Arc<dyn Generator<Tetromino>>,
        gaps: Arc<dyn Generator<usize>>,
        speed_curve: Box<dyn SpeedCurve>,
        level_system: Box<dyn LevelSystem>,
    ) -> Self {
        Self {
            tetrominoes,
            gaps,
            speed_curve,
            level_system,
        }
    }

    /// Builds an engine for the default 10-column board from a configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let tetrominoes = config
            .tetromino_seed
            .map_or_else(TetrominoGenerator::new, TetrominoGenerator::with_seed);
        let width = Grid::DEFAULT_WIDTH;
        let gaps = config.gap_seed.map_or_else(
            || GapGenerator::new(width),
            |seed| GapGenerator::with_seed(seed, width),
        );
        Self::new(
            Arc::new(tetrominoes),
            Arc::new(gaps),
            config.behavior.speed_curve(),
            config.behavior.level_system(config.start_level),
        )
    }

    /// Source of upcoming pieces, for look-ahead previews.
    #[must_use]
    pub fn tetrominoes(&self) -> &Arc<dyn Generator<Tetromino>> {
        &self.tetrominoes
    }

    #[must_use]
    pub fn speed_curve(&self) -> &dyn SpeedCurve {
        self.speed_curve.as_ref()
    }

    #[must_use]
    pub fn level_system(&self) -> &dyn LevelSystem {
        self.level_system.as_ref()
    }

    /// State at game start: empty default-sized board, first piece at the
    /// spawn location, second piece up next.
    #[must_use]
    pub fn init_game_state(&self) -> GameState {
        let mut state = GameState::builder()
            .active_at_spawn(self.tetrominoes.get(0))
            .next(self.tetrominoes.get(1))
            .build();
        let level = self.level_system.compute_level(&state, &state);
        state.set_level(level);
        state
    }

    /// Simulates one frame.
    ///
    /// Once `previous` is game over it is returned unchanged.
    #[must_use]
    pub fn compute_next_state<I>(&self, previous: &GameState, input: &I) -> GameState
    where
        I: InputSnapshot + ?Sized,
    {
        if previous.is_game_over() {
            return previous.clone();
        }

        let mut state = previous.clone();
        state.advance_frame(input);

        if previous.frames_until_lines_disappear() == 1 {
            state.remove_full_rows();
        }

        if previous.active().is_none()
            && previous.frames_until_lines_disappear() <= 1
            && self.speed_curve.are(previous) < previous.frames_since_last_lock()
        {
            state.spawn(self.tetrominoes.get(previous.block_counter() + 2));
            while state.garbage_lines() > 0 {
                let gap = self.gaps.get(state.total_garbage() / ALIGNED_GARBAGE_LINES);
                state.inject_garbage_row(gap);
            }
        }

        if state.active().is_some() {
            for action in self.determine_actions(previous, &state, input) {
                state = self.execute(state, action);
            }
        }

        let level = self.level_system.compute_level(previous, &state);
        state.set_level(level);
        state
    }

    fn determine_actions<I>(&self, previous: &GameState, state: &GameState, input: &I) -> Vec<Action>
    where
        I: InputSnapshot + ?Sized,
    {
        let mut actions = vec![];

        let gravity = self.speed_curve.internal_gravity(state);
        if 256 / gravity <= state.frames_since_last_down_move() {
            let cells = (gravity / 256).max(1);
            actions.extend((0..cells).map(|_| Action::GravityDrop));
        }

        actions.extend(
            Input::ALL
                .into_iter()
                .filter(|&input_kind| input.is_pressed(input_kind))
                .filter(|&input_kind| {
                    previous.input_history().frames_held(input_kind) % INPUT_REPEAT_FRAMES == 0
                })
                .map(Input::action),
        );

        if self.speed_curve.lock_delay(state) < state.frames_since_last_move() {
            actions.push(Action::Lock);
        }

        actions.sort();
        actions
    }

    fn execute(&self, mut state: GameState, action: Action) -> GameState {
        // An earlier action of the same frame may have locked the piece.
        let Some(active) = state.active() else {
            return state;
        };

        match action {
            Action::MoveDown => {
                if state.can_move_down() {
                    move_down(&mut state);
                } else {
                    self.lock(&mut state);
                }
            }
            Action::GravityDrop => {
                if state.can_move_down() {
                    move_down(&mut state);
                }
            }
            Action::Lock => {
                if !state.can_move_down() {
                    self.lock(&mut state);
                }
            }
            Action::MoveLeft => {
                if state.can_move_left() {
                    shift(&mut state, -1);
                }
            }
            Action::MoveRight => {
                if state.can_move_right() {
                    shift(&mut state, 1);
                }
            }
            Action::HardDrop => {
                while state.can_move_down() {
                    move_down(&mut state);
                }
                self.lock(&mut state);
            }
            Action::TurnLeft => {
                let mut turned = state.clone();
                turned.set_active(active.rotated_counterclockwise());
                turned.reset_move_counter();
                return repair(state, turned);
            }
            Action::TurnRight => {
                let mut turned = state.clone();
                turned.set_active(active.rotated_clockwise());
                turned.reset_move_counter();
                return repair(state, turned);
            }
            Action::Hold => {
                let mut held = state.clone();
                held.set_active(active.swapped(state.next()));
                held.set_next(active.tetromino());
                held.reset_move_counter();
                return repair(state, held);
            }
        }
        state
    }

    fn lock(&self, state: &mut GameState) {
        state.lock(|state| self.speed_curve.line_clear_delay(state));
    }
}

fn move_down(state: &mut GameState) {
    let Some(active) = state.active() else {
        return;
    };
    state.set_active(active.translated(0, -1));
    state.reset_down_move_counter();
    state.reset_move_counter();
}

fn shift(state: &mut GameState, dx: i32) {
    let Some(active) = state.active() else {
        return;
    };
    state.set_active(active.translated(dx, 0));
    state.reset_move_counter();
}

/// Accepts `after` if its piece is in bounds and free, otherwise nudges it one
/// column right, then one column left, and finally falls back to `before`.
fn repair(before: GameState, mut after: GameState) -> GameState {
    if after.is_active_within_bounds() && !after.is_topped() {
        after
    } else if after.can_move_right() {
        shift(&mut after, 1);
        after
    } else if after.can_move_left() {
        shift(&mut after, -1);
        after
    } else {
        before
    }
}
