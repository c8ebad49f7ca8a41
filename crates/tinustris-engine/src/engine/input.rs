use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Input {
    Left = 0,
    Right = 1,
    SoftDrop = 2,
    HardDrop = 3,
    TurnLeft = 4,
    TurnRight = 5,
    Hold = 6,
}

impl Input {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::Left,
        Self::Right,
        Self::SoftDrop,
        Self::HardDrop,
        Self::TurnLeft,
        Self::TurnRight,
        Self::Hold,
    ];

    /// Action emitted while this input is held.
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::Left => Action::MoveLeft,
            Self::Right => Action::MoveRight,
            Self::SoftDrop => Action::MoveDown,
            Self::HardDrop => Action::HardDrop,
            Self::TurnLeft => Action::TurnLeft,
            Self::TurnRight => Action::TurnRight,
            Self::Hold => Action::Hold,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "Move Left",
            Self::Right => "Move Right",
            Self::SoftDrop => "Soft Drop",
            Self::HardDrop => "Hard Drop",
            Self::TurnLeft => "Turn Left",
            Self::TurnRight => "Turn Right",
            Self::Hold => "Hold",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Left => "Shifts the tetromino one column to the left.",
            Self::Right => "Shifts the tetromino one column to the right.",
            Self::SoftDrop => "Accelerates the tetromino's descent.",
            Self::HardDrop => "Instantly drops the tetromino down.",
            Self::TurnLeft => "Rotates the tetromino 90 degrees counter-clockwise.",
            Self::TurnRight => "Rotates the tetromino 90 degrees clockwise.",
            Self::Hold => "Swaps the current tetromino with the next one.",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that happens to the active piece during a frame.
///
/// Variants are declared in execution priority order: when several actions
/// fire in the same frame they run in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    GravityDrop,
    TurnRight,
    TurnLeft,
    Hold,
    MoveDown,
    Lock,
    HardDrop,
}

/// Answers whether a logical input is held during the current frame.
///
/// Implemented for [`InputState`] and for any `Fn(Input) -> bool`.
pub trait InputSnapshot {
    fn is_pressed(&self, input: Input) -> bool;
}

impl<F> InputSnapshot for F
where
    F: Fn(Input) -> bool,
{
    fn is_pressed(&self, input: Input) -> bool {
        self(input)
    }
}

/// Set of inputs held during one frame.
///
/// # Example
///
/// ```
/// use tinustris_engine::{Input, InputSnapshot as _, InputState};
///
/// let state = InputState::from_iter([Input::Left, Input::Hold]);
/// assert!(state.is_pressed(Input::Left));
/// assert!(!state.is_pressed(Input::Right));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct InputState(u8);

impl InputState {
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn with(self, input: Input) -> Self {
        Self(self.0 | input.bit())
    }

    pub fn set(&mut self, input: Input, pressed: bool) {
        if pressed {
            self.0 |= input.bit();
        } else {
            self.0 &= !input.bit();
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn pressed(self) -> impl Iterator<Item = Input> {
        Input::ALL
            .into_iter()
            .filter(move |input| self.0 & input.bit() != 0)
    }
}

impl FromIterator<Input> for InputState {
    fn from_iter<T: IntoIterator<Item = Input>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl InputSnapshot for InputState {
    fn is_pressed(&self, input: Input) -> bool {
        self.0 & input.bit() != 0
    }
}

/// Number of consecutive frames each input has been held.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct InputHistory {
    frames_held: [u32; Input::LEN],
}

impl InputHistory {
    /// History after one more frame: held inputs count up, released ones reset to 0.
    #[must_use]
    pub fn next<I>(&self, snapshot: &I) -> Self
    where
        I: InputSnapshot + ?Sized,
    {
        let mut frames_held = self.frames_held;
        for input in Input::ALL {
            let frames = &mut frames_held[input as usize];
            *frames = if snapshot.is_pressed(input) {
                frames.saturating_add(1)
            } else {
                0
            };
        }
        Self { frames_held }
    }

    #[must_use]
    pub fn frames_held(&self, input: Input) -> u32 {
        self.frames_held[input as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_priority() {
        let mut actions = vec![
            Action::HardDrop,
            Action::Lock,
            Action::MoveDown,
            Action::Hold,
            Action::TurnLeft,
            Action::TurnRight,
            Action::GravityDrop,
            Action::MoveRight,
            Action::MoveLeft,
        ];
        actions.sort();
        assert_eq!(
            actions,
            [
                Action::MoveLeft,
                Action::MoveRight,
                Action::GravityDrop,
                Action::TurnRight,
                Action::TurnLeft,
                Action::Hold,
                Action::MoveDown,
                Action::Lock,
                Action::HardDrop,
            ]
        );
    }

    #[test]
    fn test_input_state_bits() {
        let mut state = InputState::NONE.with(Input::SoftDrop);
        state.set(Input::TurnRight, true);
        assert_eq!(
            state.pressed().collect::<Vec<_>>(),
            [Input::SoftDrop, Input::TurnRight]
        );
        state.set(Input::SoftDrop, false);
        assert!(!state.is_pressed(Input::SoftDrop));
        assert!(!state.is_empty());
        assert!(InputState::default().is_empty());
    }

    #[test]
    fn test_closure_snapshot() {
        let only_hold = |input: Input| input == Input::Hold;
        assert!(only_hold.is_pressed(Input::Hold));
        assert!(!only_hold.is_pressed(Input::Left));
    }

    #[test]
    fn test_history_counts_and_resets() {
        let left = InputState::from_iter([Input::Left]);
        let both = left.with(Input::Right);

        let history = InputHistory::default().next(&left).next(&left).next(&both);
        assert_eq!(history.frames_held(Input::Left), 3);
        assert_eq!(history.frames_held(Input::Right), 1);
        assert_eq!(history.frames_held(Input::Hold), 0);

        let history = history.next(&InputState::NONE);
        for input in Input::ALL {
            assert_eq!(history.frames_held(input), 0);
        }
    }

    #[test]
    fn test_input_descriptions() {
        assert_eq!(Input::TurnLeft.to_string(), "Turn Left");
        assert_eq!(Input::SoftDrop.action(), Action::MoveDown);
        assert!(Input::ALL.iter().all(|input| input.description().ends_with('.')));
    }
}
