use std::{borrow::Cow, collections::BTreeMap, fmt};

use crate::GameState;

/// Timing rules of a game, as a function of its state.
pub trait SpeedCurve: fmt::Debug + Send + Sync {
    /// Fall speed in 1/256 cells per frame; always positive.
    fn internal_gravity(&self, state: &GameState) -> u32;

    /// Frames a grounded piece may rest before it locks.
    fn lock_delay(&self, state: &GameState) -> u32;

    /// Appearance delay: frames between a lock and the next spawn.
    fn are(&self, state: &GameState) -> u32;

    /// Frames completed rows stay visible before they disappear.
    fn line_clear_delay(&self, state: &GameState) -> u32;
}

/// A step function from level to value.
///
/// Each breakpoint `(threshold, value)` applies from its threshold up to the
/// next one; the last applies to every higher level.
///
/// # Example
///
/// ```
/// use tinustris_engine::RangedCurve;
///
/// let curve = RangedCurve::new([(0, 30), (900, 17)]);
/// assert_eq!(curve.lookup(899), 30);
/// assert_eq!(curve.lookup(u32::MAX), 17);
/// assert_eq!(curve.to_string(), "[0, 900): 30, [900, infinity): 17");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangedCurve {
    breakpoints: Cow<'static, [(u32, u32)]>,
}

impl RangedCurve {
    /// Curve over a static table, sorted by threshold.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty or not strictly ascending.
    #[must_use]
    pub const fn from_static(breakpoints: &'static [(u32, u32)]) -> Self {
        assert!(!breakpoints.is_empty(), "ranged curve needs a breakpoint");
        let mut i = 1;
        while i < breakpoints.len() {
            assert!(
                breakpoints[i - 1].0 < breakpoints[i].0,
                "breakpoints must be strictly ascending"
            );
            i += 1;
        }
        Self {
            breakpoints: Cow::Borrowed(breakpoints),
        }
    }

    /// Curve over breakpoints in any order; later duplicates win.
    ///
    /// # Panics
    ///
    /// Panics if there are no breakpoints.
    pub fn new(breakpoints: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let map: BTreeMap<u32, u32> = breakpoints.into_iter().collect();
        assert!(!map.is_empty(), "ranged curve needs a breakpoint");
        Self {
            breakpoints: Cow::Owned(map.into_iter().collect()),
        }
    }

    /// Curve with the same value at every level.
    #[must_use]
    pub fn constant(value: u32) -> Self {
        Self {
            breakpoints: Cow::Owned(vec![(0, value)]),
        }
    }

    #[must_use]
    pub fn breakpoints(&self) -> &[(u32, u32)] {
        &self.breakpoints
    }

    fn is_positive(&self) -> bool {
        self.breakpoints.iter().all(|&(_, value)| value > 0)
    }

    /// Value for the greatest threshold not above `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is below the lowest threshold.
    #[must_use]
    pub fn lookup(&self, level: u32) -> u32 {
        let index = self.breakpoints.partition_point(|&(threshold, _)| threshold <= level);
        assert!(
            index > 0,
            "level {level} is below the lowest breakpoint {}",
            self.breakpoints[0].0
        );
        self.breakpoints[index - 1].1
    }
}

impl fmt::Display for RangedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.breakpoints.iter().peekable();
        while let Some(&(threshold, value)) = iter.next() {
            match iter.peek() {
                Some(&&(upper, _)) => write!(f, "[{threshold}, {upper}): {value}, ")?,
                None => write!(f, "[{threshold}, infinity): {value}")?,
            }
        }
        Ok(())
    }
}

/// How a [`TableCurve`] derives its lock delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockDelay {
    /// Lock delay by level.
    Ranged(RangedCurve),
    /// The frames the piece needs to fall one cell (`256 / gravity`), but at least `min`.
    FramesPerCell { min: u32 },
}

/// A speed curve driven by level tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCurve {
    name: &'static str,
    gravity: RangedCurve,
    lock_delay: LockDelay,
    are: RangedCurve,
    line_clear_delay: RangedCurve,
}

impl TableCurve {
    /// # Panics
    ///
    /// Panics if any gravity or line clear delay value is zero.
    #[must_use]
    pub fn new(
        name: &'static str,
        gravity: RangedCurve,
        lock_delay: LockDelay,
        are: RangedCurve,
        line_clear_delay: RangedCurve,
    ) -> Self {
        assert!(gravity.is_positive(), "internal gravity must be positive");
        assert!(
            line_clear_delay.is_positive(),
            "line clear delay must be positive"
        );
        Self {
            name,
            gravity,
            lock_delay,
            are,
            line_clear_delay,
        }
    }

    /// House rules: NES-like start, ramping to 20G at level 64.
    #[must_use]
    pub fn tinustris() -> Self {
        Self::new(
            "Tinustris",
            RangedCurve::from_static(TINUSTRIS_GRAVITY),
            LockDelay::FramesPerCell { min: 30 },
            RangedCurve::from_static(&[(0, 10)]),
            RangedCurve::from_static(&[(0, 30)]),
        )
    }

    #[must_use]
    pub fn game_boy() -> Self {
        Self::new(
            "Game Boy",
            RangedCurve::from_static(GAME_BOY_GRAVITY),
            LockDelay::FramesPerCell { min: 0 },
            RangedCurve::from_static(&[(0, 2)]),
            RangedCurve::from_static(&[(0, 93)]),
        )
    }

    #[must_use]
    pub fn nes() -> Self {
        Self::new(
            "NES",
            RangedCurve::from_static(NES_GRAVITY),
            LockDelay::FramesPerCell { min: 0 },
            RangedCurve::from_static(&[(0, 10)]),
            RangedCurve::from_static(&[(0, 30)]),
        )
    }

    #[must_use]
    pub fn the_grand_master() -> Self {
        Self::new(
            "The Grand Master",
            RangedCurve::from_static(THE_GRAND_MASTER_GRAVITY),
            LockDelay::Ranged(RangedCurve::from_static(&[(0, 30)])),
            RangedCurve::from_static(&[(0, 30)]),
            RangedCurve::from_static(&[(0, 41)]),
        )
    }

    #[must_use]
    pub fn the_grand_master_2_normal() -> Self {
        Self::new(
            "The Grand Master 2 Normal",
            RangedCurve::from_static(THE_GRAND_MASTER_2_NORMAL_GRAVITY),
            LockDelay::Ranged(RangedCurve::from_static(&[(0, 30)])),
            RangedCurve::from_static(&[(0, 25)]),
            RangedCurve::from_static(&[(0, 40)]),
        )
    }

    #[must_use]
    pub fn the_grand_master_2_master() -> Self {
        Self::new(
            "The Grand Master 2 Master",
            RangedCurve::from_static(THE_GRAND_MASTER_GRAVITY),
            LockDelay::Ranged(RangedCurve::from_static(&[(0, 30), (900, 17)])),
            RangedCurve::from_static(&[(0, 25), (700, 16), (800, 12)]),
            RangedCurve::from_static(&[(0, 40), (500, 25), (600, 16), (700, 12), (800, 6)]),
        )
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn gravity_curve(&self) -> &RangedCurve {
        &self.gravity
    }
}

impl SpeedCurve for TableCurve {
    fn internal_gravity(&self, state: &GameState) -> u32 {
        self.gravity.lookup(state.level())
    }

    fn lock_delay(&self, state: &GameState) -> u32 {
        match &self.lock_delay {
            LockDelay::Ranged(curve) => curve.lookup(state.level()),
            LockDelay::FramesPerCell { min } => (256 / self.internal_gravity(state)).max(*min),
        }
    }

    fn are(&self, state: &GameState) -> u32 {
        self.are.lookup(state.level())
    }

    fn line_clear_delay(&self, state: &GameState) -> u32 {
        self.line_clear_delay.lookup(state.level())
    }
}

/// A speed curve that ignores the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantCurve {
    internal_gravity: u32,
    lock_delay: u32,
    are: u32,
    line_clear_delay: u32,
}

impl Default for ConstantCurve {
    fn default() -> Self {
        Self::new(4, 120, 2, 25)
    }
}

impl ConstantCurve {
    /// Twenty cells per frame: pieces land the moment they spawn.
    pub const ALWAYS_20G: Self = Self::new(5120, 30, 30, 41);

    /// # Panics
    ///
    /// Panics if `internal_gravity` or `line_clear_delay` is zero.
    #[must_use]
    pub const fn new(internal_gravity: u32, lock_delay: u32, are: u32, line_clear_delay: u32) -> Self {
        assert!(internal_gravity > 0, "internal gravity must be positive");
        assert!(line_clear_delay > 0, "line clear delay must be positive");
        Self {
            internal_gravity,
            lock_delay,
            are,
            line_clear_delay,
        }
    }
}

impl SpeedCurve for ConstantCurve {
    fn internal_gravity(&self, _state: &GameState) -> u32 {
        self.internal_gravity
    }

    fn lock_delay(&self, _state: &GameState) -> u32 {
        self.lock_delay
    }

    fn are(&self, _state: &GameState) -> u32 {
        self.are
    }

    fn line_clear_delay(&self, _state: &GameState) -> u32 {
        self.line_clear_delay
    }
}

const TINUSTRIS_GRAVITY: &[(u32, u32)] = &[
    (0, 5),
    (1, 6),
    (2, 7),
    (3, 8),
    (4, 9),
    (5, 11),
    (6, 14),
    (7, 20),
    (8, 32),
    (9, 43),
    (10, 51),
    (13, 64),
    (16, 85),
    (19, 128),
    (29, 256),  //  1G
    (34, 512),  //  2G
    (39, 768),  //  3G
    (44, 1024), //  4G
    (49, 1280), //  5G
    (54, 1024), //  4G
    (59, 768),  //  3G
    (64, 5120), // 20G
];

const GAME_BOY_GRAVITY: &[(u32, u32)] = &[
    (0, 5),
    (1, 5),
    (2, 6),
    (3, 6),
    (4, 7),
    (5, 8),
    (6, 9),
    (7, 12),
    (8, 15),
    (9, 23),
    (10, 26),
    (11, 28),
    (12, 32),
    (13, 37),
    (14, 43),
    (15, 43),
    (16, 51),
    (17, 51),
    (18, 64),
    (19, 64),
    (20, 85),
];

const NES_GRAVITY: &[(u32, u32)] = &[
    (0, 5),
    (1, 6),
    (2, 7),
    (3, 8),
    (4, 9),
    (5, 11),
    (6, 14),
    (7, 20),
    (8, 32),
    (9, 43),
    (10, 51),
    (13, 64),
    (16, 85),
    (19, 128),
    (29, 256),
];

const THE_GRAND_MASTER_GRAVITY: &[(u32, u32)] = &[
    (0, 4),
    (30, 6),
    (35, 8),
    (40, 10),
    (50, 12),
    (60, 16),
    (70, 32),
    (80, 48),
    (90, 64),
    (100, 80),
    (120, 96),
    (140, 112),
    (160, 128),
    (170, 144),
    (200, 4),
    (220, 32),
    (230, 64),
    (233, 96),
    (236, 128),
    (239, 160),
    (243, 192),
    (247, 224),
    (251, 256),
    (300, 512),
    (330, 768),
    (360, 1024),
    (400, 1280),
    (420, 1024),
    (450, 768),
    (500, 5120),
];

const THE_GRAND_MASTER_2_NORMAL_GRAVITY: &[(u32, u32)] = &[
    (0, 4),
    (8, 5),
    (19, 6),
    (35, 8),
    (40, 10),
    (50, 12),
    (60, 16),
    (70, 32),
    (80, 48),
    (90, 64),
    (100, 4),
    (108, 5),
    (119, 6),
    (125, 8),
    (131, 12),
    (139, 32),
    (149, 48),
    (156, 80),
    (164, 112),
    (174, 128),
    (180, 144),
    (200, 16),
    (212, 48),
    (221, 80),
    (232, 112),
    (244, 144),
    (256, 176),
    (267, 192),
    (277, 208),
    (287, 224),
    (295, 240),
    (300, 5120),
];
