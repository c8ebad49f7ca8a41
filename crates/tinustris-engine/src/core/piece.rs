use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A point on the grid, or an offset inside a 4×4 bounding box.
///
/// `x` grows to the right and `y` grows upwards; `(0, 0)` is the bottom-left cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rotation state of a tetromino.
///
/// Clockwise rotation walks the ring `FlatDown -> FlatLeft -> FlatUp -> FlatRight -> FlatDown`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Spawn orientation.
    #[default]
    FlatDown,
    FlatLeft,
    FlatUp,
    FlatRight,
}

impl Orientation {
    pub const ALL: [Self; 4] = [Self::FlatDown, Self::FlatLeft, Self::FlatUp, Self::FlatRight];

    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::FlatDown => Self::FlatLeft,
            Self::FlatLeft => Self::FlatUp,
            Self::FlatUp => Self::FlatRight,
            Self::FlatRight => Self::FlatDown,
        }
    }

    #[must_use]
    pub const fn rotated_counterclockwise(self) -> Self {
        match self {
            Self::FlatDown => Self::FlatRight,
            Self::FlatLeft => Self::FlatDown,
            Self::FlatUp => Self::FlatLeft,
            Self::FlatRight => Self::FlatUp,
        }
    }

    const fn as_usize(self) -> usize {
        self as usize
    }
}

/// One of the seven tetromino shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Tetromino {
    I = 0,
    O = 1,
    T = 2,
    J = 3,
    L = 4,
    S = 5,
    Z = 6,
}

/// Uniform choice among the seven shapes.
impl Distribution<Tetromino> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tetromino {
        Tetromino::ALL[rng.random_range(0..Tetromino::LEN)]
    }
}

impl Tetromino {
    /// Number of tetromino shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::J,
        Self::L,
        Self::S,
        Self::Z,
    ];

    /// Returns the four cells this shape occupies in the given orientation.
    ///
    /// Cells are offsets within the shape's 4×4 bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinustris_engine::{Orientation, Point, Tetromino};
    ///
    /// let cells = Tetromino::I.cells_in(Orientation::FlatDown);
    /// assert!(cells.iter().all(|p| p.y() == 2));
    /// assert!(cells.contains(&Point::new(3, 2)));
    /// ```
    #[must_use]
    pub const fn cells_in(self, orientation: Orientation) -> &'static [Point; 4] {
        &SHAPES[self as usize][orientation.as_usize()]
    }

    /// Block color left behind when this shape locks.
    #[must_use]
    pub const fn block(self) -> Block {
        match self {
            Self::I => Block::I,
            Self::O => Block::O,
            Self::T => Block::T,
            Self::J => Block::J,
            Self::L => Block::L,
            Self::S => Block::S,
            Self::Z => Block::Z,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        self.block().as_char()
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'O' => Some(Self::O),
            'T' => Some(Self::T),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Tetromino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Content of an occupied grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Block {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
    /// Part of an injected garbage row.
    Garbage,
}

impl Block {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::J => 'J',
            Self::L => 'L',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::Garbage => 'G',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'G' => Some(Self::Garbage),
            _ => match Tetromino::from_char(c) {
                Some(tetromino) => Some(tetromino.block()),
                None => None,
            },
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

// Indexed by [Tetromino][Orientation].
const SHAPES: [[[Point; 4]; 4]; Tetromino::LEN] = [
    // I
    [
        [p(0, 2), p(1, 2), p(2, 2), p(3, 2)],
        [p(2, 0), p(2, 1), p(2, 2), p(2, 3)],
        [p(0, 1), p(1, 1), p(2, 1), p(3, 1)],
        [p(1, 0), p(1, 1), p(1, 2), p(1, 3)],
    ],
    // O
    [
        [p(1, 1), p(1, 2), p(2, 1), p(2, 2)],
        [p(1, 1), p(1, 2), p(2, 1), p(2, 2)],
        [p(1, 1), p(1, 2), p(2, 1), p(2, 2)],
        [p(1, 1), p(1, 2), p(2, 1), p(2, 2)],
    ],
    // T
    [
        [p(0, 2), p(1, 2), p(2, 2), p(1, 3)],
        [p(1, 1), p(1, 2), p(1, 3), p(2, 2)],
        [p(0, 2), p(1, 2), p(2, 2), p(1, 1)],
        [p(1, 1), p(1, 2), p(1, 3), p(0, 2)],
    ],
    // J
    [
        [p(0, 2), p(1, 2), p(2, 2), p(0, 3)],
        [p(1, 1), p(1, 2), p(1, 3), p(2, 3)],
        [p(0, 2), p(1, 2), p(2, 2), p(2, 1)],
        [p(1, 1), p(1, 2), p(1, 3), p(0, 1)],
    ],
    // L
    [
        [p(0, 2), p(1, 2), p(2, 2), p(2, 3)],
        [p(1, 1), p(1, 2), p(1, 3), p(2, 1)],
        [p(0, 2), p(1, 2), p(2, 2), p(0, 1)],
        [p(1, 1), p(1, 2), p(1, 3), p(0, 3)],
    ],
    // S
    [
        [p(0, 2), p(1, 2), p(1, 3), p(2, 3)],
        [p(1, 3), p(1, 2), p(2, 2), p(2, 1)],
        [p(0, 1), p(1, 1), p(1, 2), p(2, 2)],
        [p(0, 3), p(0, 2), p(1, 2), p(1, 1)],
    ],
    // Z
    [
        [p(0, 3), p(1, 3), p(1, 2), p(2, 2)],
        [p(1, 1), p(1, 2), p(2, 2), p(2, 3)],
        [p(0, 2), p(1, 2), p(1, 1), p(2, 1)],
        [p(0, 1), p(0, 2), p(1, 2), p(1, 3)],
    ],
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_every_shape_has_four_distinct_cells_in_bounding_box() {
        for tetromino in Tetromino::ALL {
            for orientation in Orientation::ALL {
                let cells = tetromino.cells_in(orientation);
                let distinct: HashSet<_> = cells.iter().copied().collect();
                assert_eq!(distinct.len(), 4, "{tetromino} {orientation:?}");
                for cell in cells {
                    assert!((0..4).contains(&cell.x()), "{tetromino} {orientation:?} {cell}");
                    assert!((0..4).contains(&cell.y()), "{tetromino} {orientation:?} {cell}");
                }
            }
        }
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let spawn: HashSet<_> = Tetromino::O.cells_in(Orientation::FlatDown).iter().collect();
        for orientation in Orientation::ALL {
            let cells: HashSet<_> = Tetromino::O.cells_in(orientation).iter().collect();
            assert_eq!(cells, spawn);
        }
    }

    #[test]
    fn test_rotation_ring() {
        assert_eq!(Orientation::default(), Orientation::FlatDown);
        assert_eq!(Orientation::FlatDown.rotated_clockwise(), Orientation::FlatLeft);
        assert_eq!(Orientation::FlatLeft.rotated_clockwise(), Orientation::FlatUp);
        assert_eq!(Orientation::FlatUp.rotated_clockwise(), Orientation::FlatRight);
        assert_eq!(Orientation::FlatRight.rotated_clockwise(), Orientation::FlatDown);

        for orientation in Orientation::ALL {
            let mut clockwise = orientation;
            let mut counterclockwise = orientation;
            for _ in 0..4 {
                clockwise = clockwise.rotated_clockwise();
                counterclockwise = counterclockwise.rotated_counterclockwise();
            }
            assert_eq!(clockwise, orientation);
            assert_eq!(counterclockwise, orientation);
            assert_eq!(
                orientation.rotated_clockwise().rotated_counterclockwise(),
                orientation
            );
        }
    }

    #[test]
    fn test_block_colors() {
        for tetromino in Tetromino::ALL {
            assert_eq!(tetromino.block().as_char(), tetromino.as_char());
            assert_eq!(Tetromino::from_char(tetromino.as_char()), Some(tetromino));
        }
        assert_eq!(Block::Garbage.to_string(), "G");
        assert_eq!(Block::from_char('G'), Some(Block::Garbage));
        assert_eq!(Block::from_char('Z'), Some(Block::Z));
        assert_eq!(Block::from_char('x'), None);
    }

    #[test]
    fn test_random_tetromino_covers_all_shapes() {
        let mut rng = Pcg32::seed_from_u64(0);
        let drawn: HashSet<Tetromino> = (0..1000).map(|_| rng.random()).collect();
        assert_eq!(drawn.len(), Tetromino::LEN);
    }
}
