use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::piece::{Orientation, Point, Tetromino};

/// An active piece: shape, orientation and the grid location of its bounding box.
///
/// Placements are immutable; every movement returns a new value.
///
/// # Example
///
/// ```
/// use tinustris_engine::{Orientation, Placement, Point, Tetromino};
///
/// let placement = Placement::new(Tetromino::T, Point::new(3, 16));
/// let moved = placement.translated(-1, 0).rotated_clockwise();
/// assert_eq!(moved.location(), Point::new(2, 16));
/// assert_eq!(moved.orientation(), Orientation::FlatLeft);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Placement {
    tetromino: Tetromino,
    orientation: Orientation,
    location: Point,
}

impl Placement {
    /// Creates a placement in the default orientation.
    #[must_use]
    pub const fn new(tetromino: Tetromino, location: Point) -> Self {
        Self::with_orientation(tetromino, Orientation::FlatDown, location)
    }

    #[must_use]
    pub const fn with_orientation(
        tetromino: Tetromino,
        orientation: Orientation,
        location: Point,
    ) -> Self {
        Self {
            tetromino,
            orientation,
            location,
        }
    }

    #[must_use]
    pub const fn tetromino(&self) -> Tetromino {
        self.tetromino
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub const fn location(&self) -> Point {
        self.location
    }

    /// Grid cells covered by this placement.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<Point, 4> {
        self.tetromino
            .cells_in(self.orientation)
            .iter()
            .map(|cell| cell.translate(self.location.x(), self.location.y()))
            .collect()
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            location: self.location.translate(dx, dy),
            ..self
        }
    }

    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self {
            orientation: self.orientation.rotated_clockwise(),
            ..self
        }
    }

    #[must_use]
    pub const fn rotated_counterclockwise(self) -> Self {
        Self {
            orientation: self.orientation.rotated_counterclockwise(),
            ..self
        }
    }

    /// Replaces the shape, keeping the location and resetting the orientation.
    #[must_use]
    pub const fn swapped(self, tetromino: Tetromino) -> Self {
        Self::new(tetromino, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_are_offset_by_location() {
        let placement = Placement::new(Tetromino::I, Point::new(3, 16));
        let cells = placement.cells();
        assert_eq!(
            cells.as_slice(),
            &[
                Point::new(3, 18),
                Point::new(4, 18),
                Point::new(5, 18),
                Point::new(6, 18)
            ]
        );
    }

    #[test]
    fn test_rotation_keeps_location() {
        let placement = Placement::new(Tetromino::J, Point::new(-1, 4));
        let rotated = placement.rotated_counterclockwise();
        assert_eq!(rotated.location(), placement.location());
        assert_eq!(rotated.orientation(), Orientation::FlatRight);
        assert_eq!(rotated.rotated_clockwise(), placement);
    }

    #[test]
    fn test_swapped_resets_orientation() {
        let placement =
            Placement::with_orientation(Tetromino::T, Orientation::FlatUp, Point::new(2, 7));
        let swapped = placement.swapped(Tetromino::S);
        assert_eq!(swapped.tetromino(), Tetromino::S);
        assert_eq!(swapped.orientation(), Orientation::FlatDown);
        assert_eq!(swapped.location(), Point::new(2, 7));
    }
}
