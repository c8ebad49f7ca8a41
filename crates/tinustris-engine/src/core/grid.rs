use std::slice::ChunksExact;

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::piece::{Block, Point};
use crate::GameStateError;

/// The locked blocks of a playing field.
///
/// Cells are stored row by row starting with the bottom row, so the cell at
/// `(x, y)` lives at index `x + y * width`. The top [`Grid::VANISH_ZONE_HEIGHT`]
/// rows form the vanish zone; any block there ends the game.
///
/// The active piece is never stored in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    cells: Vec<Option<Block>>,
}

impl Grid {
    pub const VANISH_ZONE_HEIGHT: usize = 2;
    pub const MIN_WIDTH: usize = 4;
    pub const MIN_HEIGHT: usize = 4 + Self::VANISH_ZONE_HEIGHT;
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 22;

    /// Creates an empty grid.
    pub fn empty(width: usize, height: usize) -> Result<Self, GameStateError> {
        Self::from_cells(width, vec![None; width * height])
    }

    /// Creates a grid from its cells, bottom row first.
    pub fn from_cells(width: usize, cells: Vec<Option<Block>>) -> Result<Self, GameStateError> {
        if width < Self::MIN_WIDTH {
            return Err(GameStateError::WidthTooSmall {
                width,
                min: Self::MIN_WIDTH,
            });
        }
        if cells.len() % width != 0 {
            return Err(GameStateError::GridNotMultipleOfWidth {
                len: cells.len(),
                width,
            });
        }
        let height = cells.len() / width;
        if height < Self::MIN_HEIGHT {
            return Err(GameStateError::HeightTooSmall {
                height,
                min: Self::MIN_HEIGHT,
            });
        }
        Ok(Self { width, cells })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Block>] {
        &self.cells
    }

    /// Returns the block at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[must_use]
    pub fn block(&self, x: usize, y: usize) -> Option<Block> {
        assert!(
            x < self.width && y < self.height(),
            "({x}, {y}) is outside of the {}x{} grid",
            self.width,
            self.height()
        );
        self.cells[x + y * self.width]
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.index_of(point).is_some()
    }

    /// Whether `point` is inside the grid and holds a block.
    #[must_use]
    pub fn is_occupied(&self, point: Point) -> bool {
        self.index_of(point).is_some_and(|i| self.cells[i].is_some())
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x()).ok()?;
        let y = usize::try_from(point.y()).ok()?;
        (x < self.width && y < self.height()).then_some(x + y * self.width)
    }

    /// Rows from the bottom up.
    pub fn rows(&self) -> ChunksExact<'_, Option<Block>> {
        self.cells.chunks_exact(self.width)
    }

    #[must_use]
    pub fn is_full_row(&self, y: usize) -> bool {
        self.rows()
            .nth(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Full rows anywhere in the grid, the vanish zone included. A full
    /// vanish-zone row can only exist once the game is already over.
    #[must_use]
    pub fn full_row_count(&self) -> usize {
        self.rows()
            .filter(|row| row.iter().all(Option::is_some))
            .count()
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    #[must_use]
    pub fn is_vanish_zone_occupied(&self) -> bool {
        let visible = self.height() - Self::VANISH_ZONE_HEIGHT;
        self.rows().skip(visible).flatten().any(Option::is_some)
    }

    /// Writes `block` into every listed cell.
    pub(crate) fn paint(&mut self, points: impl IntoIterator<Item = Point>, block: Block) {
        for point in points {
            let index = self
                .index_of(point)
                .unwrap_or_else(|| panic!("cannot paint {point} outside of the grid"));
            self.cells[index] = Some(block);
        }
    }

    /// Collapses every full row; rows above drop down and empty rows enter at the top.
    pub(crate) fn remove_full_rows(&mut self) {
        let height = self.height();
        let mut kept: Vec<Option<Block>> = self
            .rows()
            .filter(|row| !row.iter().all(Option::is_some))
            .flatten()
            .copied()
            .collect();
        kept.resize(self.width * height, None);
        self.cells = kept;
    }

    /// Shifts everything up one row, dropping the top row, and fills the
    /// bottom row with garbage except for the `gap` column.
    pub(crate) fn push_garbage_row(&mut self, gap: usize) {
        let width = self.width;
        let mut cells: Vec<Option<Block>> = (0..width)
            .map(|x| (x != gap).then_some(Block::Garbage))
            .collect();
        cells.extend_from_slice(&self.cells[..self.cells.len() - width]);
        self.cells = cells;
    }
}

/// Serialized as row strings from the top down, `.` marking empty cells.
impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.height()))?;
        for row in self.rows().rev() {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', Block::as_char))
                .collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}
