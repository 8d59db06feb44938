//! Tile grid owned by the world.

use tatooine_rescue_core::{BoardCoord, BoardDefinition, TileKind};
use thiserror::Error;

/// Reasons a board definition cannot be loaded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The definition contains no rows or an empty first row.
    #[error("board definition contains no tiles")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A tile code does not map to any tile kind.
    #[error("unknown tile code {code} at ({x}, {z})")]
    UnknownTileCode {
        /// Column of the offending tile.
        x: usize,
        /// Row of the offending tile.
        z: usize,
        /// Code that failed to resolve.
        code: u8,
    },
    /// No start tile is present.
    #[error("board definition has no start tile")]
    MissingStart,
    /// More than one start tile is present.
    #[error("board definition has {count} start tiles, expected exactly one")]
    MultipleStarts {
        /// Number of start tiles found.
        count: usize,
    },
    /// No goal tile is present.
    #[error("board definition has no goal tile")]
    MissingGoal,
}

/// Fixed-size grid of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl Board {
    /// Builds a board from a definition, validating its shape and contents.
    pub fn from_definition(definition: &BoardDefinition) -> Result<Self, BoardError> {
        let rows = definition.rows();
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(BoardError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (z, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(BoardError::Ragged {
                    row: z,
                    expected,
                    found: row.len(),
                });
            }
            for (x, code) in row.iter().copied().enumerate() {
                let kind =
                    TileKind::from_code(code).ok_or(BoardError::UnknownTileCode { x, z, code })?;
                tiles.push(kind);
            }
        }

        let starts = tiles.iter().filter(|kind| **kind == TileKind::Start).count();
        match starts {
            0 => return Err(BoardError::MissingStart),
            1 => {}
            count => return Err(BoardError::MultipleStarts { count }),
        }
        if !tiles.contains(&TileKind::Goal) {
            return Err(BoardError::MissingGoal);
        }

        let columns = u32::try_from(expected).map_err(|_| BoardError::Empty)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| BoardError::Empty)?;
        Ok(Self {
            columns,
            rows: row_count,
            tiles,
        })
    }

    /// The reference Tatooine board.
    pub fn tatooine() -> Result<Self, BoardError> {
        Self::from_definition(&BoardDefinition::tatooine())
    }

    /// Number of columns (`x` extent).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (`z` extent).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub fn contains(&self, coord: BoardCoord) -> bool {
        coord.x() < self.columns && coord.z() < self.rows
    }

    /// Tile at the coordinate, or `None` when it lies off the board.
    #[must_use]
    pub fn tile_at(&self, coord: BoardCoord) -> Option<TileKind> {
        self.index(coord)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites the tile at the coordinate. Returns `false` when the
    /// coordinate lies off the board.
    pub(crate) fn set_tile(&mut self, coord: BoardCoord, kind: TileKind) -> bool {
        match self.index(coord).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    /// First tile of the provided kind in row-major order.
    #[must_use]
    pub fn find_first(&self, kind: TileKind) -> Option<BoardCoord> {
        self.iter()
            .find(|(_, tile)| *tile == kind)
            .map(|(coord, _)| coord)
    }

    /// Number of tiles of the provided kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> u32 {
        self.tiles.iter().filter(|tile| **tile == kind).count() as u32
    }

    /// Number of enemies left on the board.
    #[must_use]
    pub fn enemy_count(&self) -> u32 {
        self.count(TileKind::Enemy)
    }

    /// Iterator over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (BoardCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (BoardCoord::new(index % columns, index / columns), *kind)
        })
    }

    fn index(&self, coord: BoardCoord) -> Option<usize> {
        if self.contains(coord) {
            let row = usize::try_from(coord.z()).ok()?;
            let column = usize::try_from(coord.x()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tatooine() -> Board {
        Board::tatooine().expect("reference map is valid")
    }

    #[test]
    fn tatooine_is_nine_by_nine() {
        let board = tatooine();
        assert_eq!(board.columns(), 9);
        assert_eq!(board.rows(), 9);
        assert_eq!(board.count(TileKind::Start), 1);
        assert_eq!(board.count(TileKind::Goal), 1);
    }

    #[test]
    fn tile_lookup_outside_bounds_is_none() {
        let board = tatooine();
        for coord in [
            BoardCoord::new(9, 0),
            BoardCoord::new(0, 9),
            BoardCoord::new(u32::MAX, u32::MAX),
        ] {
            assert_eq!(board.tile_at(coord), None);
        }
        assert_eq!(board.tile_at(BoardCoord::new(8, 8)), Some(TileKind::Empty));
    }

    #[test]
    fn tile_lookup_uses_column_then_row() {
        let board = tatooine();
        assert_eq!(board.tile_at(BoardCoord::new(3, 0)), Some(TileKind::Obstacle));
        assert_eq!(board.tile_at(BoardCoord::new(5, 1)), Some(TileKind::Enemy));
        assert_eq!(board.tile_at(BoardCoord::new(4, 3)), Some(TileKind::Quicksand));
        assert_eq!(board.tile_at(BoardCoord::new(3, 6)), Some(TileKind::Event));
    }

    #[test]
    fn find_first_scans_row_major() {
        let board = tatooine();
        assert_eq!(board.find_first(TileKind::Start), Some(BoardCoord::new(0, 1)));
        assert_eq!(board.find_first(TileKind::Goal), Some(BoardCoord::new(7, 7)));
        assert_eq!(board.find_first(TileKind::Enemy), Some(BoardCoord::new(5, 1)));
    }

    #[test]
    fn set_tile_ignores_coordinates_off_the_board() {
        let mut board = tatooine();
        let before = board.clone();
        assert!(!board.set_tile(BoardCoord::new(12, 0), TileKind::Empty));
        assert_eq!(board, before);

        assert!(board.set_tile(BoardCoord::new(5, 1), TileKind::Empty));
        assert_eq!(board.enemy_count(), before.enemy_count() - 1);
    }

    #[test]
    fn rejects_ragged_rows() {
        let definition = BoardDefinition::from_rows(vec![vec![1, 2], vec![0]]);
        assert_eq!(
            Board::from_definition(&definition),
            Err(BoardError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_unknown_codes_and_bad_markers() {
        let unknown = BoardDefinition::from_rows(vec![vec![1, 9, 2]]);
        assert_eq!(
            Board::from_definition(&unknown),
            Err(BoardError::UnknownTileCode { x: 1, z: 0, code: 9 })
        );

        let no_start = BoardDefinition::from_rows(vec![vec![0, 2]]);
        assert_eq!(Board::from_definition(&no_start), Err(BoardError::MissingStart));

        let two_starts = BoardDefinition::from_rows(vec![vec![1, 1, 2]]);
        assert_eq!(
            Board::from_definition(&two_starts),
            Err(BoardError::MultipleStarts { count: 2 })
        );

        let no_goal = BoardDefinition::from_rows(vec![vec![1, 0]]);
        assert_eq!(Board::from_definition(&no_goal), Err(BoardError::MissingGoal));

        let empty = BoardDefinition::from_rows(Vec::new());
        assert_eq!(Board::from_definition(&empty), Err(BoardError::Empty));
    }

    #[test]
    fn non_square_boards_index_correctly() {
        let definition = BoardDefinition::from_rows(vec![vec![1, 0, 0], vec![0, 4, 2]]);
        let board = Board::from_definition(&definition).expect("valid board");
        assert_eq!(board.columns(), 3);
        assert_eq!(board.rows(), 2);
        assert_eq!(board.tile_at(BoardCoord::new(2, 1)), Some(TileKind::Goal));
        assert_eq!(board.tile_at(BoardCoord::new(1, 2)), None);
        let coords: Vec<_> = board.iter().map(|(coord, _)| coord).collect();
        assert_eq!(coords[4], BoardCoord::new(1, 1));
    }
}
