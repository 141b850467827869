use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::error::ClientError;
use crate::protocol::SnakeState;

/// A grid position as (row, col). Travels on the wire as `[row, col]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The neighbouring cell one step towards `direction`.
    pub fn step(self, direction: Direction) -> Cell {
        let (dr, dc) = direction.offset();
        Cell {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl From<[i32; 2]> for Cell {
    fn from([row, col]: [i32; 2]) -> Self {
        Cell { row, col }
    }
}

impl From<Cell> for [i32; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

/// Contents of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    Snake,
    Apple,
}

/// Occupancy grid for one tick. Rebuilt from scratch every tick.
#[derive(Clone, Debug)]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create an all-empty board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            tiles: vec![Tile::Empty; rows * cols],
        }
    }

    /// Build the board for a tick.
    ///
    /// Every snake body cell (bots included) is marked as `Snake`, then every
    /// apple is marked as `Apple`. Apples are written last, so an apple
    /// reported on top of a body cell wins. Coordinates outside the grid are
    /// rejected and the whole tick is abandoned.
    pub fn from_snapshot(
        rows: usize,
        cols: usize,
        snakes: &HashMap<String, SnakeState>,
        apples: &[Cell],
    ) -> Result<Self, ClientError> {
        let mut board = Board::new(rows, cols);
        for snake in snakes.values() {
            for &cell in &snake.cells {
                board.set(cell, Tile::Snake)?;
            }
        }
        for &apple in apples {
            board.set(apple, Tile::Apple)?;
        }
        Ok(board)
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row as usize * self.cols + cell.col as usize)
        } else {
            None
        }
    }

    /// Returns true if the cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// Tile at `cell`, or `None` when off the board.
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.index(cell).map(|idx| self.tiles[idx])
    }

    fn set(&mut self, cell: Cell, tile: Tile) -> Result<(), ClientError> {
        let idx = self.index(cell).ok_or(ClientError::CellOutOfBounds {
            row: cell.row,
            col: cell.col,
        })?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// A snake cannot enter `cell`: it is off the board or holds a snake body.
    /// Apples never block.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !matches!(self.get(cell), Some(Tile::Empty) | Some(Tile::Apple))
    }
}
