//! Game board representation, collision detection and line clearing

use crate::tetromino::Shape;

/// Pixel size of one grid cell on the reference canvas
pub const GRID_SIZE: usize = 30;
/// Reference canvas dimensions in pixels
pub const CANVAS_WIDTH: usize = 300;
pub const CANVAS_HEIGHT: usize = 600;
/// Board dimensions derived from the canvas
pub const BOARD_COLS: usize = CANVAS_WIDTH / GRID_SIZE;
pub const BOARD_ROWS: usize = CANVAS_HEIGHT / GRID_SIZE;

/// Cell value for an empty cell; filled cells hold `color + 1`
pub const EMPTY: u8 = 0;

/// Board-relative coordinate, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Position) -> Position {
        Position::new(self.x + by.x, self.y + by.y)
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<u8>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_ROWS, BOARD_COLS)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![EMPTY; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell value at column `x`, row `y`
    /// Returns None if out of bounds
    pub fn cell_at(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get(y as usize)?.get(x as usize).copied()
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self.cells.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Check whether `shape` fits at `position + offset`: every filled cell
    /// inside the grid and over an empty cell
    pub fn is_valid(&self, shape: &Shape, position: Position, offset: Position) -> bool {
        let anchor = position.offset(offset);
        shape
            .filled_cells()
            .all(|(dx, dy)| self.cell_at(anchor.x + dx, anchor.y + dy) == Some(EMPTY))
    }

    /// Write `value` under every filled cell of `shape` at `position`
    pub fn lock_shape(&mut self, shape: &Shape, position: Position, value: u8) {
        for (dx, dy) in shape.filled_cells() {
            self.set(position.x + dx, position.y + dy, value);
        }
    }

    /// Clear completed lines and return the number cleared
    pub fn clear_lines(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|row| row.contains(&EMPTY));
        let cleared = before - self.cells.len();

        // Fill the top with empty rows
        for _ in 0..cleared {
            self.cells.insert(0, vec![EMPTY; self.cols]);
        }

        cleared
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell == EMPTY))
    }
}
