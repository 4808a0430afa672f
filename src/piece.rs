//! Active falling piece logic

use crate::board::{Board, Position};
use crate::tetromino::{Shape, PALETTE};

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Current rotation of the shape
    pub shape: Shape,
    /// Top-left corner of the shape's bounding box
    pub position: Position,
    /// Palette index, independent of the shape
    pub color: usize,
}

impl Piece {
    pub fn new(shape: Shape, position: Position, color: usize) -> Self {
        Self {
            shape,
            position,
            color,
        }
    }

    /// Create a piece at the spawn position: horizontally centered, top row
    pub fn spawn(shape: Shape, color: usize, board_cols: usize) -> Self {
        let x = (board_cols / 2) as i32 - 1;
        Self::new(shape, Position::new(x, 0), color)
    }

    /// Value written into the board when this piece locks. Out of range
    /// colors map to the last palette entry.
    pub fn cell_value(&self) -> u8 {
        self.color.min(PALETTE.len() - 1) as u8 + 1
    }

    /// Absolute (x, y) of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let Position { x, y } = self.position;
        self.shape.filled_cells().map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Whether the piece fits where it is
    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid(&self.shape, self.position, Position::ZERO)
    }

    /// Try to move by (dx, dy), returns true if successful
    pub fn move_by(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        let offset = Position::new(dx, dy);
        if board.is_valid(&self.shape, self.position, offset) {
            self.position = self.position.offset(offset);
            true
        } else {
            false
        }
    }

    /// Try to rotate in place, returns true if successful. No kicks are tried
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated();
        if board.is_valid(&rotated, self.position, Position::ZERO) {
            self.shape = rotated;
            true
        } else {
            false
        }
    }

    /// Copy this piece's cells into the board
    pub fn lock_into(&self, board: &mut Board) {
        board.lock_shape(&self.shape, self.position, self.cell_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::templates;

    fn t_shape() -> Shape {
        Shape::from_matrix(&[&[1, 1, 1], &[0, 1, 0]])
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(t_shape(), 2, 10);
        assert_eq!(piece.position, Position::new(4, 0));
        assert_eq!(piece.cell_value(), 3);
    }

    #[test]
    fn test_cells_are_absolute() {
        let piece = Piece::new(t_shape(), Position::new(2, 5), 0);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(2, 5), (3, 5), (4, 5), (3, 6)]);
    }

    #[test]
    fn test_move_down() {
        let board = Board::new(20, 10);
        let mut piece = Piece::spawn(t_shape(), 0, 10);
        assert!(piece.move_by(0, 1, &board));
        assert_eq!(piece.position, Position::new(4, 1));
    }

    #[test]
    fn test_left_wall_blocks_every_shape() {
        let board = Board::new(20, 10);
        for template in templates() {
            let mut shape = template;
            for _ in 0..4 {
                let mut piece = Piece::new(shape.clone(), Position::new(0, 5), 0);
                assert!(!piece.move_by(-1, 0, &board), "{:?}", shape);
                assert_eq!(piece.position, Position::new(0, 5));
                shape = shape.rotated();
            }
        }
    }

    #[test]
    fn test_blocked_move_is_noop() {
        let mut board = Board::new(20, 10);
        board.set(5, 2, 1);
        let mut piece = Piece::new(t_shape(), Position::new(4, 0), 0);
        assert!(!piece.move_by(0, 1, &board));
        assert_eq!(piece.position, Position::new(4, 0));
    }

    #[test]
    fn test_rotate_succeeds_in_open_space() {
        let board = Board::new(20, 10);
        let mut piece = Piece::new(Shape::line(), Position::new(3, 5), 0);
        assert!(piece.rotate(&board));
        assert_eq!(piece.shape, Shape::line().rotated());
    }

    #[test]
    fn test_rotate_fails_at_floor_without_kick() {
        let board = Board::new(20, 10);
        let mut piece = Piece::new(Shape::line(), Position::new(3, 19), 0);
        assert!(!piece.rotate(&board));
        assert_eq!(piece.shape, Shape::line());
        assert_eq!(piece.position, Position::new(3, 19));
    }

    #[test]
    fn test_rotate_fails_into_occupied_cell() {
        let mut board = Board::new(20, 10);
        board.set(3, 7, 4);
        let mut piece = Piece::new(Shape::line(), Position::new(3, 5), 0);
        assert!(!piece.rotate(&board));
        assert_eq!(piece.shape, Shape::line());
    }

    #[test]
    fn test_cell_value_stays_in_palette() {
        let piece = Piece::new(Shape::line(), Position::ZERO, 6);
        assert_eq!(piece.cell_value(), 7);
        for color in [7, 255, 256, usize::MAX] {
            let piece = Piece::new(Shape::line(), Position::ZERO, color);
            assert_eq!(piece.cell_value(), PALETTE.len() as u8);
        }
    }

    #[test]
    fn test_lock_into_board() {
        let mut board = Board::new(20, 10);
        let piece = Piece::new(Shape::line(), Position::new(3, 19), 4);
        piece.lock_into(&mut board);
        for x in 3..=6 {
            assert_eq!(board.cell_at(x, 19), Some(5));
        }
        assert_eq!(board.cell_at(2, 19), Some(0));
        assert_eq!(board.cell_at(7, 19), Some(0));
    }
}
