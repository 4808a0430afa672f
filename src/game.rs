//! Core game state and logic

use crate::board::{Board, BOARD_COLS, BOARD_ROWS};
use crate::piece::Piece;
use crate::tetromino::Catalog;
use std::time::Duration;

/// Gravity interval
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// A spawned piece overlapped the stack; only restart is accepted
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Restart,
    /// Handled by the application shell, ignored by the game
    Quit,
}

/// What a gravity tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The piece moved down one row
    Fell,
    /// The piece could not fall, was locked and full rows were cleared
    Locked { lines_cleared: usize },
    /// The game is over, nothing happened
    Halted,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current_piece: Piece,
    /// Current game state
    pub state: GameState,
    /// Shape and color source
    catalog: Catalog,
    /// End the game when a new piece spawns on top of the stack
    detect_game_over: bool,
}

impl Game {
    /// Create a new game on a standard board
    pub fn new() -> Self {
        Self::with_catalog(BOARD_ROWS, BOARD_COLS, Catalog::new())
    }

    /// Create a new game with a fixed piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_catalog(BOARD_ROWS, BOARD_COLS, Catalog::with_seed(seed))
    }

    /// Create a new game on a `rows × cols` board drawing from `catalog`
    pub fn with_catalog(rows: usize, cols: usize, mut catalog: Catalog) -> Self {
        let board = Board::new(rows, cols);
        let current_piece = Self::next_piece(&mut catalog, cols);
        tracing::debug!(rows, cols, shapes = catalog.piece_count(), "new game");

        Self {
            board,
            current_piece,
            state: GameState::Playing,
            catalog,
            detect_game_over: true,
        }
    }

    /// Enable or disable game over on spawn overlap
    pub fn with_game_over_detection(mut self, enabled: bool) -> Self {
        self.detect_game_over = enabled;
        self
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        if action == Action::Restart {
            self.restart();
            return;
        }

        if self.state == GameState::GameOver {
            return;
        }

        match action {
            Action::MoveLeft => {
                self.move_by(-1, 0);
            }
            Action::MoveRight => {
                self.move_by(1, 0);
            }
            Action::MoveDown => {
                self.move_by(0, 1);
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::Restart | Action::Quit => {}
        }
    }

    /// Advance gravity by one step (call every `TICK_INTERVAL`)
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == GameState::GameOver {
            return TickOutcome::Halted;
        }

        if self.move_by(0, 1) {
            return TickOutcome::Fell;
        }

        let lines_cleared = self.lock_piece();
        TickOutcome::Locked { lines_cleared }
    }

    /// Move the current piece if the target is free
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        self.current_piece.move_by(dx, dy, &self.board)
    }

    /// Rotate the current piece if the rotated shape fits
    pub fn rotate(&mut self) -> bool {
        self.current_piece.rotate(&self.board)
    }

    /// Lock the current piece into the board, clear full rows and spawn the
    /// next piece. Returns the number of rows cleared.
    ///
    /// Rows are cleared before spawning so the top-out check sees the
    /// cleared board.
    pub fn lock_piece(&mut self) -> usize {
        tracing::debug!(
            x = self.current_piece.position.x,
            y = self.current_piece.position.y,
            color = self.current_piece.color,
            "locking piece"
        );
        self.current_piece.lock_into(&mut self.board);

        let lines_cleared = self.board.clear_lines();
        if lines_cleared > 0 {
            tracing::info!(lines_cleared, "cleared lines");
        }
        self.spawn();
        lines_cleared
    }

    /// Replace the current piece with a fresh one at the top
    pub fn spawn(&mut self) {
        self.current_piece = Self::next_piece(&mut self.catalog, self.board.cols());

        // Check for top out
        if self.detect_game_over && !self.current_piece.fits(&self.board) {
            tracing::info!("spawned piece overlaps the stack, game over");
            self.state = GameState::GameOver;
        }
    }

    /// Reinitialize board and piece, keeping the board size and piece source
    pub fn restart(&mut self) {
        tracing::info!("restarting game");
        self.board = Board::new(self.board.rows(), self.board.cols());
        self.state = GameState::Playing;
        self.spawn();
    }

    fn next_piece(catalog: &mut Catalog, cols: usize) -> Piece {
        let shape = catalog.random_shape();
        let color = catalog.random_color();
        Piece::spawn(shape, color, cols)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
