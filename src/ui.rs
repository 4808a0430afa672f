//! Terminal UI rendering with ratatui

use crate::board::Board;
use crate::game::{Action, Game, GameState};
use crate::input::KeyBindings;
use crate::settings::Settings;
use crate::tetromino::palette_color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Width of the button column right of the board
const PANEL_WIDTH: u16 = 16;
/// Height of one on-screen button, borders included
const BUTTON_HEIGHT: u16 = 3;

/// On-screen buttons, top to bottom
const BUTTONS: [(Action, &str); 5] = [
    (Action::MoveLeft, "◀ Left"),
    (Action::MoveRight, "▶ Right"),
    (Action::MoveDown, "▼ Down"),
    (Action::Rotate, "⟳ Rotate"),
    (Action::Restart, "Restart"),
];

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings, bindings: &KeyBindings) {
    let area = frame.area();
    let (board_area, panel_area) = game_layout(area, &game.board);

    render_board(frame, board_area, game, settings.visual.block_chars());
    render_buttons(frame, panel_area, bindings);

    if game.state == GameState::GameOver {
        let subtitle = format!("Press {} to restart", bindings.label(Action::Restart));
        render_overlay(frame, area, "GAME OVER", &subtitle);
    }
}

/// Find which on-screen button, if any, covers a terminal cell
pub fn action_at(area: Rect, board: &Board, column: u16, row: u16) -> Option<Action> {
    let (_, panel_area) = game_layout(area, board);
    button_areas(panel_area)
        .into_iter()
        .find(|(_, rect)| rect.contains(Position::new(column, row)))
        .map(|(action, _)| action)
}

/// Split the screen into the board and the button panel
fn game_layout(area: Rect, board: &Board) -> (Rect, Rect) {
    let board_width = board.cols() as u16 * 2 + 2;
    let board_height = board.rows() as u16 + 2;
    let panel_height = BUTTON_HEIGHT * BUTTONS.len() as u16;

    let game_area = center_rect(
        area,
        board_width + PANEL_WIDTH,
        board_height.max(panel_height),
    );

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    (layout[0], layout[1])
}

/// Button rectangles inside the panel
fn button_areas(panel: Rect) -> Vec<(Action, Rect)> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(BUTTON_HEIGHT); BUTTONS.len()])
        .split(panel);

    BUTTONS
        .iter()
        .zip(rows.iter())
        .map(|((action, _), rect)| (*action, *rect))
        .collect()
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board with the falling piece on top
fn render_board(frame: &mut Frame, area: Rect, game: &Game, block_char: &str) {
    let block = Block::default()
        .title(" BLOCKDROP ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = &game.current_piece;
    let piece_cells: Vec<(i32, i32)> = piece.cells().collect();
    let piece_color = palette_color(piece.color);

    let mut lines: Vec<Line> = Vec::with_capacity(game.board.rows());
    for row in 0..game.board.rows() as i32 {
        let mut spans = Vec::with_capacity(game.board.cols());

        for col in 0..game.board.cols() as i32 {
            let span = if piece_cells.contains(&(col, row)) {
                Span::styled(block_char, Style::default().fg(piece_color))
            } else {
                match game.board.cell_at(col, row) {
                    Some(value) if value > 0 => Span::styled(
                        block_char,
                        Style::default().fg(palette_color(value as usize - 1)),
                    ),
                    _ => Span::raw(EMPTY),
                }
            };
            spans.push(span);
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render the clickable control buttons
fn render_buttons(frame: &mut Frame, area: Rect, bindings: &KeyBindings) {
    for ((action, rect), (_, label)) in button_areas(area).into_iter().zip(BUTTONS.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let text = Line::from(vec![
            Span::styled(*label, Style::default().fg(Color::White).bold()),
            Span::styled(
                format!(" {}", bindings.label(action)),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
    }
}

/// Render an overlay (for game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::Catalog;
    use ratatui::{backend::TestBackend, Terminal};

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 30,
    };

    fn draw(game: &Game) -> String {
        let mut terminal = Terminal::new(TestBackend::new(SCREEN.width, SCREEN.height)).unwrap();
        let settings = Settings::default();
        let bindings = KeyBindings::default();
        terminal
            .draw(|frame| render_game(frame, game, &settings, &bindings))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_every_button_is_clickable() {
        let board = Board::new(20, 10);
        let (_, panel) = game_layout(SCREEN, &board);
        for (action, rect) in button_areas(panel) {
            let hit = action_at(SCREEN, &board, rect.x + 1, rect.y + 1);
            assert_eq!(hit, Some(action));
        }
    }

    #[test]
    fn test_click_on_board_is_not_a_button() {
        let board = Board::new(20, 10);
        let (board_area, _) = game_layout(SCREEN, &board);
        assert_eq!(action_at(SCREEN, &board, board_area.x + 2, board_area.y + 2), None);
        assert_eq!(action_at(SCREEN, &board, 0, 0), None);
    }

    #[test]
    fn test_render_shows_board_and_buttons() {
        let game = Game::with_catalog(20, 10, Catalog::with_seed(11));
        let screen = draw(&game);
        assert!(screen.contains("BLOCKDROP"));
        assert!(screen.contains("Restart"));
        assert!(screen.contains("██"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_render_game_over_overlay() {
        let mut game = Game::with_catalog(20, 10, Catalog::with_seed(11));
        game.state = GameState::GameOver;
        let screen = draw(&game);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Press R to restart"));
    }
}
