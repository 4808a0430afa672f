//! BLOCKDROP - a falling-block puzzle for the terminal

mod board;
mod game;
mod input;
mod piece;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Action, Game, TickOutcome, TICK_INTERVAL};
use input::InputHandler;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::Instant,
};

/// Get the blockdrop temp directory, creating it if needed
fn blockdrop_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockdrop");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file
    let log_dir = blockdrop_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "blockdrop=debug".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKDROP starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    if let Some(path) = Settings::settings_path() {
        tracing::debug!("Settings file: {}", path.display());
    }

    let game = match settings.gameplay.seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed piece seed");
            Game::with_seed(seed)
        }
        None => Game::new(),
    };
    let mut game = game.with_game_over_detection(settings.gameplay.detect_game_over);
    let input = InputHandler::from_settings(&settings);

    // Setup terminal. Everything after raw mode is undone even if setup fails
    enable_raw_mode()?;
    let result = with_restore(
        || {
            execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
            terminal.clear()?;
            run_app(&mut terminal, &mut game, &settings, &input)
        },
        restore_terminal,
    );

    if let Err(e) = &result {
        tracing::error!("Exiting with error: {}", e);
    } else {
        tracing::info!("BLOCKDROP shutting down");
        println!("\nThanks for playing BLOCKDROP!");
    }

    result
}

/// Run `body`, then `restore` whether or not `body` failed. An error from
/// `body` takes precedence over one from `restore`.
fn with_restore<T>(
    body: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
    input: &InputHandler,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| ui::render_game(frame, game, settings, &input.bindings))?;

        // Wait for input until the next tick is due
        let timeout = TICK_INTERVAL.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let action = match event::read()? {
                Event::Key(key) => input.key_down(key),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    ui::action_at(area, &game.board, mouse.column, mouse.row)
                }
                _ => None,
            };

            match action {
                Some(Action::Quit) => return Ok(()),
                Some(action) => game.process_action(action),
                None => {}
            }
        }

        // Update game logic
        if last_tick.elapsed() >= TICK_INTERVAL {
            if let TickOutcome::Locked { lines_cleared } = game.tick() {
                tracing::debug!(lines_cleared, "piece locked");
            }
            last_tick = Instant::now();
        }
    }
}
