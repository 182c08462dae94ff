//! Terminal explorer: drives the screen at a fixed cadence and maps keys
//! onto the game.
//!
//! Arrows or hjkl move whatever the current mode targets, Tab cycles the
//! mode, Space pings from the player, R regenerates, Q or Esc quits.

use std::cell::RefCell;
use std::error::Error;
use std::io::{self, stdout, Stdout, Write};
use std::rc::Rc;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::game::Game;
use crate::screen::Screen;

/// What the loop should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_key(game: &mut Game, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,

        KeyCode::Up | KeyCode::Char('k') => game.move_focus(0, -1),
        KeyCode::Down | KeyCode::Char('j') => game.move_focus(0, 1),
        KeyCode::Left | KeyCode::Char('h') => game.move_focus(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => game.move_focus(1, 0),

        KeyCode::Tab => game.cycle_mode(),

        // Fire and forget: the handle is dropped and the ping runs on
        KeyCode::Char(' ') => drop(game.ping()),

        KeyCode::Char('r') | KeyCode::Char('R') => game.regenerate(),

        _ => {}
    }

    Flow::Continue
}

/// Run the explorer until the user quits. The terminal is restored even when
/// the loop fails.
pub fn run_explorer(config: &Config, seed: u64) -> Result<(), Box<dyn Error>> {
    terminal::enable_raw_mode()?;
    let mut terminal = match enter_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            if let Err(cleanup) = restore_terminal(&mut stdout()) {
                tracing::warn!(error = %cleanup, "terminal restore failed");
            }
            return Err(e.into());
        }
    };

    let result = explore(&mut terminal, config, seed);
    let restored = restore_terminal(terminal.backend_mut());

    result?;
    restored?;
    Ok(())
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Leave raw mode and the alternate screen and show the cursor. Every step
/// runs; the first failure is returned.
fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    let raw = terminal::disable_raw_mode();
    let screen = execute!(out, LeaveAlternateScreen, Show);
    [raw, screen].into_iter().collect()
}

fn explore<B: Backend>(terminal: &mut Terminal<B>, config: &Config, seed: u64) -> Result<(), Box<dyn Error>> {
    let game = Rc::new(RefCell::new(Game::new(config, seed)));
    let mut screen: Option<Screen> = None;

    loop {
        let size = terminal.size()?;
        let (width, height) = (size.width as i32, size.height as i32);

        if screen.as_ref().map(|s| s.size()) != Some((width, height)) {
            screen = match Screen::build(width, height, game.clone()) {
                Ok(built) => {
                    tracing::debug!(width, height, "layout rebuilt");
                    Some(built)
                }
                Err(e) => {
                    tracing::warn!(width, height, error = %e, "terminal too small for layout");
                    None
                }
            };
        }

        if let Some(screen) = screen.as_mut() {
            screen.refresh(&game.borrow())?;
            let screen = &*screen;
            terminal.draw(|f| {
                if let Err(e) = screen.draw(f.buffer_mut()) {
                    tracing::warn!(error = %e, "draw failed");
                }
            })?;
        }

        if !event::poll(config.frame_interval())? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(&mut game.borrow_mut(), key) == Flow::Quit {
                    break;
                }
            }
            Event::Resize(..) => screen = None,
            _ => {}
        }
    }

    Ok(())
}
