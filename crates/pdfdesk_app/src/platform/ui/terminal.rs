//! Terminal setup and the keyboard reader thread.

use std::io::{self, Stdout};
use std::panic;
use std::sync::mpsc;
use std::thread;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine_logging::engine_warn;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::platform::Input;

/// Raw mode plus the alternate screen for as long as the value lives.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(err);
            }
        };
        // From here on, Drop restores the terminal.
        let mut session = Self { terminal };
        session.terminal.hide_cursor()?;
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Leaves the alternate screen before the default hook prints the panic.
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

/// Forwards key presses and resizes to the main loop. Sends `Closed` when
/// the terminal can no longer be read.
pub fn spawn_input_reader(tx: mpsc::Sender<Input>) -> io::Result<()> {
    thread::Builder::new()
        .name("terminal-input".to_string())
        .spawn(move || loop {
            let input = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Input::Key(key),
                Ok(Event::Resize(..)) => Input::Resize,
                Ok(_) => continue,
                Err(err) => {
                    engine_warn!("terminal read failed: {}", err);
                    let _ = tx.send(Input::Closed);
                    return;
                }
            };
            if tx.send(input).is_err() {
                return;
            }
        })?;
    Ok(())
}
