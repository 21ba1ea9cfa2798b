use std::path::Path;
use std::sync::mpsc;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use engine_logging::{engine_debug, engine_info, engine_warn};
use pdfdesk_core::{update, AppState, Msg};

use super::config::{load_config, AppConfig};
use super::effects::EffectRunner;
use super::transcript::save_transcript;
use super::ui::commands::{self, Command};
use super::ui::input::InputEvent;
use super::ui::render::Screen;
use super::ui::terminal::{spawn_input_reader, TerminalSession};
use super::Input;

const SCROLL_PAGE: usize = 10;

pub fn run_app() -> anyhow::Result<()> {
    let (config, config_warning) = load_config();
    engine_logging::initialize(config.log_destination, config.log_level(), &config.log_file);
    if let Some(warning) = config_warning {
        engine_warn!("{}", warning);
    }
    engine_info!("Starting pdfdesk against {}", config.server_url);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(config.client_settings(), input_tx.clone())
        .with_context(|| format!("failed to set up client for {}", config.server_url))?;

    let mut session = TerminalSession::enter().context("failed to prepare the terminal")?;
    spawn_input_reader(input_tx).context("failed to spawn terminal reader")?;

    let mut shell = Shell::new(config, runner);
    session.draw(|frame| shell.draw(frame))?;

    for input in input_rx {
        let redraw = match input {
            Input::Key(key) => match shell.handle_key(key) {
                Flow::Continue => true,
                Flow::Quit => break,
            },
            Input::Resize => true,
            Input::Engine(msg) => {
                shell.dispatch(msg);
                false
            }
            Input::Closed => break,
        };
        if shell.state.consume_dirty() || redraw {
            session.draw(|frame| shell.draw(frame))?;
        }
    }

    engine_info!("pdfdesk exiting");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Shell {
    config: AppConfig,
    runner: EffectRunner,
    state: AppState,
    screen: Screen,
}

impl Shell {
    fn new(config: AppConfig, runner: EffectRunner) -> Self {
        Self {
            config,
            runner,
            state: AppState::new(),
            screen: Screen::default(),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let view = self.state.view();
        self.screen.draw(frame, &view);
    }

    fn dispatch(&mut self, msg: Msg) {
        engine_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.screen.dismiss_help() {
            return Flow::Continue;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Flow::Quit,
            (KeyCode::PageUp, _) => {
                self.screen.chat_mut().scroll_up(SCROLL_PAGE);
                return Flow::Continue;
            }
            (KeyCode::PageDown, _) => {
                self.screen.chat_mut().scroll_down(SCROLL_PAGE);
                return Flow::Continue;
            }
            _ => {}
        }

        match self.screen.input_mut().handle_key(key) {
            InputEvent::Edited(text) => self.dispatch(Msg::ChatInputChanged(text)),
            InputEvent::Submitted(line) => return self.submit_line(&line),
            InputEvent::Ignored => {}
        }
        Flow::Continue
    }

    fn submit_line(&mut self, line: &str) -> Flow {
        self.screen.clear_notice();
        let command = match commands::parse_line(line) {
            Ok(command) => command,
            Err(message) => {
                self.screen.set_notice(message);
                return Flow::Continue;
            }
        };

        match &command {
            Command::Quit => return Flow::Quit,
            Command::Help => self.screen.show_help(),
            Command::Save(path) => self.save(path),
            _ => {}
        }
        for msg in commands::to_msgs(command, &self.config.download_dir) {
            self.dispatch(msg);
        }
        Flow::Continue
    }

    fn save(&mut self, path: &Path) {
        match save_transcript(path, &self.state.view().chat) {
            Ok(written) => {
                engine_info!("Transcript saved to {:?}", written);
                self.screen
                    .set_notice(format!("Transcript saved to {}", written.display()));
            }
            Err(err) => {
                engine_warn!("Saving transcript to {:?} failed: {}", path, err);
                self.screen.set_notice(format!("Could not save transcript: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdesk_core::Role;
    use pdfdesk_engine::ClientSettings;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn shell() -> (Shell, mpsc::Receiver<Input>) {
        let (tx, rx) = mpsc::channel();
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ClientSettings::default()
        };
        let runner = EffectRunner::new(settings, tx).unwrap();
        (Shell::new(AppConfig::default(), runner), rx)
    }

    fn type_line(shell: &mut Shell, line: &str) -> Flow {
        for c in line.chars() {
            shell.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        shell.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    fn last_user_text(shell: &Shell) -> Option<String> {
        shell
            .state
            .messages()
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text.clone())
    }

    #[test]
    fn typed_line_is_sent_as_chat() {
        let (mut shell, _rx) = shell();

        assert_eq!(type_line(&mut shell, "what is a node?"), Flow::Continue);

        assert_eq!(last_user_text(&shell).as_deref(), Some("what is a node?"));
        assert_eq!(shell.state.view().chat.input, "");
        assert_eq!(shell.state.view().chat.pending_queries, 1);
    }

    #[test]
    fn colon_escape_reaches_the_chat() {
        let (mut shell, _rx) = shell();

        type_line(&mut shell, "::) thanks");

        assert_eq!(last_user_text(&shell).as_deref(), Some(":) thanks"));
    }

    #[test]
    fn unknown_command_keeps_the_line_and_sends_nothing() {
        let (mut shell, _rx) = shell();

        type_line(&mut shell, ":bogus");

        assert_eq!(last_user_text(&shell), None);
        assert_eq!(shell.state.view().chat.input, ":bogus");
    }

    #[test]
    fn quit_command_and_escape_end_the_session() {
        let (mut shell, _rx) = shell();
        assert_eq!(type_line(&mut shell, ":quit"), Flow::Quit);

        let (mut shell, _rx) = self::shell();
        assert_eq!(
            shell.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Flow::Quit
        );
    }

    #[test]
    fn help_overlay_swallows_the_next_key() {
        let (mut shell, _rx) = shell();
        type_line(&mut shell, ":help");

        assert_eq!(
            shell.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Flow::Continue
        );
        assert_eq!(
            shell.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Flow::Quit
        );
    }

    #[test]
    fn save_command_writes_transcript() {
        let (mut shell, _rx) = shell();
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("chat.html");

        type_line(&mut shell, &format!(":save {}", target.display()));

        let html = std::fs::read_to_string(&target).unwrap();
        assert!(html.contains("Welcome! Ask me a question"));
        assert_eq!(shell.state.view().chat.input, "");
    }
}
