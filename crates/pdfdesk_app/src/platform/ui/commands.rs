//! Prompt commands. A plain line is a chat message; `:`-prefixed lines drive the upload widget.
//! A leading `::` sends the line as chat with a single `:`.

use std::path::{Path, PathBuf};

use pdfdesk_core::{Msg, SelectedFile};

pub const HELP: &str = "\
Type a question and press Enter to ask it.
Start with :: to send a message that begins with a colon.
  :upload <file.pdf>   upload a PDF and track its processing
  :new                 start another upload after a result
  :retry               start over after an error
  :download [dir]      save the processed file
  :save <file.html>    save the chat transcript
  :help                show this help
  :quit                exit (also Esc or Ctrl+C)
PageUp/PageDown scroll the chat.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Upload(Option<PathBuf>),
    NewUpload,
    Retry,
    Download(Option<PathBuf>),
    Save(PathBuf),
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    if let Some(escaped) = line.trim_start().strip_prefix("::") {
        return Ok(Command::Say(format!(":{escaped}")));
    }
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|arg| !arg.is_empty())),
        None => (rest, None),
    };

    match (name, arg) {
        ("upload", arg) => Ok(Command::Upload(arg.map(PathBuf::from))),
        ("new", None) => Ok(Command::NewUpload),
        ("retry", None) => Ok(Command::Retry),
        ("download", arg) => Ok(Command::Download(arg.map(PathBuf::from))),
        ("save", Some(path)) => Ok(Command::Save(PathBuf::from(path))),
        ("save", None) => Err("Usage: :save <file.html>".to_string()),
        ("help", _) => Ok(Command::Help),
        ("quit" | "q" | "exit", None) => Ok(Command::Quit),
        _ => Err(format!("Unknown command :{rest}. Type :help for the list.")),
    }
}

/// Core messages for a submitted line. Commands clear the input box; shell-only
/// commands produce nothing else.
pub fn to_msgs(command: Command, download_dir: &Path) -> Vec<Msg> {
    let clear = Msg::ChatInputChanged(String::new());
    match command {
        Command::Say(text) => vec![Msg::ChatInputChanged(text), Msg::ChatSubmitted],
        Command::Upload(path) => vec![
            clear,
            Msg::FileSelected(path.map(SelectedFile::from_path)),
            Msg::UploadSubmitted,
        ],
        Command::NewUpload => vec![clear, Msg::NewUploadClicked],
        Command::Retry => vec![clear, Msg::RetryClicked],
        Command::Download(dir) => vec![
            clear,
            Msg::DownloadClicked {
                dir: dir.unwrap_or_else(|| download_dir.to_path_buf()),
            },
        ],
        Command::Save(_) | Command::Help | Command::Quit => vec![clear],
    }
}
