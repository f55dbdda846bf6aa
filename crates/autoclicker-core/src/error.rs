//! Structured errors that the front-end can show to the user verbatim

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    GroupExists,
    GroupNotFound,
    EmptySelection,
    ActionNotFound,
    DuplicateName,
    NothingToPlay,
    AlreadyRunning,
    AlreadyRecording,
    Io,
    Parse,
    InputFailed,
    Unknown,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn group_exists(name: &str) -> Self {
        Self::new(
            ErrorCode::GroupExists,
            format!("Group '{}' already exists", name),
        )
    }

    pub fn group_not_found(name: &str) -> Self {
        Self::new(
            ErrorCode::GroupNotFound,
            format!("Group '{}' does not exist", name),
        )
    }

    pub fn empty_selection(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptySelection, message)
    }

    pub fn action_not_found(name: &str) -> Self {
        Self::new(
            ErrorCode::ActionNotFound,
            format!("No action named '{}'", name),
        )
    }

    pub fn duplicate_name(name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateName,
            format!("An action named '{}' already exists", name),
        )
    }

    pub fn nothing_to_play() -> Self {
        Self::new(ErrorCode::NothingToPlay, "No actions to play")
    }

    pub fn already_running() -> Self {
        Self::new(ErrorCode::AlreadyRunning, "Playback is already running")
    }

    pub fn input_failed(what: &str, reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InputFailed, format!("{} failed: {}", what, reason))
    }

    pub fn io(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::Io, format!("{}: {}", path.display(), err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::new(ErrorCode::Unknown, format!("{:#}", e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorCode::Io, e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorCode::Parse, e.to_string())
    }
}
