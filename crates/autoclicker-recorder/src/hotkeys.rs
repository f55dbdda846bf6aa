//! Global hotkeys
//!
//! Key presses from the hook are resolved here, on the session thread.
//! Bindings live for the process only; every start begins with the defaults.

use autoclicker_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyCommand {
    Start,
    Stop,
    Record,
}

impl HotkeyCommand {
    pub const ALL: [HotkeyCommand; 3] = [
        HotkeyCommand::Start,
        HotkeyCommand::Stop,
        HotkeyCommand::Record,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HotkeyCommand::Start => "start",
            HotkeyCommand::Stop => "stop",
            HotkeyCommand::Record => "record",
        }
    }
}

impl fmt::Display for HotkeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HotkeyCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "start" => Ok(HotkeyCommand::Start),
            "stop" => Ok(HotkeyCommand::Stop),
            "record" => Ok(HotkeyCommand::Record),
            _ => Err(Error::invalid_input(format!("Unknown hotkey command: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkeys {
    pub start: String,
    pub stop: String,
    pub record: String,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            start: "F7".to_string(),
            stop: "F8".to_string(),
            record: "F6".to_string(),
        }
    }
}

impl Hotkeys {
    pub fn get(&self, cmd: HotkeyCommand) -> &str {
        match cmd {
            HotkeyCommand::Start => &self.start,
            HotkeyCommand::Stop => &self.stop,
            HotkeyCommand::Record => &self.record,
        }
    }

    pub fn bind(&mut self, cmd: HotkeyCommand, key: impl Into<String>) {
        let key = key.into();
        match cmd {
            HotkeyCommand::Start => self.start = key,
            HotkeyCommand::Stop => self.stop = key,
            HotkeyCommand::Record => self.record = key,
        }
    }

    /// Command bound to `key`, compared case-insensitively. If one key is
    /// bound twice, record wins over start, start over stop.
    pub fn command_for(&self, key: &str) -> Option<HotkeyCommand> {
        [HotkeyCommand::Record, HotkeyCommand::Start, HotkeyCommand::Stop]
            .into_iter()
            .find(|cmd| self.get(*cmd).eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyOutcome {
    Rebound { command: HotkeyCommand, key: String },
    Command(HotkeyCommand),
    Ignored,
}

/// Bindings plus the pending-rebind slot
#[derive(Debug, Clone, Default)]
pub struct HotkeyListener {
    bindings: Hotkeys,
    pending: Option<HotkeyCommand>,
}

impl HotkeyListener {
    pub fn new(bindings: Hotkeys) -> Self {
        Self {
            bindings,
            pending: None,
        }
    }

    pub fn bindings(&self) -> &Hotkeys {
        &self.bindings
    }

    pub fn pending_rebind(&self) -> Option<HotkeyCommand> {
        self.pending
    }

    /// The next key press binds `cmd` instead of triggering anything
    pub fn request_rebind(&mut self, cmd: HotkeyCommand) {
        self.pending = Some(cmd);
    }

    pub fn on_key(&mut self, key: &str) -> HotkeyOutcome {
        if let Some(command) = self.pending.take() {
            self.bindings.bind(command, key);
            tracing::info!(%command, key, "hotkey rebound");
            return HotkeyOutcome::Rebound {
                command,
                key: key.to_string(),
            };
        }
        match self.bindings.command_for(key) {
            Some(cmd) => HotkeyOutcome::Command(cmd),
            None => HotkeyOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let hk = Hotkeys::default();
        assert_eq!(hk.command_for("F7"), Some(HotkeyCommand::Start));
        assert_eq!(hk.command_for("f8"), Some(HotkeyCommand::Stop));
        assert_eq!(hk.command_for("F6"), Some(HotkeyCommand::Record));
        assert_eq!(hk.command_for("F9"), None);
    }

    #[test]
    fn rebind_consumes_next_key_only() {
        let mut l = HotkeyListener::default();
        l.request_rebind(HotkeyCommand::Start);
        assert_eq!(
            l.on_key("q"),
            HotkeyOutcome::Rebound {
                command: HotkeyCommand::Start,
                key: "q".into()
            }
        );
        assert_eq!(l.pending_rebind(), None);
        assert_eq!(l.on_key("Q"), HotkeyOutcome::Command(HotkeyCommand::Start));
        assert_eq!(l.on_key("F7"), HotkeyOutcome::Ignored);
    }

    #[test]
    fn rebinding_to_a_hotkey_does_not_trigger_it() {
        let mut l = HotkeyListener::default();
        l.request_rebind(HotkeyCommand::Stop);
        assert!(matches!(l.on_key("F7"), HotkeyOutcome::Rebound { .. }));
        // start and stop now share F7; start wins
        assert_eq!(l.on_key("F7"), HotkeyOutcome::Command(HotkeyCommand::Start));
    }

    #[test]
    fn parse_command() {
        assert_eq!("Record".parse::<HotkeyCommand>().unwrap(), HotkeyCommand::Record);
        assert!("pause".parse::<HotkeyCommand>().is_err());
    }
}
