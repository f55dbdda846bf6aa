//! Session controller
//!
//! The single owner of all autoclicker state. Front-ends call the methods
//! here and drain background messages with [`Session::pump`] or
//! [`Session::run_until`]; nothing else mutates the action list, the
//! groups, or the status line.

use crate::recorder::events::{self, FinishReason, PlaybackEvent, Receiver, Sender, UiEvent};
use crate::recorder::hook;
use crate::recorder::storage;
use crate::recorder::{
    ActionStore, HotkeyCommand, HotkeyListener, HotkeyOutcome, Hotkeys, PlaybackConfig, Player,
    Recorder,
};
use autoclicker_core::{
    Action, ActionPatch, DriverFactory, Error, GroupFilter, GroupIndex, Result,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

pub const READY: &str = "Ready";
pub const STOPPED: &str = "Stopped.";
pub const RECORDING: &str = "Recording mode active. Click on screen to capture location.";

const POLL: Duration = Duration::from_millis(100);

pub struct Session {
    actions: Vec<Action>,
    store: ActionStore,
    groups: GroupIndex,
    filter: GroupFilter,
    recorder: Recorder,
    hotkeys: HotkeyListener,
    player: Player,
    config: PlaybackConfig,
    /// UI-level playing state; cleared by the `Finished` teardown
    playing: bool,
    status: String,
    counter: u32,
    tx: Sender<UiEvent>,
    rx: Receiver<UiEvent>,
}

impl Session {
    /// Build a session over `store` and load its file.
    ///
    /// A file that fails to load leaves the session empty with the error
    /// on the status line.
    pub fn open(driver: DriverFactory, store: ActionStore) -> Self {
        let (tx, rx) = events::channel();
        let mut session = Self {
            actions: Vec::new(),
            store,
            groups: GroupIndex::new(),
            filter: GroupFilter::All,
            recorder: Recorder::new(),
            hotkeys: HotkeyListener::default(),
            player: Player::new(driver, tx.clone()),
            config: PlaybackConfig::default(),
            playing: false,
            status: READY.to_string(),
            counter: 1,
            tx,
            rx,
        };
        let _ = session.reload();
        session
    }

    /// Start the global input hook feeding this session
    pub fn spawn_hook(&self) -> Result<thread::JoinHandle<()>> {
        hook::spawn(self.tx.clone(), self.recorder.gate())
    }

    /// Channel end for anything else that wants to post into the session
    pub fn sender(&self) -> Sender<UiEvent> {
        self.tx.clone()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions under the active group filter, in list order
    pub fn visible_actions(&self) -> Vec<Action> {
        autoclicker_core::filter(&self.actions, &self.filter)
    }

    pub fn groups(&self) -> BTreeSet<String> {
        self.groups.all(&self.actions)
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_armed()
    }

    pub fn hotkeys(&self) -> &Hotkeys {
        self.hotkeys.bindings()
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Settings used when playback is started from a hotkey
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Play the visible actions with `config`. Returns the run id.
    pub fn start_playback(&mut self, config: PlaybackConfig) -> Result<u64> {
        let run = self.player.start(self.visible_actions(), config.clone())?;
        self.config = config;
        self.playing = true;
        self.status = "Running...".to_string();
        Ok(run)
    }

    pub fn stop_playback(&mut self) {
        self.player.stop();
        self.status = STOPPED.to_string();
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    pub fn toggle_recording(&mut self) -> Result<()> {
        if self.recorder.is_armed() {
            self.recorder.disarm();
            self.status = READY.to_string();
        } else {
            self.recorder.arm()?;
            self.status = RECORDING.to_string();
        }
        Ok(())
    }

    fn record_location(&mut self, x: i32, y: i32) -> Result<()> {
        let name = self.next_name("Location");
        self.actions.push(Action::click(name, x, y));
        self.status = format!("Location added at X: {}, Y: {}", x, y);
        self.persist()
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Create an empty group and switch the filter to it
    pub fn create_group(&mut self, name: &str) -> Result<String> {
        let name = self.groups.create(&self.actions, name)?;
        self.filter = GroupFilter::Group(name.clone());
        self.status = format!("Group '{}' created", name);
        Ok(name)
    }

    /// Tag `selection` with an existing group
    pub fn assign_group(&mut self, selection: &[String], name: &str) -> Result<usize> {
        let (updated, count) = self.groups.assign(&self.actions, selection, name)?;
        self.actions = updated;
        self.status = format!("Added {} action(s) to '{}'", count, name);
        self.persist()?;
        Ok(count)
    }

    /// Create `name` if needed, then tag `selection` with it
    pub fn add_selection_to_group(&mut self, selection: &[String], name: &str) -> Result<usize> {
        if selection.is_empty() {
            return Err(Error::empty_selection(
                "Please select actions to add to a group",
            ));
        }
        let name = self.groups.ensure_group_exists(&self.actions, name)?;
        self.assign_group(selection, &name)
    }

    pub fn remove_selection_from_group(&mut self, selection: &[String]) -> Result<usize> {
        let (updated, count) = self.groups.remove_from_groups(&self.actions, selection)?;
        self.actions = updated;
        self.status = format!("Removed {} action(s) from their group", count);
        self.persist()?;
        Ok(count)
    }

    /// `"All Groups"` or a group name
    pub fn set_filter(&mut self, selector: &str) {
        self.filter = GroupFilter::parse(selector);
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Append a keystroke, tagged with the active group. Returns its name.
    pub fn add_keystroke(&mut self, key: &str) -> Result<String> {
        let key = if key.chars().count() == 1 { key } else { key.trim() };
        if key.is_empty() {
            return Err(Error::invalid_input("Key cannot be empty"));
        }
        let name = self.next_name("Keystroke");
        let mut action = Action::keystroke(name.clone(), key);
        if let GroupFilter::Group(group) = &self.filter {
            action.set_group(Some(group.clone()));
        }
        self.actions.push(action);
        self.persist()?;
        Ok(name)
    }

    pub fn edit_action(&mut self, name: &str, patch: &ActionPatch) -> Result<()> {
        let idx = self
            .actions
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| Error::action_not_found(name))?;

        if let Some(new_name) = &patch.name {
            let new_name = new_name.trim();
            if new_name != name && self.actions.iter().any(|a| a.name == new_name) {
                return Err(Error::duplicate_name(new_name));
            }
        }

        let mut edited = self.actions[idx].clone();
        edited.apply(patch)?;
        self.actions[idx] = edited;
        self.persist()
    }

    /// Drop the named actions. Returns how many were removed.
    pub fn delete_actions(&mut self, names: &[String]) -> Result<usize> {
        if names.is_empty() {
            return Err(Error::empty_selection("Please select actions to delete"));
        }
        let before = self.actions.len();
        self.actions = storage::remove(&self.actions, names);
        let removed = before - self.actions.len();
        self.persist()?;
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.actions.clear();
        self.persist()
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Point the session at `path` and write the current list there
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.store.set_path(path);
        self.persist()?;
        self.status = format!("Saved to {}", file_label(self.store.path()));
        Ok(())
    }

    /// Switch to `path` and load it. On failure the list is left empty.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.store.set_path(path);
        let count = self.reload()?;
        self.status = format!("Opened {}", file_label(self.store.path()));
        Ok(count)
    }

    fn reload(&mut self) -> Result<usize> {
        match self.store.load() {
            Ok(actions) => {
                self.counter = storage::next_counter(&actions);
                self.actions = actions;
                if let GroupFilter::Group(g) = &self.filter {
                    if !self.groups.exists(&self.actions, g) {
                        self.filter = GroupFilter::All;
                    }
                }
                tracing::info!(
                    path = %self.store.path().display(),
                    count = self.actions.len(),
                    "loaded actions"
                );
                Ok(self.actions.len())
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.actions.clear();
                self.filter = GroupFilter::All;
                self.status = e.message.clone();
                Err(e)
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.actions)
    }

    /// First `"{prefix} N"` not already taken, counting on from the counter.
    /// The counter wraps to 1 instead of overflowing.
    fn next_name(&mut self, prefix: &str) -> String {
        loop {
            let name = format!("{} {}", prefix, self.counter);
            self.counter = self.counter.checked_add(1).unwrap_or(1);
            if !self.actions.iter().any(|a| a.name == name) {
                return name;
            }
        }
    }

    // ------------------------------------------------------------------
    // Hotkeys
    // ------------------------------------------------------------------

    /// The next key press binds `cmd` instead of triggering anything
    pub fn rebind_hotkey(&mut self, cmd: HotkeyCommand) {
        self.hotkeys.request_rebind(cmd);
        self.status = format!("Press ANY key to bind {}...", cmd.as_str().to_uppercase());
    }

    fn run_command(&mut self, cmd: HotkeyCommand) {
        tracing::debug!(%cmd, "hotkey");
        let result = match cmd {
            HotkeyCommand::Start => self.start_playback(self.config.clone()).map(|_| ()),
            HotkeyCommand::Stop => {
                self.stop_playback();
                Ok(())
            }
            HotkeyCommand::Record => self.toggle_recording(),
        };
        if let Err(e) = result {
            tracing::warn!(%cmd, "{}", e);
            self.status = e.message;
        }
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::KeyPressed(key) => match self.hotkeys.on_key(&key) {
                HotkeyOutcome::Rebound { command, key } => {
                    self.status = format!("Bound {} to {}", command, key);
                }
                HotkeyOutcome::Command(cmd) => self.run_command(cmd),
                HotkeyOutcome::Ignored => {}
            },
            UiEvent::PointerCaptured { x, y } => {
                if let Some((x, y)) = self.recorder.on_capture(x, y) {
                    if let Err(e) = self.record_location(x, y) {
                        tracing::warn!("{}", e);
                        self.status = e.message;
                    }
                }
            }
            UiEvent::Playback { run, event } => {
                if run != self.player.current_run() {
                    tracing::debug!(run, "ignoring message from an old run");
                    return;
                }
                match event {
                    PlaybackEvent::Status(text) => {
                        if self.player.is_running() {
                            self.status = text;
                        }
                    }
                    PlaybackEvent::Finished(reason) => self.finish_playback(reason),
                }
            }
        }
    }

    fn finish_playback(&mut self, reason: FinishReason) {
        self.player.wait();
        self.playing = false;
        self.status = match reason {
            FinishReason::Completed | FinishReason::Stopped => STOPPED.to_string(),
            FinishReason::Failed(msg) => format!("Stopped: {}", msg),
        };
    }

    /// Handle everything already queued. Returns how many messages ran.
    pub fn pump(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            n += 1;
        }
        n
    }

    /// Block on the channel until `stop` is set
    pub fn run_until(&mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            if let Ok(event) = self.rx.recv_timeout(POLL) {
                self.handle(event);
            }
        }
        self.shutdown();
    }

    /// Stop any run and wait for its worker to release held buttons
    pub fn shutdown(&mut self) {
        if self.playing {
            self.stop_playback();
            self.wait_playback(&AtomicBool::new(false));
        }
        self.player.stop();
        self.player.wait();
    }

    /// Block until the current run has been torn down. Setting `interrupt`
    /// stops the run early.
    pub fn wait_playback(&mut self, interrupt: &AtomicBool) {
        while self.playing {
            if interrupt.swap(false, Ordering::SeqCst) {
                self.stop_playback();
            }
            if let Ok(event) = self.rx.recv_timeout(POLL) {
                self.handle(event);
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn noop_driver() -> DriverFactory {
        std::sync::Arc::new(|| {
            Err(Error::new(
                autoclicker_core::ErrorCode::InputFailed,
                "no input in unit tests",
            ))
        })
    }

    fn session(dir: &TempDir) -> Session {
        Session::open(noop_driver(), ActionStore::at(dir.path().join("a.json")))
    }

    #[test]
    fn keystroke_takes_the_active_group() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.create_group("Boss").unwrap();
        let name = s.add_keystroke("space").unwrap();
        assert_eq!(name, "Keystroke 1");
        assert_eq!(s.actions()[0].group(), Some("Boss"));

        s.set_filter("All Groups");
        s.add_keystroke("a").unwrap();
        assert_eq!(s.actions()[1].group(), None);
    }

    #[test]
    fn rename_to_existing_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.add_keystroke("a").unwrap();
        s.add_keystroke("b").unwrap();
        let patch = ActionPatch {
            name: Some("Keystroke 1".into()),
            ..Default::default()
        };
        let err = s.edit_action("Keystroke 2", &patch).unwrap_err();
        assert_eq!(err.code, autoclicker_core::ErrorCode::DuplicateName);
    }

    #[test]
    fn counter_continues_after_reload() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.add_keystroke("a").unwrap();
        s.add_keystroke("b").unwrap();
        drop(s);

        let mut s = session(&dir);
        assert_eq!(s.add_keystroke("c").unwrap(), "Keystroke 3");
    }
}
