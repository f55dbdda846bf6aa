//! Action file storage - one pretty-printed JSON array, overwritten whole

use autoclicker_core::settings::default_actions_path;
use autoclicker_core::{Action, Error, ErrorCode, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct ActionStore {
    path: PathBuf,
}

impl ActionStore {
    /// Store at `$HOME/.autoclicker/click_locations.json`
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_actions_path()?,
        })
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.path = path.as_ref().to_path_buf();
    }

    pub fn load(&self) -> Result<Vec<Action>> {
        load(&self.path)
    }

    pub fn save(&self, actions: &[Action]) -> Result<()> {
        save(actions, &self.path)
    }
}

/// Read the action list. A file that does not exist is an empty list.
pub fn load(path: &Path) -> Result<Vec<Action>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        Error::new(
            ErrorCode::Parse,
            format!("Failed to load saved locations from {}: {}", path.display(), e),
        )
    })
}

/// Write the whole list over `path`, creating its directory if needed.
///
/// The write is not atomic; a failure can leave a truncated file behind.
pub fn save(actions: &[Action], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, actions)?;
    w.flush().map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), count = actions.len(), "saved actions");
    Ok(())
}

/// Replace the action named like `action`, or append it
pub fn upsert(actions: &[Action], action: Action) -> Vec<Action> {
    let mut out: Vec<Action> = actions.to_vec();
    match out.iter_mut().find(|a| a.name == action.name) {
        Some(slot) => *slot = action,
        None => out.push(action),
    }
    out
}

/// Everything except the named actions
pub fn remove(actions: &[Action], names: &[String]) -> Vec<Action> {
    actions
        .iter()
        .filter(|a| !names.contains(&a.name))
        .cloned()
        .collect()
}

/// First free number for generated `Location N` / `Keystroke N` names
pub fn next_counter(actions: &[Action]) -> u32 {
    actions
        .iter()
        .filter_map(|a| {
            a.name
                .strip_prefix("Location ")
                .or_else(|| a.name.strip_prefix("Keystroke "))
                .and_then(|n| n.trim().parse::<u32>().ok())
        })
        .map(|n| n.saturating_add(1))
        .max()
        .unwrap_or(1)
}
