//! OS input seam
//!
//! Playback only talks to the mouse and keyboard through [`InputDriver`].
//! The real implementation lives in `autoclicker-recorder`; tests plug in
//! a driver that just records calls.

use crate::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

pub trait InputDriver {
    fn cursor_position(&mut self) -> Result<(i32, i32)>;
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()>;
    fn click(&mut self, button: MouseButton) -> Result<()>;
    fn double_click(&mut self) -> Result<()>;
    /// Press the left button without releasing it
    fn mouse_down(&mut self) -> Result<()>;
    fn mouse_up(&mut self) -> Result<()>;
    /// Press and release a key by name (`"a"`, `"enter"`, `"f5"`, ...)
    fn press_key(&mut self, key: &str) -> Result<()>;
}

/// Builds a driver on the thread that will use it
pub type DriverFactory = Arc<dyn Fn() -> Result<Box<dyn InputDriver>> + Send + Sync>;
