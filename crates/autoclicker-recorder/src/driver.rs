//! Mouse and keyboard injection via enigo

use crate::keys::parse_key;
use autoclicker_core::{DriverFactory, Error, ErrorCode, InputDriver, MouseButton, Result};
use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(50);

pub struct EnigoDriver {
    enigo: Enigo,
}

impl EnigoDriver {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| Error::input_failed("Connecting to the input system", e))?;
        Ok(Self { enigo })
    }

    /// Factory for the playback worker; the connection is opened on the worker thread
    pub fn factory() -> DriverFactory {
        Arc::new(|| Ok(Box::new(EnigoDriver::new()?) as Box<dyn InputDriver>))
    }

    fn button(&mut self, button: Button, direction: Direction) -> Result<()> {
        self.enigo
            .button(button, direction)
            .map_err(|e| Error::input_failed("Mouse button", e))
    }
}

impl InputDriver for EnigoDriver {
    fn cursor_position(&mut self) -> Result<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| Error::input_failed("Reading cursor position", e))
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| Error::input_failed("Moving mouse", e))
    }

    fn click(&mut self, button: MouseButton) -> Result<()> {
        let b = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        self.button(b, Direction::Click)
    }

    fn double_click(&mut self) -> Result<()> {
        self.button(Button::Left, Direction::Click)?;
        thread::sleep(DOUBLE_CLICK_GAP);
        self.button(Button::Left, Direction::Click)
    }

    fn mouse_down(&mut self) -> Result<()> {
        self.button(Button::Left, Direction::Press)
    }

    fn mouse_up(&mut self) -> Result<()> {
        self.button(Button::Left, Direction::Release)
    }

    fn press_key(&mut self, key: &str) -> Result<()> {
        let k = parse_key(key).ok_or_else(|| {
            Error::new(ErrorCode::InvalidInput, format!("Unknown key name: {}", key))
        })?;
        self.enigo
            .key(k, Direction::Click)
            .map_err(|e| Error::input_failed(&format!("Pressing '{}'", key), e))
    }
}
