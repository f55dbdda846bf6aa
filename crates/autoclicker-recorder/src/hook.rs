//! Global input hook
//!
//! One OS listener for the whole process. It forwards every key press, and
//! the first pointer press after the [`CaptureGate`] opens. It never reads
//! or writes session state.

use crate::events::{Sender, UiEvent};
use crate::keys::key_name;
use crate::recorder::CaptureGate;
use autoclicker_core::{Error, ErrorCode, Result};
use enigo::{Enigo, Mouse, Settings};
use rdev::{listen, Event, EventType};
use std::thread;

/// Start the listener thread. The OS hook cannot be removed again; the
/// thread lives until the process exits.
pub fn spawn(events: Sender<UiEvent>, gate: CaptureGate) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("input-hook".into())
        .spawn(move || run_hook(events, gate))
        .map_err(|e| Error::new(ErrorCode::Unknown, format!("Failed to start input hook: {}", e)))
}

fn run_hook(events: Sender<UiEvent>, gate: CaptureGate) {
    let mut last_pos: Option<(f64, f64)> = None;

    let callback = move |event: Event| match event.event_type {
        EventType::MouseMove { x, y } => last_pos = Some((x, y)),
        EventType::KeyPress(key) => {
            let _ = events.send(UiEvent::KeyPressed(key_name(key)));
        }
        EventType::ButtonPress(_) => {
            if !gate.take() {
                return;
            }
            let Some((x, y)) = last_pos.map(|(x, y)| (x as i32, y as i32)).or_else(cursor_now)
            else {
                tracing::warn!("pointer press with unknown position, recording skipped");
                return;
            };
            let _ = events.send(UiEvent::PointerCaptured { x, y });
        }
        _ => {}
    };

    tracing::info!("global input hook started");
    if let Err(e) = listen(callback) {
        tracing::error!("global input hook stopped: {:?}", e);
    }
}

/// Fallback when no move event has been seen yet
fn cursor_now() -> Option<(i32, i32)> {
    Enigo::new(&Settings::default())
        .ok()
        .and_then(|enigo| enigo.location().ok())
}
