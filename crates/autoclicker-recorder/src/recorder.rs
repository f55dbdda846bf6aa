//! Click recorder - `Idle -> Armed -> Idle`
//!
//! Arming opens a one-shot [`CaptureGate`]. The global hook consumes the
//! gate on the next pointer press and posts its position; the session then
//! calls [`Recorder::on_capture`] to finish the recording.

use autoclicker_core::{Error, ErrorCode, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared between the recorder and the hook thread
#[derive(Debug, Clone, Default)]
pub struct CaptureGate(Arc<AtomicBool>);

impl CaptureGate {
    pub fn open(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Close the gate, reporting whether it was open. At most one caller wins.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Armed,
}

#[derive(Debug)]
pub struct Recorder {
    state: RecorderState,
    gate: CaptureGate,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            gate: CaptureGate::default(),
        }
    }

    /// Gate to hand to the hook thread
    pub fn gate(&self) -> CaptureGate {
        self.gate.clone()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == RecorderState::Armed
    }

    pub fn arm(&mut self) -> Result<()> {
        if self.is_armed() {
            return Err(Error::new(
                ErrorCode::AlreadyRecording,
                "Recording is already waiting for a click",
            ));
        }
        self.state = RecorderState::Armed;
        self.gate.open();
        tracing::debug!("recorder armed");
        Ok(())
    }

    pub fn disarm(&mut self) {
        self.state = RecorderState::Idle;
        self.gate.close();
    }

    /// A press arrived from the hook. Returns the position if it completes
    /// a recording; a stale press after disarming is dropped.
    pub fn on_capture(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        if !self.is_armed() {
            tracing::debug!(x, y, "dropping capture, recorder not armed");
            return None;
        }
        self.disarm();
        Some((x, y))
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
