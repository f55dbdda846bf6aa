//! Messages posted from background threads to the thread that owns the session
//!
//! Neither the playback worker nor the global hook touch session state.
//! They send one of these and the owner applies it.

pub use crossbeam_channel::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A global key press, already normalized by [`crate::keys::key_name`]
    KeyPressed(String),
    /// The one-shot pointer press captured while recording was armed
    PointerCaptured { x: i32, y: i32 },
    /// Progress from the playback worker for run `run`
    Playback { run: u64, event: PlaybackEvent },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Status(String),
    Finished(FinishReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FinishReason {
    /// Every repetition ran
    Completed,
    /// The running flag was cleared
    Stopped,
    /// Unexpected error or panic in the worker
    Failed(String),
}

pub fn channel() -> (Sender<UiEvent>, Receiver<UiEvent>) {
    crossbeam_channel::unbounded()
}
