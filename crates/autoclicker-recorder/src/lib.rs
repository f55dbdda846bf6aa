//! autoclicker-recorder - recording, hotkeys and replay
//!
//! The moving parts of the autoclicker: the playback worker, the one-shot
//! click recorder, the global input hook, hotkey resolution, and the
//! action file.
//!
//! ## Threads
//!
//! - **session thread**: owns every piece of state, drains [`events`]
//! - **playback worker**: one at a time, see [`replay::Player`]
//! - **input hook**: one per process, see [`hook::spawn`]

pub mod driver;
pub mod events;
pub mod hook;
pub mod hotkeys;
pub mod keys;
pub mod recorder;
pub mod replay;
pub mod storage;

pub use driver::EnigoDriver;
pub use events::{FinishReason, PlaybackEvent, Receiver, Sender, UiEvent};
pub use hotkeys::{HotkeyCommand, HotkeyListener, HotkeyOutcome, Hotkeys};
pub use recorder::{CaptureGate, Recorder, RecorderState};
pub use replay::{PlaybackConfig, Player};
pub use storage::ActionStore;

pub mod prelude {
    pub use crate::driver::EnigoDriver;
    pub use crate::events::{FinishReason, PlaybackEvent, Receiver, Sender, UiEvent};
    pub use crate::hotkeys::{HotkeyCommand, HotkeyListener, HotkeyOutcome, Hotkeys};
    pub use crate::recorder::{CaptureGate, Recorder, RecorderState};
    pub use crate::replay::{PlaybackConfig, Player};
    pub use crate::storage::ActionStore;
}
