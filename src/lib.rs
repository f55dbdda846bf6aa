//! # autoclicker
//!
//! Replays recorded mouse clicks and key presses at a configurable cadence.
//!
//! ## Features
//!
//! - **Recording**: capture a screen position with one click
//! - **Groups**: tag actions and play back one group at a time
//! - **Replay**: timed repetitions with jitter, random delay and glide
//! - **Hotkeys**: global start / stop / record keys, rebindable at runtime
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoclicker::prelude::*;
//!
//! let store = ActionStore::new()?;
//! let mut session = Session::open(EnigoDriver::factory(), store);
//! session.spawn_hook()?;
//! session.start_playback(PlaybackConfig::default())?;
//! # Ok::<(), autoclicker::Error>(())
//! ```

pub mod session;

// Re-export the data model
pub use autoclicker_core::*;

// Re-export recorder module
pub use autoclicker_recorder as recorder;

pub use autoclicker_recorder::{
    ActionStore, EnigoDriver, FinishReason, HotkeyCommand, Hotkeys, PlaybackConfig, UiEvent,
};
pub use session::Session;

/// Prelude - import everything you need
pub mod prelude {
    pub use autoclicker_core::prelude::*;
    pub use autoclicker_recorder::prelude::*;

    pub use crate::session::Session;
}
