//! autoclicker-core - data model for the autoclicker
//!
//! Everything here is plain data and pure logic: the action records and
//! their file format, the group index, app settings, and the input-driver
//! seam that playback drives.

pub mod action;
pub mod error;
pub mod groups;
pub mod input;
pub mod settings;

pub use action::{check_hold, Action, ActionKind, ActionPatch, ClickType, DEFAULT_HOLD_SECS, MAX_HOLD_SECS};
pub use error::{Error, ErrorCode, Result};
pub use groups::{all_groups, filter, GroupFilter, GroupIndex, ALL_GROUPS};
pub use input::{DriverFactory, InputDriver, MouseButton};
pub use settings::AppSettings;

pub mod prelude {
    pub use crate::action::{Action, ActionKind, ActionPatch, ClickType};
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::groups::{GroupFilter, GroupIndex, ALL_GROUPS};
    pub use crate::input::{DriverFactory, InputDriver, MouseButton};
    pub use crate::settings::AppSettings;
}
