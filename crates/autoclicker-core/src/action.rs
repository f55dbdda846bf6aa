//! Recorded actions
//!
//! An action file is a flat JSON array. Each record carries `name`,
//! `action_type` (`click` when absent), an optional `group`, and the
//! fields of its variant:
//!
//! ```json
//! { "name": "Location 1", "action_type": "click", "x": 10, "y": 20,
//!   "click_type": "Left", "hold_duration": 1.0 }
//! { "name": "Keystroke 2", "action_type": "keystroke", "key": "space", "group": "Boss" }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hold time used when a click record does not carry one
pub const DEFAULT_HOLD_SECS: f64 = 1.0;

/// Longest timed hold a click may carry
pub const MAX_HOLD_SECS: f64 = 3600.0;

/// Hold times must be finite, non-negative and at most [`MAX_HOLD_SECS`]
pub fn check_hold(secs: f64) -> Result<f64> {
    if secs.is_finite() && (0.0..=MAX_HOLD_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(Error::invalid_input(format!(
            "Hold duration must be between 0 and {} seconds, got {}",
            MAX_HOLD_SECS, secs
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub struct Action {
    pub name: String,
    /// `None` means ungrouped; never `Some("")`
    pub group: Option<String>,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Click {
        x: i32,
        y: i32,
        click_type: ClickType,
        hold_duration: f64,
    },
    Keystroke {
        key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClickType {
    #[default]
    Left,
    Right,
    Double,
    Hold,
    #[serde(rename = "Hold Until Stopped")]
    HoldUntilStopped,
}

impl ClickType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickType::Left => "Left",
            ClickType::Right => "Right",
            ClickType::Double => "Double",
            ClickType::Hold => "Hold",
            ClickType::HoldUntilStopped => "Hold Until Stopped",
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, ClickType::Hold | ClickType::HoldUntilStopped)
    }
}

impl fmt::Display for ClickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClickType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "left" => Ok(ClickType::Left),
            "right" => Ok(ClickType::Right),
            "double" => Ok(ClickType::Double),
            "hold" => Ok(ClickType::Hold),
            "holduntilstopped" => Ok(ClickType::HoldUntilStopped),
            _ => Err(Error::invalid_input(format!("Unknown click type: {}", s))),
        }
    }
}

impl Action {
    pub fn click(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            group: None,
            kind: ActionKind::Click {
                x,
                y,
                click_type: ClickType::Left,
                hold_duration: DEFAULT_HOLD_SECS,
            },
        }
    }

    pub fn keystroke(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            kind: ActionKind::Keystroke { key: key.into() },
        }
    }

    pub fn with_click_type(mut self, ty: ClickType) -> Self {
        if let ActionKind::Click { click_type, .. } = &mut self.kind {
            *click_type = ty;
        }
        self
    }

    pub fn with_hold(mut self, secs: f64) -> Self {
        if let ActionKind::Click { hold_duration, .. } = &mut self.kind {
            *hold_duration = secs;
        }
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.set_group(Some(group.into()));
        self
    }

    /// Set or clear the group tag; blank names clear it
    pub fn set_group(&mut self, group: Option<String>) {
        self.group = group.filter(|g| !g.is_empty());
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Coordinates column as the list view shows it
    pub fn position_label(&self) -> String {
        match &self.kind {
            ActionKind::Click { x, y, .. } => format!("{}, {}", x, y),
            ActionKind::Keystroke { .. } => "-, -".to_string(),
        }
    }

    /// Detail column as the list view shows it
    pub fn detail_label(&self) -> String {
        match &self.kind {
            ActionKind::Click {
                click_type,
                hold_duration,
                ..
            } if click_type.is_hold() => format!("{} ({}s)", click_type, hold_duration),
            ActionKind::Click { click_type, .. } => click_type.to_string(),
            ActionKind::Keystroke { key } => format!("Key: {}", key),
        }
    }

    /// Apply an edit in place; fields that do not fit the variant are rejected
    pub fn apply(&mut self, patch: &ActionPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_input("Action name cannot be empty"));
            }
        }
        if let Some(secs) = patch.hold_duration {
            check_hold(secs)?;
        }

        match &mut self.kind {
            ActionKind::Click {
                click_type,
                hold_duration,
                ..
            } => {
                if patch.key.is_some() {
                    return Err(Error::invalid_input(format!(
                        "'{}' is a click; it has no key",
                        self.name
                    )));
                }
                if let Some(ty) = patch.click_type {
                    *click_type = ty;
                }
                if let Some(secs) = patch.hold_duration {
                    *hold_duration = secs;
                }
            }
            ActionKind::Keystroke { key } => {
                if patch.click_type.is_some() || patch.hold_duration.is_some() {
                    return Err(Error::invalid_input(format!(
                        "'{}' is a keystroke; it has no click settings",
                        self.name
                    )));
                }
                if let Some(k) = &patch.key {
                    if k.trim().is_empty() {
                        return Err(Error::invalid_input("Key cannot be empty"));
                    }
                    *key = k.trim().to_string();
                }
            }
        }

        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        Ok(())
    }
}

/// Partial update produced by the edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPatch {
    pub name: Option<String>,
    pub click_type: Option<ClickType>,
    pub hold_duration: Option<f64>,
    pub key: Option<String>,
}

impl ActionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.click_type.is_none()
            && self.hold_duration.is_none()
            && self.key.is_none()
    }
}

// ============================================================================
// Wire shape
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    #[default]
    Click,
    Keystroke,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawAction {
    name: String,
    #[serde(default)]
    action_type: RawKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    click_type: Option<ClickType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hold_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = String;

    fn try_from(raw: RawAction) -> std::result::Result<Self, Self::Error> {
        let kind = match raw.action_type {
            RawKind::Click => {
                let (Some(x), Some(y)) = (raw.x, raw.y) else {
                    return Err(format!("click '{}' is missing x/y", raw.name));
                };
                let hold_duration = check_hold(raw.hold_duration.unwrap_or(DEFAULT_HOLD_SECS))
                    .map_err(|e| format!("click '{}': {}", raw.name, e.message))?;
                ActionKind::Click {
                    x,
                    y,
                    click_type: raw.click_type.unwrap_or_default(),
                    hold_duration,
                }
            }
            RawKind::Keystroke => {
                let key = raw
                    .key
                    .ok_or_else(|| format!("keystroke '{}' is missing key", raw.name))?;
                ActionKind::Keystroke { key }
            }
        };

        let mut action = Action {
            name: raw.name,
            group: None,
            kind,
        };
        action.set_group(raw.group);
        Ok(action)
    }
}

impl From<Action> for RawAction {
    fn from(a: Action) -> Self {
        let mut raw = RawAction {
            name: a.name,
            action_type: RawKind::Click,
            x: None,
            y: None,
            click_type: None,
            hold_duration: None,
            key: None,
            group: a.group.filter(|g| !g.is_empty()),
        };
        match a.kind {
            ActionKind::Click {
                x,
                y,
                click_type,
                hold_duration,
            } => {
                raw.x = Some(x);
                raw.y = Some(y);
                raw.click_type = Some(click_type);
                raw.hold_duration = Some(hold_duration);
            }
            ActionKind::Keystroke { key } => {
                raw.action_type = RawKind::Keystroke;
                raw.key = Some(key);
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_action_type_reads_as_click() {
        let a: Action = serde_json::from_str(r#"{"name":"A","x":10,"y":20}"#).unwrap();
        assert_eq!(a, Action::click("A", 10, 20));
    }

    #[test]
    fn empty_group_is_ungrouped() {
        let a: Action = serde_json::from_str(
            r#"{"name":"K","action_type":"keystroke","key":"a","group":""}"#,
        )
        .unwrap();
        assert_eq!(a.group, None);
    }

    #[test]
    fn hold_until_stopped_uses_spaced_name() {
        let a = Action::click("H", 1, 2).with_click_type(ClickType::HoldUntilStopped);
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains(r#""click_type":"Hold Until Stopped""#));
    }

    #[test]
    fn keystroke_omits_click_fields() {
        let json = serde_json::to_value(Action::keystroke("K", "space")).unwrap();
        assert_eq!(json["action_type"], "keystroke");
        assert!(json.get("x").is_none());
        assert!(json.get("group").is_none());
    }

    #[test]
    fn blank_group_set_directly_is_not_written() {
        let mut a = Action::keystroke("K", "space");
        a.group = Some(String::new());
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("group").is_none());
    }

    #[test]
    fn out_of_range_hold_is_rejected_on_load() {
        for hold in ["1e20", "-1", "3600.5"] {
            let text = format!(r#"{{"name":"A","x":1,"y":1,"hold_duration":{}}}"#, hold);
            let res: serde_json::Result<Action> = serde_json::from_str(&text);
            assert!(res.is_err(), "hold {} accepted", hold);
        }
        let a: Action =
            serde_json::from_str(r#"{"name":"A","x":1,"y":1,"hold_duration":3600}"#).unwrap();
        assert_eq!(a, Action::click("A", 1, 1).with_hold(MAX_HOLD_SECS));
    }

    #[test]
    fn patch_rejects_out_of_range_hold() {
        let mut a = Action::click("A", 1, 1);
        for secs in [f64::NAN, f64::INFINITY, -0.5, 1e20] {
            let patch = ActionPatch {
                hold_duration: Some(secs),
                ..Default::default()
            };
            assert!(a.apply(&patch).is_err());
        }
        assert_eq!(a, Action::click("A", 1, 1));
    }

    #[test]
    fn click_without_coordinates_is_rejected() {
        let res: serde_json::Result<Action> = serde_json::from_str(r#"{"name":"A"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn parse_click_type_loosely() {
        assert_eq!("hold-until-stopped".parse::<ClickType>().unwrap(), ClickType::HoldUntilStopped);
        assert_eq!("Hold Until Stopped".parse::<ClickType>().unwrap(), ClickType::HoldUntilStopped);
        assert_eq!("RIGHT".parse::<ClickType>().unwrap(), ClickType::Right);
        assert!("middle".parse::<ClickType>().is_err());
    }

    #[test]
    fn patch_rejects_fields_of_other_variant() {
        let mut k = Action::keystroke("K", "a");
        let patch = ActionPatch {
            click_type: Some(ClickType::Right),
            ..Default::default()
        };
        assert!(k.apply(&patch).is_err());
        assert_eq!(k, Action::keystroke("K", "a"));
    }

    #[test]
    fn patch_updates_click() {
        let mut a = Action::click("A", 1, 1);
        a.apply(&ActionPatch {
            name: Some(" Boss door ".into()),
            click_type: Some(ClickType::Hold),
            hold_duration: Some(2.5),
            key: None,
        })
        .unwrap();
        assert_eq!(a.name, "Boss door");
        assert_eq!(a.detail_label(), "Hold (2.5s)");
    }
}
