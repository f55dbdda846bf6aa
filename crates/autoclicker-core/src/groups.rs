//! Group index - a derived view over the action list
//!
//! Groups are not stored anywhere on their own. A group exists while at
//! least one action carries its tag, or while it sits in the session's
//! empty-group set (freshly created, or emptied during this session).

use crate::action::Action;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Selector label meaning "no filtering"
pub const ALL_GROUPS: &str = "All Groups";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl GroupFilter {
    pub fn parse(selector: &str) -> Self {
        if selector == ALL_GROUPS || selector.is_empty() {
            GroupFilter::All
        } else {
            GroupFilter::Group(selector.to_string())
        }
    }

    pub fn matches(&self, action: &Action) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(g) => action.group() == Some(g.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GroupFilter::All => ALL_GROUPS,
            GroupFilter::Group(g) => g,
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every distinct non-empty tag in `actions`, plus `empty`, sorted
pub fn all_groups(actions: &[Action], empty: &BTreeSet<String>) -> BTreeSet<String> {
    actions
        .iter()
        .filter_map(|a| a.group().map(str::to_string))
        .chain(empty.iter().cloned())
        .collect()
}

/// Actions visible under `filter`, in list order
pub fn filter(actions: &[Action], filter: &GroupFilter) -> Vec<Action> {
    actions.iter().filter(|a| filter.matches(a)).cloned().collect()
}

/// Session-owned group state
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    empty: BTreeSet<String>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty_groups(&self) -> &BTreeSet<String> {
        &self.empty
    }

    pub fn all(&self, actions: &[Action]) -> BTreeSet<String> {
        all_groups(actions, &self.empty)
    }

    pub fn exists(&self, actions: &[Action], name: &str) -> bool {
        self.empty.contains(name) || actions.iter().any(|a| a.group() == Some(name))
    }

    /// Create a new, empty group. Returns the trimmed name.
    pub fn create(&mut self, actions: &[Action], name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Group name cannot be empty"));
        }
        if self.exists(actions, name) {
            return Err(Error::group_exists(name));
        }
        self.empty.insert(name.to_string());
        Ok(name.to_string())
    }

    /// Like [`create`](Self::create), but an existing group is fine
    pub fn ensure_group_exists(&mut self, actions: &[Action], name: &str) -> Result<String> {
        match self.create(actions, name) {
            Err(e) if e.code == crate::ErrorCode::GroupExists => Ok(name.trim().to_string()),
            other => other,
        }
    }

    /// Tag every selected action with `group`.
    ///
    /// Returns the new list and how many actions were tagged. The group must
    /// already exist.
    pub fn assign(
        &mut self,
        actions: &[Action],
        selection: &[String],
        group: &str,
    ) -> Result<(Vec<Action>, usize)> {
        if selection.is_empty() {
            return Err(Error::empty_selection(
                "Please select actions to add to a group",
            ));
        }
        if group.is_empty() {
            return Err(Error::invalid_input("Please select a group"));
        }
        if !self.exists(actions, group) {
            return Err(Error::group_not_found(group));
        }

        let mut count = 0;
        let updated = actions
            .iter()
            .map(|a| {
                if selection.contains(&a.name) {
                    count += 1;
                    a.clone().with_group(group)
                } else {
                    a.clone()
                }
            })
            .collect();

        if count > 0 {
            self.empty.remove(group);
        }
        Ok((updated, count))
    }

    /// Clear the tag on every selected action.
    ///
    /// Groups left without members move into the empty-group set so they
    /// stay selectable for the rest of the session.
    pub fn remove_from_groups(
        &mut self,
        actions: &[Action],
        selection: &[String],
    ) -> Result<(Vec<Action>, usize)> {
        if selection.is_empty() {
            return Err(Error::empty_selection(
                "Please select actions to remove from their group",
            ));
        }

        let affected: BTreeSet<String> = actions
            .iter()
            .filter(|a| selection.contains(&a.name))
            .filter_map(|a| a.group().map(str::to_string))
            .collect();
        if affected.is_empty() {
            return Err(Error::empty_selection(
                "None of the selected items are in a group",
            ));
        }

        let mut count = 0;
        let updated: Vec<Action> = actions
            .iter()
            .map(|a| {
                let mut a = a.clone();
                if selection.contains(&a.name) && a.group.is_some() {
                    a.set_group(None);
                    count += 1;
                }
                a
            })
            .collect();

        for group in affected {
            if !updated.iter().any(|a| a.group() == Some(group.as_str())) {
                tracing::debug!(group = %group, "group is now empty, keeping it for this session");
                self.empty.insert(group);
            }
        }
        Ok((updated, count))
    }
}
