// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Selection and hover state.

use serde::{Deserialize, Serialize};

/// Selected tags (ordered, duplicate-free) plus one optional hovered tag.
///
/// Renderers read this to drive highlighting; the engine never writes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    selected: Vec<String>,
    /// Currently hovered tag (if any).
    pub hovered: Option<String>,
}

impl SelectionState {
    /// Empty selection, nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection from a tag list; duplicates keep their first position.
    pub fn with_selected<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for tag in tags {
            state.add(tag);
        }
        state
    }

    /// Selected tags in insertion order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Whether `tag` is selected.
    pub fn contains(&self, tag: &str) -> bool {
        self.selected.iter().any(|t| t == tag)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Adds `tag`; returns `false` if it was already selected.
    pub fn add(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.selected.push(tag);
        true
    }

    /// Removes `tag`; returns `false` if it was not selected.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|t| t != tag);
        before != self.selected.len()
    }

    /// Adds `tag` if absent, removes it otherwise.
    pub fn toggle(&mut self, tag: &str) {
        if !self.remove(tag) {
            self.selected.push(tag.to_owned());
        }
    }

    /// Replaces the whole selection.
    pub fn set_selected(&mut self, tags: Vec<String>) {
        self.selected.clear();
        for tag in tags {
            self.add(tag);
        }
    }

    /// Clears the selection (hover is untouched).
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selection as a sorted list, for order-insensitive comparison.
    pub fn sorted(&self) -> Vec<String> {
        let mut v = self.selected.clone();
        v.sort();
        v
    }
}
