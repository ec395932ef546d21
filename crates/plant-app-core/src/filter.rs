// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Equipment filtering by search text, system and area.

use std::collections::BTreeSet;

use plant_scene_port::EquipmentItem;
use serde::{Deserialize, Serialize};

/// Wildcard value for the system and area criteria.
pub const ALL: &str = "All";

/// Filter criteria applied before equipment reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentFilter {
    /// Whitespace-separated terms; every term must match some field.
    pub search_term: String,
    /// System name or [`ALL`].
    pub sistema: String,
    /// Area name or [`ALL`].
    pub area: String,
}

impl Default for EquipmentFilter {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sistema: ALL.to_owned(),
            area: ALL.to_owned(),
        }
    }
}

fn criterion_matches(criterion: &str, value: Option<&str>) -> bool {
    criterion == ALL || criterion.is_empty() || value == Some(criterion)
}

impl EquipmentFilter {
    /// Whether `item` passes every criterion.
    pub fn matches(&self, item: &EquipmentItem) -> bool {
        if !criterion_matches(&self.sistema, item.sistema.as_deref())
            || !criterion_matches(&self.area, item.area.as_deref())
        {
            return false;
        }
        let haystack = [
            item.tag.as_str(),
            item.name.as_str(),
            item.kind.as_str(),
            item.sistema.as_deref().unwrap_or_default(),
            item.area.as_deref().unwrap_or_default(),
        ]
        .join("\n")
        .to_lowercase();
        self.search_term
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }

    /// Items passing the filter, in input order.
    pub fn apply(&self, items: &[EquipmentItem]) -> Vec<EquipmentItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

fn distinct_with_all<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let set: BTreeSet<&str> = values.flatten().filter(|v| *v != ALL).collect();
    std::iter::once(ALL)
        .chain(set)
        .map(str::to_owned)
        .collect()
}

/// Distinct systems, sorted, with [`ALL`] first.
pub fn available_sistemas(items: &[EquipmentItem]) -> Vec<String> {
    distinct_with_all(items.iter().map(|i| i.sistema.as_deref()))
}

/// Distinct areas, sorted, with [`ALL`] first.
pub fn available_areas(items: &[EquipmentItem]) -> Vec<String> {
    distinct_with_all(items.iter().map(|i| i.area.as_deref()))
}
