// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Annotations attached to equipment.

use serde::{Deserialize, Serialize};

/// Free-text note bound to one equipment tag (at most one per tag).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Target equipment tag.
    pub equipment_tag: String,
    /// Note body.
    pub text: String,
    /// ISO 8601 timestamp of the last edit.
    #[serde(default)]
    pub created_at: String,
}

impl Annotation {
    /// Creates an annotation with an empty timestamp.
    pub fn new(equipment_tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            equipment_tag: equipment_tag.into(),
            text: text.into(),
            created_at: String::new(),
        }
    }
}
