// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Undoable actions handed to the host's command stack.

use serde::{Deserialize, Serialize};

use crate::camera::CameraState;

/// One undoable action. The host's command stack decides how to execute and
/// revert it; every variant carries both the before and after state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneCommand {
    /// Camera pose committed by the user or by a finished framing animation.
    CameraMove {
        /// Pose before the move.
        from: CameraState,
        /// Pose after the move.
        to: CameraState,
        /// History label.
        description: String,
    },
    /// Layer toggled on or off.
    LayerVisibility {
        /// Layer id.
        layer_id: String,
        /// Visibility before.
        before: bool,
        /// Visibility after.
        after: bool,
        /// History label.
        description: String,
    },
    /// Selection replaced.
    EquipmentSelect {
        /// Selected tags before (sorted).
        before: Vec<String>,
        /// Selected tags after (sorted).
        after: Vec<String>,
        /// History label.
        description: String,
    },
}

impl SceneCommand {
    /// History label of the command.
    pub fn description(&self) -> &str {
        match self {
            Self::CameraMove { description, .. }
            | Self::LayerVisibility { description, .. }
            | Self::EquipmentSelect { description, .. } => description,
        }
    }
}
