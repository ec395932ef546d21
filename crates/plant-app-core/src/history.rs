// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bridge from committed camera poses to undoable camera commands.

use plant_scene_port::{CameraState, CommandSink, SceneCommand};

/// Description used when the engine supplies none.
pub const DEFAULT_CAMERA_DESCRIPTION: &str = "Camera moved by user";

/// Tracks the last committed camera pose and records moves away from it.
#[derive(Debug, Clone, Copy)]
pub struct CameraHistory {
    last: CameraState,
}

impl Default for CameraHistory {
    fn default() -> Self {
        Self::new(CameraState::default())
    }
}

impl CameraHistory {
    /// History anchored at `initial`.
    pub const fn new(initial: CameraState) -> Self {
        Self { last: initial }
    }

    /// Last committed pose.
    pub const fn last(&self) -> CameraState {
        self.last
    }

    /// Records a committed pose. Poses within [`CameraState::EPSILON`] of the
    /// last one are ignored. Returns whether a command was emitted.
    pub fn commit<S: CommandSink>(
        &mut self,
        to: CameraState,
        description: Option<&str>,
        sink: &mut S,
    ) -> bool {
        if self.last.approx_eq(&to, CameraState::EPSILON) {
            return false;
        }
        let from = self.last;
        self.last = to;
        sink.execute_command(SceneCommand::CameraMove {
            from,
            to,
            description: description.unwrap_or(DEFAULT_CAMERA_DESCRIPTION).to_owned(),
        });
        true
    }

    /// Resets the anchor after the host applied an undo/redo.
    pub fn sync(&mut self, pose: CameraState) {
        self.last = pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn commits_carry_from_and_to() {
        let mut sink: Vec<SceneCommand> = Vec::new();
        let mut h = CameraHistory::default();
        let to = CameraState::new(Vec3::new(5.0, 5.0, 5.0), Vec3::ZERO);
        assert!(h.commit(to, None, &mut sink));
        assert!(!h.commit(to, Some("again"), &mut sink));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].description(), DEFAULT_CAMERA_DESCRIPTION);
        assert_eq!(
            sink[0],
            SceneCommand::CameraMove {
                from: CameraState::default(),
                to,
                description: DEFAULT_CAMERA_DESCRIPTION.into(),
            }
        );
        assert_eq!(h.last(), to);
    }
}
