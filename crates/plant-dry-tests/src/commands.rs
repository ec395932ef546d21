// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command sink that records every command it executes.

use std::sync::{Arc, Mutex, MutexGuard};

use plant_scene_port::{CommandSink, SceneCommand};

/// [`CommandSink`] that stores commands in order. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<SceneCommand>>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SceneCommand>> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of every command executed so far.
    pub fn commands(&self) -> Vec<SceneCommand> {
        self.lock().clone()
    }

    /// Descriptions of every command executed so far.
    pub fn descriptions(&self) -> Vec<String> {
        self.lock().iter().map(|c| c.description().to_owned()).collect()
    }

    /// Number of commands executed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been executed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forgets every recorded command.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl CommandSink for RecordingSink {
    fn execute_command(&mut self, command: SceneCommand) {
        self.lock().push(command);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use plant_scene_port::CameraState;

    #[test]
    fn clones_see_the_same_log() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.execute_command(SceneCommand::CameraMove {
            from: CameraState::default(),
            to: CameraState::default(),
            description: "moved".into(),
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.descriptions(), ["moved"]);
        sink.clear();
        assert!(writer.is_empty());
    }
}
