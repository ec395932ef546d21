// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene observer that records engine callbacks.

use std::sync::{Arc, Mutex, MutexGuard};

use plant_scene_engine::SceneObserver;
use plant_scene_port::CameraState;

/// One `on_camera_committed` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    /// Committed pose.
    pub state: CameraState,
    /// Description passed along, if any.
    pub description: Option<String>,
}

#[derive(Default)]
struct Inner {
    commits: Vec<Commit>,
    framed: Vec<String>,
}

/// [`SceneObserver`] that keeps every callback. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingObserver {
    /// Empty observer.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Camera commits in order.
    pub fn commits(&self) -> Vec<Commit> {
        self.lock().commits.clone()
    }

    /// Systems reported as framed, in order.
    pub fn framed(&self) -> Vec<String> {
        self.lock().framed.clone()
    }

    /// Forgets everything recorded.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.commits.clear();
        inner.framed.clear();
    }
}

impl SceneObserver for RecordingObserver {
    fn on_camera_committed(&mut self, state: &CameraState, description: Option<&str>) {
        self.lock().commits.push(Commit {
            state: *state,
            description: description.map(str::to_owned),
        });
    }

    fn on_system_framed(&mut self, system: &str) {
        self.lock().framed.push(system.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn records_both_callbacks() {
        let obs = RecordingObserver::new();
        let mut handle = obs.clone();
        handle.on_camera_committed(&CameraState::default(), Some("x"));
        handle.on_system_framed("ODB");
        assert_eq!(obs.commits()[0].description.as_deref(), Some("x"));
        assert_eq!(obs.framed(), ["ODB"]);
        obs.clear();
        assert!(obs.commits().is_empty());
    }
}
