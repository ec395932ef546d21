// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted scene preferences (camera pose, color mode, hidden layers).

use glam::Vec3;
use plant_scene_port::{CameraState, ColorMode, LayerState};
use serde::{Deserialize, Serialize};

/// Config key under which [`ScenePrefs`] are stored.
pub const SCENE_PREFS_KEY: &str = "scene_prefs";

/// Saved preferences for a scene view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScenePrefs {
    /// Last committed camera pose.
    pub camera: CameraPrefs,
    /// Active color mode.
    pub color_mode: ColorMode,
    /// Ids of layers the user switched off.
    pub hidden_layers: Vec<String>,
}

/// Camera pose and lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPrefs {
    /// World-space camera position.
    pub position: [f32; 3],
    /// World-space look-at target.
    pub look_at: [f32; 3],
    /// Vertical field of view (degrees).
    pub fov_y_degrees: f32,
}

impl Default for CameraPrefs {
    fn default() -> Self {
        let pose = CameraState::default();
        Self {
            position: pose.position.to_array(),
            look_at: pose.look_at.to_array(),
            fov_y_degrees: 75.0,
        }
    }
}

impl CameraPrefs {
    /// Pose stored in the prefs.
    pub fn pose(&self) -> CameraState {
        CameraState::new(Vec3::from_array(self.position), Vec3::from_array(self.look_at))
    }

    /// Replace the stored pose.
    pub fn set_pose(&mut self, pose: &CameraState) {
        self.position = pose.position.to_array();
        self.look_at = pose.look_at.to_array();
    }
}

impl ScenePrefs {
    /// Applies the hidden-layer list to `layers` (others become visible).
    pub fn apply_to_layers(&self, layers: &mut [LayerState]) {
        for layer in layers {
            layer.is_visible = !self.hidden_layers.iter().any(|id| *id == layer.id);
        }
    }

    /// Captures which of `layers` are hidden.
    pub fn capture_layers(&mut self, layers: &[LayerState]) {
        self.hidden_layers = layers
            .iter()
            .filter(|l| !l.is_visible)
            .map(|l| l.id.clone())
            .collect();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use plant_scene_port::default_layers;

    #[test]
    fn hidden_layers_round_trip() {
        let mut layers = default_layers();
        layers[3].is_visible = false;
        let mut prefs = ScenePrefs::default();
        prefs.capture_layers(&layers);
        assert_eq!(prefs.hidden_layers, vec!["layer-tanks".to_owned()]);

        let mut fresh = default_layers();
        prefs.apply_to_layers(&mut fresh);
        assert_eq!(fresh, layers);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: ScenePrefs = serde_json::from_str(r#"{"hidden_layers":["layer-pipes"]}"#).unwrap();
        assert_eq!(prefs.camera, CameraPrefs::default());
        assert_eq!(prefs.color_mode, ColorMode::Equipment);
        assert_eq!(prefs.camera.pose(), CameraState::default());
    }
}
