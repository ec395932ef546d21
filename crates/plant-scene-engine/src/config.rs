// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engine tuning constants.

use std::time::Duration;

use glam::Vec3;
use plant_scene_port::{CameraState, EquipmentType};
use serde::{Deserialize, Serialize};

/// Lens and initial pose of the perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view (degrees).
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Initial position.
    pub position: Vec3,
    /// Initial look-at target.
    pub look_at: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let pose = CameraState::default();
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
            position: pose.position,
            look_at: pose.look_at,
        }
    }
}

impl CameraConfig {
    /// Initial pose.
    pub fn pose(&self) -> CameraState {
        CameraState::new(self.position, self.look_at)
    }
}

/// Framing distance constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Lower bound of the fitted distance.
    pub min_distance: f32,
    /// Multiplier applied after clamping.
    pub fill: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            fill: 1.5,
        }
    }
}

/// Annotation pin clearances above the equipment top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Clearance for tall structures.
    pub tall_clearance: f32,
    /// Clearance for squat equipment.
    pub squat_clearance: f32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            tall_clearance: 0.8,
            squat_clearance: 0.5,
        }
    }
}

impl PinConfig {
    /// Clearance for `kind`.
    pub const fn clearance(&self, kind: EquipmentType) -> f32 {
        if kind.is_tall() {
            self.tall_clearance
        } else {
            self.squat_clearance
        }
    }
}

/// Everything the engine needs that is not scene data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Camera lens and initial pose.
    pub camera: CameraConfig,
    /// Length of programmatic camera moves (ms).
    pub animation_ms: u64,
    /// Window during which new move requests are rejected (ms).
    pub request_guard_ms: u64,
    /// System framing constants.
    pub framing: FramingConfig,
    /// Edge length of the square ground plane.
    pub ground_size: f32,
    /// Annotation pin clearances.
    pub pins: PinConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            animation_ms: 700,
            request_guard_ms: 100,
            framing: FramingConfig::default(),
            ground_size: 100.0,
            pins: PinConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Animation length as a [`Duration`].
    pub const fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Request guard as a [`Duration`].
    pub const fn request_guard(&self) -> Duration {
        Duration::from_millis(self.request_guard_ms)
    }
}
