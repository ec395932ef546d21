// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera pose exchanged with the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Externally visible camera pose.
///
/// This is the single source of truth the host subscribes to; projection
/// parameters are engine configuration, not part of the pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    /// Camera position in world space.
    pub position: Vec3,
    /// Look-at target in world space.
    pub look_at: Vec3,
}

impl CameraState {
    /// Tolerance used to decide two poses are the same.
    pub const EPSILON: f32 = 0.001;

    /// Creates a pose.
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Component-wise comparison of position and look-at within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps) && self.look_at.abs_diff_eq(other.look_at, eps)
    }

    /// Linear interpolation of both points.
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(target.position, t),
            look_at: self.look_at.lerp(target.look_at, t),
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(25.0, 20.0, 25.0),
            look_at: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}
