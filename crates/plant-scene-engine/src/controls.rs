// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! User camera interaction.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

/// Maximum orbit pitch; keeps the camera off the poles.
pub const MAX_PITCH: f32 = PI * 0.5 - 0.01;

/// Port for user-driven camera movement.
///
/// Input methods only queue deltas. [`InteractionControls::update`] applies
/// them to the camera once per frame. Disabled controls drop queued input.
pub trait InteractionControls {
    /// Allows or blocks user input.
    fn set_enabled(&mut self, enabled: bool);
    /// Whether user input is accepted.
    fn is_enabled(&self) -> bool;
    /// Queues an orbit by a pointer delta in pixels.
    fn rotate(&mut self, delta: Vec2);
    /// Queues a dolly; `scale < 1` moves closer.
    fn dolly(&mut self, scale: f32);
    /// Queues a pan by a pointer delta in pixels.
    fn pan(&mut self, delta: Vec2);
    /// Applies queued input to `camera`. Returns whether the camera moved.
    fn update(&mut self, camera: &mut PerspectiveCamera) -> bool;
}

/// Orbit around the camera's look-at point.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    enabled: bool,
    /// Radians per pixel of pointer movement.
    pub sensitivity: f32,
    /// World units per pixel per unit of orbit radius.
    pub pan_speed: f32,
    /// Closest allowed orbit radius.
    pub min_distance: f32,
    /// Farthest allowed orbit radius.
    pub max_distance: f32,
    rotate: Vec2,
    pan: Vec2,
    dolly: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: 0.0025,
            pan_speed: 0.001,
            min_distance: 1.0,
            max_distance: 500.0,
            rotate: Vec2::ZERO,
            pan: Vec2::ZERO,
            dolly: 1.0,
        }
    }
}

impl OrbitControls {
    fn has_input(&self) -> bool {
        self.rotate != Vec2::ZERO || self.pan != Vec2::ZERO || (self.dolly - 1.0).abs() > f32::EPSILON
    }

    fn clear(&mut self) {
        self.rotate = Vec2::ZERO;
        self.pan = Vec2::ZERO;
        self.dolly = 1.0;
    }
}

impl InteractionControls for OrbitControls {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn rotate(&mut self, delta: Vec2) {
        if self.enabled {
            self.rotate += delta;
        }
    }

    fn dolly(&mut self, scale: f32) {
        if self.enabled && scale.is_finite() && scale > 0.0 {
            self.dolly *= scale;
        }
    }

    fn pan(&mut self, delta: Vec2) {
        if self.enabled {
            self.pan += delta;
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.enabled || !self.has_input() {
            return false;
        }
        let offset = camera.position - camera.look_at;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            self.clear();
            return false;
        }
        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        yaw -= self.rotate.x * self.sensitivity;
        pitch = (pitch + self.rotate.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        let radius = (radius * self.dolly).clamp(self.min_distance, self.max_distance);

        let (_, right, up) = camera.basis();
        let shift = (right * -self.pan.x + up * self.pan.y) * (self.pan_speed * radius);
        camera.look_at += shift;
        let dir = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        camera.position = camera.look_at + dir * radius;
        self.clear();
        true
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plant_scene_port::CameraState;

    fn camera() -> PerspectiveCamera {
        let mut c = PerspectiveCamera::default();
        c.set_pose(&CameraState::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO));
        c
    }

    #[test]
    fn orbit_keeps_radius_and_target() {
        let mut cam = camera();
        let mut ctl = OrbitControls::default();
        ctl.rotate(Vec2::new(200.0, 100.0));
        assert!(ctl.update(&mut cam));
        assert_relative_eq!(cam.position.length(), 10.0, epsilon = 1e-4);
        assert_eq!(cam.look_at, Vec3::ZERO);
        assert!(!ctl.update(&mut cam));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera();
        let mut ctl = OrbitControls::default();
        ctl.rotate(Vec2::new(0.0, 100_000.0));
        ctl.update(&mut cam);
        let pitch = (cam.position.y / cam.position.length()).asin();
        assert_relative_eq!(pitch, MAX_PITCH, epsilon = 1e-4);
    }

    #[test]
    fn dolly_is_clamped() {
        let mut cam = camera();
        let mut ctl = OrbitControls::default();
        ctl.dolly(0.01);
        ctl.update(&mut cam);
        assert_relative_eq!(cam.position.length(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn disabled_controls_drop_input() {
        let mut cam = camera();
        let before = cam.pose();
        let mut ctl = OrbitControls::default();
        ctl.rotate(Vec2::new(50.0, 0.0));
        ctl.set_enabled(false);
        ctl.pan(Vec2::new(10.0, 0.0));
        assert!(!ctl.update(&mut cam));
        ctl.set_enabled(true);
        assert!(!ctl.update(&mut cam));
        assert_eq!(cam.pose(), before);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut cam = camera();
        let mut ctl = OrbitControls::default();
        ctl.pan(Vec2::new(-100.0, 0.0));
        ctl.update(&mut cam);
        assert!(cam.look_at.x > 0.0);
        assert_relative_eq!((cam.position - cam.look_at).length(), 10.0, epsilon = 1e-4);
    }
}
