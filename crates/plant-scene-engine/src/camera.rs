// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Perspective camera math and viewport mapping.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use plant_geom::Ray;
use plant_scene_port::CameraState;

use crate::config::CameraConfig;

/// Pixel rectangle the scene is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge (px).
    pub left: f32,
    /// Top edge (px).
    pub top: f32,
    /// Width (px).
    pub width: f32,
    /// Height (px).
    pub height: f32,
}

impl Viewport {
    /// Rectangle at `(left, top)` of size `width` x `height`.
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Whether the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width over height (1 for an empty rectangle).
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Pixel to normalized device coordinates (Y up). `None` when empty.
    pub fn to_ndc(&self, px: f32, py: f32) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let x = (px - self.left) / self.width * 2.0 - 1.0;
        let y = -((py - self.top) / self.height * 2.0 - 1.0);
        Some(Vec2::new(x, y))
    }

    /// Normalized device coordinates back to pixels.
    pub fn to_pixels(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) * 0.5 * self.width,
            self.top + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

/// Right-handed, Y-up perspective camera aimed at a look-at point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Vertical field of view (radians).
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

impl PerspectiveCamera {
    /// Camera using the lens and pose of `cfg`.
    pub fn from_config(cfg: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: cfg.position,
            look_at: cfg.look_at,
            fov_y: cfg.fov_y_degrees.to_radians(),
            aspect,
            near: cfg.near,
            far: cfg.far,
        }
    }

    /// Current pose.
    pub const fn pose(&self) -> CameraState {
        CameraState::new(self.position, self.look_at)
    }

    /// Moves the camera to `pose`.
    pub fn set_pose(&mut self, pose: &CameraState) {
        self.position = pose.position;
        self.look_at = pose.look_at;
    }

    /// Forward, right and up unit vectors.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.look_at - self.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        let (f, _, u) = self.basis();
        Mat4::look_to_rh(self.position, f, u)
    }

    /// View-to-clip matrix.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.near, self.far)
    }

    /// World-to-clip matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray from the eye through `ndc`.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let (f, r, u) = self.basis();
        let t = (self.fov_y * 0.5).tan();
        let dir = (f + r * (ndc.x * t * self.aspect) + u * (ndc.y * t)).normalize();
        Ray::new(self.position, dir)
    }

    /// NDC position and view depth of `world`. `None` when behind the eye.
    pub fn project(&self, world: Vec3) -> Option<(Vec2, f32)> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= self.near * 0.5 {
            return None;
        }
        Some((clip.xy() / clip.w, clip.w))
    }
}
