// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Rigid transform with non-uniform scale used for scene-node placement.
///
/// Conventions:
/// - `translation` in meters.
/// - `rotation` as a unit quaternion.
/// - `scale` is non-uniform and applied before rotation/translation.
///
/// `to_mat4` constructs `M = T * R * S`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (no translation, no rotation, unit scale).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Creates a transform from components.
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Translation plus an XYZ Euler rotation in radians.
    #[must_use]
    pub fn from_translation_euler(translation: Vec3, euler_xyz: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(EulerRot::XYZ, euler_xyz.x, euler_xyz.y, euler_xyz.z),
            scale: Vec3::ONE,
        }
    }

    /// Translation component.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation component.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Scale component.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Returns a copy with the translation replaced.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Returns the column-major `Mat4` corresponding to this transform.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.normalize(), self.translation)
    }
}
