// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::{Mat4, Vec3};

/// Half-line `origin + t * direction` for `t >= 0`.
///
/// `direction` is not required to be unit length. Hit queries report `t` in
/// the ray's own parameterization, so distances survive affine remapping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Maps the ray through an affine transform without renormalizing.
    #[must_use]
    pub fn transformed(&self, mat: &Mat4) -> Self {
        Self {
            origin: mat.transform_point3(self.origin),
            direction: mat.transform_vector3(self.direction),
        }
    }

    /// Nearest non-negative hit against a sphere.
    #[must_use]
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.direction.length_squared();
        if a <= f32::EPSILON {
            return None;
        }
        let half_b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let near = (-half_b - sq) / a;
        if near >= 0.0 {
            return Some(near);
        }
        let far = (-half_b + sq) / a;
        (far >= 0.0).then_some(far)
    }

    /// Nearest non-negative hit against a Y-aligned cylinder centered at the
    /// origin, including its end caps.
    #[must_use]
    pub fn hit_capped_cylinder(&self, radius: f32, half_height: f32) -> Option<f32> {
        let (o, d) = (self.origin, self.direction);
        let r2 = radius * radius;
        let mut best: Option<f32> = None;
        let mut consider = |t: f32| {
            if t >= 0.0 && best.is_none_or(|b| t < b) {
                best = Some(t);
            }
        };

        let a = d.x * d.x + d.z * d.z;
        if a > f32::EPSILON {
            let half_b = o.x * d.x + o.z * d.z;
            let c = o.x * o.x + o.z * o.z - r2;
            let disc = half_b * half_b - a * c;
            if disc >= 0.0 {
                let sq = disc.sqrt();
                for t in [(-half_b - sq) / a, (-half_b + sq) / a] {
                    if (o.y + t * d.y).abs() <= half_height {
                        consider(t);
                    }
                }
            }
        }

        if d.y.abs() > f32::EPSILON {
            for cap in [-half_height, half_height] {
                let t = (cap - o.y) / d.y;
                let p = self.at(t);
                if p.x * p.x + p.z * p.z <= r2 {
                    consider(t);
                }
            }
        }
        best
    }
}
