// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shape descriptions returned by geometry factories.
//!
//! A shape is centered on its own local origin: for groups, the first part is
//! the body and sits at the origin; the remaining parts are attachments.

use glam::{Quat, Vec3};
use plant_geom::{Aabb, Transform};

use crate::color::Color;

/// Solid primitive in its own local frame (Y up, centered).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// Axis-aligned box.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
    },
    /// Y-aligned capped cylinder.
    Cylinder {
        /// Radius.
        radius: f32,
        /// Extent along Y.
        height: f32,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Flat XZ rectangle.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Z.
        depth: f32,
    },
}

impl Primitive {
    /// Local bounds of the primitive.
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => Aabb::from_center_half_extents(Vec3::ZERO, width * 0.5, height * 0.5, depth * 0.5),
            Self::Cylinder { radius, height } => {
                Aabb::from_center_half_extents(Vec3::ZERO, radius, height * 0.5, radius)
            }
            Self::Sphere { radius } => Aabb::from_center_half_extents(Vec3::ZERO, radius, radius, radius),
            Self::Plane { width, depth } => {
                Aabb::from_center_half_extents(Vec3::ZERO, width * 0.5, 0.0, depth * 0.5)
            }
        }
    }
}

/// One mesh of a grouped shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapePart {
    /// Part name, for diagnostics.
    pub name: &'static str,
    /// Geometry.
    pub primitive: Primitive,
    /// Offset from the shape origin.
    pub offset: Vec3,
    /// Orientation relative to the shape.
    pub rotation: Quat,
    /// Optional color override; `None` uses the item color.
    pub tint: Option<Color>,
}

impl ShapePart {
    /// Part at `offset` with no rotation.
    pub fn new(name: &'static str, primitive: Primitive, offset: Vec3) -> Self {
        Self {
            name,
            primitive,
            offset,
            rotation: Quat::IDENTITY,
            tint: None,
        }
    }

    /// Returns the part rotated by `rotation`.
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns the part with a fixed color.
    pub fn tinted(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Placement of the part inside its shape.
    pub fn transform(&self) -> Transform {
        Transform::new(self.offset, self.rotation, Vec3::ONE)
    }

    /// Bounds of the part in shape space.
    pub fn bounds(&self) -> Aabb {
        self.primitive.local_bounds().transformed(&self.transform().to_mat4())
    }
}

/// A factory result: a single mesh or a group of parts.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Single primitive centered at the origin.
    Mesh(Primitive),
    /// Body part first, attachments after.
    Group(Vec<ShapePart>),
}

impl Shape {
    /// Bounds of the body (the mesh itself or the group's first part).
    pub fn body_bounds(&self) -> Option<Aabb> {
        match self {
            Self::Mesh(p) => Some(p.local_bounds()),
            Self::Group(parts) => parts.first().map(ShapePart::bounds),
        }
    }

    /// Half the vertical extent of the body; 0 for an empty group.
    pub fn body_half_height(&self) -> f32 {
        self.body_bounds().map_or(0.0, |b| b.size().y * 0.5)
    }

    /// Bounds of every part in shape space.
    pub fn local_bounds(&self) -> Option<Aabb> {
        match self {
            Self::Mesh(p) => Some(p.local_bounds()),
            Self::Group(parts) => Aabb::union_all(parts.iter().map(ShapePart::bounds)),
        }
    }

    /// Number of meshes the shape expands to.
    pub fn mesh_count(&self) -> usize {
        match self {
            Self::Mesh(_) => 1,
            Self::Group(parts) => parts.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn laid_down_body_reports_radius_as_half_height() {
        let body = ShapePart::new(
            "body",
            Primitive::Cylinder {
                radius: 1.2,
                height: 6.0,
            },
            Vec3::ZERO,
        )
        .rotated(Quat::from_rotation_z(FRAC_PI_2));
        let shape = Shape::Group(vec![body]);
        assert_relative_eq!(shape.body_half_height(), 1.2, epsilon = 1e-5);
    }

    #[test]
    fn attachments_extend_local_bounds_but_not_body() {
        let shape = Shape::Group(vec![
            ShapePart::new(
                "body",
                Primitive::Box {
                    width: 2.0,
                    height: 2.0,
                    depth: 2.0,
                },
                Vec3::ZERO,
            ),
            ShapePart::new("cap", Primitive::Sphere { radius: 0.5 }, Vec3::new(0.0, 1.5, 0.0)),
        ]);
        assert_relative_eq!(shape.body_half_height(), 1.0);
        assert_relative_eq!(shape.local_bounds().unwrap().max().y, 2.0);
        assert_eq!(shape.mesh_count(), 2);
    }
}
