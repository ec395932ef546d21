// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for the plant scene engine.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`) with union, transform and slab ray tests.
- Rigid transforms with non-uniform scale (`Transform`).
- Rays (`Ray`) with sphere and capped-cylinder hit queries.

Design notes:
- Float32 throughout, backed by `glam`.
- Ray hit distances are expressed in the ray's own parameter, so a ray mapped
  into an object's local space with [`Ray::transformed`] reports distances that
  stay comparable with world-space hits.
"]

/// Foundational geometric types.
pub mod types;

pub use types::aabb::Aabb;
pub use types::ray::Ray;
pub use types::transform::Transform;
