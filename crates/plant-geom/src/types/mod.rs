// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the scene engine (transform, AABB, ray).
//!
//! Overlap and containment tests are inclusive on faces.

#[doc = "Axis-aligned bounding boxes (local or world space)."]
pub mod aabb;
#[doc = "Half-lines with hit queries against simple solids."]
pub mod ray;
#[doc = "Rigid transforms with non-uniform scale."]
pub mod transform;
