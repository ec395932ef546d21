// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::{Mat4, Vec3};

use crate::types::ray::Ray;

/// Axis-aligned bounding box.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Values are `f32` and represent meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB spanning two opposite corners.
    ///
    /// The corners may be given in any order; components are sorted so the
    /// `min <= max` invariant always holds.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy, hz`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, hx: f32, hy: f32, hz: f32) -> Self {
        let he = Vec3::new(hx, hy, hz).abs();
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest edge length.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Returns `true` when every edge has (near) zero length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max_dimension() <= f32::EPSILON
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max.cmpge(other.min).all() && self.min.cmple(other.max).all()
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of every box yielded by `boxes`; `None` when the iterator is empty.
    pub fn union_all<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Inflates the box by a uniform margin `m` in all directions.
    #[must_use]
    pub fn inflate(&self, m: f32) -> Self {
        let delta = Vec3::splat(m);
        Self::new(self.min - delta, self.max + delta)
    }

    /// Computes the AABB that bounds this box after transformation by `mat`.
    ///
    /// This evaluates the eight corners under the affine transform and builds a
    /// new axis-aligned box containing them.
    #[must_use]
    pub fn transformed(&self, mat: &Mat4) -> Self {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        let first = mat.transform_point3(corners[0]);
        let (min, max) = corners[1..].iter().fold((first, first), |(mi, ma), c| {
            let p = mat.transform_point3(*c);
            (mi.min(p), ma.max(p))
        });
        Self { min, max }
    }

    /// Builds the minimal AABB that contains all `points`; `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(mi, ma), p| (mi.min(*p), ma.max(*p)));
        Some(Self { min, max })
    }

    /// Slab test. Returns the ray parameter of the first boundary crossing at
    /// or after the origin, or `None` when the ray misses.
    ///
    /// A ray starting inside the box reports its exit distance.
    #[must_use]
    pub fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        let axes = ray
            .origin
            .to_array()
            .into_iter()
            .zip(ray.direction.to_array())
            .zip(self.min.to_array().into_iter().zip(self.max.to_array()));
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for ((o, d), (lo, hi)) in axes {
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = d.recip();
            let t0 = (lo - o) * inv;
            let t1 = (hi - o) * inv;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
            if t_near > t_far {
                return None;
            }
        }
        if t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min(), Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max(), Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn union_all_of_nothing_is_none() {
        assert!(Aabb::union_all(Vec::new()).is_none());
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn slab_hit_from_outside_and_inside() {
        let b = Aabb::from_center_half_extents(Vec3::ZERO, 1.0, 1.0, 1.0);
        let outside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(b.ray_hit(&outside), Some(4.0));
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(b.ray_hit(&inside), Some(1.0));
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(b.ray_hit(&behind), None);
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let b = Aabb::from_center_half_extents(Vec3::ZERO, 1.0, 1.0, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::NEG_Z);
        assert_eq!(b.ray_hit(&ray), None);
    }
}
