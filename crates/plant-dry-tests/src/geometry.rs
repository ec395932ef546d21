// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Geometry factory with fixed, predictable shapes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use plant_scene_port::{EquipmentItem, EquipmentType, GeometryFactory, Primitive, Shape};

/// Builds the same box for every kind except terrain.
///
/// The build counter is shared across clones.
#[derive(Clone, Debug)]
pub struct FixedGeometryFactory {
    /// Box edge lengths `(width, height, depth)`.
    pub size: (f32, f32, f32),
    /// Kinds the factory declines to build.
    pub declined: Vec<EquipmentType>,
    builds: Arc<AtomicUsize>,
}

impl Default for FixedGeometryFactory {
    fn default() -> Self {
        Self::new(2.0, 2.0, 2.0)
    }
}

impl FixedGeometryFactory {
    /// Factory building `width` x `height` x `depth` boxes.
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            size: (width, height, depth),
            declined: vec![EquipmentType::Terrain],
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Also declines `kind`.
    pub fn declining(mut self, kind: EquipmentType) -> Self {
        self.declined.push(kind);
        self
    }

    /// Shapes built so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

impl GeometryFactory for FixedGeometryFactory {
    fn build_geometry(&self, item: &EquipmentItem) -> Option<Shape> {
        if self.declined.contains(&item.kind) {
            return None;
        }
        self.builds.fetch_add(1, Ordering::Relaxed);
        let (width, height, depth) = self.size;
        Some(Shape::Mesh(Primitive::Box {
            width,
            height,
            depth,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn counts_builds_and_declines_terrain() {
        let f = FixedGeometryFactory::default().declining(EquipmentType::Pump);
        let tank = EquipmentItem::new("t", EquipmentType::Tank, Vec3::ZERO);
        assert!(f.build_geometry(&tank).is_some());
        assert!(f
            .build_geometry(&EquipmentItem::new("g", EquipmentType::Terrain, Vec3::ZERO))
            .is_none());
        assert!(f
            .build_geometry(&EquipmentItem::new("p", EquipmentType::Pump, Vec3::ZERO))
            .is_none());
        assert_eq!(f.clone().builds(), 1);
    }
}
