// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pointer picking against live objects.

use glam::Vec3;
use plant_geom::Ray;
use plant_scene_port::Primitive;

use crate::camera::{PerspectiveCamera, Viewport};
use crate::reconcile::LiveObjectIndex;
use crate::scene::{NodeId, SceneGraph};

/// Mouse button of a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button; the only one that selects.
    Primary,
    /// Right button.
    Secondary,
    /// Wheel button.
    Middle,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Command / Windows key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt / Option key.
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl or Meta extends the selection instead of replacing it.
    pub const fn multi_select(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Result of a selecting click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Tag under the pointer, if any.
    pub tag: Option<String>,
    /// Whether a multi-select modifier was held.
    pub multi: bool,
}

/// Ray distance to `primitive` for a ray already in the primitive's local frame.
fn hit_primitive(primitive: &Primitive, ray: &Ray) -> Option<f32> {
    match *primitive {
        Primitive::Cylinder { radius, height } => ray.hit_capped_cylinder(radius, height * 0.5),
        Primitive::Sphere { radius } => ray.hit_sphere(Vec3::ZERO, radius),
        Primitive::Box { .. } | Primitive::Plane { .. } => primitive.local_bounds().ray_hit(ray),
    }
}

/// Resolves pointer positions to equipment tags.
///
/// Stateless; reads the scene as left by the last reconcile.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerPicker;

impl PointerPicker {
    /// Nearest visible, pickable mesh of a live object hit by `ray`.
    pub fn nearest_hit(scene: &SceneGraph, live: &LiveObjectIndex, ray: &Ray) -> Option<(NodeId, f32)> {
        live.iter()
            .flat_map(|object| scene.subtree(object.node))
            .filter_map(|id| {
                let node = scene.node(id)?;
                let mesh = node.mesh()?;
                if !node.pickable || !scene.is_effectively_visible(id) {
                    return None;
                }
                let world = scene.world_matrix(id)?;
                if world.determinant().abs() <= f32::EPSILON {
                    return None;
                }
                let local = ray.transformed(&world.inverse());
                hit_primitive(&mesh.primitive, &local).map(|t| (id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Tag under the pointer at pixel `(px, py)`.
    ///
    /// Returns `None` for an empty viewport or when nothing is hit.
    pub fn pick(
        scene: &SceneGraph,
        live: &LiveObjectIndex,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        px: f32,
        py: f32,
    ) -> Option<String> {
        let ndc = viewport.to_ndc(px, py)?;
        let ray = camera.ray_through(ndc);
        let (node, _) = Self::nearest_hit(scene, live, &ray)?;
        scene.tag_of(node).map(str::to_owned)
    }

    /// Click handling: only the primary button selects.
    #[allow(clippy::too_many_arguments)]
    pub fn on_click(
        scene: &SceneGraph,
        live: &LiveObjectIndex,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        px: f32,
        py: f32,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Option<ClickOutcome> {
        if button != PointerButton::Primary {
            return None;
        }
        Some(ClickOutcome {
            tag: Self::pick(scene, live, camera, viewport, px, py),
            multi: modifiers.multi_select(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::DefaultColorResolver;
    use crate::geometry::PrimitiveGeometryFactory;
    use crate::reconcile::MeshReconciler;
    use plant_scene_port::{default_layers, CameraState, ColorMode, EquipmentItem, EquipmentType};

    fn scene(items: &[EquipmentItem]) -> (SceneGraph, MeshReconciler) {
        let mut g = SceneGraph::new();
        let mut r = MeshReconciler::new();
        r.reconcile(
            &mut g,
            items,
            &default_layers(),
            ColorMode::Equipment,
            &PrimitiveGeometryFactory,
            &DefaultColorResolver,
        );
        (g, r)
    }

    fn camera_on_z() -> PerspectiveCamera {
        let mut c = PerspectiveCamera::default();
        c.set_pose(&CameraState::new(Vec3::new(0.0, 0.5, 30.0), Vec3::new(0.0, 0.5, 0.0)));
        c
    }

    #[test]
    fn nearest_object_wins() {
        let near = EquipmentItem::new("near", EquipmentType::Other, Vec3::new(0.0, 0.0, 5.0));
        let far = EquipmentItem::new("far", EquipmentType::Other, Vec3::new(0.0, 0.0, -5.0));
        let (g, r) = scene(&[far, near]);
        let vp = Viewport::sized(100, 100);
        let tag = PointerPicker::pick(&g, r.live(), &camera_on_z(), &vp, 50.0, 50.0);
        assert_eq!(tag.as_deref(), Some("near"));
    }

    #[test]
    fn group_parts_resolve_to_owner_tag() {
        let pump = EquipmentItem::new("pump-01", EquipmentType::Pump, Vec3::ZERO);
        let (g, r) = scene(&[pump]);
        let mut cam = camera_on_z();
        cam.set_pose(&CameraState::new(Vec3::new(0.0, 0.3, 10.0), Vec3::new(0.0, 0.3, 0.0)));
        let ray = cam.ray_through(glam::Vec2::ZERO);
        let (node, _) = PointerPicker::nearest_hit(&g, r.live(), &ray).unwrap();
        assert_ne!(node, r.live().get("pump-01").unwrap().node);
        assert_eq!(g.tag_of(node), Some("pump-01"));
    }

    #[test]
    fn miss_and_empty_viewport_yield_none() {
        let (g, r) = scene(&[EquipmentItem::new("a", EquipmentType::Other, Vec3::ZERO)]);
        let cam = camera_on_z();
        assert!(PointerPicker::pick(&g, r.live(), &cam, &Viewport::sized(100, 100), 0.0, 0.0).is_none());
        assert!(PointerPicker::pick(&g, r.live(), &cam, &Viewport::sized(0, 0), 0.0, 0.0).is_none());
    }

    #[test]
    fn only_primary_button_selects() {
        let (g, r) = scene(&[EquipmentItem::new("a", EquipmentType::Other, Vec3::ZERO)]);
        let cam = camera_on_z();
        let vp = Viewport::sized(100, 100);
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(PointerPicker::on_click(&g, r.live(), &cam, &vp, 50.0, 50.0, PointerButton::Secondary, meta).is_none());
        let out = PointerPicker::on_click(&g, r.live(), &cam, &vp, 50.0, 50.0, PointerButton::Primary, meta).unwrap();
        assert_eq!(out, ClickOutcome { tag: Some("a".into()), multi: true });
    }
}
