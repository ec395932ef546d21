// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mesh reconciler: keeps live scene objects in step with equipment data.
//!
//! A pass is split in two. [`plan`] is pure: it reads the live index, the
//! new item list and the layers, and decides what to remove and what to
//! (re)build. [`MeshReconciler::reconcile`] applies that plan to the scene
//! graph. Visible items are always rebuilt so attribute changes (color mode,
//! dimensions, rotation) never need a field-level diff.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use plant_geom::Transform;
use plant_scene_port::{
    is_kind_visible, terrain_visible, Anchoring, Color, ColorMode, ColorResolver, EquipmentItem,
    EquipmentType, GeometryFactory, LayerState, SceneError, Shape,
};
use tracing::{debug, instrument, warn};

use crate::scene::{MeshData, NodeId, SceneGraph};
use crate::EngineError;

/// A scene object built for one equipment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveObject {
    /// Equipment tag.
    pub tag: String,
    /// Equipment kind at build time.
    pub kind: EquipmentType,
    /// Owning system at build time.
    pub sistema: Option<String>,
    /// Root node of the object (mesh or group).
    pub node: NodeId,
}

/// Live objects keyed by tag. At most one object per tag.
#[derive(Debug, Clone, Default)]
pub struct LiveObjectIndex {
    objects: BTreeMap<String, LiveObject>,
}

impl LiveObjectIndex {
    /// Object for `tag`.
    pub fn get(&self, tag: &str) -> Option<&LiveObject> {
        self.objects.get(tag)
    }

    /// Whether `tag` has a live object.
    pub fn contains(&self, tag: &str) -> bool {
        self.objects.contains_key(tag)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is live.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects sorted by tag.
    pub fn iter(&self) -> impl Iterator<Item = &LiveObject> + '_ {
        self.objects.values()
    }

    /// Tags sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.keys().map(String::as_str)
    }

    /// Objects belonging to `sistema`.
    pub fn in_system<'a>(&'a self, sistema: &'a str) -> impl Iterator<Item = &'a LiveObject> + 'a {
        self.objects
            .values()
            .filter(move |o| o.sistema.as_deref() == Some(sistema))
    }

    fn insert(&mut self, object: LiveObject) {
        self.objects.insert(object.tag.clone(), object);
    }

    fn remove(&mut self, tag: &str) -> Option<LiveObject> {
        self.objects.remove(tag)
    }
}

/// Why an item produced no live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record failed validation.
    Invalid(SceneError),
    /// Terrain is drawn by the ground plane, not as equipment.
    Terrain,
    /// The geometry factory declined to build a shape.
    NotBuilt,
    /// The scene graph rejected the insertion.
    Scene(EngineError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => err.fmt(f),
            Self::Terrain => f.write_str("terrain records are not built as equipment"),
            Self::NotBuilt => f.write_str("factory returned no shape"),
            Self::Scene(err) => err.fmt(f),
        }
    }
}

/// An item the pass did not build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Item tag (may be empty for invalid records).
    pub tag: String,
    /// Reason.
    pub reason: SkipReason,
}

/// Output of [`plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan<'a> {
    /// Live tags to drop without replacement (gone, hidden or now invalid).
    pub remove: Vec<String>,
    /// Items to build, in input order; live ones are replaced.
    pub build: Vec<&'a EquipmentItem>,
    /// Items rejected before building.
    pub skipped: Vec<Skipped>,
    /// Visibility of the ground plane.
    pub terrain_visible: bool,
}

/// Summary of an applied pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tags built fresh.
    pub created: Vec<String>,
    /// Tags whose previous object was replaced.
    pub rebuilt: Vec<String>,
    /// Tags removed without replacement.
    pub removed: Vec<String>,
    /// Items that produced no object.
    pub skipped: Vec<Skipped>,
}

impl ReconcileReport {
    /// Whether the pass changed the live set or rebuilt anything.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.rebuilt.is_empty() && self.removed.is_empty()
    }
}

/// Decides what a pass must do without touching the scene.
///
/// Invalid records, duplicate tags (the first occurrence wins) and terrain
/// records are skipped. Items whose layer is hidden are neither built nor
/// kept.
pub fn plan<'a>(
    live: &LiveObjectIndex,
    items: &'a [EquipmentItem],
    layers: &[LayerState],
) -> ReconcilePlan<'a> {
    let mut seen = BTreeSet::new();
    let mut build = Vec::new();
    let mut skipped = Vec::new();
    for item in items {
        let skip = |reason| Skipped {
            tag: item.tag.clone(),
            reason,
        };
        if let Err(err) = item.validate() {
            skipped.push(skip(SkipReason::Invalid(err)));
            continue;
        }
        if !seen.insert(item.tag.as_str()) {
            skipped.push(skip(SkipReason::Invalid(SceneError::DuplicateTag(
                item.tag.clone(),
            ))));
            continue;
        }
        if item.kind == EquipmentType::Terrain {
            skipped.push(skip(SkipReason::Terrain));
            continue;
        }
        if is_kind_visible(layers, item.kind) {
            build.push(item);
        }
    }
    let wanted: BTreeSet<&str> = build.iter().map(|i| i.tag.as_str()).collect();
    let remove = live
        .tags()
        .filter(|t| !wanted.contains(t))
        .map(str::to_owned)
        .collect();
    ReconcilePlan {
        remove,
        build,
        skipped,
        terrain_visible: terrain_visible(layers),
    }
}

/// Owns the live-object index and applies reconcile passes.
#[derive(Debug, Clone, Default)]
pub struct MeshReconciler {
    live: LiveObjectIndex,
    ground: Option<NodeId>,
}

impl MeshReconciler {
    /// Reconciler without a ground plane.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciler that also drives `ground` visibility from the terrain layer.
    pub fn with_ground(ground: NodeId) -> Self {
        Self {
            live: LiveObjectIndex::default(),
            ground: Some(ground),
        }
    }

    /// Read-only view of the live objects.
    pub const fn live(&self) -> &LiveObjectIndex {
        &self.live
    }

    /// Ground plane node, if any.
    pub const fn ground(&self) -> Option<NodeId> {
        self.ground
    }

    /// Brings `scene` in line with `items` under `layers` and `mode`.
    #[instrument(skip_all, fields(items = items.len(), live = self.live.len()))]
    pub fn reconcile<F, C>(
        &mut self,
        scene: &mut SceneGraph,
        items: &[EquipmentItem],
        layers: &[LayerState],
        mode: ColorMode,
        factory: &F,
        colors: &C,
    ) -> ReconcileReport
    where
        F: GeometryFactory + ?Sized,
        C: ColorResolver + ?Sized,
    {
        let plan = plan(&self.live, items, layers);
        self.apply(scene, plan, mode, factory, colors)
    }

    /// Applies a plan produced by [`plan`] against this reconciler's index.
    pub fn apply<F, C>(
        &mut self,
        scene: &mut SceneGraph,
        plan: ReconcilePlan<'_>,
        mode: ColorMode,
        factory: &F,
        colors: &C,
    ) -> ReconcileReport
    where
        F: GeometryFactory + ?Sized,
        C: ColorResolver + ?Sized,
    {
        let mut report = ReconcileReport {
            skipped: plan.skipped,
            ..ReconcileReport::default()
        };
        for tag in plan.remove {
            if self.drop_object(scene, &tag) {
                debug!(%tag, "removed live object");
                report.removed.push(tag);
            }
        }
        for item in plan.build {
            let replaced = self.drop_object(scene, &item.tag);
            let Some(shape) = factory.build_geometry(item) else {
                report.skipped.push(Skipped {
                    tag: item.tag.clone(),
                    reason: SkipReason::NotBuilt,
                });
                if replaced {
                    report.removed.push(item.tag.clone());
                }
                continue;
            };
            let color = colors.color_for(item, mode);
            match build_object(scene, item, &shape, color) {
                Ok(node) => {
                    debug!(tag = %item.tag, kind = %item.kind, replaced, "built live object");
                    self.live.insert(LiveObject {
                        tag: item.tag.clone(),
                        kind: item.kind,
                        sistema: item.sistema.clone(),
                        node,
                    });
                    if replaced {
                        report.rebuilt.push(item.tag.clone());
                    } else {
                        report.created.push(item.tag.clone());
                    }
                }
                Err(err) => {
                    report.skipped.push(Skipped {
                        tag: item.tag.clone(),
                        reason: SkipReason::Scene(err),
                    });
                    if replaced {
                        report.removed.push(item.tag.clone());
                    }
                }
            }
        }
        for skip in &report.skipped {
            warn!(tag = %skip.tag, reason = %skip.reason, "skipped equipment record");
        }
        if let Some(ground) = self.ground {
            if scene.set_visible(ground, plan.terrain_visible).is_err() {
                warn!("ground plane node is gone");
                self.ground = None;
            }
        }
        report
    }

    /// Removes every live object. Returns how many were dropped.
    pub fn clear(&mut self, scene: &mut SceneGraph) -> usize {
        let tags: Vec<String> = self.live.tags().map(str::to_owned).collect();
        tags.iter().filter(|t| self.drop_object(scene, t)).count()
    }

    fn drop_object(&mut self, scene: &mut SceneGraph, tag: &str) -> bool {
        let Some(object) = self.live.remove(tag) else {
            return false;
        };
        if let Err(err) = scene.remove_subtree(object.node) {
            warn!(%tag, %err, "live object node already gone");
        }
        true
    }
}

/// World placement of an item's centered shape.
///
/// Base-anchored kinds are lifted by `body_half_height` so their base rests
/// on `item.position`.
pub fn placement(item: &EquipmentItem, body_half_height: f32) -> Transform {
    let lift = match item.anchoring() {
        Anchoring::Base => body_half_height,
        Anchoring::Center => 0.0,
    };
    Transform::from_translation_euler(
        item.position + Vec3::Y * lift,
        item.rotation.unwrap_or(Vec3::ZERO),
    )
}

fn build_object(
    scene: &mut SceneGraph,
    item: &EquipmentItem,
    shape: &Shape,
    color: Color,
) -> Result<NodeId, EngineError> {
    let transform = placement(item, shape.body_half_height());
    let root = scene.root();
    let node = match shape {
        Shape::Mesh(primitive) => scene.add_mesh(
            root,
            MeshData {
                primitive: *primitive,
                color,
            },
            transform,
        )?,
        Shape::Group(parts) => {
            let group = scene.add_group(root, transform)?;
            for part in parts {
                let mesh = MeshData {
                    primitive: part.primitive,
                    color: part.tint.unwrap_or(color),
                };
                if let Err(err) = scene.add_mesh(group, mesh, part.transform()) {
                    scene.remove_subtree(group)?;
                    return Err(err);
                }
            }
            group
        }
    };
    if let Some(n) = scene.node_mut(node) {
        n.tag = Some(item.tag.clone());
    }
    Ok(node)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::DefaultColorResolver;
    use crate::geometry::PrimitiveGeometryFactory;
    use approx::assert_relative_eq;
    use plant_scene_port::default_layers;

    fn tank(tag: &str, x: f32) -> EquipmentItem {
        let mut t = EquipmentItem::new(tag, EquipmentType::Tank, Vec3::new(x, 0.0, 0.0));
        t.height = Some(4.0);
        t
    }

    fn run(
        r: &mut MeshReconciler,
        g: &mut SceneGraph,
        items: &[EquipmentItem],
        layers: &[LayerState],
    ) -> ReconcileReport {
        r.reconcile(
            g,
            items,
            layers,
            ColorMode::Equipment,
            &PrimitiveGeometryFactory,
            &DefaultColorResolver,
        )
    }

    #[test]
    fn plan_is_pure_and_classifies_items() {
        let mut dup = tank("tank-01", 5.0);
        dup.name = "dup".into();
        let items = vec![
            tank("tank-01", 0.0),
            dup,
            EquipmentItem::new("", EquipmentType::Pump, Vec3::ZERO),
            EquipmentItem::new("ground", EquipmentType::Terrain, Vec3::ZERO),
        ];
        let p = plan(&LiveObjectIndex::default(), &items, &default_layers());
        assert_eq!(p.build.len(), 1);
        assert_eq!(p.build[0].name, "tank-01");
        assert_eq!(p.skipped.len(), 3);
        assert!(p.remove.is_empty());
        assert!(p.terrain_visible);
    }

    #[test]
    fn base_anchored_tank_sits_on_its_position() {
        let mut g = SceneGraph::new();
        let mut r = MeshReconciler::new();
        run(&mut r, &mut g, &[tank("tank-01", 0.0)], &default_layers());
        let node = r.live().get("tank-01").unwrap().node;
        let p = g.world_matrix(node).unwrap().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.y, 2.0);
        let bounds = g.world_bounds(node).unwrap();
        assert_relative_eq!(bounds.min().y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn hiding_a_layer_removes_and_showing_restores() {
        let mut g = SceneGraph::new();
        let mut r = MeshReconciler::new();
        let items = [tank("tank-01", 3.0)];
        let mut layers = default_layers();
        run(&mut r, &mut g, &items, &layers);
        let before = g
            .world_matrix(r.live().get("tank-01").unwrap().node)
            .unwrap();

        layers[3].is_visible = false;
        let report = run(&mut r, &mut g, &items, &layers);
        assert_eq!(report.removed, ["tank-01"]);
        assert!(r.live().is_empty());
        assert_eq!(g.stats().live_geometries(), 0);

        layers[3].is_visible = true;
        let report = run(&mut r, &mut g, &items, &layers);
        assert_eq!(report.created, ["tank-01"]);
        let after = g
            .world_matrix(r.live().get("tank-01").unwrap().node)
            .unwrap();
        assert!(before.abs_diff_eq(after, 1e-6));
    }

    #[test]
    fn rebuild_keeps_resources_balanced() {
        let mut g = SceneGraph::new();
        let mut r = MeshReconciler::new();
        let items = [tank("a", 0.0), tank("b", 10.0)];
        run(&mut r, &mut g, &items, &default_layers());
        let live = g.stats().live_geometries();
        let report = run(&mut r, &mut g, &items, &default_layers());
        assert_eq!(report.rebuilt, ["a", "b"]);
        assert_eq!(g.stats().live_geometries(), live);
        assert_eq!(g.stats().live_materials(), live);
    }

    #[test]
    fn ground_follows_terrain_layer() {
        let mut g = SceneGraph::new();
        let ground = g.add_group(g.root(), Transform::identity()).unwrap();
        let mut r = MeshReconciler::with_ground(ground);
        let mut layers = default_layers();
        layers[0].is_visible = false;
        run(&mut r, &mut g, &[], &layers);
        assert!(!g.is_effectively_visible(ground));
    }
}
