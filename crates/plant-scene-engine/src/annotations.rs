// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Annotation pins anchored above equipment.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use plant_geom::Transform;
use plant_scene_port::{annotations_visible, Annotation, EquipmentItem, LayerState};
use serde::Serialize;
use tracing::debug;

use crate::camera::{PerspectiveCamera, Viewport};
use crate::config::PinConfig;
use crate::scene::{NodeId, SceneGraph};
use crate::EngineError;

/// A placed pin.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationPin {
    /// Annotated equipment.
    pub equipment_tag: String,
    /// Annotation body.
    pub text: String,
    /// Offset from the equipment position to the pin.
    pub anchor_offset: Vec3,
    /// World position of the pin.
    pub world: Vec3,
    /// Marker node in the scene graph.
    pub node: NodeId,
}

/// A pin mapped to viewport pixels for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPin {
    /// Annotated equipment.
    pub equipment_tag: String,
    /// Pixel position (meaningless when not visible).
    pub screen: Vec2,
    /// Whether the pin is in front of the camera.
    pub visible: bool,
}

/// Owns the pin group and rebuilds it on every sync.
#[derive(Clone, Debug, Default)]
pub struct AnnotationPinLayer {
    group: Option<NodeId>,
    pins: Vec<AnnotationPin>,
    visible: bool,
}

impl AnnotationPinLayer {
    /// Empty, hidden layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins placed by the last sync.
    pub fn pins(&self) -> &[AnnotationPin] {
        &self.pins
    }

    /// Whether the annotations layer was visible at the last sync.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Drops every pin and recreates them from `annotations`.
    ///
    /// Annotations whose equipment is missing are skipped. A hidden
    /// annotations layer leaves the layer empty and hidden.
    pub fn sync(
        &mut self,
        scene: &mut SceneGraph,
        annotations: &[Annotation],
        items: &[EquipmentItem],
        layers: &[LayerState],
        cfg: &PinConfig,
    ) -> Result<usize, EngineError> {
        self.pins.clear();
        let group = match self.group.filter(|g| scene.contains(*g)) {
            Some(g) => {
                scene.clear_children(g)?;
                g
            }
            None => scene.add_group(scene.root(), Transform::identity())?,
        };
        self.group = Some(group);

        self.visible = annotations_visible(layers);
        scene.set_visible(group, self.visible)?;
        if !self.visible {
            return Ok(0);
        }

        let mut by_tag: HashMap<&str, &EquipmentItem> = HashMap::with_capacity(items.len());
        for item in items {
            by_tag.entry(item.tag.as_str()).or_insert(item);
        }
        for note in annotations {
            let Some(item) = by_tag.get(note.equipment_tag.as_str()) else {
                debug!(tag = %note.equipment_tag, "annotation without equipment");
                continue;
            };
            let anchor_offset = Vec3::Y * (item.extent_above_anchor() + cfg.clearance(item.kind));
            let world = item.position + anchor_offset;
            let node = scene.add_marker(group, Transform::from_translation(world))?;
            self.pins.push(AnnotationPin {
                equipment_tag: note.equipment_tag.clone(),
                text: note.text.clone(),
                anchor_offset,
                world,
                node,
            });
        }
        Ok(self.pins.len())
    }

    /// Screen positions of all pins for `camera` in `viewport`.
    pub fn project(&self, camera: &PerspectiveCamera, viewport: &Viewport) -> Vec<ProjectedPin> {
        if !self.visible {
            return Vec::new();
        }
        self.pins
            .iter()
            .map(|pin| match camera.project(pin.world) {
                Some((ndc, _)) => ProjectedPin {
                    equipment_tag: pin.equipment_tag.clone(),
                    screen: viewport.to_pixels(ndc),
                    visible: true,
                },
                None => ProjectedPin {
                    equipment_tag: pin.equipment_tag.clone(),
                    screen: Vec2::ZERO,
                    visible: false,
                },
            })
            .collect()
    }
}
