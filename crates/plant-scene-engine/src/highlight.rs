// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outline highlight for selection and hover.

use plant_scene_port::{Color, OutlineParams, OutlineStyle, HIDDEN_EDGE_COLOR};

use crate::reconcile::LiveObjectIndex;
use crate::scene::{NodeId, SceneGraph};

/// State of the outline post-effect.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineEffect {
    outlined: Vec<NodeId>,
    style: OutlineStyle,
    params: OutlineParams,
    hidden_edge_color: Color,
    resolution: (u32, u32),
}

impl Default for OutlineEffect {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl OutlineEffect {
    /// Effect with nothing outlined at `width` x `height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            outlined: Vec::new(),
            style: OutlineStyle::None,
            params: OutlineStyle::None.params(),
            hidden_edge_color: HIDDEN_EDGE_COLOR,
            resolution: (width, height),
        }
    }

    /// Nodes currently outlined.
    pub fn outlined(&self) -> &[NodeId] {
        &self.outlined
    }

    /// Active preset.
    pub const fn style(&self) -> OutlineStyle {
        self.style
    }

    /// Active edge parameters.
    pub const fn params(&self) -> OutlineParams {
        self.params
    }

    /// Color of occluded edges.
    pub const fn hidden_edge_color(&self) -> Color {
        self.hidden_edge_color
    }

    /// Render-target resolution.
    pub const fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// Resizes the effect's render target.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = (width, height);
    }

    fn set(&mut self, outlined: Vec<NodeId>, style: OutlineStyle) {
        self.outlined = outlined;
        self.style = style;
        self.params = style.params();
    }
}

/// Points the outline at the selected set, or the hovered object, or nothing.
///
/// With a non-empty selection every live selected object is outlined, plus
/// the hovered object when it is not already selected, all in the selected
/// style. Otherwise a visible hovered object gets the hover style. With
/// neither, or when none of the selected tags is live, nothing is outlined
/// and the edge parameters drop to zero.
pub fn apply_highlight(
    effect: &mut OutlineEffect,
    scene: &SceneGraph,
    live: &LiveObjectIndex,
    selected: &[String],
    hovered: Option<&str>,
) {
    let hovered_node = hovered.and_then(|tag| live.get(tag)).map(|o| o.node);
    if !selected.is_empty() {
        let mut nodes: Vec<NodeId> = selected
            .iter()
            .filter_map(|tag| live.get(tag))
            .map(|o| o.node)
            .collect();
        if let Some(h) = hovered_node {
            if !nodes.contains(&h) {
                nodes.push(h);
            }
        }
        if nodes.is_empty() {
            effect.set(nodes, OutlineStyle::None);
        } else {
            effect.set(nodes, OutlineStyle::Selected);
        }
        return;
    }
    match hovered_node.filter(|n| scene.is_effectively_visible(*n)) {
        Some(node) => effect.set(vec![node], OutlineStyle::Hover),
        None => effect.set(Vec::new(), OutlineStyle::None),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::DefaultColorResolver;
    use crate::geometry::PrimitiveGeometryFactory;
    use crate::reconcile::MeshReconciler;
    use glam::Vec3;
    use plant_scene_port::{default_layers, ColorMode, EquipmentItem, EquipmentType};

    fn setup() -> (SceneGraph, MeshReconciler) {
        let items: Vec<_> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, t)| EquipmentItem::new(*t, EquipmentType::Other, Vec3::X * (i as f32 * 3.0)))
            .collect();
        let mut g = SceneGraph::new();
        let mut r = MeshReconciler::new();
        r.reconcile(
            &mut g,
            &items,
            &default_layers(),
            ColorMode::Equipment,
            &PrimitiveGeometryFactory,
            &DefaultColorResolver,
        );
        (g, r)
    }

    fn node(r: &MeshReconciler, tag: &str) -> NodeId {
        r.live().get(tag).unwrap().node
    }

    #[test]
    fn selection_takes_precedence_and_adds_hover() {
        let (g, r) = setup();
        let mut fx = OutlineEffect::default();
        apply_highlight(&mut fx, &g, r.live(), &["a".into(), "b".into()], Some("c"));
        assert_eq!(fx.outlined(), [node(&r, "a"), node(&r, "b"), node(&r, "c")]);
        assert_eq!(fx.style(), OutlineStyle::Selected);
        assert_eq!(fx.params().color.to_hex(), 0x0000ff);

        apply_highlight(&mut fx, &g, r.live(), &["a".into()], Some("a"));
        assert_eq!(fx.outlined(), [node(&r, "a")]);
    }

    #[test]
    fn hover_only_uses_hover_preset() {
        let (g, r) = setup();
        let mut fx = OutlineEffect::default();
        apply_highlight(&mut fx, &g, r.live(), &[], Some("b"));
        assert_eq!(fx.outlined(), [node(&r, "b")]);
        assert_eq!(fx.params(), OutlineStyle::Hover.params());
    }

    #[test]
    fn nothing_zeroes_the_edges() {
        let (g, r) = setup();
        let mut fx = OutlineEffect::default();
        apply_highlight(&mut fx, &g, r.live(), &["a".into()], None);
        apply_highlight(&mut fx, &g, r.live(), &[], Some("ghost"));
        assert!(fx.outlined().is_empty());
        let p = fx.params();
        assert!(p.edge_strength == 0.0 && p.edge_glow == 0.0 && p.edge_thickness == 0.0);
        assert_eq!(fx.hidden_edge_color().to_hex(), 0x190a05);
    }

    #[test]
    fn stale_selection_without_hover_outlines_nothing() {
        let (g, r) = setup();
        let mut fx = OutlineEffect::default();
        apply_highlight(&mut fx, &g, r.live(), &["a".into()], None);
        assert_eq!(fx.style(), OutlineStyle::Selected);

        apply_highlight(&mut fx, &g, r.live(), &["hidden-tank".into()], None);
        assert!(fx.outlined().is_empty());
        assert_eq!(fx.style(), OutlineStyle::None);
        assert_eq!(fx.params(), OutlineStyle::None.params());

        apply_highlight(&mut fx, &g, r.live(), &["hidden-tank".into()], Some("b"));
        assert_eq!(fx.outlined(), [node(&r, "b")]);
        assert_eq!(fx.style(), OutlineStyle::Selected);
    }
}
