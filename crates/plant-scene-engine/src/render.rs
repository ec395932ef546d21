// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Output ports: the 3D surface and the 2D pin overlay.
//!
//! Headless implementations record what they were asked to do so the engine
//! can run without a GPU in tests and in the CLI.

use plant_scene_port::{CameraState, OutlineStyle};

use crate::annotations::ProjectedPin;
use crate::scene::SceneGraph;

/// Per-frame data handed to the render surface.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInfo {
    /// Monotonic frame number.
    pub index: u64,
    /// Camera pose used for the frame.
    pub camera: CameraState,
    /// Render target size in pixels.
    pub size: (u32, u32),
    /// Active outline preset.
    pub outline: OutlineStyle,
    /// Number of outlined objects.
    pub outlined: usize,
}

/// Draws the scene graph.
pub trait RenderSurface {
    /// Resizes the render target.
    fn resize(&mut self, width: u32, height: u32);
    /// Draws one frame.
    fn render(&mut self, scene: &SceneGraph, frame: &FrameInfo);
    /// Releases the surface.
    fn dispose(&mut self);
}

/// Draws screen-space pins above the 3D surface.
pub trait OverlaySurface {
    /// Resizes the overlay.
    fn resize(&mut self, width: u32, height: u32);
    /// Shows or hides the whole overlay.
    fn set_visible(&mut self, visible: bool);
    /// Replaces the pins shown.
    fn place_pins(&mut self, pins: &[ProjectedPin]);
}

/// Render surface that counts frames instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct HeadlessRenderer {
    /// Number of render calls.
    pub render_count: u64,
    /// Current target size.
    pub viewport: (u32, u32),
    /// Meshes that would have been drawn in the last frame.
    pub drawn_meshes: usize,
    /// Last frame rendered.
    pub last_frame: Option<FrameInfo>,
    /// Whether dispose has been called.
    pub disposed: bool,
}

impl HeadlessRenderer {
    /// Fresh renderer with a 1x1 target.
    pub fn new() -> Self {
        Self {
            viewport: (1, 1),
            ..Self::default()
        }
    }
}

impl RenderSurface for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn render(&mut self, scene: &SceneGraph, frame: &FrameInfo) {
        self.render_count += 1;
        self.drawn_meshes = scene
            .meshes()
            .filter(|(id, _)| scene.is_effectively_visible(*id))
            .count();
        self.last_frame = Some(frame.clone());
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.last_frame = None;
    }
}

/// Overlay that keeps the last pins it was given.
#[derive(Clone, Debug, Default)]
pub struct HeadlessOverlay {
    /// Current overlay size.
    pub viewport: (u32, u32),
    /// Whether the overlay is shown.
    pub visible: bool,
    /// Pins from the last placement.
    pub pins: Vec<ProjectedPin>,
}

impl OverlaySurface for HeadlessOverlay {
    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.pins.clear();
        }
    }

    fn place_pins(&mut self, pins: &[ProjectedPin]) {
        self.pins = pins.to_vec();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use glam::Vec2;
    use plant_geom::Transform;
    use plant_scene_port::{Color, Primitive};

    use crate::scene::MeshData;

    fn frame(index: u64) -> FrameInfo {
        FrameInfo {
            index,
            camera: CameraState::default(),
            size: (1, 1),
            outline: OutlineStyle::None,
            outlined: 0,
        }
    }

    #[test]
    fn renderer_counts_visible_meshes() {
        let mut g = SceneGraph::new();
        let mesh = MeshData {
            primitive: Primitive::Sphere { radius: 1.0 },
            color: Color::FALLBACK,
        };
        let root = g.root();
        g.add_mesh(root, mesh, Transform::identity()).unwrap();
        let hidden = g.add_mesh(root, mesh, Transform::identity()).unwrap();
        g.set_visible(hidden, false).unwrap();

        let mut r = HeadlessRenderer::new();
        r.render(&g, &frame(0));
        r.render(&g, &frame(1));
        assert_eq!(r.render_count, 2);
        assert_eq!(r.drawn_meshes, 1);
        assert_eq!(r.last_frame.as_ref().map(|f| f.index), Some(1));
        r.dispose();
        assert!(r.disposed && r.last_frame.is_none());
    }

    #[test]
    fn hiding_the_overlay_drops_pins() {
        let mut o = HeadlessOverlay::default();
        o.set_visible(true);
        o.place_pins(&[ProjectedPin {
            equipment_tag: "t".into(),
            screen: Vec2::ONE,
            visible: true,
        }]);
        assert_eq!(o.pins.len(), 1);
        o.set_visible(false);
        assert!(o.pins.is_empty());
    }
}
