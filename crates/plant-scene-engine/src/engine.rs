// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The engine facade.
//!
//! [`SceneEngine`] owns the scene graph, the camera and every controller.
//! Hosts push data in through the setters, feed pointer and wheel input,
//! and call [`SceneEngine::frame`] from their loop (usually through a
//! [`crate::FrameDriver`]). Data changes are applied lazily on the next frame.

use std::time::Duration;

use glam::Vec2;
use plant_geom::{Aabb, Transform};
use plant_scene_port::{
    Annotation, CameraState, Color, ColorMode, ColorResolver, EquipmentItem, GeometryFactory,
    LayerState, Primitive, SelectionState,
};
use tracing::{info, instrument, warn};

use crate::annotations::{AnnotationPinLayer, ProjectedPin};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::color::DefaultColorResolver;
use crate::config::EngineConfig;
use crate::controls::{InteractionControls, OrbitControls};
use crate::geometry::PrimitiveGeometryFactory;
use crate::highlight::{apply_highlight, OutlineEffect};
use crate::motion::{CameraMotionController, MotionEffect, RequestOutcome};
use crate::picker::{ClickOutcome, Modifiers, PointerButton, PointerPicker};
use crate::reconcile::{LiveObjectIndex, MeshReconciler, ReconcileReport};
use crate::render::{FrameInfo, HeadlessOverlay, HeadlessRenderer, OverlaySurface, RenderSurface};
use crate::scene::{MeshData, NodeId, SceneGraph};
use crate::EngineError;

/// Tag of the ground plane node.
pub const GROUND_TAG: &str = "terrain-ground-plane";

const GROUND_COLOR: Color = Color::from_hex(0x556b2f);

/// Receives camera commits and framing completions.
pub trait SceneObserver {
    /// A camera pose change the host should record (history, prefs).
    fn on_camera_committed(&mut self, state: &CameraState, description: Option<&str>);
    /// A frame-system request finished.
    fn on_system_framed(&mut self, system: &str);
}

/// Scene, camera and controllers behind one API.
///
/// `R`, `O` and `C` are the render surface, pin overlay and interaction
/// controls. The engine is ready once a render surface and controls are
/// attached; until then frame, camera and picking calls fail with
/// [`EngineError::NotReady`].
pub struct SceneEngine<R = HeadlessRenderer, O = HeadlessOverlay, C = OrbitControls> {
    config: EngineConfig,
    scene: SceneGraph,
    camera: PerspectiveCamera,
    viewport: Viewport,
    size: (u32, u32),
    reconciler: MeshReconciler,
    pins: AnnotationPinLayer,
    projected: Vec<ProjectedPin>,
    outline: OutlineEffect,
    motion: CameraMotionController,
    renderer: Option<R>,
    overlay: Option<O>,
    controls: Option<C>,
    factory: Box<dyn GeometryFactory>,
    colors: Box<dyn ColorResolver>,
    observer: Option<Box<dyn SceneObserver>>,
    equipment: Vec<EquipmentItem>,
    layers: Vec<LayerState>,
    color_mode: ColorMode,
    selection: SelectionState,
    annotations: Vec<Annotation>,
    scene_dirty: bool,
    pins_dirty: bool,
    last_report: ReconcileReport,
    frame_index: u64,
}

impl<R, O, C> Default for SceneEngine<R, O, C>
where
    R: RenderSurface,
    O: OverlaySurface,
    C: InteractionControls,
{
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<R, O, C> SceneEngine<R, O, C>
where
    R: RenderSurface,
    O: OverlaySurface,
    C: InteractionControls,
{
    /// Engine with the reference geometry factory and color resolver.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_collaborators(
            config,
            Box::new(PrimitiveGeometryFactory),
            Box::new(DefaultColorResolver),
        )
    }

    /// Engine using the given geometry factory and color resolver.
    pub fn with_collaborators(
        config: EngineConfig,
        factory: Box<dyn GeometryFactory>,
        colors: Box<dyn ColorResolver>,
    ) -> Self {
        let mut scene = SceneGraph::new();
        let reconciler = match add_ground(&mut scene, config.ground_size) {
            Ok(ground) => MeshReconciler::with_ground(ground),
            Err(err) => {
                warn!(%err, "could not create ground plane");
                MeshReconciler::new()
            }
        };
        Self {
            camera: PerspectiveCamera::from_config(&config.camera, 1.0),
            viewport: Viewport::sized(1, 1),
            size: (1, 1),
            reconciler,
            pins: AnnotationPinLayer::new(),
            projected: Vec::new(),
            outline: OutlineEffect::default(),
            motion: CameraMotionController::new(&config),
            renderer: None,
            overlay: None,
            controls: None,
            factory,
            colors,
            observer: None,
            equipment: Vec::new(),
            layers: plant_scene_port::default_layers(),
            color_mode: ColorMode::default(),
            selection: SelectionState::new(),
            annotations: Vec::new(),
            scene_dirty: true,
            pins_dirty: true,
            last_report: ReconcileReport::default(),
            frame_index: 0,
            scene,
            config,
        }
    }

    // ── Surfaces ────────────────────────────────────────────────────────

    /// Attaches the render surface.
    pub fn attach_renderer(&mut self, mut renderer: R) {
        renderer.resize(self.size.0, self.size.1);
        self.renderer = Some(renderer);
        self.log_ready();
    }

    /// Attaches the interaction controls.
    pub fn attach_controls(&mut self, mut controls: C) {
        controls.set_enabled(self.motion.interaction_enabled());
        self.controls = Some(controls);
        self.log_ready();
    }

    /// Attaches the pin overlay.
    pub fn attach_overlay(&mut self, mut overlay: O) {
        overlay.resize(self.size.0, self.size.1);
        overlay.set_visible(self.pins.is_visible());
        self.overlay = Some(overlay);
    }

    /// Detaches and disposes the render surface; the live scene is dropped.
    pub fn detach_renderer(&mut self) -> Option<R> {
        let mut renderer = self.renderer.take()?;
        renderer.dispose();
        self.drop_live_scene();
        info!("render surface detached");
        Some(renderer)
    }

    /// Installs the observer for commits and framing completions.
    pub fn set_observer(&mut self, observer: Box<dyn SceneObserver>) {
        self.observer = Some(observer);
    }

    /// Whether a render surface and controls are attached.
    pub const fn is_ready(&self) -> bool {
        self.renderer.is_some() && self.controls.is_some()
    }

    fn log_ready(&self) {
        if self.is_ready() {
            info!("scene engine ready");
        }
    }

    fn ensure_ready(&mut self) -> Result<(), EngineError> {
        if self.is_ready() {
            return Ok(());
        }
        self.drop_live_scene();
        Err(EngineError::NotReady)
    }

    fn drop_live_scene(&mut self) {
        if !self.reconciler.live().is_empty() {
            let dropped = self.reconciler.clear(&mut self.scene);
            info!(dropped, "live scene cleared");
        }
        self.scene_dirty = true;
        self.pins_dirty = true;
    }

    // ── Data ────────────────────────────────────────────────────────────

    /// Replaces the equipment list.
    pub fn update_equipment(&mut self, items: Vec<EquipmentItem>) {
        self.equipment = items;
        self.scene_dirty = true;
        self.pins_dirty = true;
    }

    /// Replaces the layer states.
    pub fn update_layers(&mut self, layers: Vec<LayerState>) {
        self.layers = layers;
        self.scene_dirty = true;
        self.pins_dirty = true;
    }

    /// Changes the color mode.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if self.color_mode != mode {
            self.color_mode = mode;
            self.scene_dirty = true;
        }
    }

    /// Replaces the selection and hover state.
    pub fn set_selection(&mut self, selection: SelectionState) {
        self.selection = selection;
    }

    /// Updates only the hovered tag.
    pub fn set_hovered(&mut self, tag: Option<String>) {
        self.selection.hovered = tag;
    }

    /// Replaces the annotations.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.pins_dirty = true;
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The scene graph.
    pub const fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The camera.
    pub const fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// The current viewport.
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Live objects as of the last reconcile.
    pub const fn live(&self) -> &LiveObjectIndex {
        self.reconciler.live()
    }

    /// Ground plane node.
    pub const fn ground(&self) -> Option<NodeId> {
        self.reconciler.ground()
    }

    /// Outline effect state.
    pub const fn outline(&self) -> &OutlineEffect {
        &self.outline
    }

    /// Annotation pin layer.
    pub const fn pins(&self) -> &AnnotationPinLayer {
        &self.pins
    }

    /// Pins projected in the last frame.
    pub fn projected_pins(&self) -> &[ProjectedPin] {
        &self.projected
    }

    /// Camera motion state machine.
    pub const fn motion(&self) -> &CameraMotionController {
        &self.motion
    }

    /// Report of the last reconcile pass.
    pub const fn last_report(&self) -> &ReconcileReport {
        &self.last_report
    }

    /// Attached render surface.
    pub const fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Attached overlay.
    pub const fn overlay(&self) -> Option<&O> {
        self.overlay.as_ref()
    }

    /// Attached controls.
    pub const fn controls(&self) -> Option<&C> {
        self.controls.as_ref()
    }

    /// Current selection and hover.
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Frames rendered so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame_index
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Runs one frame: reconcile, pins, highlight, camera step, controls,
    /// pin projection, render.
    #[instrument(skip_all, fields(frame = self.frame_index))]
    pub fn frame(&mut self, now: Duration) -> Result<FrameInfo, EngineError> {
        self.ensure_ready()?;

        if self.scene_dirty {
            self.last_report = self.reconciler.reconcile(
                &mut self.scene,
                &self.equipment,
                &self.layers,
                self.color_mode,
                self.factory.as_ref(),
                self.colors.as_ref(),
            );
            self.scene_dirty = false;
        }

        if self.pins_dirty {
            self.pins.sync(
                &mut self.scene,
                &self.annotations,
                &self.equipment,
                &self.layers,
                &self.config.pins,
            )?;
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.set_visible(self.pins.is_visible());
            }
            self.pins_dirty = false;
        }

        apply_highlight(
            &mut self.outline,
            &self.scene,
            self.reconciler.live(),
            self.selection.selected(),
            self.selection.hovered.as_deref(),
        );

        let (pose, effects) = self.motion.tick(now);
        if let Some(pose) = pose {
            self.camera.set_pose(&pose);
        }
        self.dispatch(effects);

        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        self.projected = self.pins.project(&self.camera, &self.viewport);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.place_pins(&self.projected);
        }

        let info = FrameInfo {
            index: self.frame_index,
            camera: self.camera.pose(),
            size: self.size,
            outline: self.outline.style(),
            outlined: self.outline.outlined().len(),
        };
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.scene, &info);
        }
        self.frame_index += 1;
        Ok(info)
    }

    /// Resizes camera aspect, render target, overlay and outline together.
    /// Dimensions are clamped to at least 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (w, h) = (width.max(1), height.max(1));
        self.size = (w, h);
        self.viewport = Viewport::sized(w, h);
        self.camera.aspect = self.viewport.aspect();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(w, h);
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize(w, h);
        }
        self.outline.set_resolution(w, h);
        info!(width = w, height = h, "viewport resized");
    }

    /// Releases the render surface and all live objects.
    pub fn dispose(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.dispose();
        }
        self.renderer = None;
        self.drop_live_scene();
    }

    // ── Pointer ─────────────────────────────────────────────────────────

    /// Tag under the pixel `(px, py)`.
    pub fn pick(&mut self, px: f32, py: f32) -> Result<Option<String>, EngineError> {
        self.ensure_ready()?;
        Ok(PointerPicker::pick(
            &self.scene,
            self.reconciler.live(),
            &self.camera,
            &self.viewport,
            px,
            py,
        ))
    }

    /// Resolves a click; `None` for non-primary buttons.
    pub fn pointer_click(
        &mut self,
        px: f32,
        py: f32,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Result<Option<ClickOutcome>, EngineError> {
        self.ensure_ready()?;
        Ok(PointerPicker::on_click(
            &self.scene,
            self.reconciler.live(),
            &self.camera,
            &self.viewport,
            px,
            py,
            button,
            modifiers,
        ))
    }

    /// Resolves hover and stores it as the hovered tag.
    pub fn pointer_move(&mut self, px: f32, py: f32) -> Result<Option<String>, EngineError> {
        let tag = self.pick(px, py)?;
        self.selection.hovered.clone_from(&tag);
        Ok(tag)
    }

    // ── Camera ──────────────────────────────────────────────────────────

    /// User pressed to orbit. Returns false while an animation runs.
    pub fn begin_drag(&mut self) -> Result<bool, EngineError> {
        self.ensure_ready()?;
        Ok(self.motion.begin_drag(self.camera.pose()))
    }

    /// Queues an orbit delta in pixels.
    pub fn drag(&mut self, delta: Vec2) -> Result<(), EngineError> {
        self.ensure_ready()?;
        if let Some(controls) = self.controls.as_mut() {
            controls.rotate(delta);
        }
        Ok(())
    }

    /// Queues a pan delta in pixels.
    pub fn pan(&mut self, delta: Vec2) -> Result<(), EngineError> {
        self.ensure_ready()?;
        if let Some(controls) = self.controls.as_mut() {
            controls.pan(delta);
        }
        Ok(())
    }

    /// User released; commits the pose if it moved.
    pub fn end_drag(&mut self) -> Result<(), EngineError> {
        self.ensure_ready()?;
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }
        let effects = self.motion.end_drag(self.camera.pose());
        self.dispatch(effects);
        Ok(())
    }

    /// Wheel input: cancels an animation in flight, then queues a dolly.
    pub fn wheel(&mut self, scale: f32, now: Duration) -> Result<(), EngineError> {
        self.ensure_ready()?;
        let (pose, effects) = self.motion.on_wheel(now);
        if let Some(pose) = pose {
            self.camera.set_pose(&pose);
        }
        self.dispatch(effects);
        if let Some(controls) = self.controls.as_mut() {
            controls.dolly(scale);
        }
        Ok(())
    }

    /// Frames every visible live object of `system`.
    pub fn request_frame_system(
        &mut self,
        system: &str,
        now: Duration,
    ) -> Result<RequestOutcome, EngineError> {
        self.ensure_ready()?;
        let bounds = self.system_bounds(system);
        let (outcome, effects) =
            self.motion
                .request_frame_system(system, bounds, &self.camera, now);
        self.dispatch(effects);
        Ok(outcome)
    }

    /// Animates to `target` (history undo/redo).
    pub fn request_camera_state(
        &mut self,
        target: CameraState,
        now: Duration,
    ) -> Result<RequestOutcome, EngineError> {
        self.ensure_ready()?;
        let (outcome, effects) = self
            .motion
            .request_camera_state(self.camera.pose(), target, now);
        self.dispatch(effects);
        Ok(outcome)
    }

    /// Moves the camera without animation or commit. Ignored while animating.
    pub fn set_camera_pose(&mut self, pose: CameraState) -> bool {
        if !self.motion.interaction_enabled() {
            return false;
        }
        self.camera.set_pose(&pose);
        true
    }

    /// Union of world bounds of the visible live objects in `system`.
    pub fn system_bounds(&self, system: &str) -> Option<Aabb> {
        Aabb::union_all(
            self.reconciler
                .live()
                .in_system(system)
                .filter(|o| self.scene.is_effectively_visible(o.node))
                .filter_map(|o| self.scene.world_bounds(o.node)),
        )
    }

    fn dispatch(&mut self, effects: Vec<MotionEffect>) {
        for effect in effects {
            match effect {
                MotionEffect::SetInteraction(enabled) => {
                    if let Some(controls) = self.controls.as_mut() {
                        controls.set_enabled(enabled);
                    }
                }
                MotionEffect::Committed { state, description } => {
                    if let Some(observer) = self.observer.as_mut() {
                        observer.on_camera_committed(&state, description.as_deref());
                    }
                }
                MotionEffect::SystemFramed { system } => {
                    if let Some(observer) = self.observer.as_mut() {
                        observer.on_system_framed(&system);
                    }
                }
            }
        }
    }
}

fn add_ground(scene: &mut SceneGraph, size: f32) -> Result<NodeId, EngineError> {
    let root = scene.root();
    let ground = scene.add_mesh(
        root,
        MeshData {
            primitive: Primitive::Plane {
                width: size,
                depth: size,
            },
            color: GROUND_COLOR,
        },
        Transform::identity(),
    )?;
    if let Some(node) = scene.node_mut(ground) {
        node.tag = Some(GROUND_TAG.to_owned());
        node.pickable = false;
    }
    Ok(ground)
}
