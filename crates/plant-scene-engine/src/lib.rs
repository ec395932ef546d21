// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene reconciliation and camera animation engine for plant viewers.
//!
//! The engine keeps a headless scene graph in step with a declarative
//! equipment list and answers the interactive questions a viewer asks every
//! frame: what is under the pointer, what should be outlined, where the
//! camera is heading, and where annotation pins land on screen.
//!
//! # Frame order
//!
//! [`SceneEngine::frame`] runs, in order: reconcile, pin sync, highlight,
//! camera animation step, interaction controls update, pin projection,
//! render. Picking reads the live objects as of the last reconcile.
//!
//! # Ports
//!
//! - [`RenderSurface`] and [`OverlaySurface`] receive finished frames.
//! - [`InteractionControls`] owns user orbiting.
//! - [`FrameScheduler`] decides when frames run.
//! - [`SceneObserver`] receives committed camera poses.

use thiserror::Error;

pub mod annotations;
pub mod camera;
pub mod color;
pub mod config;
pub mod controls;
pub mod engine;
pub mod frame;
pub mod framing;
pub mod geometry;
pub mod highlight;
pub mod motion;
pub mod picker;
pub mod reconcile;
pub mod render;
pub mod scene;

pub use annotations::{AnnotationPin, AnnotationPinLayer, ProjectedPin};
pub use camera::{PerspectiveCamera, Viewport};
pub use color::DefaultColorResolver;
pub use config::EngineConfig;
pub use controls::{InteractionControls, OrbitControls};
pub use engine::{SceneEngine, SceneObserver};
pub use frame::{FrameDriver, FrameScheduler, IntervalScheduler, ManualScheduler};
pub use framing::ViewKind;
pub use geometry::PrimitiveGeometryFactory;
pub use highlight::{apply_highlight, OutlineEffect};
pub use motion::{CameraMotionController, MotionEffect, MotionPhase, RequestOutcome};
pub use picker::{Modifiers, PointerButton, PointerPicker};
pub use reconcile::{LiveObject, LiveObjectIndex, MeshReconciler, ReconcilePlan, ReconcileReport};
pub use render::{FrameInfo, HeadlessOverlay, HeadlessRenderer, OverlaySurface, RenderSurface};
pub use scene::{NodeId, ResourceStats, SceneGraph};

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No render surface or no interaction controls are attached.
    #[error("scene engine is not ready")]
    NotReady,
    /// The node handle is stale or was never issued.
    #[error("unknown scene node {0}")]
    UnknownNode(NodeId),
    /// The node cannot be removed (the root).
    #[error("scene node {0} cannot be removed")]
    ProtectedNode(NodeId),
    /// The arena ran out of addressable slots.
    #[error("scene arena is full")]
    ArenaFull,
}
