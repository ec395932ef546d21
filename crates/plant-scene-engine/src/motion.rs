// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera motion state machine.
//!
//! The controller never touches the camera or the host directly. Every call
//! returns the pose to apply (if any) and a list of [`MotionEffect`]s the
//! caller turns into controls toggles and observer callbacks. The only
//! clock is the `now` the caller passes in.

use std::time::Duration;

use plant_geom::Aabb;
use plant_scene_port::CameraState;
use tracing::{debug, info};

use crate::camera::PerspectiveCamera;
use crate::config::{EngineConfig, FramingConfig};
use crate::framing::{frame_bounds, ViewKind};

/// Coarse controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionPhase {
    /// Nothing in flight; user interaction allowed.
    #[default]
    Idle,
    /// The user is orbiting the camera.
    UserDragging,
    /// A programmatic move is in flight; user interaction disabled.
    Animating,
}

/// Side effect requested by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum MotionEffect {
    /// Enable or disable the interaction controls.
    SetInteraction(bool),
    /// A pose change the host should record.
    Committed {
        /// Committed pose.
        state: CameraState,
        /// History label (`None` for plain user moves).
        description: Option<String>,
    },
    /// A frame-system request finished (completed, cancelled or had nothing to frame).
    SystemFramed {
        /// System that was framed.
        system: String,
    },
}

/// How a move request was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// An animation started.
    Started,
    /// Another move is in flight or was just requested; nothing changed.
    Ignored,
    /// Accepted but nothing to animate; completion already reported.
    Completed,
    /// The camera already sits at the target.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq)]
enum Completion {
    Framed { system: String, view: ViewKind },
    Restored,
}

#[derive(Clone, Debug, PartialEq)]
struct CameraAnimation {
    from: CameraState,
    to: CameraState,
    started_at: Duration,
    completion: Completion,
}

/// Quartic ease-out.
pub fn ease_out_quart(alpha: f32) -> f32 {
    1.0 - (1.0 - alpha).powi(4)
}

/// Idle / dragging / animating state machine for the camera.
#[derive(Clone, Debug)]
pub struct CameraMotionController {
    phase: MotionPhase,
    animation: Option<CameraAnimation>,
    guard_until: Option<Duration>,
    drag_start: Option<CameraState>,
    framed_system: Option<String>,
    view: ViewKind,
    duration: Duration,
    guard: Duration,
    framing: FramingConfig,
}

impl Default for CameraMotionController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CameraMotionController {
    /// Controller using the timings and framing constants of `cfg`.
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            phase: MotionPhase::Idle,
            animation: None,
            guard_until: None,
            drag_start: None,
            framed_system: None,
            view: ViewKind::Default,
            duration: cfg.animation_duration(),
            guard: cfg.request_guard(),
            framing: cfg.framing,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Whether user interaction is currently allowed.
    pub fn interaction_enabled(&self) -> bool {
        self.phase != MotionPhase::Animating
    }

    /// Target of the in-flight animation.
    pub fn target(&self) -> Option<CameraState> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Last framed system and the view it was framed with.
    pub fn framed(&self) -> Option<(&str, ViewKind)> {
        self.framed_system.as_deref().map(|s| (s, self.view))
    }

    /// Whether a new request at `now` would be ignored.
    pub fn is_busy(&self, now: Duration) -> bool {
        self.phase == MotionPhase::Animating || self.guard_until.is_some_and(|g| now < g)
    }

    /// User started orbiting. Ignored while animating.
    pub fn begin_drag(&mut self, current: CameraState) -> bool {
        if self.phase == MotionPhase::Animating {
            return false;
        }
        self.phase = MotionPhase::UserDragging;
        self.drag_start = Some(current);
        true
    }

    /// User released; commits `current` when it differs from the drag start.
    pub fn end_drag(&mut self, current: CameraState) -> Vec<MotionEffect> {
        if self.phase != MotionPhase::UserDragging {
            return Vec::new();
        }
        self.phase = MotionPhase::Idle;
        let start = self.drag_start.take();
        if start.is_some_and(|s| s.approx_eq(&current, CameraState::EPSILON)) {
            return Vec::new();
        }
        vec![MotionEffect::Committed {
            state: current,
            description: None,
        }]
    }

    /// Frames `system` whose visible objects span `bounds`.
    ///
    /// Repeated requests for the same system cycle the view; a different
    /// system starts over at [`ViewKind::Default`]. Ignored requests leave
    /// the cycle untouched.
    pub fn request_frame_system(
        &mut self,
        system: &str,
        bounds: Option<Aabb>,
        camera: &PerspectiveCamera,
        now: Duration,
    ) -> (RequestOutcome, Vec<MotionEffect>) {
        if self.is_busy(now) {
            debug!(%system, "frame request ignored; camera busy");
            return (RequestOutcome::Ignored, Vec::new());
        }
        self.view = if self.framed_system.as_deref() == Some(system) {
            self.view.next()
        } else {
            ViewKind::Default
        };
        self.framed_system = Some(system.to_owned());
        self.guard_until = Some(now + self.guard);

        let target = bounds.and_then(|b| frame_bounds(&b, self.view, camera.fov_y, &self.framing));
        let Some(target) = target else {
            info!(%system, "nothing visible to frame");
            return (
                RequestOutcome::Completed,
                vec![MotionEffect::SystemFramed {
                    system: system.to_owned(),
                }],
            );
        };
        info!(%system, view = %self.view, "framing system");
        let completion = Completion::Framed {
            system: system.to_owned(),
            view: self.view,
        };
        (
            RequestOutcome::Started,
            self.start(camera.pose(), target, now, completion),
        )
    }

    /// Animates from `current` to `target` (history undo/redo). No commit on completion.
    pub fn request_camera_state(
        &mut self,
        current: CameraState,
        target: CameraState,
        now: Duration,
    ) -> (RequestOutcome, Vec<MotionEffect>) {
        if self.is_busy(now) {
            debug!("camera state request ignored; camera busy");
            return (RequestOutcome::Ignored, Vec::new());
        }
        if current.approx_eq(&target, CameraState::EPSILON) {
            return (RequestOutcome::Unchanged, Vec::new());
        }
        self.guard_until = Some(now + self.guard);
        (
            RequestOutcome::Started,
            self.start(current, target, now, Completion::Restored),
        )
    }

    fn start(
        &mut self,
        from: CameraState,
        to: CameraState,
        now: Duration,
        completion: Completion,
    ) -> Vec<MotionEffect> {
        self.phase = MotionPhase::Animating;
        self.drag_start = None;
        self.animation = Some(CameraAnimation {
            from,
            to,
            started_at: now,
            completion,
        });
        vec![MotionEffect::SetInteraction(false)]
    }

    fn pose_at(&self, anim: &CameraAnimation, now: Duration) -> (CameraState, bool) {
        let elapsed = now.saturating_sub(anim.started_at).as_secs_f32();
        let total = self.duration.as_secs_f32();
        let alpha = if total > 0.0 {
            (elapsed / total).min(1.0)
        } else {
            1.0
        };
        if alpha >= 1.0 {
            (anim.to, true)
        } else {
            (anim.from.lerp(&anim.to, ease_out_quart(alpha)), false)
        }
    }

    /// Advances the animation to `now`. Returns the pose to apply, if animating.
    pub fn tick(&mut self, now: Duration) -> (Option<CameraState>, Vec<MotionEffect>) {
        if self.guard_until.is_some_and(|g| now >= g) {
            self.guard_until = None;
        }
        let Some(anim) = self.animation.as_ref() else {
            return (None, Vec::new());
        };
        let (pose, done) = self.pose_at(anim, now);
        if !done {
            return (Some(pose), Vec::new());
        }
        info!("camera animation finished");
        (Some(pose), self.finish(pose, false))
    }

    /// Wheel/zoom input. Aborts an animation at its current pose.
    pub fn on_wheel(&mut self, now: Duration) -> (Option<CameraState>, Vec<MotionEffect>) {
        let Some(anim) = self.animation.as_ref() else {
            return (None, Vec::new());
        };
        let (pose, _) = self.pose_at(anim, now);
        info!("camera animation cancelled by wheel input");
        (Some(pose), self.finish(pose, true))
    }

    /// A restore cut short by the wheel commits its interrupted pose without a
    /// description.
    fn finish(&mut self, pose: CameraState, cancelled: bool) -> Vec<MotionEffect> {
        self.phase = MotionPhase::Idle;
        let mut effects = vec![MotionEffect::SetInteraction(true)];
        let Some(anim) = self.animation.take() else {
            return effects;
        };
        match anim.completion {
            Completion::Framed { system, view } => {
                effects.push(MotionEffect::Committed {
                    state: pose,
                    description: Some(format!(
                        "Focused system {system} (view {})",
                        view.index()
                    )),
                });
                effects.push(MotionEffect::SystemFramed { system });
            }
            Completion::Restored if cancelled => effects.push(MotionEffect::Committed {
                state: pose,
                description: None,
            }),
            Completion::Restored => {}
        }
        effects
    }
}
