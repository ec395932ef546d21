// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `plant-scene run`: one headless session against a plant document.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use glam::Vec3;
use plant_app_core::filter::EquipmentFilter;
use plant_app_core::history::CameraHistory;
use plant_app_core::layers::LayerManager;
use plant_app_core::prefs::{ScenePrefs, SCENE_PREFS_KEY};
use plant_app_core::selection::SelectionManager;
use plant_scene_engine::{
    EngineConfig, FrameDriver, HeadlessOverlay, HeadlessRenderer, ManualScheduler, MotionPhase,
    OrbitControls, ProjectedPin, RequestOutcome, SceneEngine, SceneObserver,
};
use plant_scene_port::{CameraState, ColorMode, SceneCommand};
use serde::Serialize;
use tracing::{info, warn};

/// Simulated time between frames.
const FRAME_STEP: Duration = Duration::from_millis(16);
/// Upper bound on frames spent waiting for one camera move.
const MAX_SETTLE_FRAMES: u32 = 10_000;

/// Options of `plant-scene run`.
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Plant document (JSON); the built-in sample when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,
    /// Engine tuning (JSON); defaults when omitted
    #[arg(long)]
    pub engine_config: Option<PathBuf>,
    /// Extra frames to render after all requests settled
    #[arg(long, default_value_t = 1)]
    pub frames: u32,
    /// System to frame (repeatable; repeating a system cycles its views)
    #[arg(long = "frame-system")]
    pub frame_systems: Vec<String>,
    /// Color mode (equipment, product, operational-state)
    #[arg(long)]
    pub color_mode: Option<ColorMode>,
    /// Layer id or name to hide (repeatable)
    #[arg(long = "hide-layer")]
    pub hide_layers: Vec<String>,
    /// Equipment tag to select (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,
    /// Only load equipment matching these search terms
    #[arg(long)]
    pub search: Option<String>,
    /// Only load equipment of this system
    #[arg(long)]
    pub sistema: Option<String>,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,
    /// Directory of saved preferences to apply
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
    /// Store the final camera pose, color mode and hidden layers in `--config-dir`
    #[arg(long, requires = "config_dir")]
    pub save_prefs: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scene: None,
            engine_config: None,
            frames: 1,
            frame_systems: Vec::new(),
            color_mode: None,
            hide_layers: Vec::new(),
            select: Vec::new(),
            search: None,
            sistema: None,
            width: 1280,
            height: 720,
            config_dir: None,
            save_prefs: false,
        }
    }
}

/// A live object in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEntry {
    /// Equipment tag.
    pub tag: String,
    /// Equipment kind name.
    pub kind: String,
    /// Owning system.
    pub sistema: Option<String>,
    /// World position of the object's root.
    pub position: Vec3,
}

/// A record the engine did not build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Equipment tag.
    pub tag: String,
    /// Why it was skipped.
    pub reason: String,
}

/// JSON report printed by `plant-scene run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Frames rendered.
    pub frames: u64,
    /// Meshes drawn in the last frame.
    pub drawn_meshes: usize,
    /// Live objects, sorted by tag.
    pub live: Vec<LiveEntry>,
    /// Records that were not built.
    pub skipped: Vec<SkippedEntry>,
    /// Final camera pose.
    pub camera: CameraState,
    /// Objects outlined in the last frame.
    pub outlined: usize,
    /// Systems whose framing finished, in order.
    pub framed: Vec<String>,
    /// Undoable commands recorded during the session.
    pub commands: Vec<SceneCommand>,
    /// Annotation pins projected in the last frame.
    pub pins: Vec<ProjectedPin>,
}

/// Observer feeding engine commits into a [`CameraHistory`].
#[derive(Clone, Default)]
struct SessionLog {
    inner: Arc<Mutex<SessionInner>>,
}

#[derive(Default)]
struct SessionInner {
    history: CameraHistory,
    commands: Vec<SceneCommand>,
    framed: Vec<String>,
}

impl SessionLog {
    fn anchored(pose: CameraState) -> Self {
        let log = Self::default();
        log.lock().history = CameraHistory::new(pose);
        log
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, command: SceneCommand) {
        self.lock().commands.push(command);
    }
}

impl SceneObserver for SessionLog {
    fn on_camera_committed(&mut self, state: &CameraState, description: Option<&str>) {
        let mut inner = self.lock();
        let SessionInner {
            history, commands, ..
        } = &mut *inner;
        history.commit(*state, description, commands);
    }

    fn on_system_framed(&mut self, system: &str) {
        self.lock().framed.push(system.to_owned());
    }
}

fn load_engine_config(opts: &RunOptions) -> Result<EngineConfig> {
    let Some(path) = opts.engine_config.as_deref() else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn resolve_layer_id(layers: &LayerManager, wanted: &str) -> Option<String> {
    layers
        .layers()
        .iter()
        .find(|l| l.id == wanted || l.name.eq_ignore_ascii_case(wanted))
        .map(|l| l.id.clone())
}

/// Runs one headless session and collects the report.
pub fn run_scene(opts: &RunOptions) -> Result<RunReport> {
    let doc = crate::load_document(opts.scene.as_deref())?;
    let config = load_engine_config(opts)?;
    let prefs_service = opts
        .config_dir
        .as_deref()
        .map(|dir| crate::prefs::open(Some(dir)))
        .transpose()?;
    let prefs: Option<ScenePrefs> = prefs_service
        .as_ref()
        .map(|s| s.load_or_default(SCENE_PREFS_KEY))
        .transpose()?;

    let filter = EquipmentFilter {
        search_term: opts.search.clone().unwrap_or_default(),
        sistema: opts
            .sistema
            .clone()
            .unwrap_or_else(|| plant_app_core::filter::ALL.to_owned()),
        ..EquipmentFilter::default()
    };
    let equipment = filter.apply(&doc.equipment);
    info!(
        loaded = doc.equipment.len(),
        shown = equipment.len(),
        "plant document loaded"
    );

    let mut layer_states = doc.layers.clone();
    if let Some(prefs) = &prefs {
        prefs.apply_to_layers(&mut layer_states);
    }
    let mut layers = LayerManager::new(layer_states);
    let mut selection = SelectionManager::new();

    let mut engine: SceneEngine = SceneEngine::new(config);
    engine.attach_renderer(HeadlessRenderer::new());
    engine.attach_overlay(HeadlessOverlay::default());
    engine.attach_controls(OrbitControls::default());
    engine.resize(opts.width, opts.height);

    let start_pose = prefs
        .as_ref()
        .map_or_else(|| engine.camera().pose(), |p| p.camera.pose());
    engine.set_camera_pose(start_pose);
    let log = SessionLog::anchored(start_pose);
    engine.set_observer(Box::new(log.clone()));

    let mut recorded: Vec<SceneCommand> = Vec::new();
    for wanted in &opts.hide_layers {
        let Some(id) = resolve_layer_id(&layers, wanted) else {
            bail!("unknown layer {wanted:?}");
        };
        layers.set_visible(&id, false, &mut recorded)?;
    }
    if !opts.select.is_empty() {
        selection.select_batch(opts.select.iter().cloned(), &mut recorded);
    }
    for command in recorded {
        log.record(command);
    }

    let color_mode = opts
        .color_mode
        .or_else(|| prefs.as_ref().map(|p| p.color_mode))
        .unwrap_or_default();
    engine.set_color_mode(color_mode);
    engine.update_layers(layers.layers().to_vec());
    engine.update_equipment(equipment);
    engine.set_annotations(doc.annotations.clone());
    engine.set_selection(selection.state().clone());

    let mut driver = FrameDriver::new(ManualScheduler::new());
    driver.start();
    let mut now = Duration::ZERO;
    driver.pump(&mut engine, now)?;
    for skipped in &engine.last_report().skipped {
        warn!(tag = %skipped.tag, reason = %skipped.reason, "equipment not built");
    }

    for system in &opts.frame_systems {
        now += FRAME_STEP;
        match engine.request_frame_system(system, now)? {
            RequestOutcome::Ignored => warn!(%system, "frame request ignored"),
            RequestOutcome::Started => {
                let mut waited = 0;
                while engine.motion().phase() == MotionPhase::Animating {
                    if waited == MAX_SETTLE_FRAMES {
                        bail!("camera never settled while framing {system}");
                    }
                    now += FRAME_STEP;
                    driver.pump(&mut engine, now)?;
                    waited += 1;
                }
            }
            RequestOutcome::Completed | RequestOutcome::Unchanged => {}
        }
        now += engine.config().request_guard();
    }

    for _ in 0..opts.frames {
        now += FRAME_STEP;
        driver.pump(&mut engine, now)?;
    }
    driver.stop();

    let report = collect_report(&engine, &log);
    if opts.save_prefs {
        if let Some(service) = &prefs_service {
            service.update(SCENE_PREFS_KEY, |p: &mut ScenePrefs| {
                p.camera.set_pose(&report.camera);
                p.color_mode = color_mode;
                p.capture_layers(layers.layers());
            })?;
            info!("scene prefs saved");
        }
    }
    Ok(report)
}

fn collect_report(engine: &SceneEngine, log: &SessionLog) -> RunReport {
    let scene = engine.scene();
    let live = engine
        .live()
        .iter()
        .map(|o| LiveEntry {
            tag: o.tag.clone(),
            kind: o.kind.to_string(),
            sistema: o.sistema.clone(),
            position: scene
                .world_matrix(o.node)
                .map_or(Vec3::NAN, |m| m.w_axis.truncate()),
        })
        .collect();
    let skipped = engine
        .last_report()
        .skipped
        .iter()
        .map(|s| SkippedEntry {
            tag: s.tag.clone(),
            reason: s.reason.to_string(),
        })
        .collect();
    let inner = log.lock();
    RunReport {
        frames: engine.frame_count(),
        drawn_meshes: engine.renderer().map_or(0, |r| r.drawn_meshes),
        live,
        skipped,
        camera: engine.camera().pose(),
        outlined: engine.outline().outlined().len(),
        framed: inner.framed.clone(),
        commands: inner.commands.clone(),
        pins: engine.projected_pins().to_vec(),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn framing_twice_records_two_views() {
        let opts = RunOptions {
            frame_systems: vec!["ODB".into(), "ODB".into()],
            ..RunOptions::default()
        };
        let report = run_scene(&opts).unwrap();
        assert_eq!(report.framed, ["ODB", "ODB"]);
        let labels: Vec<&str> = report.commands.iter().map(SceneCommand::description).collect();
        assert_eq!(
            labels,
            ["Focused system ODB (view 0)", "Focused system ODB (view 1)"]
        );
        assert_eq!(report.live.len(), 20);
    }

    #[test]
    fn hidden_layers_and_selection_are_recorded() {
        let opts = RunOptions {
            hide_layers: vec!["Tanks".into()],
            select: vec!["crane-01".into()],
            ..RunOptions::default()
        };
        let report = run_scene(&opts).unwrap();
        assert!(report.live.iter().all(|e| e.kind != "Tank"));
        assert_eq!(report.outlined, 1);
        let labels: Vec<&str> = report.commands.iter().map(SceneCommand::description).collect();
        assert_eq!(labels, ["Hid layer Tanks", "Selected crane-01"]);
    }

    #[test]
    fn unknown_layers_are_rejected() {
        let opts = RunOptions {
            hide_layers: vec!["nope".into()],
            ..RunOptions::default()
        };
        assert!(run_scene(&opts).is_err());
    }

    #[test]
    fn system_filter_limits_the_scene() {
        let opts = RunOptions {
            sistema: Some("ODB".into()),
            ..RunOptions::default()
        };
        let report = run_scene(&opts).unwrap();
        assert!(!report.live.is_empty());
        assert!(report
            .live
            .iter()
            .all(|e| e.sistema.as_deref() == Some("ODB")));
    }
}
