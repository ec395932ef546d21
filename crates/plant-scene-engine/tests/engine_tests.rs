// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Engine-level behaviour: picking, highlight, camera motion, readiness.

use std::time::Duration;

use glam::{Vec2, Vec3};
use plant_dry_tests::{boxes_in_a_row, sample_plant, tank, RecordingObserver};
use plant_scene_engine::{
    EngineError, FrameDriver, HeadlessOverlay, HeadlessRenderer, InteractionControls,
    ManualScheduler, Modifiers, MotionPhase, OrbitControls, PointerButton, RequestOutcome,
    SceneEngine,
};
use plant_scene_port::{Annotation, CameraState, OutlineStyle, SelectionState};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine() -> (SceneEngine, RecordingObserver) {
    let mut e: SceneEngine = SceneEngine::default();
    e.attach_renderer(HeadlessRenderer::new());
    e.attach_controls(OrbitControls::default());
    e.attach_overlay(HeadlessOverlay::default());
    e.resize(800, 600);
    let obs = RecordingObserver::new();
    e.set_observer(Box::new(obs.clone()));
    (e, obs)
}

fn frame(e: &mut SceneEngine, at: u64) {
    e.frame(ms(at)).unwrap_or_else(|err| panic!("{err}"));
}

fn pixel_of(e: &SceneEngine, world: Vec3) -> Vec2 {
    let (ndc, _) = e
        .camera()
        .project(world)
        .unwrap_or_else(|| panic!("{world} behind camera"));
    e.viewport().to_pixels(ndc)
}

#[test]
fn picking_resolves_each_of_two_objects() {
    let (mut e, _) = engine();
    e.update_equipment(boxes_in_a_row(2, 6.0, "ODB"));
    frame(&mut e, 0);
    assert!(e.set_camera_pose(CameraState::new(
        Vec3::new(3.0, 0.5, 20.0),
        Vec3::new(3.0, 0.5, 0.0)
    )));

    let left = pixel_of(&e, Vec3::new(0.0, 0.5, 0.0));
    let right = pixel_of(&e, Vec3::new(6.0, 0.5, 0.0));
    assert_eq!(e.pick(left.x, left.y), Ok(Some("box-00".into())));
    assert_eq!(e.pick(right.x, right.y), Ok(Some("box-01".into())));
    assert_eq!(e.pick(1.0, 1.0), Ok(None));

    let click = e
        .pointer_click(right.x, right.y, PointerButton::Primary, Modifiers::default())
        .unwrap_or_default()
        .unwrap_or_else(|| panic!("primary click ignored"));
    assert_eq!(click.tag.as_deref(), Some("box-01"));
    assert!(!click.multi);

    assert_eq!(e.pointer_move(left.x, left.y), Ok(Some("box-00".into())));
    assert_eq!(e.selection().hovered.as_deref(), Some("box-00"));
}

#[test]
fn ground_plane_is_never_picked() {
    let (mut e, _) = engine();
    frame(&mut e, 0);
    assert!(e.set_camera_pose(CameraState::new(Vec3::new(0.0, 30.0, 0.1), Vec3::ZERO)));
    assert_eq!(e.pick(400.0, 300.0), Ok(None));
}

#[test]
fn highlight_follows_selection_then_hover_then_nothing() {
    let (mut e, _) = engine();
    e.update_equipment(boxes_in_a_row(3, 4.0, "ODB"));
    let mut sel = SelectionState::with_selected(["box-00", "box-01"]);
    sel.hovered = Some("box-02".into());
    e.set_selection(sel);
    frame(&mut e, 0);
    assert_eq!(e.outline().style(), OutlineStyle::Selected);
    assert_eq!(e.outline().outlined().len(), 3);

    e.set_selection(SelectionState::new());
    e.set_hovered(Some("box-02".into()));
    frame(&mut e, 16);
    assert_eq!(e.outline().style(), OutlineStyle::Hover);
    assert_eq!(e.outline().outlined().len(), 1);

    e.set_hovered(None);
    frame(&mut e, 32);
    assert!(e.outline().outlined().is_empty());
    assert!(e.outline().params().edge_strength.abs() < f32::EPSILON);
}

#[test]
fn framing_converges_and_reports_once() {
    let (mut e, obs) = engine();
    e.update_equipment(boxes_in_a_row(3, 4.0, "ODB"));
    frame(&mut e, 0);

    assert_eq!(e.request_frame_system("ODB", ms(0)), Ok(RequestOutcome::Started));
    let target = e.motion().target().unwrap_or_else(|| panic!("no target"));
    assert_eq!(e.request_frame_system("ODB", ms(50)), Ok(RequestOutcome::Ignored));

    for t in (16..=688).step_by(16) {
        frame(&mut e, t);
    }
    assert!(obs.framed().is_empty());
    frame(&mut e, 700);
    frame(&mut e, 716);

    assert!(e.camera().pose().approx_eq(&target, 1e-6));
    assert_eq!(e.motion().phase(), MotionPhase::Idle);
    assert!(e.controls().is_some_and(|c| c.is_enabled()));
    assert_eq!(obs.framed(), ["ODB"]);
    let commits = obs.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].description.as_deref(), Some("Focused system ODB (view 0)"));
    assert_eq!(commits[0].state, target);
}

#[test]
fn wheel_cancels_framing_and_still_completes() {
    let (mut e, obs) = engine();
    e.update_equipment(boxes_in_a_row(2, 4.0, "ODB"));
    frame(&mut e, 0);
    let start = e.camera().pose();
    e.request_frame_system("ODB", ms(0))
        .unwrap_or_else(|err| panic!("{err}"));
    frame(&mut e, 100);
    e.wheel(0.9, ms(150)).unwrap_or_else(|err| panic!("{err}"));

    assert_eq!(e.motion().phase(), MotionPhase::Idle);
    assert!(e.controls().is_some_and(|c| c.is_enabled()));
    assert_eq!(obs.framed(), ["ODB"]);
    assert_eq!(obs.commits().len(), 1);
    assert!(!e.camera().pose().approx_eq(&start, CameraState::EPSILON));

    frame(&mut e, 800);
    assert_eq!(obs.framed().len(), 1);
}

#[test]
fn repeated_framing_cycles_three_views() {
    let (mut e, obs) = engine();
    e.update_equipment(boxes_in_a_row(3, 4.0, "ODB"));
    frame(&mut e, 0);

    let mut poses = Vec::new();
    for round in 0..4u64 {
        let t = round * 1000;
        assert_eq!(e.request_frame_system("ODB", ms(t)), Ok(RequestOutcome::Started));
        frame(&mut e, t + 700);
        poses.push(e.camera().pose());
    }
    let descriptions: Vec<_> = obs
        .commits()
        .into_iter()
        .filter_map(|c| c.description)
        .collect();
    assert_eq!(
        descriptions,
        [
            "Focused system ODB (view 0)",
            "Focused system ODB (view 1)",
            "Focused system ODB (view 2)",
            "Focused system ODB (view 0)",
        ]
    );
    assert!(!poses[0].approx_eq(&poses[1], CameraState::EPSILON));
    assert!(!poses[1].approx_eq(&poses[2], CameraState::EPSILON));
    assert!(!poses[0].approx_eq(&poses[2], CameraState::EPSILON));
    assert!(poses[0].approx_eq(&poses[3], 1e-4));
}

#[test]
fn switching_systems_resets_the_view_cycle() {
    let (mut e, obs) = engine();
    let mut items = boxes_in_a_row(2, 4.0, "ODB");
    items.push(tank("t", Vec3::new(30.0, 0.0, 0.0), 4.0));
    items[2].sistema = Some("GA".into());
    e.update_equipment(items);
    frame(&mut e, 0);
    e.request_frame_system("ODB", ms(0)).unwrap_or_else(|err| panic!("{err}"));
    frame(&mut e, 700);
    e.request_frame_system("GA", ms(800)).unwrap_or_else(|err| panic!("{err}"));
    frame(&mut e, 1500);
    let last = obs.commits().pop().and_then(|c| c.description);
    assert_eq!(last.as_deref(), Some("Focused system GA (view 0)"));
}

#[test]
fn framing_an_unknown_system_completes_immediately() {
    let (mut e, obs) = engine();
    frame(&mut e, 0);
    assert_eq!(e.request_frame_system("NONE", ms(0)), Ok(RequestOutcome::Completed));
    assert_eq!(obs.framed(), ["NONE"]);
    assert!(obs.commits().is_empty());
    assert_eq!(e.request_frame_system("NONE", ms(50)), Ok(RequestOutcome::Ignored));
}

#[test]
fn history_moves_animate_without_committing() {
    let (mut e, obs) = engine();
    frame(&mut e, 0);
    let target = CameraState::new(Vec3::new(40.0, 10.0, 0.0), Vec3::ZERO);
    assert_eq!(e.request_camera_state(target, ms(0)), Ok(RequestOutcome::Started));
    frame(&mut e, 700);
    assert_eq!(e.camera().pose(), target);
    assert!(obs.commits().is_empty());
    assert_eq!(e.request_camera_state(target, ms(800)), Ok(RequestOutcome::Unchanged));
}

#[test]
fn wheel_during_history_move_commits_where_it_stopped() {
    let (mut e, obs) = engine();
    frame(&mut e, 0);
    let target = CameraState::new(Vec3::new(40.0, 10.0, 0.0), Vec3::ZERO);
    e.request_camera_state(target, ms(0))
        .unwrap_or_else(|err| panic!("{err}"));
    frame(&mut e, 100);
    e.wheel(0.9, ms(150)).unwrap_or_else(|err| panic!("{err}"));

    assert_eq!(e.motion().phase(), MotionPhase::Idle);
    let commits = obs.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].description, None);
    assert!(!commits[0].state.approx_eq(&target, CameraState::EPSILON));
}

#[test]
fn drag_release_commits_only_real_moves() {
    let (mut e, obs) = engine();
    frame(&mut e, 0);
    assert_eq!(e.begin_drag(), Ok(true));
    e.end_drag().unwrap_or_else(|err| panic!("{err}"));
    assert!(obs.commits().is_empty());

    assert_eq!(e.begin_drag(), Ok(true));
    e.drag(Vec2::new(120.0, 0.0)).unwrap_or_else(|err| panic!("{err}"));
    frame(&mut e, 16);
    e.end_drag().unwrap_or_else(|err| panic!("{err}"));
    let commits = obs.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].description, None);
    assert_eq!(commits[0].state, e.camera().pose());
}

#[test]
fn dragging_is_refused_while_animating() {
    let (mut e, _) = engine();
    e.update_equipment(boxes_in_a_row(2, 4.0, "ODB"));
    frame(&mut e, 0);
    e.request_frame_system("ODB", ms(0)).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(e.begin_drag(), Ok(false));
    assert!(!e.set_camera_pose(CameraState::default()));
}

#[test]
fn annotations_follow_their_layer_and_reach_the_overlay() {
    let (mut e, _) = engine();
    let doc = sample_plant();
    e.update_equipment(doc.equipment.clone());
    e.set_annotations(vec![
        Annotation::new("tank-03", "check level"),
        Annotation::new("gone", "stale"),
    ]);
    frame(&mut e, 0);
    assert_eq!(e.pins().pins().len(), 1);
    assert_eq!(e.projected_pins().len(), 1);
    let overlay = e.overlay().unwrap_or_else(|| panic!("overlay"));
    assert!(overlay.visible);
    assert_eq!(overlay.pins.len(), 1);

    let mut layers = doc.layers;
    for l in &mut layers {
        if l.id == "layer-annotations" {
            l.is_visible = false;
        }
    }
    e.update_layers(layers);
    frame(&mut e, 16);
    assert!(e.projected_pins().is_empty());
    assert!(!e.overlay().is_some_and(|o| o.visible));
}

#[test]
fn terrain_layer_toggles_the_ground_plane() {
    let (mut e, _) = engine();
    let doc = sample_plant();
    let mut layers = doc.layers.clone();
    layers[0].is_visible = false;
    e.update_layers(layers);
    frame(&mut e, 0);
    let ground = e.ground().unwrap_or_else(|| panic!("ground"));
    assert!(!e.scene().is_effectively_visible(ground));
    e.update_layers(doc.layers);
    frame(&mut e, 16);
    assert!(e.scene().is_effectively_visible(ground));
}

#[test]
fn not_ready_engine_refuses_work_and_clears_the_scene() {
    let (mut e, _) = engine();
    e.update_equipment(sample_plant().equipment);
    frame(&mut e, 0);
    assert!(!e.live().is_empty());
    e.dispose();
    assert!(e.live().is_empty());
    assert_eq!(e.frame(ms(16)), Err(EngineError::NotReady));
    assert_eq!(e.request_frame_system("ODB", ms(16)), Err(EngineError::NotReady));
    assert_eq!(e.begin_drag(), Err(EngineError::NotReady));
    assert_eq!(e.wheel(1.1, ms(16)), Err(EngineError::NotReady));
}

#[test]
fn resize_clamps_and_reaches_every_surface() {
    let (mut e, _) = engine();
    e.resize(1024, 0);
    frame(&mut e, 0);
    let r = e.renderer().unwrap_or_else(|| panic!("renderer"));
    assert_eq!(r.viewport, (1024, 1));
    assert_eq!(r.last_frame.as_ref().map(|f| f.size), Some((1024, 1)));
    assert_eq!(e.overlay().map(|o| o.viewport), Some((1024, 1)));
    assert_eq!(e.outline().resolution(), (1024, 1));
    assert!((e.camera().aspect - 1024.0).abs() < 1e-3);
}

#[test]
fn driver_pumps_frames_through_a_manual_scheduler() {
    let (mut e, _) = engine();
    e.update_equipment(sample_plant().equipment);
    let mut driver = FrameDriver::new(ManualScheduler::new());
    assert_eq!(driver.pump(&mut e, ms(0)), Ok(None));
    driver.start();
    for t in 0..5 {
        driver
            .pump(&mut e, ms(t * 16))
            .unwrap_or_else(|err| panic!("{err}"));
    }
    driver.stop();
    assert_eq!(driver.frames(), 5);
    assert_eq!(e.renderer().map(|r| r.render_count), Some(5));
    assert!(e.renderer().is_some_and(|r| r.drawn_meshes > 20));
}
