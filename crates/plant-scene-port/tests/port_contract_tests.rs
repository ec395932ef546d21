// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Serialization and placement contract tests for plant-scene-port.

use glam::Vec3;
use plant_scene_port::{
    Anchoring, CameraState, ColorMode, CommandSink, EquipmentItem, EquipmentType, OutlineStyle,
    SceneCommand,
};

#[test]
fn equipment_record_parses_host_json() {
    let json = r##"{
        "tag": "tank-01",
        "name": "Storage Tank Alpha",
        "type": "Tank",
        "sistema": "ODB",
        "area": "Área 33",
        "operationalState": "operando",
        "product": "70H",
        "position": [-8.0, 0.0, 12.0],
        "radius": 3,
        "height": 5,
        "color": "#4FC3F7"
    }"##;
    let item: EquipmentItem = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(item.kind, EquipmentType::Tank);
    assert_eq!(item.anchoring(), Anchoring::Base);
    assert_eq!(item.position, Vec3::new(-8.0, 0.0, 12.0));
    assert!((item.extent_above_anchor() - 5.0).abs() < 1e-6);
}

#[test]
fn color_mode_accepts_both_spellings() {
    let a: ColorMode = serde_json::from_str("\"Estado Operacional\"").unwrap_or_default();
    let b: ColorMode = serde_json::from_str("\"OperationalState\"").unwrap_or_default();
    assert_eq!(a, ColorMode::OperationalState);
    assert_eq!(a, b);
    assert_eq!("produto".parse::<ColorMode>(), Ok(ColorMode::Product));
}

#[test]
fn outline_presets_are_fixed() {
    let sel = OutlineStyle::Selected.params();
    assert_eq!(sel.color.to_hex(), 0x0000ff);
    assert!((sel.edge_strength - 10.0).abs() < f32::EPSILON);
    let none = OutlineStyle::None.params();
    assert!(none.edge_strength == 0.0 && none.edge_glow == 0.0 && none.edge_thickness == 0.0);
}

#[test]
fn vec_sink_records_commands_in_order() {
    let mut sink: Vec<SceneCommand> = Vec::new();
    let from = CameraState::default();
    let to = CameraState::new(Vec3::ONE, Vec3::ZERO);
    (&mut sink).execute_command(SceneCommand::CameraMove {
        from,
        to,
        description: "moved".into(),
    });
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].description(), "moved");
    let json = serde_json::to_value(&sink[0]).unwrap_or_default();
    assert_eq!(json["type"], "CAMERA_MOVE");
}

#[test]
fn camera_tolerance_is_component_wise() {
    let a = CameraState::default();
    let mut b = a;
    b.position.x += 0.0005;
    assert!(a.approx_eq(&b, CameraState::EPSILON));
    b.look_at.y += 0.01;
    assert!(!a.approx_eq(&b, CameraState::EPSILON));
}
