// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Equipment fixtures.

use glam::Vec3;
use plant_app_core::document::PlantDocument;
use plant_scene_port::{EquipmentItem, EquipmentType};

/// The built-in sample plant, or an empty document if it fails to parse.
pub fn sample_plant() -> PlantDocument {
    PlantDocument::sample().unwrap_or_default()
}

/// Item of `kind` at `position` belonging to `sistema`.
pub fn item(tag: &str, kind: EquipmentType, position: Vec3, sistema: &str) -> EquipmentItem {
    let mut item = EquipmentItem::new(tag, kind, position);
    item.sistema = Some(sistema.to_owned());
    item
}

/// Tank of `height` with its base at `position`.
pub fn tank(tag: &str, position: Vec3, height: f32) -> EquipmentItem {
    let mut item = EquipmentItem::new(tag, EquipmentType::Tank, position);
    item.height = Some(height);
    item
}

/// `count` unit boxes spaced `spacing` apart along X, all in `sistema`.
pub fn boxes_in_a_row(count: usize, spacing: f32, sistema: &str) -> Vec<EquipmentItem> {
    (0..count)
        .map(|i| {
            item(
                &format!("box-{i:02}"),
                EquipmentType::Other,
                Vec3::X * (i as f32 * spacing),
                sistema,
            )
        })
        .collect()
}
