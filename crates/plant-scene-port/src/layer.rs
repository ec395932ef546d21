// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visibility layers.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentType;

/// What a layer switches on and off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayerTarget {
    /// Every equipment record of one kind (`Terrain` drives the ground plane).
    Equipment(EquipmentType),
    /// Every equipment record regardless of kind.
    All,
    /// The annotation pin overlay.
    Annotations,
}

impl fmt::Display for LayerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equipment(kind) => kind.fmt(f),
            Self::All => f.write_str("All"),
            Self::Annotations => f.write_str("Annotations"),
        }
    }
}

impl From<LayerTarget> for String {
    fn from(target: LayerTarget) -> Self {
        target.to_string()
    }
}

impl TryFrom<String> for LayerTarget {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim() {
            "" => Err("empty layer target".to_owned()),
            "All" => Ok(Self::All),
            "Annotations" => Ok(Self::Annotations),
            other => match other.parse::<EquipmentType>() {
                Ok(kind) => Ok(Self::Equipment(kind)),
                Err(never) => match never {},
            },
        }
    }
}

/// One on/off visibility switch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerState {
    /// Stable identifier (`layer-tanks`).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Controlled elements.
    #[serde(alias = "equipmentType")]
    pub controlled_type: LayerTarget,
    /// Current visibility.
    pub is_visible: bool,
}

impl LayerState {
    /// Creates a visible layer.
    pub fn new(id: impl Into<String>, name: impl Into<String>, target: LayerTarget) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            controlled_type: target,
            is_visible: true,
        }
    }
}

/// The stock layer set: one per equipment kind, terrain, and annotations.
pub fn default_layers() -> Vec<LayerState> {
    use EquipmentType as K;
    let eq = |id: &str, name: &str, kind| LayerState::new(id, name, LayerTarget::Equipment(kind));
    vec![
        eq("layer-terrain", "Terrain", K::Terrain),
        eq("layer-buildings", "Buildings", K::Building),
        eq("layer-cranes", "Cranes", K::Crane),
        eq("layer-tanks", "Tanks", K::Tank),
        eq("layer-spheres", "Spheres", K::Sphere),
        eq("layer-vessels", "Vessels", K::Vessel),
        eq("layer-pumps", "Pumps", K::Pump),
        eq("layer-pipes", "Pipes", K::Pipe),
        eq("layer-valves", "Valves", K::Valve),
        eq("layer-ships", "Ships", K::Ship),
        eq("layer-barges", "Barges", K::Barge),
        LayerState::new("layer-annotations", "Annotations", LayerTarget::Annotations),
    ]
}

/// Visibility of equipment of `kind`.
///
/// A kind without a matching layer counts as visible. A hidden `All` layer
/// hides every kind.
pub fn is_kind_visible(layers: &[LayerState], kind: EquipmentType) -> bool {
    let all_hidden = layers
        .iter()
        .any(|l| l.controlled_type == LayerTarget::All && !l.is_visible);
    if all_hidden {
        return false;
    }
    layers
        .iter()
        .find(|l| l.controlled_type == LayerTarget::Equipment(kind))
        .is_none_or(|l| l.is_visible)
}

/// Visibility of the ground plane. No terrain layer means visible.
pub fn terrain_visible(layers: &[LayerState]) -> bool {
    layers
        .iter()
        .find(|l| l.controlled_type == LayerTarget::Equipment(EquipmentType::Terrain))
        .is_none_or(|l| l.is_visible)
}

/// Visibility of the annotation overlay. No annotations layer means visible.
pub fn annotations_visible(layers: &[LayerState]) -> bool {
    layers
        .iter()
        .find(|l| l.controlled_type == LayerTarget::Annotations)
        .is_none_or(|l| l.is_visible)
}
