// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plant scene documents (equipment, layers, annotations) as JSON.

use plant_scene_port::{default_layers, Annotation, EquipmentItem, LayerState};
use serde::{Deserialize, Serialize};

use crate::repository::MemoryRepository;

/// Built-in demo plant: buildings, cranes, tanks, pipes, valves, a sphere,
/// vessels, a pump, a ship and a barge spread over several systems.
pub const SAMPLE_PLANT_JSON: &str = include_str!("../data/sample_plant.json");

/// Everything a viewer needs to show one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDocument {
    /// Equipment records.
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    /// Visibility layers; the stock set when absent.
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerState>,
    /// Annotations keyed by equipment tag.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Default for PlantDocument {
    fn default() -> Self {
        Self {
            equipment: Vec::new(),
            layers: default_layers(),
            annotations: Vec::new(),
        }
    }
}

impl PlantDocument {
    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The built-in demo plant.
    pub fn sample() -> Result<Self, serde_json::Error> {
        Self::from_json(SAMPLE_PLANT_JSON)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Repository seeded with this document's equipment and annotations.
    pub fn to_repository(&self) -> MemoryRepository {
        MemoryRepository::seeded(self.equipment.iter().cloned(), self.annotations.iter().cloned())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use plant_scene_port::{EquipmentStore, EquipmentType};

    #[test]
    fn missing_sections_take_defaults() {
        let doc = PlantDocument::from_json(
            r#"{"equipment":[{"tag":"t","type":"Tank","position":[1.0,0.0,2.0]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.equipment[0].kind, EquipmentType::Tank);
        assert_eq!(doc.layers, default_layers());
        assert!(doc.annotations.is_empty());
        assert_eq!(doc.to_repository().list().len(), 1);
    }

    #[test]
    fn sample_plant_is_well_formed() {
        let doc = PlantDocument::sample().unwrap();
        assert_eq!(doc.equipment.len(), 20);
        assert!(doc.equipment.iter().all(|e| e.validate().is_ok()));
        let vessel = doc.equipment.iter().find(|e| e.tag == "vessel-02").unwrap();
        assert!(vessel.rotation.is_none());
        let repo = doc.to_repository();
        assert_eq!(repo.equipment_len(), 20);
    }

    #[test]
    fn pretty_json_parses_back() {
        let mut doc = PlantDocument::default();
        doc.annotations.push(Annotation::new("t", "leak"));
        let back = PlantDocument::from_json(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
