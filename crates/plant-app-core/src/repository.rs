// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory equipment and annotation repository.

use std::collections::BTreeMap;

use plant_scene_port::{
    Annotation, AnnotationStore, EquipmentItem, EquipmentPatch, EquipmentStore,
};

/// Map-backed implementation of [`EquipmentStore`] and [`AnnotationStore`].
///
/// Reads hand out copies; `BTreeMap` keeps listings sorted by tag.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    equipment: BTreeMap<String, EquipmentItem>,
    annotations: BTreeMap<String, Annotation>,
}

impl MemoryRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with `equipment` and `annotations`.
    ///
    /// Later duplicates of a tag replace earlier ones.
    pub fn seeded<E, A>(equipment: E, annotations: A) -> Self
    where
        E: IntoIterator<Item = EquipmentItem>,
        A: IntoIterator<Item = Annotation>,
    {
        Self {
            equipment: equipment.into_iter().map(|e| (e.tag.clone(), e)).collect(),
            annotations: annotations
                .into_iter()
                .map(|a| (a.equipment_tag.clone(), a))
                .collect(),
        }
    }

    /// Number of equipment records.
    pub fn equipment_len(&self) -> usize {
        self.equipment.len()
    }

    /// Drops annotations whose equipment no longer exists; returns how many.
    pub fn prune_orphan_annotations(&mut self) -> usize {
        let before = self.annotations.len();
        let equipment = &self.equipment;
        self.annotations.retain(|tag, _| equipment.contains_key(tag));
        before - self.annotations.len()
    }
}

impl EquipmentStore for MemoryRepository {
    fn get(&self, tag: &str) -> Option<EquipmentItem> {
        self.equipment.get(tag).cloned()
    }

    fn list(&self) -> Vec<EquipmentItem> {
        self.equipment.values().cloned().collect()
    }

    fn upsert(&mut self, item: EquipmentItem) -> EquipmentItem {
        self.equipment.insert(item.tag.clone(), item.clone());
        item
    }

    fn update(&mut self, tag: &str, patch: &EquipmentPatch) -> Option<EquipmentItem> {
        let existing = self.equipment.get_mut(tag)?;
        existing.apply_patch(patch);
        Some(existing.clone())
    }

    fn delete(&mut self, tag: &str) -> bool {
        self.equipment.remove(tag).is_some()
    }
}

impl AnnotationStore for MemoryRepository {
    fn get_annotation(&self, equipment_tag: &str) -> Option<Annotation> {
        self.annotations.get(equipment_tag).cloned()
    }

    fn list_annotations(&self) -> Vec<Annotation> {
        self.annotations.values().cloned().collect()
    }

    fn upsert_annotation(&mut self, annotation: Annotation) -> Annotation {
        self.annotations
            .insert(annotation.equipment_tag.clone(), annotation.clone());
        annotation
    }

    fn delete_annotation(&mut self, equipment_tag: &str) -> bool {
        self.annotations.remove(equipment_tag).is_some()
    }
}
