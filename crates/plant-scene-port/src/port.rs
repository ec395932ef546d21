// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port traits implemented by the engine's collaborators.

use crate::{
    Annotation, Color, ColorMode, EquipmentItem, EquipmentPatch, SceneCommand, Shape,
};

/// Builds the centered shape for an equipment record.
///
/// Implementations must return shapes centered on their local origin (the
/// body of a group at the origin); the engine applies the anchoring rule.
/// Returning `None` means "nothing to build" (e.g. terrain records).
pub trait GeometryFactory {
    /// Shape for `item`, with defaults applied for missing dimensions.
    fn build_geometry(&self, item: &EquipmentItem) -> Option<Shape>;
}

/// Maps a record and the active color mode to a display color.
pub trait ColorResolver {
    /// Color for `item` under `mode`.
    fn color_for(&self, item: &EquipmentItem, mode: ColorMode) -> Color;
}

/// Opaque sink for undoable actions (the host's command stack).
pub trait CommandSink {
    /// Execute `command` and record it for undo.
    fn execute_command(&mut self, command: SceneCommand);
}

impl CommandSink for Vec<SceneCommand> {
    fn execute_command(&mut self, command: SceneCommand) {
        self.push(command);
    }
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn execute_command(&mut self, command: SceneCommand) {
        (**self).execute_command(command);
    }
}

/// Key-value store of equipment records keyed by tag.
pub trait EquipmentStore {
    /// Record for `tag`.
    fn get(&self, tag: &str) -> Option<EquipmentItem>;
    /// Every record, sorted by tag.
    fn list(&self) -> Vec<EquipmentItem>;
    /// Inserts or replaces a record; returns the stored copy.
    fn upsert(&mut self, item: EquipmentItem) -> EquipmentItem;
    /// Merges `patch` into an existing record. Unknown tags yield `None`.
    fn update(&mut self, tag: &str, patch: &EquipmentPatch) -> Option<EquipmentItem>;
    /// Removes a record; returns whether it existed.
    fn delete(&mut self, tag: &str) -> bool;
}

/// Key-value store of annotations keyed by equipment tag.
pub trait AnnotationStore {
    /// Annotation bound to `equipment_tag`.
    fn get_annotation(&self, equipment_tag: &str) -> Option<Annotation>;
    /// Every annotation, sorted by equipment tag.
    fn list_annotations(&self) -> Vec<Annotation>;
    /// Inserts or replaces the annotation for its tag.
    fn upsert_annotation(&mut self, annotation: Annotation) -> Annotation;
    /// Removes the annotation for `equipment_tag`; returns whether it existed.
    fn delete_annotation(&mut self, equipment_tag: &str) -> bool;
}
