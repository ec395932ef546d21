// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Selection manager that turns clicks into undoable selection commands.

use plant_scene_port::{CommandSink, SceneCommand, SelectionState};

/// Owns the selection and hover state shared with the engine.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    state: SelectionState,
}

fn describe(after: &[String]) -> String {
    match after {
        [] => "Cleared selection".to_owned(),
        [one] => format!("Selected {one}"),
        many => format!("Selected {} items", many.len()),
    }
}

impl SelectionManager {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Resolves a pick result.
    ///
    /// A tag with `multi` toggles it, a tag alone replaces the selection,
    /// an empty pick clears unless `multi` is held. Returns whether the
    /// selection changed; changes are recorded in `sink`.
    pub fn handle_click<S: CommandSink>(
        &mut self,
        tag: Option<&str>,
        multi: bool,
        sink: &mut S,
    ) -> bool {
        let before = self.state.sorted();
        match (tag, multi) {
            (Some(tag), true) => self.state.toggle(tag),
            (Some(tag), false) => self.state.set_selected(vec![tag.to_owned()]),
            (None, false) => self.state.clear(),
            (None, true) => return false,
        }
        self.commit(before, sink)
    }

    /// Replaces the selection with `tags` (deduplicated and sorted).
    pub fn select_batch<S, I>(&mut self, tags: I, sink: &mut S) -> bool
    where
        S: CommandSink,
        I: IntoIterator<Item = String>,
    {
        let before = self.state.sorted();
        let mut tags: Vec<String> = tags.into_iter().collect();
        tags.sort();
        tags.dedup();
        self.state.set_selected(tags);
        self.commit(before, sink)
    }

    /// Applies a selection restored by the host's undo stack. No command is emitted.
    pub fn restore(&mut self, tags: Vec<String>) {
        self.state.set_selected(tags);
    }

    /// Updates the hovered tag. Hover never produces a command.
    pub fn set_hovered(&mut self, tag: Option<String>) -> bool {
        if self.state.hovered == tag {
            return false;
        }
        self.state.hovered = tag;
        true
    }

    fn commit<S: CommandSink>(&self, before: Vec<String>, sink: &mut S) -> bool {
        let after = self.state.sorted();
        if after == before {
            return false;
        }
        let description = describe(&after);
        sink.execute_command(SceneCommand::EquipmentSelect {
            before,
            after,
            description,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_rules() {
        let mut sink: Vec<SceneCommand> = Vec::new();
        let mut m = SelectionManager::new();

        assert!(m.handle_click(Some("tank-01"), false, &mut sink));
        assert!(m.handle_click(Some("pump-01"), true, &mut sink));
        assert_eq!(m.state().sorted(), ["pump-01", "tank-01"]);

        assert!(!m.handle_click(None, true, &mut sink));
        assert!(m.handle_click(Some("tank-01"), true, &mut sink));
        assert_eq!(m.state().selected(), ["pump-01"]);

        assert!(m.handle_click(None, false, &mut sink));
        assert!(m.state().is_empty());
        assert!(!m.handle_click(None, false, &mut sink));
        assert_eq!(sink.len(), 4);
        assert_eq!(sink[3].description(), "Cleared selection");
    }

    #[test]
    fn reselecting_same_tag_is_silent() {
        let mut sink: Vec<SceneCommand> = Vec::new();
        let mut m = SelectionManager::new();
        m.handle_click(Some("a"), false, &mut sink);
        assert!(!m.handle_click(Some("a"), false, &mut sink));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn batch_dedupes_and_sorts() {
        let mut sink: Vec<SceneCommand> = Vec::new();
        let mut m = SelectionManager::new();
        m.select_batch(["c", "a", "c", "b"].map(String::from), &mut sink);
        assert_eq!(m.state().selected(), ["a", "b", "c"]);
        assert_eq!(
            sink,
            [SceneCommand::EquipmentSelect {
                before: Vec::new(),
                after: vec!["a".into(), "b".into(), "c".into()],
                description: "Selected 3 items".into(),
            }]
        );
    }

    #[test]
    fn hover_does_not_emit() {
        let mut m = SelectionManager::new();
        assert!(m.set_hovered(Some("a".into())));
        assert!(!m.set_hovered(Some("a".into())));
        assert_eq!(m.state().hovered.as_deref(), Some("a"));
    }
}
