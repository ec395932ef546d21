// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Layer visibility manager.

use plant_scene_port::{default_layers, CommandSink, LayerState, SceneCommand, SceneError};

/// Owns the layer list handed to the engine.
#[derive(Debug, Clone)]
pub struct LayerManager {
    layers: Vec<LayerState>,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new(default_layers())
    }
}

impl LayerManager {
    /// Manager over `layers`.
    pub const fn new(layers: Vec<LayerState>) -> Self {
        Self { layers }
    }

    /// Current layers.
    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    /// Flips `layer_id` and records the change. Returns the new visibility.
    pub fn toggle<S: CommandSink>(&mut self, layer_id: &str, sink: &mut S) -> Result<bool, SceneError> {
        let visible = !self.layer(layer_id)?.is_visible;
        self.set_visible(layer_id, visible, sink)?;
        Ok(visible)
    }

    /// Sets `layer_id` visibility, recording a command only on change.
    pub fn set_visible<S: CommandSink>(
        &mut self,
        layer_id: &str,
        visible: bool,
        sink: &mut S,
    ) -> Result<bool, SceneError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| SceneError::UnknownLayer(layer_id.to_owned()))?;
        if layer.is_visible == visible {
            return Ok(false);
        }
        let before = layer.is_visible;
        layer.is_visible = visible;
        let verb = if visible { "Showed" } else { "Hid" };
        sink.execute_command(SceneCommand::LayerVisibility {
            layer_id: layer_id.to_owned(),
            before,
            after: visible,
            description: format!("{verb} layer {}", layer.name),
        });
        Ok(true)
    }

    /// Applies a visibility restored by the host's undo stack. No command is emitted.
    pub fn restore(&mut self, layer_id: &str, visible: bool) -> Result<(), SceneError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| SceneError::UnknownLayer(layer_id.to_owned()))?;
        layer.is_visible = visible;
        Ok(())
    }

    fn layer(&self, layer_id: &str) -> Result<&LayerState, SceneError> {
        self.layers
            .iter()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| SceneError::UnknownLayer(layer_id.to_owned()))
    }
}
