// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `plant-scene prefs` subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use plant_app_core::config::ConfigService;
use plant_app_core::prefs::{ScenePrefs, SCENE_PREFS_KEY};
use plant_config_fs::FsConfigStore;
use plant_scene_port::ColorMode;
use serde::Serialize;
use tracing::info;

/// What to do with the stored preferences.
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Print the stored preferences (defaults when nothing is stored)
    Show,
    /// Change the stored color mode or hidden layers
    Set {
        /// Color mode (equipment, product, operational-state)
        #[arg(long)]
        color_mode: Option<ColorMode>,
        /// Layer id to hide (repeatable); replaces the stored list
        #[arg(long = "hide-layer")]
        hide_layers: Vec<String>,
    },
    /// Delete the stored preferences
    Reset,
}

/// What `plant-scene prefs` prints.
///
/// Serialized straight from the stored `f32` fields, so poses print exactly as
/// `plant-scene run` reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrefsOutput {
    /// Current preferences.
    Prefs(ScenePrefs),
    /// Outcome of `prefs reset`.
    Reset {
        /// Always `true`.
        reset: bool,
    },
}

/// Opens the preference store under `dir`, or the platform config directory.
pub fn open(dir: Option<&Path>) -> Result<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::with_base(dir)
            .with_context(|| format!("cannot use config dir {}", dir.display()))?,
        None => FsConfigStore::new().context("cannot resolve platform config dir")?,
    };
    Ok(ConfigService::new(store))
}

/// Runs `action` and returns what to print.
pub fn execute(dir: Option<&Path>, action: &PrefsAction) -> Result<PrefsOutput> {
    let service = open(dir)?;
    match action {
        PrefsAction::Show => {
            let prefs: ScenePrefs = service.load_or_default(SCENE_PREFS_KEY)?;
            Ok(PrefsOutput::Prefs(prefs))
        }
        PrefsAction::Set {
            color_mode,
            hide_layers,
        } => {
            let prefs = service.update(SCENE_PREFS_KEY, |p: &mut ScenePrefs| {
                if let Some(mode) = color_mode {
                    p.color_mode = *mode;
                }
                if !hide_layers.is_empty() {
                    p.hidden_layers.clone_from(hide_layers);
                }
            })?;
            info!(dir = %service.store().base().display(), "scene prefs saved");
            Ok(PrefsOutput::Prefs(prefs))
        }
        PrefsAction::Reset => {
            service.reset(SCENE_PREFS_KEY)?;
            info!(dir = %service.store().base().display(), "scene prefs cleared");
            Ok(PrefsOutput::Reset { reset: true })
        }
    }
}
