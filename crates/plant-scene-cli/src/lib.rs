// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless plant scene runner.
//!
//! The `plant-scene` binary loads a plant document, drives the engine with a
//! manual frame scheduler and a counting render surface, and prints JSON
//! reports on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plant_app_core::document::{PlantDocument, SAMPLE_PLANT_JSON};
use plant_app_core::filter::{available_areas, available_sistemas};
use tracing_subscriber::EnvFilter;

pub mod prefs;
pub mod run;

pub use run::{run_scene, RunOptions, RunReport};

/// Command line of the `plant-scene` binary.
#[derive(Parser, Debug)]
#[command(name = "plant-scene", version, about = "Headless plant scene runner")]
pub struct Cli {
    /// Subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

/// `plant-scene` subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile a plant, run camera requests and report the result
    Run(RunOptions),
    /// Print the built-in sample plant document
    Sample,
    /// List the systems and areas present in a plant document
    Systems {
        /// Plant document (JSON); the built-in sample when omitted
        #[arg(long)]
        scene: Option<PathBuf>,
    },
    /// Inspect or clear saved scene preferences
    Prefs {
        /// Directory holding the preference files (platform default when omitted)
        #[arg(long, global = true)]
        config_dir: Option<PathBuf>,
        /// Action.
        #[command(subcommand)]
        action: prefs::PrefsAction,
    },
}

/// Parses the process arguments and runs the selected command.
pub fn entrypoint() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &mut out)
}

/// Runs `command`, writing its report to `out`.
pub fn execute(command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Run(opts) => {
            let report = run_scene(&opts)?;
            write_json(out, &report)
        }
        Commands::Sample => {
            out.write_all(SAMPLE_PLANT_JSON.as_bytes())?;
            Ok(())
        }
        Commands::Systems { scene } => {
            let doc = load_document(scene.as_deref())?;
            let listing = serde_json::json!({
                "sistemas": available_sistemas(&doc.equipment),
                "areas": available_areas(&doc.equipment),
            });
            write_json(out, &listing)
        }
        Commands::Prefs { config_dir, action } => {
            let output = prefs::execute(config_dir.as_deref(), &action)?;
            write_json(out, &output)
        }
    }
}

/// Loads the document at `path`, or the built-in sample.
pub fn load_document(path: Option<&Path>) -> Result<PlantDocument> {
    let Some(path) = path else {
        return PlantDocument::sample().context("built-in sample plant does not parse");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    PlantDocument::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
