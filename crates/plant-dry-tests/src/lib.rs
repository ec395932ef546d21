// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for plant scene crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`commands`] - Command sink that records what it is given
//! - [`observer`] - Scene observer that records commits and framing completions
//! - [`geometry`] - Geometry factory with fixed, predictable shapes
//! - [`fixtures`] - The sample plant and small equipment builders

pub mod commands;
pub mod config;
pub mod fixtures;
pub mod geometry;
pub mod observer;

pub use commands::RecordingSink;
pub use config::InMemoryConfigStore;
pub use fixtures::{boxes_in_a_row, item, sample_plant, tank};
pub use geometry::FixedGeometryFactory;
pub use observer::{Commit, RecordingObserver};
