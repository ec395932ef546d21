// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for plant scene hosts.
//! Keeps UI/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod document;
pub mod filter;
pub mod history;
pub mod layers;
pub mod prefs;
pub mod repository;
pub mod selection;
