// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `plant-scene` entrypoint.

fn main() -> anyhow::Result<()> {
    plant_scene_cli::entrypoint()
}
