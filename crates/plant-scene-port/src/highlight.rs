// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outline styles for selection and hover feedback.

use crate::color::Color;

/// Default visible-edge color of the outline pass.
pub const VISIBLE_EDGE_COLOR: Color = Color::from_hex(0xffffff);
/// Default hidden-edge color of the outline pass.
pub const HIDDEN_EDGE_COLOR: Color = Color::from_hex(0x190a05);

/// Which preset the outline effect is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutlineStyle {
    /// Nothing outlined.
    #[default]
    None,
    /// Hovered object only.
    Hover,
    /// Selected set (plus hovered object).
    Selected,
}

/// Edge parameters of the outline effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineParams {
    /// Visible edge color.
    pub color: Color,
    /// Edge strength.
    pub edge_strength: f32,
    /// Edge thickness.
    pub edge_thickness: f32,
    /// Edge glow.
    pub edge_glow: f32,
    /// Pulse period (always 0: no pulsing).
    pub pulse_period: f32,
}

impl OutlineStyle {
    /// The fixed parameter bundle for this style.
    pub const fn params(self) -> OutlineParams {
        match self {
            Self::Selected => OutlineParams {
                color: Color::from_hex(0x0000ff),
                edge_strength: 10.0,
                edge_thickness: 2.0,
                edge_glow: 0.7,
                pulse_period: 0.0,
            },
            Self::Hover => OutlineParams {
                color: Color::from_hex(0x87cefa),
                edge_strength: 7.0,
                edge_thickness: 1.5,
                edge_glow: 0.5,
                pulse_period: 0.0,
            },
            Self::None => OutlineParams {
                color: VISIBLE_EDGE_COLOR,
                edge_strength: 0.0,
                edge_thickness: 0.0,
                edge_glow: 0.0,
                pulse_period: 0.0,
            },
        }
    }
}
