// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linear RGB color with hex helpers.

use serde::{Deserialize, Serialize};

use crate::SceneError;

/// RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Neutral gray used when a record carries no usable color.
    pub const FALLBACK: Self = Self::from_hex(0x808080);

    /// Builds a color from channel values (clamped to `[0, 1]`).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packs the color back into `0xRRGGBB`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hex(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    /// Parses `#rrggbb` or `rrggbb` (also the short `#rgb` form).
    pub fn parse_hex(s: &str) -> Result<Self, SceneError> {
        let digits = s.trim().trim_start_matches('#');
        let invalid = || SceneError::InvalidColor(s.to_owned());
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return Err(invalid()),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Self::from_hex)
            .map_err(|_| invalid())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_for_known_values() {
        assert_eq!(Color::from_hex(0xDA70D6).to_hex(), 0xDA70D6);
        assert_eq!(Color::parse_hex("#4FC3F7").unwrap().to_hex(), 0x4FC3F7);
        assert_eq!(Color::parse_hex("fff").unwrap().to_hex(), 0xFFFFFF);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Color::parse_hex("#12").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
    }
}
