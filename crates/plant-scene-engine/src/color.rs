// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference color resolver.

use plant_scene_port::{Color, ColorMode, ColorResolver, EquipmentItem};
use tracing::warn;

/// Product value that never maps to a color.
pub const PRODUCT_NOT_APPLICABLE: &str = "Não aplicável";

/// Colors equipment by base color, operational state or product code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColorResolver;

/// `0`-`9` map to 0-9, letters (any case) to 10-35, anything else to 0.
fn code_value(c: char) -> f32 {
    c.to_digit(36).map_or(0.0, |v| v as f32)
}

fn base_color(item: &EquipmentItem) -> Color {
    Color::parse_hex(&item.color).unwrap_or_else(|err| {
        warn!(tag = %item.tag, %err, "unparseable base color; using fallback");
        Color::FALLBACK
    })
}

fn product_color(product: &str) -> Option<Color> {
    if product == PRODUCT_NOT_APPLICABLE {
        return None;
    }
    let mut chars = product.chars();
    let (r, g, b) = (chars.next()?, chars.next()?, chars.next()?);
    Some(Color::rgb(
        code_value(r) / 35.0,
        code_value(g) / 35.0,
        code_value(b) / 35.0,
    ))
}

fn state_color(state: &str) -> Option<Color> {
    match state {
        "operando" => Some(Color::from_hex(0xff0000)),
        "não operando" => Some(Color::from_hex(0x00ff00)),
        "manutenção" => Some(Color::from_hex(0xffff00)),
        "em falha" => Some(Color::from_hex(0xda70d6)),
        _ => None,
    }
}

impl ColorResolver for DefaultColorResolver {
    fn color_for(&self, item: &EquipmentItem, mode: ColorMode) -> Color {
        let derived = match mode {
            ColorMode::Product => item.product.as_deref().and_then(product_color),
            ColorMode::OperationalState => item.operational_state.as_deref().and_then(state_color),
            ColorMode::Equipment => None,
        };
        derived.unwrap_or_else(|| base_color(item))
    }
}
