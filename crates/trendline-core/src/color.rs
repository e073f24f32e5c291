// File: crates/trendline-core/src/color.rs
// Summary: CSS color strings (hex, rgb(), rgba(), named colors) parsed into Skia colors.

use std::str::FromStr;

use serde::Deserialize;
use skia_safe as skia;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("unsupported color syntax: {0:?}")]
    Syntax(String),
    #[error("color component out of range in {0:?}")]
    Component(String),
}

/// Color as written in configuration, e.g. `"#3b82f6"` or `"rgba(0,0,0,0.3)"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CssColor(pub skia::Color);

impl CssColor {
    pub const TRANSPARENT: Self = Self(skia::Color::TRANSPARENT);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(skia::Color::from_argb(a, r, g, b))
    }

    pub fn color(self) -> skia::Color {
        self.0
    }

    pub fn is_transparent(self) -> bool {
        self.0.a() == 0
    }
}

impl From<skia::Color> for CssColor {
    fn from(c: skia::Color) -> Self {
        Self(c)
    }
}

impl TryFrom<String> for CssColor {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for CssColor {
    type Err = ColorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim().to_ascii_lowercase();
        if s == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(&(_, rgb)) = NAMED.iter().find(|(name, _)| *name == s) {
            let [_, r, g, b] = rgb.to_be_bytes();
            return Ok(Self::from_argb(255, r, g, b));
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::Syntax(raw.to_string()));
        }
        let (body, has_alpha) = if let Some(b) = s.strip_prefix("rgba(") {
            (b, true)
        } else if let Some(b) = s.strip_prefix("rgb(") {
            (b, false)
        } else {
            return Err(ColorParseError::Syntax(raw.to_string()));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::Syntax(raw.to_string()))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(ColorParseError::Syntax(raw.to_string()));
        }

        let channel = |p: &str| -> Result<u8, ColorParseError> {
            let v: f64 = p.parse().map_err(|_| ColorParseError::Syntax(raw.to_string()))?;
            if !(0.0..=255.0).contains(&v) {
                return Err(ColorParseError::Component(raw.to_string()));
            }
            Ok(v.round() as u8)
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = if has_alpha {
            let v: f64 = parts[3].parse().map_err(|_| ColorParseError::Syntax(raw.to_string()))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(ColorParseError::Component(raw.to_string()));
            }
            (v * 255.0).round() as u8
        } else {
            255
        };
        Ok(Self::from_argb(a, r, g, b))
    }
}

/// CSS basic color keywords plus the few extended ones charts commonly use.
const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("silver", 0xc0c0c0),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("white", 0xffffff),
    ("maroon", 0x800000),
    ("red", 0xff0000),
    ("purple", 0x800080),
    ("fuchsia", 0xff00ff),
    ("magenta", 0xff00ff),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("olive", 0x808000),
    ("yellow", 0xffff00),
    ("navy", 0x000080),
    ("blue", 0x0000ff),
    ("teal", 0x008080),
    ("aqua", 0x00ffff),
    ("cyan", 0x00ffff),
    ("orange", 0xffa500),
    ("pink", 0xffc0cb),
    ("brown", 0xa52a2a),
    ("lightgray", 0xd3d3d3),
    ("lightgrey", 0xd3d3d3),
    ("darkgray", 0xa9a9a9),
    ("darkgrey", 0xa9a9a9),
];

fn parse_hex(hex: &str) -> Option<CssColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(CssColor::from_argb(255, nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(CssColor::from_argb(255, byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(CssColor::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}
