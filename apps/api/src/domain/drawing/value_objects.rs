use super::entity::{DictOfVars, STROKE_COLOR_KEY};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Stroke color assumed when the client does not send one.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Luminance above which a stroke counts as light, scaled by 1000 so the
/// comparison stays in integers.
const LIGHT_LUMINANCE_THRESHOLD_MILLI: u32 = 186_000;

const MAX_SPECIFIER_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("unknown color specifier: {0:?}")]
    Unknown(String),
    #[error("color specifier is too long")]
    TooLong,
    #[error("unknown color specifier: {0}")]
    NotAString(String),
}

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    fn weighted_milli(self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    /// Perceived brightness on a 0-255 scale (`0.299 R + 0.587 G + 0.114 B`).
    pub fn luminance(self) -> f64 {
        self.weighted_milli() as f64 / 1000.0
    }

    /// Strictly brighter than 186. A luminance of exactly 186 is dark.
    pub fn is_light(self) -> bool {
        self.weighted_milli() > LIGHT_LUMINANCE_THRESHOLD_MILLI
    }

    /// Black behind light strokes, white behind everything else.
    pub fn contrasting_background(self) -> Rgb {
        if self.is_light() { Rgb::BLACK } else { Rgb::WHITE }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts CSS color keywords, `#rgb[a]`, `#rrggbb[aa]`, `rgb()`,
    /// `rgba()`, `hsl()` and `hsv()`/`hsb()`. Matching is case-insensitive,
    /// channels outside their range are clamped and alpha is dropped.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.len() > MAX_SPECIFIER_LEN {
            return Err(ColorParseError::TooLong);
        }
        let css = match spec.get(..4) {
            Some(func) if func.eq_ignore_ascii_case("hsb(") => format!("hsv({}", &spec[4..]),
            _ => spec.to_string(),
        };
        let color = css
            .parse::<csscolorparser::Color>()
            .map_err(|_| ColorParseError::Unknown(spec.to_string()))?;
        let [r, g, b, _] = color.to_rgba8();
        Ok(Rgb::new(r, g, b))
    }
}

/// Stroke color of a drawing and the background chosen to contrast with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub stroke: Rgb,
    pub background: Rgb,
}

impl Palette {
    pub fn for_stroke(stroke: Rgb) -> Self {
        Self {
            stroke,
            background: stroke.contrasting_background(),
        }
    }

    /// Reads `strokeColor` from the client variables, falling back to black.
    pub fn from_vars(vars: &DictOfVars) -> Result<Self, ColorParseError> {
        let stroke = match vars.get(STROKE_COLOR_KEY) {
            None => DEFAULT_STROKE_COLOR.parse()?,
            Some(serde_json::Value::String(spec)) => spec.parse()?,
            Some(other) => return Err(ColorParseError::NotAString(other.to_string())),
        };
        Ok(Self::for_stroke(stroke))
    }
}
