use std::{fmt, str::FromStr};

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color, either in its `#rrggbb` or `#rgb` form. The leading `#` is optional.
    pub fn from_hex(input: &str) -> Result<Self, ParseColorError> {
        let digits = input.trim().trim_start_matches('#');
        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ParseColorError::InvalidLength(input.to_string())),
        };
        let bytes = hex::decode(&expanded).map_err(|_| ParseColorError::InvalidHex(input.to_string()))?;
        match bytes.as_slice() {
            &[r, g, b] => Ok(Self::new(r, g, b)),
            _ => Err(ParseColorError::InvalidLength(input.to_string())),
        }
    }

    /// Blend this color towards white by the given percentage.
    ///
    /// Each channel becomes `old + (255 - old) * percent / 100`, rounded to the nearest integer
    /// with ties going towards the original channel value. This means 50% over black yields
    /// `#7f7f7f` and white is left untouched regardless of the percentage.
    pub fn lighten(self, percent: u8) -> Self {
        let percent = u32::from(percent);
        let lighten = |channel: u8| {
            let channel = u32::from(channel);
            let scaled = channel * 100 + (255 - channel) * percent;
            ((scaled + 49) / 100).min(255) as u8
        };
        Self::new(lighten(self.r), lighten(self.g), lighten(self.b))
    }

    /// Linearly interpolate between this color and `other`.
    ///
    /// `ratio` is clamped to `[0, 1]`, where 0 is `self` and 1 is `other`.
    pub fn blend(self, other: Color, ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * ratio).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Format this color as `#rrggbb`.
    pub fn as_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::from_hex(input)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

/// Lighten a hex color string by blending it towards white.
///
/// See [Color::lighten] for the exact rounding rules.
pub fn lighten_color(hex: &str, percent: u8) -> Result<String, ParseColorError> {
    let color = Color::from_hex(hex)?;
    Ok(color.lighten(percent).as_hex())
}

/// An error when parsing a color.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("invalid hex digits in color '{0}'")]
    InvalidHex(String),

    #[error("color '{0}' must have 3 or 6 hex digits")]
    InvalidLength(String),
}
