use crate::color::lighten_color;
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};

/// How much the accent color is lightened to derive the transition color.
const TRANSITION_LIGHTEN_PERCENT: u8 = 60;

/// The options a reveal effect can be customized with.
///
/// Every field is optional: anything left out takes its default value when resolved.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct RevealOptions {
    /// The color characters flash with when they appear.
    pub accent_color: Option<String>,

    /// The color characters settle on.
    pub final_color: Option<String>,

    /// The intermediate color between the accent and final ones.
    ///
    /// Derived from the accent color when not set or empty.
    pub transition_color: Option<String>,

    /// The delay between consecutive characters appearing, in milliseconds.
    pub reveal_delay: Option<u64>,

    /// How long opacity changes take, in milliseconds.
    pub fade_duration: Option<u64>,

    /// How long a character stays in the transition color, in milliseconds.
    pub color_delay: Option<u64>,

    /// How long a character stays in the accent color, in milliseconds.
    pub flash_delay: Option<u64>,

    /// Whether to animate again every time the text comes back into view.
    pub replay: Option<bool>,

    /// Whether replays hide and reveal characters again rather than only flashing their colors.
    pub reveal_on_replay: Option<bool>,

    /// The fraction of the element that needs to be in view for it to count as visible.
    pub threshold: Option<f64>,
}

impl RevealOptions {
    /// Parse options from a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Merge another set of options on top of these ones.
    ///
    /// Any option set in `overrides` wins.
    pub fn merge(self, overrides: RevealOptions) -> Self {
        Self {
            accent_color: overrides.accent_color.or(self.accent_color),
            final_color: overrides.final_color.or(self.final_color),
            transition_color: overrides.transition_color.or(self.transition_color),
            reveal_delay: overrides.reveal_delay.or(self.reveal_delay),
            fade_duration: overrides.fade_duration.or(self.fade_duration),
            color_delay: overrides.color_delay.or(self.color_delay),
            flash_delay: overrides.flash_delay.or(self.flash_delay),
            replay: overrides.replay.or(self.replay),
            reveal_on_replay: overrides.reveal_on_replay.or(self.reveal_on_replay),
            threshold: overrides.threshold.or(self.threshold),
        }
    }

    /// Resolve these options into a full configuration.
    pub fn resolve(&self) -> RevealConfig {
        let accent_color = self.accent_color.clone().unwrap_or_else(|| RevealConfig::DEFAULT_ACCENT_COLOR.into());
        let transition_color = match self.transition_color.as_deref() {
            Some(color) if !color.is_empty() => color.to_string(),
            _ => derive_transition_color(&accent_color),
        };
        let millis = |value: Option<u64>, default: u64| Duration::from_millis(value.unwrap_or(default));
        RevealConfig {
            final_color: self.final_color.clone().unwrap_or_else(|| RevealConfig::DEFAULT_FINAL_COLOR.into()),
            transition_color,
            accent_color,
            reveal_delay: millis(self.reveal_delay, 40),
            fade_duration: millis(self.fade_duration, 350),
            color_delay: millis(self.color_delay, 300),
            flash_delay: millis(self.flash_delay, 150),
            replay: self.replay.unwrap_or(true),
            reveal_on_replay: self.reveal_on_replay.unwrap_or(true),
            threshold: self.threshold.unwrap_or(0.4),
        }
    }
}

fn derive_transition_color(accent_color: &str) -> String {
    match lighten_color(accent_color, TRANSITION_LIGHTEN_PERCENT) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("cannot derive transition color: {e}; using accent color instead");
            accent_color.to_string()
        }
    }
}

/// A fully resolved reveal effect configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub accent_color: String,
    pub final_color: String,
    pub transition_color: String,
    pub reveal_delay: Duration,
    pub fade_duration: Duration,
    pub color_delay: Duration,
    pub flash_delay: Duration,
    pub replay: bool,
    pub reveal_on_replay: bool,
    pub threshold: f64,
}

impl RevealConfig {
    pub const DEFAULT_ACCENT_COLOR: &'static str = "#ff7a00";
    pub const DEFAULT_FINAL_COLOR: &'static str = "#000";
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealOptions::default().resolve()
    }
}

/// An error loading reveal options.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] serde_yaml::Error),
}
