//! Engine configuration (luma.toml)
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! default_duration_ms = 800
//! default_easing = "easeOutQuart"
//! scroll_threshold = 0.25
//!
//! [presets.shake]
//! duration_ms = 300
//! easing = "elastic"
//! properties = { transform = "translateX(12px)" }
//! ```

use crate::easing::Easing;
use crate::error::{AnimateError, Result};
use crate::presets::Preset;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine-wide defaults and unit rules
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimateConfig {
    /// Duration used when a tween gives none (or a non-positive one)
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: f64,
    /// Easing used when a tween names none
    #[serde(default = "default_easing")]
    pub default_easing: String,
    /// Unit appended to length-like values
    #[serde(default = "default_length_unit")]
    pub length_unit: String,
    /// Unit appended to angular composite channels
    #[serde(default = "default_angle_unit")]
    pub angle_unit: String,
    /// Property names containing any of these get the length unit
    #[serde(default = "default_length_properties")]
    pub length_properties: Vec<String>,
    /// Properties whose goals are function-call lists of channels
    #[serde(default = "default_composite_properties")]
    pub composite_properties: Vec<String>,
    /// Intersection threshold used by scroll triggers
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
    /// Extra named presets; these shadow built-ins of the same name
    #[serde(default)]
    pub presets: IndexMap<String, Preset>,
}

fn default_duration_ms() -> f64 {
    1000.0
}

fn default_easing() -> String {
    Easing::default().name().to_string()
}

fn default_length_unit() -> String {
    "px".to_string()
}

fn default_angle_unit() -> String {
    "deg".to_string()
}

fn default_length_properties() -> Vec<String> {
    [
        "width",
        "height",
        "top",
        "left",
        "right",
        "bottom",
        "margin",
        "padding",
        "fontSize",
        "borderRadius",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_composite_properties() -> Vec<String> {
    vec!["transform".to_string()]
}

fn default_scroll_threshold() -> f64 {
    0.1
}

/// Number text that reads back through the style parser; infinities use the
/// `Infinity` spelling
fn format_number(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else {
        value.to_string()
    }
}

/// False for zero, negatives and NaN
fn is_positive(value: f64) -> bool {
    value > 0.0
}

impl Default for AnimateConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            default_easing: default_easing(),
            length_unit: default_length_unit(),
            angle_unit: default_angle_unit(),
            length_properties: default_length_properties(),
            composite_properties: default_composite_properties(),
            scroll_threshold: default_scroll_threshold(),
            presets: IndexMap::new(),
        }
    }
}

impl AnimateConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.default_duration_ms) {
            return Err(AnimateError::InvalidConfig(format!(
                "default_duration_ms must be positive, got {}",
                self.default_duration_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.scroll_threshold) {
            return Err(AnimateError::InvalidConfig(format!(
                "scroll_threshold must be within 0..=1, got {}",
                self.scroll_threshold
            )));
        }
        if let Some((name, _)) = self
            .presets
            .iter()
            .find(|(_, preset)| !is_positive(preset.duration_ms))
        {
            return Err(AnimateError::InvalidConfig(format!(
                "preset `{name}` needs a positive duration_ms"
            )));
        }
        Ok(())
    }

    /// Resolved default easing (unknown names fall back to easeOutCubic)
    pub fn easing(&self) -> Easing {
        Easing::lookup(&self.default_easing)
    }

    pub fn is_composite(&self, property: &str) -> bool {
        self.composite_properties.iter().any(|p| p == property)
    }

    /// Format a plain property value, adding the length unit when the name
    /// matches the length family
    pub fn format_property(&self, property: &str, value: f64) -> String {
        if self
            .length_properties
            .iter()
            .any(|p| property.contains(p.as_str()))
        {
            format!("{}{}", format_number(value), self.length_unit)
        } else {
            format_number(value)
        }
    }

    /// Unit for a composite channel: length for translations, angle for
    /// rotations and skews, none for scales and anything else
    pub fn channel_unit(&self, channel: &str) -> &str {
        if channel.contains("scale") {
            ""
        } else if channel.contains("rotate") || channel.contains("skew") {
            &self.angle_unit
        } else if channel.contains("translate") {
            &self.length_unit
        } else {
            ""
        }
    }

    /// Join channel values into one composite write, e.g.
    /// `translateX(10px) rotate(45deg)`
    pub fn format_channels<'a, I>(&self, channels: I) -> String
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        channels
            .into_iter()
            .map(|(channel, value)| {
                format!(
                    "{channel}({}{})",
                    format_number(value),
                    self.channel_unit(channel)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AnimateConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnimateConfig::default());
        assert_eq!(config.easing(), Easing::EaseOutCubic);
        assert_eq!(config.scroll_threshold, 0.1);
    }

    #[test]
    fn test_partial_document() {
        let config = AnimateConfig::from_toml_str(
            r#"
            default_duration_ms = 800
            default_easing = "easeOutQuart"
            length_unit = "rem"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_duration_ms, 800.0);
        assert_eq!(config.easing(), Easing::EaseOutQuart);
        assert_eq!(config.format_property("width", 2.0), "2rem");
        assert_eq!(config.composite_properties, vec!["transform"]);
    }

    #[test]
    fn test_presets_from_toml() {
        let config = AnimateConfig::from_toml_str(
            r#"
            [presets.shake]
            duration_ms = 300
            easing = "elastic"
            properties = { transform = "translateX(12px)", opacity = 1 }
            "#,
        )
        .unwrap();

        let shake = &config.presets["shake"];
        assert_eq!(shake.duration_ms, 300.0);
        assert_eq!(shake.easing, "elastic");
        assert_eq!(shake.properties.len(), 2);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = AnimateConfig::from_toml_str("scroll_threshold = 1.5").unwrap_err();
        assert!(matches!(err, AnimateError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let err = AnimateConfig::from_toml_str("default_duration_ms = 0").unwrap_err();
        assert!(matches!(err, AnimateError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AnimateConfig::from_toml_str("default_easing = ").unwrap_err();
        assert!(matches!(err, AnimateError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AnimateConfig::load("/definitely/not/here/luma.toml").unwrap_err();
        assert!(matches!(err, AnimateError::Io(_)));
    }

    #[test]
    fn test_length_unit_inference() {
        let config = AnimateConfig::default();
        assert_eq!(config.format_property("width", 120.0), "120px");
        assert_eq!(config.format_property("marginTop", 4.0), "4px");
        assert_eq!(config.format_property("fontSize", 16.0), "16px");
        assert_eq!(config.format_property("opacity", 0.5), "0.5");
    }

    #[test]
    fn test_infinite_values_use_parser_spelling() {
        let config = AnimateConfig::default();
        assert_eq!(config.format_property("width", f64::INFINITY), "Infinitypx");
        assert_eq!(config.format_property("opacity", f64::NEG_INFINITY), "-Infinity");
        assert_eq!(config.format_property("opacity", f64::NAN), "NaN");
        assert_eq!(
            config.format_channels([("translateX", f64::INFINITY)]),
            "translateX(Infinitypx)"
        );
    }

    #[test]
    fn test_channel_units() {
        let config = AnimateConfig::default();
        assert_eq!(config.channel_unit("translateX"), "px");
        assert_eq!(config.channel_unit("rotate"), "deg");
        assert_eq!(config.channel_unit("skewY"), "deg");
        assert_eq!(config.channel_unit("scale"), "");
        assert_eq!(config.channel_unit("perspective"), "");
    }

    #[test]
    fn test_format_channels() {
        let config = AnimateConfig::default();
        let written = config.format_channels([("translateX", 100.0), ("rotate", 45.0), ("scale", 1.5)]);
        assert_eq!(written, "translateX(100px) rotate(45deg) scale(1.5)");
    }
}
