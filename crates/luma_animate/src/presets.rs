//! Animation presets for common entry/exit animations
//!
//! Named bundles of property goals plus timing. Presets are plain data: the
//! [`Animator`](crate::Animator) turns one into a started tween, letting the
//! caller's options override the preset's duration and easing.

use crate::value::Properties;
use serde::{Deserialize, Serialize};

/// A named bundle of goals and timing
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Preset {
    #[serde(default)]
    pub properties: Properties,
    #[serde(default = "default_preset_duration_ms")]
    pub duration_ms: f64,
    #[serde(default = "default_preset_easing")]
    pub easing: String,
}

fn default_preset_duration_ms() -> f64 {
    600.0
}

fn default_preset_easing() -> String {
    "easeOutCubic".to_string()
}

impl Preset {
    pub fn new(properties: Properties, duration_ms: f64, easing: impl Into<String>) -> Self {
        Self {
            properties,
            duration_ms,
            easing: easing.into(),
        }
    }
}

/// Pre-built presets
pub struct AnimationPreset;

impl AnimationPreset {
    /// Names of all built-in presets
    pub const NAMES: [&'static str; 11] = [
        "fadeIn",
        "fadeOut",
        "slideInLeft",
        "slideInRight",
        "slideInUp",
        "slideInDown",
        "zoomIn",
        "zoomOut",
        "rotateIn",
        "bounce",
        "pulse",
    ];

    /// Look up a built-in preset by name
    pub fn by_name(name: &str) -> Option<Preset> {
        let preset = match name {
            "fadeIn" => Self::fade_in(),
            "fadeOut" => Self::fade_out(),
            "slideInLeft" | "slideInRight" => Self::slide_in_horizontal(),
            "slideInUp" | "slideInDown" => Self::slide_in_vertical(),
            "zoomIn" => Self::zoom_in(),
            "zoomOut" => Self::zoom_out(),
            "rotateIn" => Self::rotate_in(),
            "bounce" => Self::bounce(),
            "pulse" => Self::pulse(),
            _ => return None,
        };
        Some(preset)
    }

    // ========================================================================
    // Fade
    // ========================================================================

    pub fn fade_in() -> Preset {
        Preset::new(Properties::new().with("opacity", 1.0), 600.0, "easeOutCubic")
    }

    pub fn fade_out() -> Preset {
        Preset::new(Properties::new().with("opacity", 0.0), 600.0, "easeOutCubic")
    }

    // ========================================================================
    // Slide
    // ========================================================================

    /// Slide back to the resting X position (used by slideInLeft/Right)
    pub fn slide_in_horizontal() -> Preset {
        Preset::new(
            Properties::new()
                .with("transform", "translateX(0)")
                .with("opacity", 1.0),
            800.0,
            "easeOutCubic",
        )
    }

    /// Slide back to the resting Y position (used by slideInUp/Down)
    pub fn slide_in_vertical() -> Preset {
        Preset::new(
            Properties::new()
                .with("transform", "translateY(0)")
                .with("opacity", 1.0),
            800.0,
            "easeOutCubic",
        )
    }

    // ========================================================================
    // Zoom and rotate
    // ========================================================================

    pub fn zoom_in() -> Preset {
        Preset::new(
            Properties::new()
                .with("transform", "scale(1)")
                .with("opacity", 1.0),
            600.0,
            "easeOutBack",
        )
    }

    pub fn zoom_out() -> Preset {
        Preset::new(
            Properties::new()
                .with("transform", "scale(0)")
                .with("opacity", 0.0),
            600.0,
            "easeInBack",
        )
    }

    pub fn rotate_in() -> Preset {
        Preset::new(
            Properties::new()
                .with("transform", "rotate(0deg)")
                .with("opacity", 1.0),
            800.0,
            "easeOutBack",
        )
    }

    // ========================================================================
    // Attention
    // ========================================================================

    pub fn bounce() -> Preset {
        Preset::new(
            Properties::new().with("transform", "translateY(0)"),
            1000.0,
            "bounce",
        )
    }

    pub fn pulse() -> Preset {
        Preset::new(
            Properties::new().with("transform", "scale(1.05)"),
            400.0,
            "easeInOutQuad",
        )
    }
}
