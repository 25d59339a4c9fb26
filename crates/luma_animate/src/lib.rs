//! LumaAnimate
//!
//! Declarative tweening for style-bearing targets.
//!
//! # Features
//!
//! - **Easing Table**: 24 named curves mapping linear progress to eased progress
//! - **Tweens**: interpolate numeric properties and composite transforms
//! - **Timelines**: start, pause and kill a group of tweens together
//! - **Scroll Triggers**: start a tween when its target scrolls into view
//! - **Presets**: named entry/exit animations, extendable from `luma.toml`

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod presets;
pub mod scroll_trigger;
pub mod timeline;
pub mod tween;
pub mod value;

pub use animator::Animator;
pub use config::AnimateConfig;
pub use easing::Easing;
pub use error::{AnimateError, Result};
pub use presets::{AnimationPreset, Preset};
pub use scroll_trigger::{ScrollTrigger, ScrollTriggerOptions};
pub use timeline::{Timeline, TimelineOptions};
pub use tween::{Interpolation, PlanKey, PlayState, Tween, TweenOptions};
pub use value::{Properties, PropertyValue};
