//! Engine entry point
//!
//! [`Animator`] bundles the frame scheduler, the visibility observer and the
//! configuration, and builds every tween, timeline and scroll trigger.
//!
//! ```
//! use luma_animate::{Animator, Properties, TweenOptions};
//! use luma_core::{Element, FrameLoop, IntersectionHub, TargetRef};
//! use std::rc::Rc;
//!
//! let frames = FrameLoop::new();
//! let animator = Animator::new(Rc::new(frames.clone()), Rc::new(IntersectionHub::new()));
//!
//! let element = Rc::new(Element::new("hero"));
//! let target: TargetRef = element.clone();
//! animator.to(target, &Properties::new().with("opacity", 1.0), TweenOptions::new().duration(500.0));
//!
//! frames.tick(0.0);
//! frames.tick(500.0);
//! assert_eq!(element.style("opacity").as_deref(), Some("1"));
//! ```

use crate::config::AnimateConfig;
use crate::easing::Easing;
use crate::presets::{AnimationPreset, Preset};
use crate::scroll_trigger::{ScrollTrigger, ScrollTriggerOptions};
use crate::timeline::{Timeline, TimelineOptions};
use crate::tween::{Tween, TweenOptions};
use crate::value::Properties;
use luma_core::{FrameScheduler, TargetRef, VisibilityObserver};
use std::rc::Rc;
use tracing::warn;

/// Factory for tweens, timelines and scroll triggers
#[derive(Clone)]
pub struct Animator {
    scheduler: Rc<dyn FrameScheduler>,
    observer: Rc<dyn VisibilityObserver>,
    config: Rc<AnimateConfig>,
}

impl Animator {
    /// Create an animator with the default configuration
    pub fn new(scheduler: Rc<dyn FrameScheduler>, observer: Rc<dyn VisibilityObserver>) -> Self {
        Self::with_config(scheduler, observer, AnimateConfig::default())
    }

    pub fn with_config(
        scheduler: Rc<dyn FrameScheduler>,
        observer: Rc<dyn VisibilityObserver>,
        config: AnimateConfig,
    ) -> Self {
        Self {
            scheduler,
            observer,
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &AnimateConfig {
        &self.config
    }

    /// Build an idle tween toward `properties`
    pub fn create_tween(
        &self,
        target: TargetRef,
        properties: &Properties,
        options: TweenOptions,
    ) -> Tween {
        Tween::new(
            target,
            properties,
            options,
            self.scheduler.clone(),
            self.config.clone(),
        )
    }

    /// Build an idle tween that plays from `properties` back to the values
    /// the target has now
    pub fn create_reversed_tween(
        &self,
        target: TargetRef,
        properties: &Properties,
        options: TweenOptions,
    ) -> Tween {
        let tween = self.create_tween(target, properties, options);
        tween.reverse();
        tween
    }

    pub fn create_timeline(&self, options: TimelineOptions) -> Timeline {
        Timeline::new(self.clone(), options)
    }

    /// Subscribe a scroll trigger at the configured threshold
    pub fn create_scroll_trigger(
        &self,
        target: TargetRef,
        options: ScrollTriggerOptions,
    ) -> ScrollTrigger {
        ScrollTrigger::new(
            target,
            options,
            self.observer.as_ref(),
            self.config.scroll_threshold,
        )
    }

    /// Build and start a tween
    pub fn to(&self, target: TargetRef, properties: &Properties, options: TweenOptions) -> Tween {
        let tween = self.create_tween(target, properties, options);
        tween.start();
        tween
    }

    /// Build and start a reversed tween
    pub fn from(&self, target: TargetRef, properties: &Properties, options: TweenOptions) -> Tween {
        let tween = self.create_reversed_tween(target, properties, options);
        tween.start();
        tween
    }

    /// Start a named preset on `target`.
    ///
    /// The preset supplies duration and easing unless `options` sets them.
    /// Unknown names log a warning and return `None`.
    pub fn animate(&self, target: TargetRef, name: &str, mut options: TweenOptions) -> Option<Tween> {
        let Some(preset) = self.preset(name) else {
            warn!(preset = name, "unknown animation preset");
            return None;
        };

        options.duration_ms.get_or_insert(preset.duration_ms);
        options.easing.get_or_insert(preset.easing);

        Some(self.to(target, &preset.properties, options))
    }

    /// Configured presets first, then built-ins
    pub fn preset(&self, name: &str) -> Option<Preset> {
        self.config
            .presets
            .get(name)
            .cloned()
            .or_else(|| AnimationPreset::by_name(name))
    }

    /// Every preset name, configured ones after the built-ins
    pub fn presets(&self) -> Vec<String> {
        let mut names: Vec<String> = AnimationPreset::NAMES.iter().map(|n| n.to_string()).collect();
        for name in self.config.presets.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// The easing registry
    pub fn easings(&self) -> &'static [Easing] {
        &Easing::ALL
    }
}
