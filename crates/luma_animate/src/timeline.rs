//! Parallel tween groups
//!
//! A [`Timeline`] collects tweens and plays, pauses or kills them together.
//! Every member runs with its own delay and duration; there are no offsets
//! and no sequencing between members.

use crate::animator::Animator;
use crate::tween::{Tween, TweenOptions};
use crate::value::Properties;
use luma_core::TargetRef;
use tracing::debug;

/// Options for a timeline
#[derive(Clone, Debug, Default)]
pub struct TimelineOptions {
    /// Name shown in diagnostics
    pub label: Option<String>,
}

impl TimelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered group of tweens controlled together
pub struct Timeline {
    animator: Animator,
    options: TimelineOptions,
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new(animator: Animator, options: TimelineOptions) -> Self {
        Self {
            animator,
            options,
            tweens: Vec::new(),
        }
    }

    /// Add a tween toward `properties`
    pub fn to(
        &mut self,
        target: TargetRef,
        properties: &Properties,
        options: TweenOptions,
    ) -> &mut Self {
        let tween = self.animator.create_tween(target, properties, options);
        self.tweens.push(tween);
        self
    }

    /// Add a tween from `properties` back to the current values
    pub fn from(
        &mut self,
        target: TargetRef,
        properties: &Properties,
        options: TweenOptions,
    ) -> &mut Self {
        let tween = self.animator.create_reversed_tween(target, properties, options);
        self.tweens.push(tween);
        self
    }

    pub fn play(&self) -> &Self {
        debug!(timeline = self.label(), tweens = self.tweens.len(), "timeline play");
        for tween in &self.tweens {
            tween.start();
        }
        self
    }

    pub fn pause(&self) -> &Self {
        debug!(timeline = self.label(), "timeline pause");
        for tween in &self.tweens {
            tween.pause();
        }
        self
    }

    pub fn kill(&self) -> &Self {
        debug!(timeline = self.label(), "timeline kill");
        for tween in &self.tweens {
            tween.kill();
        }
        self
    }

    /// Members in insertion order
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn label(&self) -> &str {
        self.options.label.as_deref().unwrap_or("timeline")
    }
}
