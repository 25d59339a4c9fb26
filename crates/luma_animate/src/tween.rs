//! Single-target tweens
//!
//! A [`Tween`] captures start and end values for every goal when it is
//! built, then interpolates between them on each display frame until raw
//! progress reaches 1.
//!
//! ```text
//!            start()          delay fires        progress == 1
//!   Idle ───────────▶ Scheduled ──────────▶ Running ──────────▶ Completed
//!                        │                    │
//!                        └── pause()/kill() ──┴──▶ Paused / Killed
//! ```
//!
//! Paused, killed and completed tweens can all be started again. A restart
//! re-applies the full delay and plays from the captured start values, so
//! progress made before a pause is lost.

use crate::config::AnimateConfig;
use crate::easing::Easing;
use crate::value::{composite_channels, resolve_goal, Properties};
use indexmap::IndexMap;
use luma_core::scheduler::{FrameHandle, FrameScheduler, TimerHandle};
use luma_core::TargetRef;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Called with eased progress after every frame's writes
pub type UpdateCallback = Box<dyn FnMut(f64)>;

/// Called once when a run reaches the end
pub type CompleteCallback = Box<dyn FnMut()>;

/// Per-tween timing and callbacks
#[derive(Default)]
pub struct TweenOptions {
    /// Milliseconds; absent, zero or negative uses the configured default
    pub duration_ms: Option<f64>,
    /// Milliseconds to wait after `start()` before the first frame
    pub delay_ms: f64,
    /// Easing registry name; absent uses the configured default
    pub easing: Option<String>,
    pub on_update: Option<UpdateCallback>,
    pub on_complete: Option<CompleteCallback>,
}

impl TweenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, name: impl Into<String>) -> Self {
        self.easing = Some(name.into());
        self
    }

    pub fn on_update<F: FnMut(f64) + 'static>(mut self, callback: F) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_complete<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for TweenOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenOptions")
            .field("duration_ms", &self.duration_ms)
            .field("delay_ms", &self.delay_ms)
            .field("easing", &self.easing)
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Identifies one interpolated value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlanKey {
    /// A plain property written on its own
    Property(String),
    /// One channel of a composite property, merged into a single write
    Channel { bundle: String, channel: String },
}

impl PlanKey {
    pub fn property(name: impl Into<String>) -> Self {
        PlanKey::Property(name.into())
    }

    pub fn channel(bundle: impl Into<String>, channel: impl Into<String>) -> Self {
        PlanKey::Channel {
            bundle: bundle.into(),
            channel: channel.into(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, PlanKey::Channel { .. })
    }
}

/// Start and end of one interpolated value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interpolation {
    pub start: f64,
    pub end: f64,
}

impl Interpolation {
    /// Value at eased progress `t`
    pub fn at(&self, t: f64) -> f64 {
        self.start + (self.end - self.start) * t
    }

    fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Playback state of a tween
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Built, never started
    #[default]
    Idle,
    /// Waiting for the start delay
    Scheduled,
    /// Frames are being delivered
    Running,
    /// Reached raw progress 1
    Completed,
    Paused,
    /// Stopped by `kill()`; restartable like `Paused`
    Killed,
}

struct TweenState {
    target: TargetRef,
    plan: IndexMap<PlanKey, Interpolation>,
    duration_ms: f64,
    delay_ms: f64,
    easing: Easing,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
    play_state: PlayState,
    start_timestamp: Option<f64>,
    frame: Option<FrameHandle>,
    delay: Option<TimerHandle>,
}

/// A property-interpolation task bound to one target.
///
/// `Tween` is a cheap handle: clones share the same playback state. Pending
/// frames hold a handle too, so a started tween keeps running even if the
/// caller drops theirs.
#[derive(Clone)]
pub struct Tween {
    state: Rc<RefCell<TweenState>>,
    scheduler: Rc<dyn FrameScheduler>,
    config: Rc<AnimateConfig>,
}

impl Tween {
    /// Build a tween, reading every start value from `target` now.
    pub fn new(
        target: TargetRef,
        properties: &Properties,
        options: TweenOptions,
        scheduler: Rc<dyn FrameScheduler>,
        config: Rc<AnimateConfig>,
    ) -> Self {
        let plan = build_plan(&target, properties, &config);

        let duration_ms = options
            .duration_ms
            .filter(|ms| *ms > 0.0)
            .unwrap_or(config.default_duration_ms);
        let easing = match options.easing.as_deref() {
            Some(name) => Easing::lookup(name),
            None => config.easing(),
        };

        debug!(
            element = target.label(),
            entries = plan.len(),
            duration_ms,
            easing = easing.name(),
            "tween created"
        );

        Self {
            state: Rc::new(RefCell::new(TweenState {
                target,
                plan,
                duration_ms,
                delay_ms: options.delay_ms.max(0.0),
                easing,
                on_update: options.on_update,
                on_complete: options.on_complete,
                play_state: PlayState::Idle,
                start_timestamp: None,
                frame: None,
                delay: None,
            })),
            scheduler,
            config,
        }
    }

    /// Swap start and end of every entry, so playback runs from the goals
    /// back toward the values captured at construction.
    pub fn reverse(&self) -> &Self {
        let mut state = self.state.borrow_mut();
        for interpolation in state.plan.values_mut() {
            *interpolation = interpolation.reversed();
        }
        self
    }

    /// Start playback after the configured delay.
    ///
    /// No-op while the tween is already scheduled or running.
    pub fn start(&self) -> &Self {
        let delay_ms = {
            let mut state = self.state.borrow_mut();
            if matches!(state.play_state, PlayState::Scheduled | PlayState::Running) {
                return self;
            }
            state.play_state = PlayState::Scheduled;
            state.start_timestamp = None;
            state.delay_ms
        };

        debug!(element = %self.label(), delay_ms, "tween scheduled");

        let tween = self.clone();
        let handle = self
            .scheduler
            .after(delay_ms, Box::new(move || tween.begin()));

        let mut state = self.state.borrow_mut();
        if state.play_state == PlayState::Scheduled {
            state.delay = Some(handle);
        }
        self
    }

    /// Stop delivering frames. Values already written stay in place.
    pub fn pause(&self) -> &Self {
        self.halt(PlayState::Paused);
        self
    }

    /// Start again if not scheduled or running.
    ///
    /// This goes through `start()`: the delay is applied again and playback
    /// restarts from the beginning.
    pub fn resume(&self) -> &Self {
        if !self.is_active() {
            self.start();
        }
        self
    }

    /// Same effect as `pause()`; the tween can still be restarted.
    pub fn kill(&self) -> &Self {
        self.halt(PlayState::Killed);
        self
    }

    /// Write the plan at `raw_progress` without touching playback state.
    ///
    /// Returns the eased progress that was rendered.
    pub fn render_at(&self, raw_progress: f64) -> f64 {
        let (target, eased, writes) = {
            let state = self.state.borrow();
            let eased = state.easing.apply(raw_progress.clamp(0.0, 1.0));
            let writes = styles_at(&state.plan, eased, &self.config);
            (state.target.clone(), eased, writes)
        };

        for (property, value) in &writes {
            target.write_style(property, value);
        }
        eased
    }

    pub fn state(&self) -> PlayState {
        self.state.borrow().play_state
    }

    /// Scheduled or running
    pub fn is_active(&self) -> bool {
        matches!(self.state(), PlayState::Scheduled | PlayState::Running)
    }

    pub fn is_running(&self) -> bool {
        self.state() == PlayState::Running
    }

    pub fn target(&self) -> TargetRef {
        self.state.borrow().target.clone()
    }

    pub fn duration_ms(&self) -> f64 {
        self.state.borrow().duration_ms
    }

    pub fn delay_ms(&self) -> f64 {
        self.state.borrow().delay_ms
    }

    pub fn easing(&self) -> Easing {
        self.state.borrow().easing
    }

    /// Snapshot of the interpolation plan in construction order
    pub fn plan(&self) -> Vec<(PlanKey, Interpolation)> {
        self.state
            .borrow()
            .plan
            .iter()
            .map(|(key, interpolation)| (key.clone(), *interpolation))
            .collect()
    }

    pub fn interpolation(&self, key: &PlanKey) -> Option<Interpolation> {
        self.state.borrow().plan.get(key).copied()
    }

    fn label(&self) -> String {
        self.state.borrow().target.label().to_string()
    }

    fn halt(&self, next: PlayState) {
        let (frame, delay) = {
            let mut state = self.state.borrow_mut();
            state.play_state = next;
            (state.frame.take(), state.delay.take())
        };

        if let Some(handle) = frame {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = delay {
            self.scheduler.cancel_timer(handle);
        }

        debug!(element = %self.label(), state = ?next, "tween halted");
    }

    /// Delay elapsed: enter Running and ask for the first frame
    fn begin(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.delay = None;
            if state.play_state != PlayState::Scheduled {
                return;
            }
            state.play_state = PlayState::Running;
        }
        self.request_frame();
    }

    fn request_frame(&self) {
        let tween = self.clone();
        let handle = self
            .scheduler
            .request_frame(Box::new(move |timestamp| tween.on_frame(timestamp)));

        let mut state = self.state.borrow_mut();
        if state.play_state == PlayState::Running {
            state.frame = Some(handle);
        }
    }

    fn on_frame(&self, timestamp: f64) {
        let raw_progress = {
            let mut state = self.state.borrow_mut();
            state.frame = None;
            if state.play_state != PlayState::Running {
                return;
            }
            let start = *state.start_timestamp.get_or_insert(timestamp);
            ((timestamp - start) / state.duration_ms).clamp(0.0, 1.0)
        };

        let eased = self.render_at(raw_progress);
        trace!(raw_progress, eased, "tween frame");
        self.notify_update(eased);

        if raw_progress < 1.0 {
            if self.is_running() {
                self.request_frame();
            }
            return;
        }

        self.state.borrow_mut().play_state = PlayState::Completed;
        debug!(element = %self.label(), "tween completed");
        self.notify_complete();
    }

    fn notify_update(&self, eased: f64) {
        let callback = self.state.borrow_mut().on_update.take();
        if let Some(mut callback) = callback {
            callback(eased);
            let mut state = self.state.borrow_mut();
            if state.on_update.is_none() {
                state.on_update = Some(callback);
            }
        }
    }

    fn notify_complete(&self) {
        let callback = self.state.borrow_mut().on_complete.take();
        if let Some(mut callback) = callback {
            callback();
            let mut state = self.state.borrow_mut();
            if state.on_complete.is_none() {
                state.on_complete = Some(callback);
            }
        }
    }
}

/// Capture start values and resolve goals for every entry
fn build_plan(
    target: &TargetRef,
    properties: &Properties,
    config: &AnimateConfig,
) -> IndexMap<PlanKey, Interpolation> {
    let mut plan = IndexMap::new();

    for (property, goal) in properties.iter() {
        if !config.is_composite(property) {
            let start = target.computed_value(property);
            let end = resolve_goal(goal, start);
            plan.insert(PlanKey::property(property.as_str()), Interpolation { start, end });
            continue;
        }

        let channels = composite_channels(goal);
        if channels.is_empty() {
            debug!(property = property.as_str(), goal = %goal, "composite goal has no channels");
        }

        for (channel, channel_goal) in channels {
            let start = target.channel_value(property, &channel);
            let end = resolve_goal(&channel_goal, start);
            plan.insert(
                PlanKey::channel(property.as_str(), channel),
                Interpolation { start, end },
            );
        }
    }

    plan
}

/// Formatted writes for the plan at eased progress `t`.
///
/// Plain properties come first in plan order, then one write per composite
/// bundle in the order each bundle first appears.
fn styles_at(
    plan: &IndexMap<PlanKey, Interpolation>,
    t: f64,
    config: &AnimateConfig,
) -> Vec<(String, String)> {
    let mut writes = Vec::with_capacity(plan.len());
    let mut bundles: IndexMap<&str, SmallVec<[(&str, f64); 4]>> = IndexMap::new();

    for (key, interpolation) in plan {
        let value = interpolation.at(t);
        match key {
            PlanKey::Property(property) => {
                writes.push((property.clone(), config.format_property(property, value)));
            }
            PlanKey::Channel { bundle, channel } => {
                bundles
                    .entry(bundle.as_str())
                    .or_default()
                    .push((channel.as_str(), value));
            }
        }
    }

    for (bundle, channels) in bundles {
        writes.push((bundle.to_string(), config.format_channels(channels)));
    }

    writes
}

#[cfg(test)]
mod tests {
    use super::*;
    use luma_core::{AnimationTarget, Element, FrameLoop};
    use std::cell::Cell;

    fn setup(element: Element) -> (FrameLoop, Rc<Element>, TargetRef) {
        let frames = FrameLoop::new();
        let element = Rc::new(element);
        let target: TargetRef = element.clone();
        (frames, element, target)
    }

    fn tween(
        frames: &FrameLoop,
        target: &TargetRef,
        properties: &Properties,
        options: TweenOptions,
    ) -> Tween {
        Tween::new(
            target.clone(),
            properties,
            options,
            Rc::new(frames.clone()),
            Rc::new(AnimateConfig::default()),
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_plan_captures_start_and_resolves_goals() {
        let (frames, _element, target) = setup(
            Element::recording("box")
                .with_value("opacity", 0.0)
                .with_value("left", 5.0),
        );
        let props = Properties::new()
            .with("opacity", 1.0)
            .with("left", "+=10")
            .with("top", "-=10");

        let tween = tween(&frames, &target, &props, TweenOptions::new());

        assert_eq!(
            tween.interpolation(&PlanKey::property("opacity")),
            Some(Interpolation {
                start: 0.0,
                end: 1.0
            })
        );
        assert_eq!(
            tween.interpolation(&PlanKey::property("left")),
            Some(Interpolation {
                start: 5.0,
                end: 15.0
            })
        );
        assert_eq!(
            tween.interpolation(&PlanKey::property("top")),
            Some(Interpolation {
                start: 0.0,
                end: -10.0
            })
        );
    }

    #[test]
    fn test_defaults_applied() {
        let (frames, _element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);

        let default = tween(&frames, &target, &props, TweenOptions::new());
        assert_eq!(default.duration_ms(), 1000.0);
        assert_eq!(default.easing(), Easing::EaseOutCubic);
        assert_eq!(default.state(), PlayState::Idle);

        let zero = tween(
            &frames,
            &target,
            &props,
            TweenOptions::new().duration(0.0).easing("nope"),
        );
        assert_eq!(zero.duration_ms(), 1000.0);
        assert_eq!(zero.easing(), Easing::EaseOutCubic);
    }

    #[test]
    fn test_composite_entries() {
        let (frames, _element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("transform", "translateX(+=100px) rotate(45deg)");

        let tween = tween(&frames, &target, &props, TweenOptions::new());
        let plan = tween.plan();

        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|(key, _)| key.is_composite()));
        assert_eq!(
            tween.interpolation(&PlanKey::channel("transform", "translateX")),
            Some(Interpolation {
                start: 0.0,
                end: 100.0
            })
        );
    }

    #[test]
    fn test_malformed_composite_animates_nothing() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new()
            .with("transform", "translateX 100px")
            .with("opacity", 1.0);

        let tween = tween(&frames, &target, &props, TweenOptions::new());
        assert_eq!(tween.plan().len(), 1);

        tween.render_at(1.0);
        assert!(element.style("transform").is_none());
        assert_eq!(element.style("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_render_at_writes_start_and_end() {
        let (frames, element, target) = setup(Element::recording("box").with_value("width", 10.0));
        let props = Properties::new()
            .with("width", 50.0)
            .with("transform", "scale(2)");

        let tween = tween(&frames, &target, &props, TweenOptions::new().easing("linear"));

        tween.render_at(0.0);
        assert_eq!(element.style("width").as_deref(), Some("10px"));
        assert_eq!(element.style("transform").as_deref(), Some("scale(1)"));

        tween.render_at(1.0);
        assert_eq!(element.style("width").as_deref(), Some("50px"));
        assert_eq!(element.style("transform").as_deref(), Some("scale(2)"));
    }

    #[test]
    fn test_composite_written_once_per_frame() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new()
            .with("transform", "translateX(10px) translateY(20px) rotate(90deg)")
            .with("opacity", 1.0);

        let tween = tween(&frames, &target, &props, TweenOptions::new().easing("linear"));
        tween.render_at(1.0);

        let writes = element.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].property, "opacity");
        assert_eq!(writes[1].property, "transform");
        assert_eq!(
            writes[1].value,
            "translateX(10px) translateY(20px) rotate(90deg)"
        );
    }

    #[test]
    fn test_non_numeric_goal_propagates_nan() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new()
            .with("width", "auto")
            .with("opacity", "full");

        let tween = tween(&frames, &target, &props, TweenOptions::new());
        tween.render_at(0.5);

        assert_eq!(element.style("width").as_deref(), Some("NaNpx"));
        assert_eq!(element.style("opacity").as_deref(), Some("NaN"));
    }

    #[test]
    fn test_reverse_swaps_plan() {
        let (frames, _element, target) = setup(Element::recording("box").with_value("opacity", 0.0));
        let props = Properties::new().with("opacity", 1.0);

        let tween = tween(&frames, &target, &props, TweenOptions::new());
        tween.reverse();

        assert_eq!(
            tween.interpolation(&PlanKey::property("opacity")),
            Some(Interpolation {
                start: 1.0,
                end: 0.0
            })
        );
    }

    #[test]
    fn test_playback_to_completion() {
        let (frames, element, target) = setup(Element::recording("box").with_value("opacity", 0.0));
        let props = Properties::new().with("opacity", 1.0);
        let completed = Rc::new(Cell::new(0));
        let updates = Rc::new(RefCell::new(Vec::new()));

        let completed_cb = completed.clone();
        let updates_cb = updates.clone();
        let tween = tween(
            &frames,
            &target,
            &props,
            TweenOptions::new()
                .duration(500.0)
                .on_update(move |p| updates_cb.borrow_mut().push(p))
                .on_complete(move || completed_cb.set(completed_cb.get() + 1)),
        );

        tween.start();
        assert_eq!(tween.state(), PlayState::Scheduled);

        frames.tick(0.0);
        assert_eq!(tween.state(), PlayState::Running);
        assert_close(element.computed_value("opacity"), 0.0);

        frames.tick(250.0);
        assert_close(element.computed_value("opacity"), 0.875);

        frames.tick(500.0);
        assert_close(element.computed_value("opacity"), 1.0);
        assert_eq!(tween.state(), PlayState::Completed);
        assert_eq!(completed.get(), 1);
        assert!(!frames.has_pending());

        frames.tick(750.0);
        assert_eq!(completed.get(), 1);
        assert_eq!(updates.borrow().len(), 3);
        assert_close(updates.borrow()[1], 0.875);
    }

    #[test]
    fn test_start_is_noop_while_active() {
        let (frames, _element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);
        let tween = tween(&frames, &target, &props, TweenOptions::new().delay(100.0));

        tween.start();
        tween.start();
        assert_eq!(frames.pending_timers(), 1);

        frames.tick(100.0);
        tween.start();
        assert_eq!(frames.pending_timers(), 0);
        assert_eq!(frames.pending_frames(), 1);
    }

    #[test]
    fn test_delay_defers_first_frame() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);
        let tween = tween(
            &frames,
            &target,
            &props,
            TweenOptions::new().duration(200.0).delay(100.0).easing("linear"),
        );

        tween.start();
        frames.tick(50.0);
        assert_eq!(element.write_count(), 0);
        assert_eq!(tween.state(), PlayState::Scheduled);

        frames.tick(100.0);
        assert_eq!(tween.state(), PlayState::Running);
        assert_close(element.computed_value("opacity"), 0.0);

        frames.tick(200.0);
        assert_close(element.computed_value("opacity"), 0.5);
    }

    #[test]
    fn test_pause_keeps_written_value() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);
        let tween = tween(
            &frames,
            &target,
            &props,
            TweenOptions::new().duration(1000.0).easing("linear"),
        );

        tween.start();
        frames.tick(0.0);
        frames.tick(400.0);
        tween.pause();

        let writes = element.write_count();
        frames.tick(800.0);

        assert_eq!(tween.state(), PlayState::Paused);
        assert_eq!(element.write_count(), writes);
        assert_close(element.computed_value("opacity"), 0.4);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_pause_during_delay_cancels_timer() {
        let (frames, element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);
        let tween = tween(&frames, &target, &props, TweenOptions::new().delay(100.0));

        tween.start();
        frames.tick(50.0);
        tween.pause();
        frames.tick(200.0);

        assert_eq!(tween.state(), PlayState::Paused);
        assert_eq!(element.write_count(), 0);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_callback_can_pause_its_tween() {
        let (frames, _element, target) = setup(Element::recording("box"));
        let props = Properties::new().with("opacity", 1.0);
        let slot: Rc<RefCell<Option<Tween>>> = Rc::new(RefCell::new(None));

        let slot_cb = slot.clone();
        let tween = tween(
            &frames,
            &target,
            &props,
            TweenOptions::new().on_update(move |_| {
                if let Some(tween) = slot_cb.borrow().as_ref() {
                    tween.pause();
                }
            }),
        );
        *slot.borrow_mut() = Some(tween.clone());

        tween.start();
        frames.tick(0.0);

        assert_eq!(tween.state(), PlayState::Paused);
        assert!(!frames.has_pending());

        slot.borrow_mut().take();
    }

    #[test]
    fn test_styles_at_orders_plain_before_composite() {
        let mut plan = IndexMap::new();
        plan.insert(
            PlanKey::channel("transform", "rotate"),
            Interpolation {
                start: 0.0,
                end: 90.0,
            },
        );
        plan.insert(
            PlanKey::property("height"),
            Interpolation {
                start: 0.0,
                end: 10.0,
            },
        );

        let writes = styles_at(&plan, 0.5, &AnimateConfig::default());
        assert_eq!(
            writes,
            vec![
                ("height".to_string(), "5px".to_string()),
                ("transform".to_string(), "rotate(45deg)".to_string()),
            ]
        );
    }
}
