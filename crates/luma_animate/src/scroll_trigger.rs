//! Visibility-driven playback
//!
//! A [`ScrollTrigger`] watches one target through a
//! [`VisibilityObserver`] and starts its tween when the target comes into
//! view. With `once` set, only the first entry starts anything.

use crate::tween::Tween;
use luma_core::observer::{IntersectionEntry, ObserveOptions, Subscription, VisibilityObserver};
use luma_core::TargetRef;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Called with the observed target on entry or exit
pub type TriggerCallback = Box<dyn FnMut(&TargetRef)>;

/// Scroll trigger settings
pub struct ScrollTriggerOptions {
    /// Viewport start position; stored but not interpreted
    pub start: String,
    /// Viewport end position; stored but not interpreted
    pub end: String,
    /// Tween started on entry
    pub tween: Option<Tween>,
    pub on_enter: Option<TriggerCallback>,
    pub on_leave: Option<TriggerCallback>,
    /// Only react to the first entry
    pub once: bool,
}

impl Default for ScrollTriggerOptions {
    fn default() -> Self {
        Self {
            start: "top 80%".to_string(),
            end: "bottom 20%".to_string(),
            tween: None,
            on_enter: None,
            on_leave: None,
            once: false,
        }
    }
}

impl ScrollTriggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, position: impl Into<String>) -> Self {
        self.start = position.into();
        self
    }

    pub fn end(mut self, position: impl Into<String>) -> Self {
        self.end = position.into();
        self
    }

    pub fn tween(mut self, tween: Tween) -> Self {
        self.tween = Some(tween);
        self
    }

    pub fn on_enter<F: FnMut(&TargetRef) + 'static>(mut self, callback: F) -> Self {
        self.on_enter = Some(Box::new(callback));
        self
    }

    pub fn on_leave<F: FnMut(&TargetRef) + 'static>(mut self, callback: F) -> Self {
        self.on_leave = Some(Box::new(callback));
        self
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

struct TriggerState {
    target: TargetRef,
    tween: Option<Tween>,
    on_enter: Option<TriggerCallback>,
    on_leave: Option<TriggerCallback>,
    once: bool,
    has_triggered: bool,
}

/// Apply one notification. User callbacks run outside the state borrow so
/// they can query or kill the trigger.
fn handle_entry(state: &Rc<RefCell<TriggerState>>, entry: &IntersectionEntry) {
    let mut current = state.borrow_mut();

    if entry.is_intersecting {
        if current.has_triggered && current.once {
            return;
        }
        current.has_triggered = true;
        debug!(element = current.target.label(), ratio = entry.ratio, "scroll trigger enter");

        let tween = current.tween.clone();
        let target = current.target.clone();
        let callback = current.on_enter.take();
        drop(current);

        if let Some(tween) = tween {
            tween.start();
        }
        if let Some(mut callback) = callback {
            callback(&target);
            let mut current = state.borrow_mut();
            if current.on_enter.is_none() {
                current.on_enter = Some(callback);
            }
        }
    } else if current.has_triggered {
        debug!(element = current.target.label(), "scroll trigger leave");

        let target = current.target.clone();
        let callback = current.on_leave.take();
        drop(current);

        if let Some(mut callback) = callback {
            callback(&target);
            let mut current = state.borrow_mut();
            if current.on_leave.is_none() {
                current.on_leave = Some(callback);
            }
        }
    }
}

/// Starts a tween when its target becomes visible
pub struct ScrollTrigger {
    state: Rc<RefCell<TriggerState>>,
    subscription: RefCell<Option<Box<dyn Subscription>>>,
    start: String,
    end: String,
}

impl ScrollTrigger {
    /// Subscribe to visibility of `target` at the given threshold
    pub fn new(
        target: TargetRef,
        options: ScrollTriggerOptions,
        observer: &dyn VisibilityObserver,
        threshold: f64,
    ) -> Self {
        let state = Rc::new(RefCell::new(TriggerState {
            target: target.clone(),
            tween: options.tween,
            on_enter: options.on_enter,
            on_leave: options.on_leave,
            once: options.once,
            has_triggered: false,
        }));

        let handler_state = state.clone();
        let subscription = observer.observe(
            target,
            ObserveOptions { threshold },
            Box::new(move |entry| handle_entry(&handler_state, &entry)),
        );

        debug!(
            element = state.borrow().target.label(),
            threshold,
            once = options.once,
            "scroll trigger created"
        );

        Self {
            state,
            subscription: RefCell::new(Some(subscription)),
            start: options.start,
            end: options.end,
        }
    }

    /// Disconnect from the observer and kill the tween. Safe to repeat.
    pub fn kill(&self) {
        if let Some(mut subscription) = self.subscription.borrow_mut().take() {
            subscription.disconnect();
            debug!(element = self.state.borrow().target.label(), "scroll trigger killed");
        }
        if let Some(tween) = &self.state.borrow().tween {
            tween.kill();
        }
    }

    /// Whether an entry has been handled at least once
    pub fn has_triggered(&self) -> bool {
        self.state.borrow().has_triggered
    }

    /// Still subscribed to the observer
    pub fn is_active(&self) -> bool {
        self.subscription
            .borrow()
            .as_ref()
            .is_some_and(|subscription| subscription.is_connected())
    }

    pub fn target(&self) -> TargetRef {
        self.state.borrow().target.clone()
    }

    pub fn tween(&self) -> Option<Tween> {
        self.state.borrow().tween.clone()
    }

    pub fn start_position(&self) -> &str {
        &self.start
    }

    pub fn end_position(&self) -> &str {
        &self.end
    }
}
