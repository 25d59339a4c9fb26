//! Visibility observation
//!
//! Scroll-driven tweens learn about viewport intersection through
//! [`VisibilityObserver`]. [`IntersectionHub`] is the adapter: the host (or a
//! test) reports the visible ratio of each target and the hub turns ratio
//! changes into intersection notifications.

use crate::target::{same_target, TargetRef};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

new_key_type! {
    /// Unique identifier for an observation registered with a hub
    pub struct ObservationId;
}

/// One intersection notification
#[derive(Clone)]
pub struct IntersectionEntry {
    pub target: TargetRef,
    pub is_intersecting: bool,
    /// Visible fraction of the target (0.0 to 1.0)
    pub ratio: f64,
}

impl std::fmt::Debug for IntersectionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionEntry")
            .field("target", &self.target.label())
            .field("is_intersecting", &self.is_intersecting)
            .field("ratio", &self.ratio)
            .finish()
    }
}

/// Observation settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction at which a target counts as intersecting
    pub threshold: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self { threshold: 0.0 }
    }
}

/// Callback receiving intersection notifications
pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// An active observation. Dropping the subscription does not disconnect it.
pub trait Subscription {
    /// Stop delivering notifications. Safe to call more than once.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;
}

/// Source of intersection notifications for targets
pub trait VisibilityObserver {
    fn observe(
        &self,
        target: TargetRef,
        options: ObserveOptions,
        callback: IntersectionCallback,
    ) -> Box<dyn Subscription>;
}

struct Observation {
    target: TargetRef,
    options: ObserveOptions,
    /// Last delivered intersection state
    last: Option<bool>,
    /// Taken out while the callback runs
    callback: Option<IntersectionCallback>,
}

#[derive(Default)]
struct HubInner {
    observations: SlotMap<ObservationId, Observation>,
}

/// Ratio-driven visibility observer.
///
/// A target intersects when its reported ratio is above zero and at least
/// the observation threshold. The first report for an observation is always
/// delivered; after that only changes of the intersecting state are.
#[derive(Clone, Default)]
pub struct IntersectionHub {
    inner: Rc<RefCell<HubInner>>,
}

impl IntersectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connected observations
    pub fn observation_count(&self) -> usize {
        self.inner.borrow().observations.len()
    }

    /// Report the visible ratio of `target`.
    ///
    /// Returns the number of notifications delivered.
    pub fn report(&self, target: &TargetRef, ratio: f64) -> usize {
        let ids: SmallVec<[ObservationId; 4]> = self
            .inner
            .borrow()
            .observations
            .iter()
            .filter(|(_, observation)| same_target(&observation.target, target))
            .map(|(id, _)| id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let (callback, entry) = {
                let mut inner = self.inner.borrow_mut();
                let Some(observation) = inner.observations.get_mut(id) else {
                    continue;
                };

                let is_intersecting = ratio > 0.0 && ratio >= observation.options.threshold;
                if observation.last == Some(is_intersecting) {
                    continue;
                }
                observation.last = Some(is_intersecting);

                let entry = IntersectionEntry {
                    target: observation.target.clone(),
                    is_intersecting,
                    ratio,
                };
                (observation.callback.take(), entry)
            };

            let Some(mut callback) = callback else {
                continue;
            };

            trace!(
                element = entry.target.label(),
                is_intersecting = entry.is_intersecting,
                ratio,
                "intersection changed"
            );
            callback(entry);
            delivered += 1;

            // The callback may have disconnected its own observation
            if let Some(observation) = self.inner.borrow_mut().observations.get_mut(id) {
                observation.callback = Some(callback);
            }
        }

        delivered
    }
}

impl VisibilityObserver for IntersectionHub {
    fn observe(
        &self,
        target: TargetRef,
        options: ObserveOptions,
        callback: IntersectionCallback,
    ) -> Box<dyn Subscription> {
        let id = self.inner.borrow_mut().observations.insert(Observation {
            target,
            options,
            last: None,
            callback: Some(callback),
        });

        Box::new(HubSubscription {
            hub: Rc::downgrade(&self.inner),
            id: Some(id),
        })
    }
}

/// Subscription handed out by [`IntersectionHub`]
struct HubSubscription {
    hub: Weak<RefCell<HubInner>>,
    id: Option<ObservationId>,
}

impl Subscription for HubSubscription {
    fn disconnect(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(hub) = self.hub.upgrade() {
            // Dropping the observation drops its callback outside the borrow
            let removed = hub.borrow_mut().observations.remove(id);
            drop(removed);
        }
    }

    fn is_connected(&self) -> bool {
        self.id.is_some() && self.hub.strong_count() > 0
    }
}
