//! LumaAnimate Core
//!
//! Host-facing ports that the tweening engine is written against, together
//! with the adapters used to drive it:
//!
//! - **Frame Scheduling**: request/cancel display frames and one-shot delays
//! - **Style Targets**: read computed values and write styles on a visual object
//! - **Visibility Observation**: intersection notifications for a target
//!
//! Everything here is single-threaded. Shared state lives behind
//! `Rc<RefCell<_>>` and no type is `Send`.
//!
//! # Example
//!
//! ```rust
//! use luma_core::FrameLoop;
//! use luma_core::scheduler::FrameScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let frames = FrameLoop::new();
//! let seen = Rc::new(Cell::new(0.0));
//! let seen_in_frame = seen.clone();
//!
//! frames.request_frame(Box::new(move |ts| seen_in_frame.set(ts)));
//! frames.tick(16.0);
//! assert_eq!(seen.get(), 16.0);
//! ```

pub mod observer;
pub mod scheduler;
pub mod syntax;
pub mod target;

pub use observer::{
    IntersectionEntry, IntersectionHub, ObserveOptions, Subscription, VisibilityObserver,
};
pub use scheduler::{FrameHandle, FrameLoop, FrameScheduler, TimerHandle};
pub use target::{AnimationTarget, Element, StyleWrite, TargetRef};
