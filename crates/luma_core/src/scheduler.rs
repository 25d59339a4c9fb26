//! Frame scheduling
//!
//! Tweens never read a clock on their own. Display refreshes and start
//! delays are requested through [`FrameScheduler`], which the host provides.
//! [`FrameLoop`] is the adapter used both in production (ticked from the
//! host's vsync with [`FrameLoop::tick_now`]) and in tests (ticked with
//! explicit timestamps for deterministic playback).

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::trace;

new_key_type! {
    /// Handle to a pending frame request
    pub struct FrameHandle;
    /// Handle to a pending one-shot delay timer
    pub struct TimerHandle;
}

/// Invoked once with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Invoked once when a delay has elapsed
pub type TimerCallback = Box<dyn FnOnce()>;

/// Request-next-frame / cancel-pending-frame primitive plus one-shot delays.
pub trait FrameScheduler {
    /// Run `callback` on the next display frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending frame request. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Run `callback` once after `delay_ms` milliseconds
    fn after(&self, delay_ms: f64, callback: TimerCallback) -> TimerHandle;

    /// Drop a pending delay. Unknown or already-fired handles are ignored.
    fn cancel_timer(&self, handle: TimerHandle);
}

struct PendingFrame {
    seq: u64,
    callback: FrameCallback,
}

struct PendingTimer {
    due_ms: f64,
    seq: u64,
    callback: TimerCallback,
}

struct FrameLoopInner {
    frames: SlotMap<FrameHandle, PendingFrame>,
    timers: SlotMap<TimerHandle, PendingTimer>,
    now_ms: f64,
    next_seq: u64,
    ticks: u64,
    /// Set once the host ticks from the wall clock
    wall_clock: bool,
}

impl FrameLoopInner {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Host-ticked frame scheduler.
///
/// Each [`tick`](FrameLoop::tick) first fires every delay timer that is due
/// (earliest first, ties in request order), then runs every frame that was
/// pending at that point in request order. Frames requested from inside a
/// frame callback wait for the next tick.
///
/// Delays count from the loop time. Once the loop is driven by
/// [`tick_now`](FrameLoop::tick_now), delays count from the wall clock
/// instead, so a delay requested after the host stopped ticking still waits
/// its full length.
///
/// Cloning yields another handle to the same loop.
#[derive(Clone)]
pub struct FrameLoop {
    inner: Rc<RefCell<FrameLoopInner>>,
    epoch: Instant,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(FrameLoopInner {
                frames: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                now_ms: 0.0,
                next_seq: 0,
                ticks: 0,
                wall_clock: false,
            })),
            epoch: Instant::now(),
        }
    }

    /// Time of the most recent tick in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Number of ticks processed so far
    pub fn tick_count(&self) -> u64 {
        self.inner.borrow().ticks
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Check if anything is waiting for a future tick
    pub fn has_pending(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.frames.is_empty() || !inner.timers.is_empty()
    }

    /// Tick using wall-clock time elapsed since the loop was created
    pub fn tick_now(&self) {
        self.inner.borrow_mut().wall_clock = true;
        self.tick(self.elapsed_ms());
    }

    fn elapsed_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Time delays are measured from
    fn current_ms(&self) -> f64 {
        let inner = self.inner.borrow();
        if inner.wall_clock {
            inner.now_ms.max(self.elapsed_ms())
        } else {
            inner.now_ms
        }
    }

    /// Advance the loop to `now_ms` and run everything that is due.
    ///
    /// Time never runs backwards: an earlier timestamp is treated as the
    /// current loop time.
    pub fn tick(&self, now_ms: f64) {
        let now = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = inner.now_ms.max(now_ms);
            inner.ticks += 1;
            inner.now_ms
        };

        let mut due: Vec<(f64, u64, TimerHandle)> = self
            .inner
            .borrow()
            .timers
            .iter()
            .filter(|(_, timer)| timer.due_ms <= now)
            .map(|(handle, timer)| (timer.due_ms, timer.seq, handle))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, _, handle) in due {
            // A previous timer may have cancelled this one
            let timer = self.inner.borrow_mut().timers.remove(handle);
            if let Some(timer) = timer {
                (timer.callback)();
            }
        }

        let mut frames: Vec<(u64, FrameHandle)> = self
            .inner
            .borrow()
            .frames
            .iter()
            .map(|(handle, frame)| (frame.seq, handle))
            .collect();
        frames.sort_unstable_by_key(|(seq, _)| *seq);

        trace!(now_ms = now, frames = frames.len(), "frame loop tick");

        for (_, handle) in frames {
            let frame = self.inner.borrow_mut().frames.remove(handle);
            if let Some(frame) = frame {
                (frame.callback)(now);
            }
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq();
        inner.frames.insert(PendingFrame { seq, callback })
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.inner.borrow_mut().frames.remove(handle);
    }

    fn after(&self, delay_ms: f64, callback: TimerCallback) -> TimerHandle {
        let due_ms = self.current_ms() + delay_ms.max(0.0);
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq();
        inner.timers.insert(PendingTimer {
            due_ms,
            seq,
            callback,
        })
    }

    fn cancel_timer(&self, handle: TimerHandle) {
        self.inner.borrow_mut().timers.remove(handle);
    }
}
