//! Frame scheduling and the update/render loop contract
//!
//! The driver owns nothing about gameplay. It delivers timestamps to a
//! callback once per display frame, guarantees the callback never fires
//! after `stop()`, and converts raw timestamps into clamped elapsed time.
//! Update-then-render ordering is the callback's responsibility; the
//! shell wires it as `update(); render();` and returns `Stop` once the
//! run leaves its active mode.

use crate::consts::{MAX_FRAME_MS, REF_FRAME_MS};

/// Returned by the frame callback to keep or release the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Request the next frame
    Continue,
    /// Deregister; no further callbacks fire
    Stop,
}

/// Source of per-frame callbacks
///
/// `start` replaces any previous callback and begins delivery; `stop`
/// cancels the outstanding request synchronously, so no callback runs
/// after it returns. Both are idempotent.
pub trait FrameScheduler {
    fn start(&mut self, on_frame: Box<dyn FnMut(f64) -> LoopControl>);
    fn stop(&mut self);
}

/// Converts absolute frame timestamps into clamped elapsed milliseconds.
///
/// The first frame after a (re)start reports exactly one reference frame,
/// since there is no previous timestamp to diff against.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed ms since the previous frame, clamped to [0, MAX_FRAME_MS]
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => REF_FRAME_MS,
        };
        self.last = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (call when the loop restarts)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Hand-pumped scheduler for tests and the native headless demo
#[derive(Default)]
pub struct ManualScheduler {
    on_frame: Option<Box<dyn FnMut(f64) -> LoopControl>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one frame. Returns false once the callback has stopped
    /// (or was never started), after which pumping is a no-op.
    pub fn pump(&mut self, now_ms: f64) -> bool {
        let Some(cb) = self.on_frame.as_mut() else {
            return false;
        };
        match cb(now_ms) {
            LoopControl::Continue => true,
            LoopControl::Stop => {
                self.on_frame = None;
                false
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.on_frame.is_some()
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self, on_frame: Box<dyn FnMut(f64) -> LoopControl>) {
        self.on_frame = Some(on_frame);
    }

    fn stop(&mut self) {
        self.on_frame = None;
    }
}

/// `requestAnimationFrame`-backed scheduler
#[cfg(target_arch = "wasm32")]
pub use raf::RafScheduler;

#[cfg(target_arch = "wasm32")]
mod raf {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use super::{FrameScheduler, LoopControl};

    struct RafInner {
        on_frame: Option<Box<dyn FnMut(f64) -> LoopControl>>,
        handle: Option<i32>,
    }

    /// Drives the frame callback off the browser's display refresh.
    ///
    /// `stop()` cancels the pending rAF handle in the same tick, so a
    /// stopped game never receives a trailing update.
    pub struct RafScheduler {
        inner: Rc<RefCell<RafInner>>,
    }

    impl RafScheduler {
        pub fn new() -> Self {
            Self {
                inner: Rc::new(RefCell::new(RafInner {
                    on_frame: None,
                    handle: None,
                })),
            }
        }

        fn schedule(inner: Rc<RefCell<RafInner>>) {
            let fire = inner.clone();
            let closure = Closure::once(move |time: f64| Self::fire(fire, time));
            let window = web_sys::window().expect("no window");
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(handle) => inner.borrow_mut().handle = Some(handle),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            closure.forget();
        }

        fn fire(inner: Rc<RefCell<RafInner>>, time: f64) {
            let control = {
                let mut b = inner.borrow_mut();
                b.handle = None;
                match b.on_frame.as_mut() {
                    Some(cb) => cb(time),
                    // Stopped between scheduling and delivery
                    None => LoopControl::Stop,
                }
            };
            match control {
                LoopControl::Continue => Self::schedule(inner),
                LoopControl::Stop => inner.borrow_mut().on_frame = None,
            }
        }
    }

    impl Default for RafScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FrameScheduler for RafScheduler {
        fn start(&mut self, on_frame: Box<dyn FnMut(f64) -> LoopControl>) {
            self.stop();
            self.inner.borrow_mut().on_frame = Some(on_frame);
            Self::schedule(self.inner.clone());
        }

        fn stop(&mut self) {
            let mut b = self.inner.borrow_mut();
            b.on_frame = None;
            if let Some(handle) = b.handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn clock_first_frame_is_one_reference_frame() {
        let mut clock = FrameClock::new();
        assert!((clock.elapsed(1000.0) - REF_FRAME_MS).abs() < 1e-9);
        assert!((clock.elapsed(1016.0) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn clock_clamps_long_gaps() {
        let mut clock = FrameClock::new();
        clock.elapsed(0.0);
        // Tab was hidden for five seconds
        assert_eq!(clock.elapsed(5000.0), MAX_FRAME_MS);
    }

    #[test]
    fn clock_reset_forgets_previous_timestamp() {
        let mut clock = FrameClock::new();
        clock.elapsed(0.0);
        clock.reset();
        assert!((clock.elapsed(9999.0) - REF_FRAME_MS).abs() < 1e-9);
    }

    #[test]
    fn manual_scheduler_stops_on_stop_control() {
        let count = Rc::new(Cell::new(0u32));
        let c = count.clone();
        let mut sched = ManualScheduler::new();
        sched.start(Box::new(move |_| {
            c.set(c.get() + 1);
            if c.get() >= 3 {
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        }));

        let mut t = 0.0;
        while sched.pump(t) {
            t += 16.0;
        }
        assert_eq!(count.get(), 3);
        // Further pumps never invoke the callback
        assert!(!sched.pump(t));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn manual_scheduler_stop_cancels_synchronously() {
        let count = Rc::new(Cell::new(0u32));
        let c = count.clone();
        let mut sched = ManualScheduler::new();
        sched.start(Box::new(move |_| {
            c.set(c.get() + 1);
            LoopControl::Continue
        }));
        sched.pump(0.0);
        sched.stop();
        assert!(!sched.is_active());
        assert!(!sched.pump(16.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn scheduler_restart_replaces_callback() {
        let mut sched = ManualScheduler::new();
        let first = Rc::new(Cell::new(0u32));
        let second = Rc::new(Cell::new(0u32));
        let f = first.clone();
        sched.start(Box::new(move |_| {
            f.set(f.get() + 1);
            LoopControl::Continue
        }));
        sched.pump(0.0);
        let s = second.clone();
        sched.start(Box::new(move |_| {
            s.set(s.get() + 1);
            LoopControl::Continue
        }));
        sched.pump(16.0);
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }
}
