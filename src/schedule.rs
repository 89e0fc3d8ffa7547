//! Frame bookkeeping shared by a running loop and the handle that controls it.

use log::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::*;

/// Requests frame callbacks, e.g. through `requestAnimationFrame`.
///
/// The scheduler owns the frame callback, and the callback usually holds the `FrameState`
/// that owns the scheduler. `release` breaks that cycle.
pub trait FrameScheduler {
    /// Requests one more call of the frame callback and returns an id for `cancel`.
    fn request(&self) -> Result<i32, Error>;

    fn cancel(&self, request: i32);

    /// Drops the frame callback. Must be safe to call more than once.
    fn release(&self);
}

/// State of a running frame loop: tick count, pending request and the last frame's error.
pub struct FrameState<S: FrameScheduler> {
    scheduler: S,
    running: Cell<bool>,
    tick: Cell<u64>,
    pending: Cell<Option<i32>>,
    last_error: RefCell<Option<Error>>,
}

impl<S: FrameScheduler> FrameState<S> {
    pub fn new(scheduler: S) -> Rc<Self> {
        Rc::new(FrameState {
            scheduler,
            running: Cell::new(true),
            tick: Cell::new(0),
            pending: Cell::new(None),
            last_error: RefCell::new(None),
        })
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Called first thing in the frame callback. Returns the tick to render, or `None` once
    /// the loop has stopped.
    pub fn begin_frame(&self) -> Option<u64> {
        self.pending.set(None);
        if self.running.get() {
            Some(self.tick.get())
        } else {
            None
        }
    }

    /// Records the frame's outcome, advances the tick and requests the next frame.
    pub fn end_frame(&self, result: Result<(), Error>) {
        *self.last_error.borrow_mut() = result.err();
        self.tick.set(self.tick.get() + 1);
        if let Err(err) = self.schedule() {
            error!("Unable to schedule the next frame: {}", err);
            self.running.set(false);
        }
    }

    fn schedule(&self) -> Result<(), Error> {
        let id = self.scheduler.request()?;
        self.pending.set(Some(id));
        Ok(())
    }
}

/// Controls a running frame loop. Dropping the handle stops the loop.
pub struct LoopHandle<S: FrameScheduler> {
    state: Rc<FrameState<S>>,
    info: String,
}

impl<S: FrameScheduler> LoopHandle<S> {
    /// Takes control of `state` and requests its first frame. If that fails the loop is
    /// released before the error is returned.
    pub fn start(state: Rc<FrameState<S>>, info: &str) -> Result<Self, Error> {
        let handle = LoopHandle { state, info: info.to_string() };
        handle.state.schedule()?;
        Ok(handle)
    }

    /// Cancels the pending frame and releases the frame callback. Frames never overlap, so
    /// no frame is in progress when this runs.
    pub fn stop(&self) {
        let was_running = self.state.running.replace(false);
        if let Some(id) = self.state.pending.take() {
            self.state.scheduler.cancel(id);
        }
        self.state.scheduler.release();
        if was_running {
            info!("Animation loop stopped after {} frames", self.state.tick.get());
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    pub fn tick(&self) -> u64 {
        self.state.tick.get()
    }

    /// The error of the most recent frame, if it failed.
    pub fn last_error(&self) -> Option<Error> {
        self.state.last_error.borrow().clone()
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

impl<S: FrameScheduler> Drop for LoopHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::rc::Weak;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Request(i32),
        Cancel(i32),
        Release,
    }

    #[derive(Default)]
    struct ManualFrames {
        next_id: Cell<i32>,
        refuse: Cell<bool>,
        events: Rc<RefCell<Vec<Event>>>,
        callback: RefCell<Option<Box<dyn FnMut()>>>,
    }

    impl FrameScheduler for ManualFrames {
        fn request(&self) -> Result<i32, Error> {
            if self.refuse.get() {
                return Err(Error::Context("no window".to_string()));
            }
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.events.borrow_mut().push(Event::Request(id));
            Ok(id)
        }

        fn cancel(&self, request: i32) {
            self.events.borrow_mut().push(Event::Cancel(request));
        }

        fn release(&self) {
            if self.callback.borrow_mut().take().is_some() {
                self.events.borrow_mut().push(Event::Release);
            }
        }
    }

    type Outcomes = Rc<RefCell<VecDeque<Result<(), Error>>>>;

    // Builds a loop whose callback captures its own state, as the browser driver does.
    fn running_loop() -> (LoopHandle<ManualFrames>, Rc<RefCell<Vec<Event>>>, Outcomes) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let outcomes: Outcomes = Rc::new(RefCell::new(VecDeque::new()));
        let state = FrameState::new(ManualFrames { events: events.clone(), ..Default::default() });

        let frame_state = state.clone();
        let frame_outcomes = outcomes.clone();
        *state.scheduler().callback.borrow_mut() = Some(Box::new(move || {
            if frame_state.begin_frame().is_none() {
                return;
            }
            let result = frame_outcomes.borrow_mut().pop_front().unwrap_or(Ok(()));
            frame_state.end_frame(result);
        }));

        let handle = LoopHandle::start(state, "lesson").unwrap();
        (handle, events, outcomes)
    }

    fn fire(handle: &LoopHandle<ManualFrames>) {
        let mut callback = handle.state.scheduler.callback.borrow_mut().take().unwrap();
        callback();
        *handle.state.scheduler.callback.borrow_mut() = Some(callback);
    }

    fn weak_state(handle: &LoopHandle<ManualFrames>) -> Weak<FrameState<ManualFrames>> {
        Rc::downgrade(&handle.state)
    }

    #[test]
    fn test_frames_advance_the_tick() {
        let (handle, events, _) = running_loop();
        assert_eq!(handle.tick(), 0);
        fire(&handle);
        fire(&handle);
        assert_eq!(handle.tick(), 2);
        assert!(handle.is_running());
        assert_eq!(handle.info(), "lesson");
        assert_eq!(*events.borrow(), vec![Event::Request(1), Event::Request(2), Event::Request(3)]);
    }

    #[test]
    fn test_stop_cancels_and_releases_once() {
        let (handle, events, _) = running_loop();
        fire(&handle);
        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
        assert_eq!(
            *events.borrow(),
            vec![Event::Request(1), Event::Request(2), Event::Cancel(2), Event::Release]
        );
        assert_eq!(handle.state.begin_frame(), None);
    }

    #[test]
    fn test_dropping_the_handle_frees_the_loop() {
        let (handle, events, _) = running_loop();
        fire(&handle);
        let state = weak_state(&handle);
        drop(handle);

        assert!(state.upgrade().is_none());
        assert_eq!(events.borrow().last(), Some(&Event::Release));
        assert!(events.borrow().contains(&Event::Cancel(2)));
    }

    #[test]
    fn test_last_frame_error_is_kept_until_a_frame_succeeds() {
        let (handle, _, outcomes) = running_loop();
        let err = Error::render("triangle", "context lost");
        outcomes.borrow_mut().push_back(Err(err.clone()));

        fire(&handle);
        assert_eq!(handle.last_error(), Some(err));
        assert!(handle.is_running());
        assert_eq!(handle.tick(), 1);

        fire(&handle);
        assert_eq!(handle.last_error(), None);
    }

    #[test]
    fn test_refused_request_stops_the_loop() {
        let (handle, _, _) = running_loop();
        handle.state.scheduler.refuse.set(true);
        fire(&handle);
        assert!(!handle.is_running());
        assert_eq!(handle.tick(), 1);

        let state = weak_state(&handle);
        drop(handle);
        assert!(state.upgrade().is_none());
    }

    #[test]
    fn test_failed_start_releases_the_callback() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let state = FrameState::new(ManualFrames { events: events.clone(), ..Default::default() });
        state.scheduler().refuse.set(true);
        let frame_state = state.clone();
        *state.scheduler().callback.borrow_mut() = Some(Box::new(move || {
            frame_state.begin_frame();
        }));
        let weak = Rc::downgrade(&state);

        assert!(matches!(LoopHandle::start(state, "lesson"), Err(Error::Context(_))));
        assert!(weak.upgrade().is_none());
        assert_eq!(*events.borrow(), vec![Event::Release]);
    }
}
