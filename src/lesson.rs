use log::*;
use std::marker::PhantomData;

use crate::device::*;
use crate::error::*;
use crate::scene::*;

/// The callbacks a frame driver invokes.
pub trait Lesson<D: Device> {
    /// Everything created at initialization and mutated each frame.
    type State;

    /// A short human-readable description of the lesson.
    fn info(&self) -> &str {
        ""
    }

    /// Called once, before any frame. An error here means no frame is ever rendered.
    fn on_initialize(&mut self, device: &D) -> Result<Self::State, Error>;

    /// Called once per frame.
    fn on_render(&mut self, state: &mut Self::State, frame: &FrameContext<'_, D>) -> Result<(), Error>;
}

enum LoopState<S> {
    Initializing,
    Rendering(S),
    Failed,
}

/// Runs a `Lesson`: initializes it once, then renders it every frame the driver asks for.
///
/// There's no way back from `Rendering` to `Initializing`; a failed initialization is final.
pub struct AnimationLoop<D: Device, L: Lesson<D>> {
    lesson: L,
    state: LoopState<L::State>,
    frames_rendered: u64,
    frames_failed: u64,
    phantom: PhantomData<fn(&D)>,
}

impl<D: Device, L: Lesson<D>> AnimationLoop<D, L> {
    pub fn new(lesson: L) -> Self {
        AnimationLoop {
            lesson,
            state: LoopState::Initializing,
            frames_rendered: 0,
            frames_failed: 0,
            phantom: PhantomData,
        }
    }

    pub fn initialize(&mut self, device: &D) -> Result<(), Error> {
        match self.state {
            LoopState::Initializing => {}
            _ => return Err(Error::AlreadyInitialized),
        }

        match self.lesson.on_initialize(device) {
            Ok(state) => {
                info!("Animation loop initialized");
                self.state = LoopState::Rendering(state);
                Ok(())
            }
            Err(err) => {
                error!("Animation loop failed to initialize: {}", err);
                self.state = LoopState::Failed;
                Err(err)
            }
        }
    }

    /// Renders one frame. A failed frame is reported but doesn't stop the loop.
    pub fn frame(&mut self, frame: &FrameContext<'_, D>) -> Result<(), Error> {
        let state = match &mut self.state {
            LoopState::Rendering(state) => state,
            _ => return Err(Error::NotRendering),
        };

        match self.lesson.on_render(state, frame) {
            Ok(()) => {
                self.frames_rendered += 1;
                Ok(())
            }
            Err(err) => {
                self.frames_failed += 1;
                warn!("Frame {} failed: {}", frame.tick, err);
                Err(err)
            }
        }
    }

    pub fn is_rendering(&self) -> bool {
        match self.state {
            LoopState::Rendering(_) => true,
            _ => false,
        }
    }

    pub fn has_failed(&self) -> bool {
        match self.state {
            LoopState::Failed => true,
            _ => false,
        }
    }

    /// The lesson's state, once initialized.
    pub fn state(&self) -> Option<&L::State> {
        match &self.state {
            LoopState::Rendering(state) => Some(state),
            _ => None,
        }
    }

    pub fn lesson(&self) -> &L {
        &self.lesson
    }

    pub fn info(&self) -> &str {
        self.lesson.info()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }
}
