//! Drives a `Lesson` from `requestAnimationFrame`.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::*;
use crate::context::*;
use crate::error::*;
use crate::lesson::*;
use crate::movement::*;
use crate::scene::*;
use crate::schedule::*;

/// Schedules frames on the browser's display refresh.
pub struct BrowserFrames {
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameScheduler for BrowserFrames {
    fn request(&self) -> Result<i32, Error> {
        let window = web_sys::window().ok_or_else(|| Error::Context("no window".to_string()))?;
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| Error::Context("animation loop was stopped".to_string()))?;
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| Error::Context(format!("{:?}", err)))
    }

    fn cancel(&self, request: i32) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(request);
        }
    }

    fn release(&self) {
        self.callback.borrow_mut().take();
    }
}

/// Creates a WebGL context on the canvas, initializes the lesson and starts rendering it
/// once per display refresh.
///
/// If initialization fails, no frame is ever scheduled.
pub fn start<L>(canvas_id: &str, lesson: L) -> Result<LoopHandle<BrowserFrames>, Error>
where
    L: Lesson<GlContext> + 'static,
    L::State: 'static,
{
    let (context, mut surface) = GlContext::new(canvas_id)?;
    let mut animation_loop = AnimationLoop::new(lesson);
    animation_loop.initialize(&context)?;
    let info = animation_loop.info().to_string();

    let state = FrameState::new(BrowserFrames { callback: RefCell::new(None) });
    let frame_state = state.clone();
    let callback = Closure::wrap(Box::new(move || {
        let tick = match frame_state.begin_frame() {
            Some(tick) => tick,
            None => return,
        };

        surface.sync_size(&context);
        let aspect = surface.aspect().unwrap_or(1.0);
        let result = animation_loop.frame(&FrameContext::new(&context, tick, aspect));
        frame_state.end_frame(result);
    }) as Box<dyn FnMut()>);
    *state.scheduler().callback.borrow_mut() = Some(callback);

    LoopHandle::start(state, &info)
}

/// A running lesson, as seen from JavaScript. Freeing it stops the lesson.
#[wasm_bindgen]
pub struct LessonHandle {
    handle: LoopHandle<BrowserFrames>,
}

#[wasm_bindgen]
impl LessonHandle {
    pub fn stop(&self) {
        self.handle.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn tick(&self) -> f64 {
        self.handle.tick() as f64
    }

    pub fn info(&self) -> String {
        self.handle.info().to_string()
    }

    /// Why the most recent frame failed, if it did.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.handle.last_error().map(|err| err.to_string())
    }
}

/// Starts the movement lesson on the canvas with the given id. `config_json` is an optional
/// `LessonConfig` in JSON form.
#[wasm_bindgen(js_name = startMovementLesson)]
pub fn start_movement_lesson(canvas_id: &str, config_json: Option<String>) -> Result<LessonHandle, JsValue> {
    let config = match config_json {
        Some(json) => LessonConfig::from_json(&json),
        None => Ok(LessonConfig::default()),
    }
    .map_err(|err| JsValue::from_str(&err.to_string()))?;

    start(canvas_id, MovementLesson::new(config))
        .map(|handle| LessonHandle { handle })
        .map_err(|err| JsValue::from_str(&err.to_string()))
}
