use cgmath::*;
use log::*;
use web_sys::*;

use crate::context::*;
use crate::rect::*;

/// The canvas' default framebuffer.
pub struct ScreenSurface {
    viewport: Rect<i32>,
    canvas: HtmlCanvasElement,
}

impl ScreenSurface {
    pub(crate) fn new(context: &GlContext, canvas: HtmlCanvasElement) -> Self {
        let viewport = Rect::from_size(vec2(canvas.width() as i32, canvas.height() as i32));
        context.viewport(&viewport);
        ScreenSurface { viewport, canvas }
    }

    /// Resizes the canvas.
    pub fn set_size(&mut self, context: &GlContext, new_size: Vector2<u32>) {
        self.canvas.set_width(new_size.x);
        self.canvas.set_height(new_size.y);
        self.viewport = Rect::from_size(vec2(new_size.x as i32, new_size.y as i32));
        // Resizing requires that we also change the viewport to match
        context.viewport(&self.viewport);
    }

    /// Matches the canvas' drawing buffer to its displayed size. Does nothing while the
    /// canvas isn't laid out.
    pub fn sync_size(&mut self, context: &GlContext) {
        let width = self.canvas.client_width();
        let height = self.canvas.client_height();
        if width <= 0 || height <= 0 {
            return;
        }
        let new_size = vec2(width as u32, height as u32);
        if new_size != self.size() {
            debug!("Canvas resized to {}x{}", new_size.x, new_size.y);
            self.set_size(context, new_size);
        }
    }

    /// Returns the size of the surface.
    pub fn size(&self) -> Vector2<u32> {
        vec2(self.canvas.width(), self.canvas.height())
    }

    /// Width over height, if the canvas has any area.
    pub fn aspect(&self) -> Option<f32> {
        self.viewport.aspect()
    }

    /// Returns the canvas corresponding to this surface.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}
