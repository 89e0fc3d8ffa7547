use js_sys::Float32Array;
use web_sys::*;

use crate::context::*;
use crate::error::*;

/// A vertex buffer holding `f32` data.
pub struct GlBuffer {
    buffer: WebGlBuffer,
    len: usize,
    context: GlContext,
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        self.context.inner.delete_buffer(Some(&self.buffer));
    }
}

impl GlBuffer {
    pub(crate) fn new(context: &GlContext, data: &[f32]) -> Result<Self, Error> {
        let buffer = context
            .inner
            .create_buffer()
            .ok_or_else(|| Error::Context("unable to create buffer".to_string()))?;
        context.inner.bind_buffer(WebGl2::ARRAY_BUFFER, Some(&buffer));

        // Copies out of wasm memory, so `data` doesn't need to outlive the call.
        let array = Float32Array::from(data);
        context.inner.buffer_data_with_array_buffer_view(
            WebGl2::ARRAY_BUFFER,
            &array,
            WebGl2::STATIC_DRAW,
        );

        Ok(GlBuffer { buffer, len: data.len(), context: context.clone() })
    }

    pub(crate) fn bind(&self, context: &GlContext) {
        context.inner.bind_buffer(WebGl2::ARRAY_BUFFER, Some(&self.buffer));
    }

    /// The number of floats in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
