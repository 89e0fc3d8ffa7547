use log::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::*;

use crate::buffer::*;
use crate::device::*;
use crate::error::*;
use crate::geometry::*;
use crate::program::*;
use crate::rect::*;
use crate::surface::*;
use crate::uniforms::*;

pub(crate) type WebGl2 = WebGl2RenderingContext;

#[derive(Default)]
pub(crate) struct GlCache {
    pub(crate) bound_program: Option<ProgramId>,
}

/// A WebGL context.
#[derive(Clone)]
pub struct GlContext {
    pub(crate) inner: WebGl2RenderingContext,
    pub(crate) cache: Rc<RefCell<GlCache>>,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum GlFlag {
    DepthTest,
    CullFace,
    Blend,
}

impl GlFlag {
    fn as_gl(self) -> u32 {
        match self {
            GlFlag::DepthTest => WebGl2::DEPTH_TEST,
            GlFlag::CullFace => WebGl2::CULL_FACE,
            GlFlag::Blend => WebGl2::BLEND,
        }
    }
}

impl DrawMode {
    fn as_gl(self) -> u32 {
        match self {
            DrawMode::Points => WebGl2::POINTS,
            DrawMode::Lines => WebGl2::LINES,
            DrawMode::LineLoop => WebGl2::LINE_LOOP,
            DrawMode::LineStrip => WebGl2::LINE_STRIP,
            DrawMode::Triangles => WebGl2::TRIANGLES,
            DrawMode::TriangleStrip => WebGl2::TRIANGLE_STRIP,
            DrawMode::TriangleFan => WebGl2::TRIANGLE_FAN,
        }
    }
}

impl DepthFunc {
    fn as_gl(self) -> u32 {
        match self {
            DepthFunc::Never => WebGl2::NEVER,
            DepthFunc::Less => WebGl2::LESS,
            DepthFunc::Equal => WebGl2::EQUAL,
            DepthFunc::LessOrEqual => WebGl2::LEQUAL,
            DepthFunc::Greater => WebGl2::GREATER,
            DepthFunc::NotEqual => WebGl2::NOTEQUAL,
            DepthFunc::GreaterOrEqual => WebGl2::GEQUAL,
            DepthFunc::Always => WebGl2::ALWAYS,
        }
    }
}

impl GlContext {
    /// Creates a `GlContext` and associated surface for the canvas with the given id.
    ///
    /// Returns an error if the WebGl 2 context couldn't be created.
    pub fn new(canvas_id: &str) -> Result<(Self, ScreenSurface), Error> {
        let document = window()
            .and_then(|window| window.document())
            .ok_or_else(|| Error::Context("no document".to_string()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| Error::Context(format!("no element with id `{}`", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::Context(format!("`{}` is not a canvas", canvas_id)))?;
        let context = canvas
            .get_context_with_context_options(
                "webgl2",
                WebGlContextAttributes::new().antialias(true).as_ref(),
            )
            .map_err(|err| Error::Context(format!("{:?}", err)))?
            .ok_or_else(|| Error::Context("WebGL 2 is not supported".to_string()))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| Error::Context("unexpected context type".to_string()))?;
        info!("Created WebGL 2 context for `{}`", canvas_id);

        let context = GlContext { inner: context, cache: Rc::new(RefCell::new(GlCache::default())) };
        let surface = ScreenSurface::new(&context, canvas);
        Ok((context, surface))
    }

    pub(crate) fn viewport(&self, viewport: &Rect<i32>) {
        let size = viewport.size();
        self.inner.viewport(viewport.start.x, viewport.start.y, size.x, size.y);
    }

    pub(crate) fn enable(&self, flag: GlFlag) {
        self.inner.enable(flag.as_gl());
    }

    pub(crate) fn disable(&self, flag: GlFlag) {
        self.inner.disable(flag.as_gl());
    }

    fn set_uniform(&self, loc: &WebGlUniformLocation, value: &UniformValue) {
        match value {
            UniformValue::Float(val) => self.inner.uniform1f(Some(loc), *val),
            UniformValue::Vec2(val) => self.inner.uniform2f(Some(loc), val[0], val[1]),
            UniformValue::Vec3(val) => self.inner.uniform3f(Some(loc), val[0], val[1], val[2]),
            UniformValue::Vec4(val) => {
                self.inner.uniform4f(Some(loc), val[0], val[1], val[2], val[3])
            }
            UniformValue::Mat4(mat) => {
                let mut data: [f32; 16] = *AsRef::<[f32; 16]>::as_ref(mat);
                self.inner.uniform_matrix4fv_with_f32_array(Some(loc), false, &mut data);
            }
        }
    }
}

impl Device for GlContext {
    type Program = GlProgram;
    type Buffer = GlBuffer;

    fn set_parameters(&self, params: &RenderParameters) {
        match params.depth_test {
            Some(func) => {
                self.enable(GlFlag::DepthTest);
                self.inner.depth_func(func.as_gl());
            }
            None => self.disable(GlFlag::DepthTest),
        }
        if params.cull_face {
            self.enable(GlFlag::CullFace);
        } else {
            self.disable(GlFlag::CullFace);
        }
        if params.blend {
            self.enable(GlFlag::Blend);
            self.inner.blend_func(WebGl2::ONE, WebGl2::ONE_MINUS_SRC_ALPHA);
        } else {
            self.disable(GlFlag::Blend);
        }
    }

    fn compile_program(&self, vertex_source: &str, fragment_source: &str) -> Result<GlProgram, Error> {
        GlProgram::new(self, vertex_source, fragment_source)
    }

    fn upload_buffer(&self, name: &str, components: u32, data: &[f32]) -> Result<GlBuffer, Error> {
        debug!("Uploading `{}`: {} floats, {} per vertex", name, data.len(), components);
        GlBuffer::new(self, data)
    }

    fn clear(&self, buffers: &[ClearBuffer]) {
        let mut bits = 0;
        for buffer in buffers {
            match buffer {
                ClearBuffer::Color(color) => {
                    bits |= WebGl2::COLOR_BUFFER_BIT;
                    self.inner.clear_color(color[0], color[1], color[2], color[3]);
                }
                ClearBuffer::Depth(depth) => {
                    bits |= WebGl2::DEPTH_BUFFER_BIT;
                    self.inner.clear_depth(*depth);
                }
            }
        }
        if bits != 0 {
            self.inner.clear(bits);
        }
    }

    fn draw(&self, call: &DrawCall<'_, Self>) -> Result<(), Error> {
        call.program.bind(self);

        for attr in call.attributes {
            let loc = call.program.attrib_location(self, &attr.name);
            if loc < 0 {
                trace!("`{}` has no active attribute `{}`", call.label, attr.name);
                continue;
            }
            attr.buffer.bind(self);
            self.inner.enable_vertex_attrib_array(loc as u32);
            self.inner.vertex_attrib_pointer_with_i32(
                loc as u32,
                attr.components as i32,
                WebGl2::FLOAT,
                false,
                0,
                0,
            );
        }

        for (name, value) in call.uniforms.iter() {
            match call.program.uniform_location(self, name) {
                Some(loc) => self.set_uniform(&loc, value),
                None => trace!("`{}` has no active uniform `{}`", call.label, name),
            }
        }

        self.inner.draw_arrays(call.mode.as_gl(), 0, call.vertex_count as i32);

        match self.inner.get_error() {
            WebGl2::NO_ERROR => Ok(()),
            WebGl2::CONTEXT_LOST_WEBGL => Err(Error::render(call.label, "context lost")),
            code => Err(Error::render(call.label, format!("WebGL error 0x{:04x}", code))),
        }
    }
}
