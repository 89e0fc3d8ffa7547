use serde::*;
use std::fmt;
use uid::*;

use crate::error::*;
use crate::geometry::*;
use crate::uniforms::*;

#[doc(hidden)]
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub struct ProgramId_(());

/// Identifies a linked program for the lifetime of the process.
pub type ProgramId = Id<ProgramId_>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShaderType {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderType::Vertex => write!(f, "vertex"),
            ShaderType::Fragment => write!(f, "fragment"),
        }
    }
}

/// A buffer that can be cleared at the start of a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClearBuffer {
    Color([f32; 4]),
    Depth(f32),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DepthFunc {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Fixed-function state set once when a lesson initializes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParameters {
    /// `None` disables the depth test.
    pub depth_test: Option<DepthFunc>,
    pub cull_face: bool,
    /// Blend with premultiplied alpha (`ONE`, `ONE_MINUS_SRC_ALPHA`).
    pub blend: bool,
}

impl Default for RenderParameters {
    fn default() -> Self {
        RenderParameters { depth_test: Some(DepthFunc::LessOrEqual), cull_face: false, blend: false }
    }
}

/// A runtime buffer together with the attribute it was uploaded from.
pub struct VertexBuffer<B> {
    pub name: String,
    pub components: u32,
    pub buffer: B,
}

/// Everything the runtime needs to issue a single draw.
pub struct DrawCall<'a, D: Device> {
    /// Name of the drawable, used in error messages and logs.
    pub label: &'a str,
    pub program: &'a D::Program,
    pub attributes: &'a [VertexBuffer<D::Buffer>],
    pub uniforms: &'a Uniforms,
    pub mode: DrawMode,
    pub vertex_count: u32,
}

/// The graphics runtime: owns the device context, uploads buffers, compiles programs and
/// executes draw calls.
///
/// Methods take `&self`; implementations that keep state use interior mutability. Callers
/// only borrow a `Device` for the duration of a call.
pub trait Device: Sized {
    /// A compiled and linked shader program. Cloning shares the same program.
    type Program: Clone;
    /// An uploaded vertex buffer.
    type Buffer;

    fn set_parameters(&self, params: &RenderParameters);

    fn compile_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self::Program, Error>;

    fn upload_buffer(&self, name: &str, components: u32, data: &[f32]) -> Result<Self::Buffer, Error>;

    fn clear(&self, buffers: &[ClearBuffer]);

    fn draw(&self, call: &DrawCall<'_, Self>) -> Result<(), Error>;
}
