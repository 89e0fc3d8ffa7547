use thiserror::Error;

use crate::device::ShaderType;

/// Why an attribute was rejected while building a `Geometry`.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AttributeFault {
    #[error("the geometry has no attributes")]
    NoAttributes,
    #[error("component count {0} is outside 1..=4")]
    ComponentCount(u32),
    #[error("the buffer is empty")]
    Empty,
    #[error("buffer length {len} is not a multiple of the component count {components}")]
    Misaligned { len: usize, components: u32 },
    #[error("describes {found} vertices but the geometry has {expected}")]
    VertexCountMismatch { expected: usize, found: usize },
    #[error("the name is used by more than one attribute")]
    Duplicate,
}

/// Errors surfaced by geometry construction, the graphics runtime and the animation loop.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("invalid attribute `{name}`: {fault}")]
    InvalidAttribute { name: String, fault: AttributeFault },

    #[error("invalid transform: {field} {value:?} has a non-finite component")]
    InvalidTransform { field: &'static str, value: [f32; 3] },

    #[error("error compiling {stage} shader: {log}")]
    ShaderCompile { stage: ShaderType, log: String },

    #[error("error linking program: {0}")]
    ProgramLink(String),

    #[error("error drawing `{drawable}`: {reason}")]
    Render { drawable: String, reason: String },

    #[error("unable to create graphics context: {0}")]
    Context(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("the animation loop has already been initialized")]
    AlreadyInitialized,

    #[error("the animation loop is not rendering")]
    NotRendering,
}

impl Error {
    pub(crate) fn attribute(name: &str, fault: AttributeFault) -> Self {
        Error::InvalidAttribute { name: name.to_string(), fault }
    }

    pub(crate) fn render(drawable: &str, reason: impl Into<String>) -> Self {
        Error::Render { drawable: drawable.to_string(), reason: reason.into() }
    }

    /// True for errors that stop the animation loop from ever rendering. Transform and render
    /// errors only cost the frame they happen in.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Render { .. } | Error::InvalidTransform { .. } | Error::NotRendering => false,
            _ => true,
        }
    }
}
