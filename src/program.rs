use log::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::*;

use crate::context::*;
use crate::device::*;
use crate::error::*;

impl ShaderType {
    fn as_gl(self) -> u32 {
        match self {
            ShaderType::Vertex => WebGl2::VERTEX_SHADER,
            ShaderType::Fragment => WebGl2::FRAGMENT_SHADER,
        }
    }
}

/// A linked WebGL program. Cloning shares the underlying program.
#[derive(Clone)]
pub struct GlProgram {
    inner: Rc<GlProgramInner>,
}

struct GlProgramInner {
    program: WebGlProgram,
    id: ProgramId,
    context: GlContext,
    vert_shader: WebGlShader,
    frag_shader: WebGlShader,
    attrib_locations: RefCell<HashMap<String, i32>>,
    uniform_locations: RefCell<HashMap<String, Option<WebGlUniformLocation>>>,
}

impl Drop for GlProgramInner {
    fn drop(&mut self) {
        self.context.inner.delete_program(Some(&self.program));
        self.context.inner.delete_shader(Some(&self.vert_shader));
        self.context.inner.delete_shader(Some(&self.frag_shader));
    }
}

impl GlProgram {
    pub fn new(context: &GlContext, vert_shader_source: &str, frag_shader_source: &str) -> Result<Self, Error> {
        let vert_shader = Self::load_shader(context, ShaderType::Vertex, vert_shader_source)?;
        let frag_shader = match Self::load_shader(context, ShaderType::Fragment, frag_shader_source) {
            Ok(shader) => shader,
            Err(err) => {
                context.inner.delete_shader(Some(&vert_shader));
                return Err(err);
            }
        };

        let program = context
            .inner
            .create_program()
            .ok_or_else(|| Error::ProgramLink("unable to create program".to_string()))?;
        context.inner.attach_shader(&program, &vert_shader);
        context.inner.attach_shader(&program, &frag_shader);
        context.inner.link_program(&program);

        let link_status = context
            .inner
            .get_program_parameter(&program, WebGl2::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !link_status {
            let log = context.inner.get_program_info_log(&program).unwrap_or_default();
            error!("Error linking program: {}", log);
            context.inner.delete_program(Some(&program));
            context.inner.delete_shader(Some(&vert_shader));
            context.inner.delete_shader(Some(&frag_shader));
            return Err(Error::ProgramLink(log));
        }
        debug!("Linked program");

        Ok(GlProgram {
            inner: Rc::new(GlProgramInner {
                program,
                id: ProgramId::new(),
                context: context.clone(),
                vert_shader,
                frag_shader,
                attrib_locations: RefCell::new(HashMap::new()),
                uniform_locations: RefCell::new(HashMap::new()),
            }),
        })
    }

    fn load_shader(context: &GlContext, shader_type: ShaderType, source: &str) -> Result<WebGlShader, Error> {
        let shader = context.inner.create_shader(shader_type.as_gl()).ok_or_else(|| {
            Error::ShaderCompile { stage: shader_type, log: "unable to create shader".to_string() }
        })?;
        context.inner.shader_source(&shader, source);
        context.inner.compile_shader(&shader);

        let compile_status = context
            .inner
            .get_shader_parameter(&shader, WebGl2::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !compile_status {
            let log = context.inner.get_shader_info_log(&shader).unwrap_or_default();
            error!("Error compiling {} shader: {}", shader_type, log);
            context.inner.delete_shader(Some(&shader));
            return Err(Error::ShaderCompile { stage: shader_type, log });
        }

        Ok(shader)
    }

    pub fn id(&self) -> ProgramId {
        self.inner.id
    }

    pub(crate) fn bind(&self, context: &GlContext) {
        let mut cache = context.cache.borrow_mut();
        if cache.bound_program != Some(self.inner.id) {
            cache.bound_program = Some(self.inner.id);
            context.inner.use_program(Some(&self.inner.program));
        }
    }

    /// The location of an attribute, or -1 if the program doesn't use it.
    pub(crate) fn attrib_location(&self, context: &GlContext, name: &str) -> i32 {
        *self
            .inner
            .attrib_locations
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| context.inner.get_attrib_location(&self.inner.program, name))
    }

    pub(crate) fn uniform_location(&self, context: &GlContext, name: &str) -> Option<WebGlUniformLocation> {
        self.inner
            .uniform_locations
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| context.inner.get_uniform_location(&self.inner.program, name))
            .clone()
    }
}
