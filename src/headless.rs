//! A `Device` that records what it's asked to do instead of talking to a GPU.

use log::*;
use std::cell::RefCell;

use crate::device::*;
use crate::error::*;
use crate::geometry::*;
use crate::uniforms::*;

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessProgram {
    id: ProgramId,
}

impl HeadlessProgram {
    pub fn id(&self) -> ProgramId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessBuffer {
    components: u32,
    len: usize,
}

/// A draw call as seen by the headless device.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    pub label: String,
    pub program: ProgramId,
    pub attributes: Vec<String>,
    pub uniforms: Uniforms,
    pub mode: DrawMode,
    pub vertex_count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
    SetParameters(RenderParameters),
    CompileProgram { linked: bool },
    UploadBuffer { name: String, components: u32, len: usize },
    Clear(Vec<ClearBuffer>),
    Draw(DrawRecord),
}

#[derive(Default)]
struct Failures {
    compile: Option<ShaderType>,
    link: bool,
    draws_of: Vec<String>,
}

/// Records every call in order, and can be told to fail compiles, links or draws.
#[derive(Default)]
pub struct HeadlessDevice {
    calls: RefCell<Vec<DeviceCall>>,
    failures: RefCell<Failures>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following compile of the given stage fail.
    pub fn fail_compile(&self, stage: ShaderType) {
        self.failures.borrow_mut().compile = Some(stage);
    }

    /// Makes every following link fail.
    pub fn fail_link(&self) {
        self.failures.borrow_mut().link = true;
    }

    /// Makes every following draw of the drawable named `label` fail.
    pub fn fail_draws_of(&self, label: &str) {
        self.failures.borrow_mut().draws_of.push(label.to_string());
    }

    pub fn clear_failures(&self) {
        *self.failures.borrow_mut() = Failures::default();
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn draws(&self) -> Vec<DrawRecord> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Draw(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets the recorded calls, e.g. between frames.
    pub fn take_calls(&self) -> Vec<DeviceCall> {
        self.calls.replace(vec![])
    }

    fn record(&self, call: DeviceCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check_source(&self, stage: ShaderType, source: &str) -> Result<(), Error> {
        if self.failures.borrow().compile == Some(stage) {
            return Err(Error::ShaderCompile { stage, log: "injected compile failure".to_string() });
        }
        if !source.contains("main") {
            return Err(Error::ShaderCompile { stage, log: "no entry point `main`".to_string() });
        }
        Ok(())
    }
}

impl Device for HeadlessDevice {
    type Program = HeadlessProgram;
    type Buffer = HeadlessBuffer;

    fn set_parameters(&self, params: &RenderParameters) {
        self.record(DeviceCall::SetParameters(*params));
    }

    fn compile_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<HeadlessProgram, Error> {
        let result = self
            .check_source(ShaderType::Vertex, vertex_source)
            .and_then(|()| self.check_source(ShaderType::Fragment, fragment_source))
            .and_then(|()| {
                if self.failures.borrow().link {
                    Err(Error::ProgramLink("injected link failure".to_string()))
                } else {
                    Ok(HeadlessProgram { id: ProgramId::new() })
                }
            });
        self.record(DeviceCall::CompileProgram { linked: result.is_ok() });
        if let Err(err) = &result {
            error!("{}", err);
        }
        result
    }

    fn upload_buffer(&self, name: &str, components: u32, data: &[f32]) -> Result<HeadlessBuffer, Error> {
        self.record(DeviceCall::UploadBuffer {
            name: name.to_string(),
            components,
            len: data.len(),
        });
        Ok(HeadlessBuffer { components, len: data.len() })
    }

    fn clear(&self, buffers: &[ClearBuffer]) {
        self.record(DeviceCall::Clear(buffers.to_vec()));
    }

    fn draw(&self, call: &DrawCall<'_, Self>) -> Result<(), Error> {
        if self.failures.borrow().draws_of.iter().any(|label| label == call.label) {
            return Err(Error::render(call.label, "injected draw failure"));
        }
        for attr in call.attributes {
            let available = attr.buffer.len / attr.buffer.components.max(1) as usize;
            if available < call.vertex_count as usize {
                return Err(Error::render(
                    call.label,
                    format!(
                        "attribute `{}` holds {} vertices, {} requested",
                        attr.name, available, call.vertex_count
                    ),
                ));
            }
        }

        self.record(DeviceCall::Draw(DrawRecord {
            label: call.label.to_string(),
            program: call.program.id,
            attributes: call.attributes.iter().map(|attr| attr.name.clone()).collect(),
            uniforms: call.uniforms.clone(),
            mode: call.mode,
            vertex_count: call.vertex_count,
        }));
        Ok(())
    }
}
