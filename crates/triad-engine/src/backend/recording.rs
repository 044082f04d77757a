//! Recording backend for tests and headless development.
//!
//! Performs no GPU work. Every call is appended to an in-order log that
//! tests inspect with [`RecordingBackend::calls`]. Shader compilation, program
//! linking and the set of active uniforms are scripted up front.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::paint::Color;
use crate::render::{AttributeDescriptor, ColorFormat, DrawMode, UniformValue, UsageHint};

use super::{ClearMask, GlBackend, ShaderStage, TextureParameter};

/// One recorded backend call. Object ids are assigned from 1 upward.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    ClearColor(Color),
    Clear(ClearMask),
    DrawArrays { mode: DrawMode, first: i32, count: i32 },

    CreateShader { shader: u32, stage: ShaderStage },
    CompileShader { shader: u32, stage: ShaderStage },
    ShaderInfoLog(u32),
    DeleteShader(u32),

    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    ProgramInfoLog(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    UniformLocation { program: u32, name: String },
    PushUniform { location: u32, value: UniformValue },

    CreateVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindArrayBuffer(u32),
    ArrayBufferData { data: Vec<u8>, usage: UsageHint },
    VertexAttribPointer { index: u32, attribute: AttributeDescriptor, stride: i32, offset: i32 },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    DeleteBuffer(u32),

    CreateTexture(u32),
    ActiveTextureUnit(u32),
    BindTexture2d(u32),
    Texture2dParameter(TextureParameter),
    Texture2dImage { level: i32, format: ColorFormat, width: i32, height: i32, len: usize },
    GenerateMipmap2d,
    DeleteTexture(u32),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<GlCall>>,
    next_id: Cell<u32>,
    shader_stages: RefCell<HashMap<u32, ShaderStage>>,

    uniforms: Vec<String>,
    failing_stage: Option<(ShaderStage, String)>,
    failing_link: Option<String>,
}

impl RecordingBackend {
    /// Backend whose programs compile and link and expose no uniforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the active uniforms of every linked program.
    ///
    /// A uniform's location is its position in `names`.
    pub fn with_uniforms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uniforms = names.into_iter().map(Into::into).collect();
        self
    }

    /// Makes every compile of `stage` fail with `log` as the info log.
    pub fn failing_compile(mut self, stage: ShaderStage, log: impl Into<String>) -> Self {
        self.failing_stage = Some((stage, log.into()));
        self
    }

    /// Makes every link fail with `log` as the info log.
    pub fn failing_link(mut self, log: impl Into<String>) -> Self {
        self.failing_link = Some(log.into());
        self
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Returns and clears the call log.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: GlCall) {
        log::trace!("RecordingBackend: {call:?}");
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn stage_of(&self, shader: u32) -> ShaderStage {
        self.shader_stages
            .borrow()
            .get(&shader)
            .copied()
            .unwrap_or(ShaderStage::Vertex)
    }
}

impl GlBackend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport { x, y, width, height });
    }

    fn clear_color(&self, color: Color) {
        self.record(GlCall::ClearColor(color));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCall::Clear(mask));
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let shader = self.allocate();
        self.shader_stages.borrow_mut().insert(shader, stage);
        self.record(GlCall::CreateShader { shader, stage });
        Ok(shader)
    }

    fn compile_shader(&self, shader: u32, _source: &str) -> bool {
        let stage = self.stage_of(shader);
        self.record(GlCall::CompileShader { shader, stage });
        !matches!(&self.failing_stage, Some((failing, _)) if *failing == stage)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.record(GlCall::ShaderInfoLog(shader));
        match &self.failing_stage {
            Some((stage, log)) if *stage == self.stage_of(shader) => log.clone(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let program = self.allocate();
        self.record(GlCall::CreateProgram(program));
        Ok(program)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::AttachShader { program, shader });
    }

    fn link_program(&self, program: u32) -> bool {
        self.record(GlCall::LinkProgram(program));
        self.failing_link.is_none()
    }

    fn program_info_log(&self, program: u32) -> String {
        self.record(GlCall::ProgramInfoLog(program));
        self.failing_link.clone().unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.record(GlCall::UniformLocation {
            program,
            name: name.to_owned(),
        });
        self.uniforms.iter().position(|u| u == name).map(|i| i as u32)
    }

    fn push_uniform(&self, location: &u32, value: UniformValue) {
        self.record(GlCall::PushUniform {
            location: *location,
            value,
        });
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: u32) {
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[u8], usage: UsageHint) {
        self.record(GlCall::ArrayBufferData {
            data: data.to_vec(),
            usage,
        });
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: AttributeDescriptor,
        stride: i32,
        offset: i32,
    ) {
        self.record(GlCall::VertexAttribPointer {
            index,
            attribute,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray(index));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn create_texture(&self) -> Result<u32, String> {
        let id = self.allocate();
        self.record(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(GlCall::ActiveTextureUnit(unit));
    }

    fn bind_texture_2d(&self, texture: u32) {
        self.record(GlCall::BindTexture2d(texture));
    }

    fn texture_2d_parameter(&self, parameter: TextureParameter) {
        self.record(GlCall::Texture2dParameter(parameter));
    }

    fn texture_2d_image(
        &self,
        level: i32,
        format: ColorFormat,
        width: i32,
        height: i32,
        pixels: &[u8],
    ) {
        self.record(GlCall::Texture2dImage {
            level,
            format,
            width,
            height,
            len: pixels.len(),
        });
    }

    fn generate_mipmap_2d(&self) {
        self.record(GlCall::GenerateMipmap2d);
    }

    fn delete_texture(&self, texture: u32) {
        self.record(GlCall::DeleteTexture(texture));
    }
}
