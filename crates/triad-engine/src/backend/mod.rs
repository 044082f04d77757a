//! Graphics driver seam.
//!
//! [`GlBackend`] is the only path to raw graphics API entry points. The
//! resource wrappers in [`crate::render`] are written against it, so the same
//! code drives a real GL context through [`GlowBackend`] and a call log through
//! [`RecordingBackend`].
//!
//! Every call is direct and unbuffered. Methods act on whatever object the
//! driver currently has bound; callers bind first.

mod glow_backend;
pub mod recording;

use std::fmt::Debug;

use bitflags::bitflags;

use crate::paint::Color;
use crate::render::{AttributeDescriptor, ColorFormat, DrawMode, UniformValue, UsageHint};

pub use glow_backend::GlowBackend;
pub use recording::{GlCall, RecordingBackend};

/// Pipeline stage of a shader object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

bitflags! {
    /// Framebuffer planes reset by [`GlBackend::clear`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Sampling state of the currently bound 2D texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureParameter {
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
}

/// Raw driver capability set.
///
/// Object creation returns the driver's message on failure. Info logs are
/// returned untruncated.
pub trait GlBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;
    type Texture: Copy + Debug;
    type UniformLocation: Clone + Debug;

    // Framebuffer + draw.
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, color: Color);
    fn clear(&self, mask: ClearMask);
    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32);

    // Shaders.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Sets the source of `shader`, compiles it and returns the compile status.
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // Programs + uniforms.
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Links `program` and returns the link status.
    fn link_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Self::Program);
    fn delete_program(&self, program: Self::Program);
    /// `None` when the program has no active uniform of that exact name.
    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    /// Pushes `value` to `location` of the program in use.
    fn push_uniform(&self, location: &Self::UniformLocation, value: UniformValue);

    // Vertex arrays + buffers.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Self::VertexArray);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_array_buffer(&self, buffer: Self::Buffer);
    fn array_buffer_data(&self, data: &[u8], usage: UsageHint);
    /// Declares attribute `index` of the bound vertex array, sourced from the bound buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: AttributeDescriptor,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);

    // Textures.
    fn create_texture(&self) -> Result<Self::Texture, String>;
    /// Selects texture unit `unit` (0-based) for subsequent binds.
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture_2d(&self, texture: Self::Texture);
    fn texture_2d_parameter(&self, parameter: TextureParameter);
    /// Uploads tightly packed, row-major pixels to the bound 2D texture.
    fn texture_2d_image(
        &self,
        level: i32,
        format: ColorFormat,
        width: i32,
        height: i32,
        pixels: &[u8],
    );
    fn generate_mipmap_2d(&self);
    fn delete_texture(&self, texture: Self::Texture);
}
