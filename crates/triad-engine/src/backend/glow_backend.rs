use glow::{HasContext, PixelUnpackData};

use crate::paint::Color;
use crate::render::{
    AttributeDescriptor, ColorFormat, ComponentType, DrawMode, UniformValue, UsageHint,
};

use super::{ClearMask, GlBackend, ShaderStage, TextureFilter, TextureParameter, TextureWrap};

/// OpenGL backend over a `glow` context.
///
/// Every method forwards to exactly one (occasionally two) driver calls. The
/// context must be current on the calling thread for the whole lifetime of
/// this value and of every resource created through it.
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Direct access for calls outside the capability set.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

impl std::fmt::Debug for GlowBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowBackend")
            .field("version", self.gl.version())
            .finish()
    }
}

// SAFETY (all `unsafe` blocks below): `glow` marks every entry point unsafe
// because it requires a current context. That is a construction invariant of
// `GlowBackend`; slices passed to the driver are sized by the caller-validated
// lengths of the borrowed data.
impl GlBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, color: Color) {
        unsafe { self.gl.clear_color(color.r, color.g, color.b, color.a) }
    }

    fn clear(&self, mask: ClearMask) {
        let mut bits = 0;
        if mask.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if mask.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        if mask.contains(ClearMask::STENCIL) {
            bits |= glow::STENCIL_BUFFER_BIT;
        }
        unsafe { self.gl.clear(bits) }
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        let mode = match mode {
            DrawMode::Triangles => glow::TRIANGLES,
            DrawMode::Lines => glow::LINES,
            DrawMode::Points => glow::POINTS,
        };
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(ty) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn push_uniform(&self, location: &Self::UniformLocation, value: UniformValue) {
        let loc = Some(location);
        unsafe {
            match value {
                UniformValue::Vec1i(v) => self.gl.uniform_1_i32(loc, v),
                UniformValue::Vec1f(v) => self.gl.uniform_1_f32(loc, v),
                UniformValue::Vec2f(v) => self.gl.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3f(v) => self.gl.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4f(v) => self.gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat4f(m, order) => self.gl.uniform_matrix_4_f32_slice(
                    loc,
                    order.transposes(),
                    &m.to_cols_array(),
                ),
            }
        }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.bind_vertex_array(Some(vertex_array)) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_array_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer)) }
    }

    fn array_buffer_data(&self, data: &[u8], usage: UsageHint) {
        let usage = match usage {
            UsageHint::StaticDraw => glow::STATIC_DRAW,
            UsageHint::DynamicDraw => glow::DYNAMIC_DRAW,
            UsageHint::StreamDraw => glow::STREAM_DRAW,
        };
        unsafe { self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, usage) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: AttributeDescriptor,
        stride: i32,
        offset: i32,
    ) {
        // Integer components go through the float path, converted (and
        // optionally normalized) by the driver.
        let data_type = match attribute.ty {
            ComponentType::Float => glow::FLOAT,
            ComponentType::Int => glow::INT,
            ComponentType::Uint => glow::UNSIGNED_INT,
        };
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                attribute.count.get() as i32,
                data_type,
                attribute.normalize,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: Self::Texture) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, Some(texture)) }
    }

    fn texture_2d_parameter(&self, parameter: TextureParameter) {
        let (name, value) = match parameter {
            TextureParameter::WrapS(w) => (glow::TEXTURE_WRAP_S, wrap_value(w)),
            TextureParameter::WrapT(w) => (glow::TEXTURE_WRAP_T, wrap_value(w)),
            TextureParameter::MinFilter(f) => (glow::TEXTURE_MIN_FILTER, filter_value(f)),
            TextureParameter::MagFilter(f) => (glow::TEXTURE_MAG_FILTER, filter_value(f)),
        };
        unsafe { self.gl.tex_parameter_i32(glow::TEXTURE_2D, name, value as i32) }
    }

    fn texture_2d_image(
        &self,
        level: i32,
        format: ColorFormat,
        width: i32,
        height: i32,
        pixels: &[u8],
    ) {
        let format = match format {
            ColorFormat::Rgb => glow::RGB,
            ColorFormat::Rgba => glow::RGBA,
        };
        unsafe {
            // Rows are tightly packed; the default 4-byte alignment would
            // misread RGB rows whose length is not a multiple of four.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                level,
                format as i32,
                width,
                height,
                0,
                format,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
        }
    }

    fn generate_mipmap_2d(&self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }
}

fn wrap_value(wrap: TextureWrap) -> u32 {
    match wrap {
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
    }
}

fn filter_value(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}
