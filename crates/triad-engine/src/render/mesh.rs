use crate::backend::GlBackend;

use super::program::Program;
use super::texture::Texture2D;
use super::vertex_buffer::VertexBuffer;

/// Primitive assembly mode of a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Triangles,
    Lines,
    Points,
}

/// How to interpret a vertex buffer's contents when drawing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GeometryDescription {
    pub mode: DrawMode,
    pub vertex_count: usize,
}

impl GeometryDescription {
    #[inline]
    pub const fn new(mode: DrawMode, vertex_count: usize) -> Self {
        Self { mode, vertex_count }
    }

    #[inline]
    pub const fn triangles(vertex_count: usize) -> Self {
        Self::new(DrawMode::Triangles, vertex_count)
    }

    /// Vertex count as the driver's signed count, saturated at `i32::MAX`.
    #[inline]
    pub fn draw_count(&self) -> i32 {
        i32::try_from(self.vertex_count).unwrap_or(i32::MAX)
    }
}

/// One drawable: a program, its vertex data and the textures it samples.
///
/// The mesh is the sole owner of its resources; they are released with it.
pub struct Mesh<B: GlBackend> {
    program: Program<B>,
    vertex_buffer: VertexBuffer<B>,
    textures: Vec<Texture2D<B>>,
    geometry: GeometryDescription,
}

impl<B: GlBackend> Mesh<B> {
    pub fn new(
        program: Program<B>,
        vertex_buffer: VertexBuffer<B>,
        textures: Vec<Texture2D<B>>,
        geometry: GeometryDescription,
    ) -> Self {
        Self {
            program,
            vertex_buffer,
            textures,
            geometry,
        }
    }

    /// Draws the mesh into whatever framebuffer is current.
    ///
    /// Order: texture `i` on unit `i`, then the program (pushing uniforms),
    /// then the vertex buffer, then a single draw call.
    pub fn render_in_current_context(&self) {
        for (unit, texture) in self.textures.iter().enumerate() {
            texture.activate_on(unit as u32);
        }
        self.program.activate();
        self.vertex_buffer.activate();
        self.program
            .backend()
            .draw_arrays(self.geometry.mode, 0, self.geometry.draw_count());
    }

    pub fn program(&self) -> &Program<B> {
        &self.program
    }

    /// Mutable access for binding further uniforms after assembly.
    pub fn program_mut(&mut self) -> &mut Program<B> {
        &mut self.program
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer<B> {
        &self.vertex_buffer
    }

    pub fn textures(&self) -> &[Texture2D<B>] {
        &self.textures
    }

    pub fn geometry(&self) -> GeometryDescription {
        self.geometry
    }
}

impl<B: GlBackend> std::fmt::Debug for Mesh<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("program", &self.program)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("textures", &self.textures)
            .field("geometry", &self.geometry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::{GlCall, RecordingBackend};
    use crate::render::{
        AttributeDescriptor, ColorFormat, ComponentCount, TextureImage, UniformValue, UsageHint,
    };

    fn textured_mesh(backend: &Rc<RecordingBackend>, textures: usize) -> Mesh<RecordingBackend> {
        let mut program = Program::compile(Rc::clone(backend), "vs", "fs").unwrap();
        let sampler = program.bind_vec1i("u_texture").unwrap();
        sampler.set(0);

        let mut vb = VertexBuffer::new(Rc::clone(backend)).unwrap();
        vb.upload(
            &[0u8; 60],
            &[
                AttributeDescriptor::float(ComponentCount::Vec3),
                AttributeDescriptor::float(ComponentCount::Vec2),
            ],
            UsageHint::StaticDraw,
        )
        .unwrap();

        let textures = (0..textures)
            .map(|_| {
                let image = TextureImage::new(1, 1, ColorFormat::Rgba, &[255; 4]);
                Texture2D::new(Rc::clone(backend), &image).unwrap()
            })
            .collect();

        Mesh::new(program, vb, textures, GeometryDescription::triangles(3))
    }

    #[test]
    fn render_activates_in_fixed_order_and_draws_once() {
        let backend = Rc::new(RecordingBackend::new().with_uniforms(["u_texture"]));
        let mesh = textured_mesh(&backend, 2);
        // ids: vs 1, fs 2, program 3, vao 4, vbo 5, textures 6 and 7
        backend.take_calls();

        mesh.render_in_current_context();

        assert_eq!(
            backend.calls(),
            vec![
                GlCall::ActiveTextureUnit(0),
                GlCall::BindTexture2d(6),
                GlCall::ActiveTextureUnit(1),
                GlCall::BindTexture2d(7),
                GlCall::UseProgram(3),
                GlCall::PushUniform { location: 0, value: UniformValue::Vec1i(0) },
                GlCall::BindVertexArray(4),
                GlCall::BindArrayBuffer(5),
                GlCall::DrawArrays { mode: DrawMode::Triangles, first: 0, count: 3 },
            ]
        );
    }

    #[test]
    fn each_render_issues_exactly_one_draw() {
        let backend = Rc::new(RecordingBackend::new().with_uniforms(["u_texture"]));
        let mesh = textured_mesh(&backend, 0);
        backend.take_calls();

        for _ in 0..3 {
            mesh.render_in_current_context();
        }

        let draws: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GlCall::DrawArrays { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![GlCall::DrawArrays { mode: DrawMode::Triangles, first: 0, count: 3 }; 3]
        );
    }

    #[test]
    fn geometry_mode_and_count_are_forwarded() {
        let backend = Rc::new(RecordingBackend::new());
        let program = Program::compile(Rc::clone(&backend), "vs", "fs").unwrap();
        let vb = VertexBuffer::new(Rc::clone(&backend)).unwrap();
        let mesh = Mesh::new(program, vb, Vec::new(), GeometryDescription::new(DrawMode::Lines, 8));
        backend.take_calls();

        mesh.render_in_current_context();
        assert_eq!(
            backend.calls().last(),
            Some(&GlCall::DrawArrays { mode: DrawMode::Lines, first: 0, count: 8 })
        );
    }

    #[test]
    fn draw_count_saturates_instead_of_wrapping() {
        assert_eq!(GeometryDescription::triangles(3).draw_count(), 3);
        assert_eq!(
            GeometryDescription::triangles(i32::MAX as usize + 1).draw_count(),
            i32::MAX
        );
        assert_eq!(GeometryDescription::triangles(usize::MAX).draw_count(), i32::MAX);
    }

    #[test]
    fn dropping_mesh_releases_every_resource() {
        let backend = Rc::new(RecordingBackend::new().with_uniforms(["u_texture"]));
        let mesh = textured_mesh(&backend, 1);
        backend.take_calls();

        drop(mesh);
        let calls = backend.calls();
        assert!(calls.contains(&GlCall::DeleteProgram(3)));
        assert!(calls.contains(&GlCall::DeleteVertexArray(4)));
        assert!(calls.contains(&GlCall::DeleteBuffer(5)));
        assert!(calls.contains(&GlCall::DeleteTexture(6)));
    }
}
