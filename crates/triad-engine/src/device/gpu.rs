use std::rc::Rc;

use crate::backend::{ClearMask, GlBackend};
use crate::paint::Color;
use crate::render::{
    CreateTextureError, GeometryDescription, Program, ProgramError, ResourceError, Texture2D,
    TextureImage, VertexBuffer,
};

/// Device facade over a [`GlBackend`].
///
/// Every resource created here shares the same backend, so it must be created
/// and dropped while that backend's context is current. Framebuffer commands
/// are issued immediately and cannot fail.
pub struct Gpu<B: GlBackend> {
    backend: Rc<B>,
}

impl<B: GlBackend> Gpu<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Shared handle to the backend, for resources constructed directly.
    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    /// Maps normalized device coordinates to the window rectangle in pixels.
    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.backend.viewport(x, y, width, height);
    }

    pub fn clear_color(&self, color: Color) {
        self.backend.clear_color(color);
    }

    pub fn clear(&self, mask: ClearMask) {
        self.backend.clear(mask);
    }

    /// Compiles and links a program from vertex and fragment sources.
    pub fn create_program(
        &self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Program<B>, ProgramError> {
        Program::compile(Rc::clone(&self.backend), vertex_source, fragment_source)
    }

    pub fn create_vertex_buffer(&self) -> Result<VertexBuffer<B>, ResourceError> {
        VertexBuffer::new(Rc::clone(&self.backend))
    }

    pub fn create_texture_2d(
        &self,
        image: &TextureImage<'_>,
    ) -> Result<Texture2D<B>, CreateTextureError> {
        Texture2D::new(Rc::clone(&self.backend), image)
    }

    /// Draws `geometry.vertex_count` vertices from the currently active
    /// program and vertex buffer. Counts above `i32::MAX` are saturated.
    pub fn draw(&self, geometry: GeometryDescription) {
        self.backend
            .draw_arrays(geometry.mode, 0, geometry.draw_count());
    }
}

impl<B: GlBackend> std::fmt::Debug for Gpu<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gpu")
            .field("resources", &(Rc::strong_count(&self.backend) - 1))
            .finish()
    }
}
