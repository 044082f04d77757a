//! Typed GPU resources built on a [`GlBackend`](crate::backend::GlBackend).
//!
//! Every resource holds the backend it was created from and issues commands
//! directly; nothing is queued. Resources delete their GL objects on drop, so
//! they must not outlive the context that created them.

mod attribute;
mod error;
mod mesh;
mod program;
mod texture;
mod uniform;
mod vertex_buffer;

pub use attribute::{AttributeDescriptor, ComponentCount, ComponentType, VertexAttribute, VertexLayout};
pub use error::{
    CreateTextureError, ProgramError, ResourceError, ShaderStep, TextureError, UniformError,
    VertexBufferError,
};
pub use mesh::{DrawMode, GeometryDescription, Mesh};
pub use program::Program;
pub use texture::{ColorFormat, Texture2D, TextureImage};
pub use uniform::{MatrixOrder, Uniform, UniformKind, UniformValue};
pub use vertex_buffer::{UsageHint, VertexBuffer};
