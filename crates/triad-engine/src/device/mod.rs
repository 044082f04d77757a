//! GL context + device facade.
//!
//! This module is responsible for:
//! - creating the window, GL config, context and window surface (`glutin`)
//! - loading the GL entry points into a [`GlowBackend`](crate::backend::GlowBackend)
//! - the [`Gpu`] facade resource creation and framebuffer commands go through

mod context;
mod gpu;
mod init;

pub use context::GlContext;
pub use gpu::Gpu;
pub use init::GlInit;
