//! Triad engine crate.
//!
//! A thin typed layer over OpenGL: shader programs with cached uniform slots,
//! vertex buffers described by attribute descriptors, 2D textures and meshes
//! tying them together. All driver access goes through [`backend::GlBackend`].
//! The window runtime and logging setup used by binaries live here as well.

pub mod backend;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
