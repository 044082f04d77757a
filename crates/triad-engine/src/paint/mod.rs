//! Color values handed to the framebuffer and to uniforms.

pub mod color;

pub use color::Color;
