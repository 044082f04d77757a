//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and wires them to the GL
//! context and the app.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
