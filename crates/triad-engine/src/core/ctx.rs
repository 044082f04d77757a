use winit::window::{Window, WindowId};

use crate::backend::{ClearMask, GlowBackend};
use crate::device::Gpu;
use crate::paint::Color;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Drawable size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Width over height; 1.0 while the window is minimized.
    pub fn aspect_ratio(&self) -> f32 {
        match self.physical_size() {
            (w, h) if w > 0 && h > 0 => w as f32 / h as f32,
            _ => 1.0,
        }
    }
}

/// Per-frame context passed to [`App::on_frame`](crate::core::App::on_frame).
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<GlowBackend>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a> FrameCtx<'a> {
    /// Clears color and depth to `color`.
    pub fn clear(&self, color: Color) {
        self.gpu.clear_color(color);
        self.gpu.clear(ClearMask::COLOR | ClearMask::DEPTH);
    }

    /// Asks the runtime to exit once the frame is presented.
    pub fn request_exit(&mut self) {
        self.runtime.exit();
    }
}
