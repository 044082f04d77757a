use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::backend::GlowBackend;
use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// GL resources the app keeps are owned by the app value itself; the runtime
/// drops the app before it tears down the context.
pub trait App {
    /// Called once after the GL context is current, before the first frame.
    ///
    /// An error stops the runtime and is returned from `Runtime::run`.
    fn on_start(&mut self, gpu: &Gpu<GlowBackend>) -> anyhow::Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for window events, before the runtime's own handling.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per frame, before the buffers are swapped.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
