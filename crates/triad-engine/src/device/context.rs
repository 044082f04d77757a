use std::num::NonZeroU32;

use anyhow::{Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::backend::GlowBackend;

use super::GlInit;

/// Window, GL context and window surface, current on the creating thread.
///
/// Field order is drop order: the surface goes before the context, and both
/// before the window they render into.
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlContext {
    /// Creates the window and a core-profile context of `init.version`, makes
    /// it current and loads the GL entry points.
    pub fn new(
        event_loop: &ActiveEventLoop,
        attrs: WindowAttributes,
        init: GlInit,
    ) -> Result<(Self, GlowBackend)> {
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow::anyhow!("failed to create window and GL config: {e}"))?;
        let window = window.context("display builder returned no window")?;

        let raw_handle = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();

        let (major, minor) = init.version;
        let context_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        let display = config.display();

        // SAFETY: `raw_handle` belongs to `window`, which `GlContext` keeps
        // alive (and drops last) for as long as the context and surface exist.
        let not_current = unsafe { display.create_context(&config, &context_attrs) }
            .with_context(|| format!("failed to create OpenGL {major}.{minor} core context"))?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to describe window surface")?;
        // SAFETY: as above; the surface never outlives `window`.
        let surface = unsafe { display.create_window_surface(&config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if init.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("swap interval {interval:?} rejected: {e}");
        }

        // SAFETY: the context is current on this thread and `display` resolves
        // symbols for it.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };
        let backend = GlowBackend::new(gl);

        log::debug!(
            "GL context created: requested {major}.{minor} core, {backend:?}, {} samples, vsync {}",
            config.num_samples(),
            init.vsync
        );

        Ok((
            Self {
                surface,
                context,
                window,
            },
            backend,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the drawable. Returns `false` (and does nothing) for a zero-sized
    /// window, which happens while minimized.
    pub fn resize(&self, size: PhysicalSize<u32>) -> bool {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return false;
        };
        self.surface.resize(&self.context, width, height);
        true
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) -> Result<()> {
        self.window.pre_present_notify();
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}

impl std::fmt::Debug for GlContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlContext")
            .field("window", &self.window.id())
            .finish_non_exhaustive()
    }
}

/// Prefers the config with the most multisample buffers.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("glutin reports at least one config matching the template")
}
