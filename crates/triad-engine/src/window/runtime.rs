use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::backend::GlowBackend;
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{GlContext, GlInit, Gpu};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "triad".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until it or the user asks to exit, then
    /// tears everything down.
    ///
    /// Returns the error that stopped the loop, if any.
    pub fn run<A>(config: RuntimeConfig, gl_init: GlInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gl_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct WindowEntry {
    gpu: Gpu<GlowBackend>,
    clock: FrameClock,
    gl: GlContext,
}

impl WindowEntry {
    fn resize(&self, size: PhysicalSize<u32>) {
        if self.gl.resize(size) {
            self.gpu
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
        self.gl.window().request_redraw();
    }
}

// Field order is drop order: `app` (and every GL resource it owns) is dropped
// while `window` still holds the current context.
struct AppState<A>
where
    A: CoreApp + 'static,
{
    app: A,
    window: Option<WindowEntry>,

    config: RuntimeConfig,
    gl_init: GlInit,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gl_init: GlInit, app: A) -> Self {
        Self {
            app,
            window: None,
            config,
            gl_init,
            exit_requested: false,
            failure: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let (gl, backend) = GlContext::new(event_loop, attrs, self.gl_init)?;
        let size = gl.window().inner_size();

        // Stored before `on_start` so anything the app created before failing
        // is still dropped ahead of the context.
        let entry = self.window.insert(WindowEntry {
            gpu: Gpu::new(backend),
            clock: FrameClock::default(),
            gl,
        });
        entry
            .gpu
            .viewport(0, 0, size.width as i32, size.height as i32);

        self.app
            .on_start(&entry.gpu)
            .context("application failed to start")?;

        // Restart the clock so the first dt does not include setup.
        entry.clock = FrameClock::default();
        entry.gl.window().request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let control = {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: entry.gl.window(),
                },
                gpu: &entry.gpu,
                time: entry.clock.tick(),
                runtime: &mut runtime_ctx,
            };
            self.app.on_frame(&mut ctx)
        };

        if let Err(err) = entry.gl.swap_buffers() {
            self.fail(event_loop, err);
            return;
        }

        if control == AppControl::Exit || runtime_ctx.exit_requested() {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err.context("failed to open window"));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; the demo animates every frame.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.window {
            entry.gl.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.request_exit(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = &self.window {
                    entry.resize(*new_size);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = &self.window {
                    entry.resize(entry.gl.window().inner_size());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("event loop exiting");
    }
}
