//! Cybweb - a wave-driven web for the desktop
//!
//! A hex-packed mesh ripples under a damped spring integrator, kicked now and
//! then from its left edge, lit by a light that follows the time of day.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cybweb::camera::CameraSystem;
use cybweb::cli::Args;
use cybweb::params::{ProjectionParams, RenderConfig, SnapshotConfig};
use cybweb::rendering::{OffscreenRenderer, RenderSystem, Uniforms};
use cybweb::shutdown::ShutdownToken;
use cybweb::timing::{FpsTracker, FrameClock};
use cybweb::web::WebSystem;

/// Steps between amplitude reports in the debug log
const STATS_INTERVAL_STEPS: u64 = 150;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    web: WebSystem,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,

    // Frame pacing
    clock: FrameClock,
    fps: FpsTracker,
    step_pending: bool,
    start_time: Instant,

    shutdown: ShutdownToken,
    /// First fatal error seen inside the event loop
    error: Option<String>,
}

impl App {
    fn new(
        web: WebSystem,
        camera: CameraSystem,
        render_config: RenderConfig,
        shutdown: ShutdownToken,
    ) -> Self {
        let now = Instant::now();
        Self {
            window: None,
            render_system: None,
            web,
            camera,
            clock: FrameClock::new(render_config.frame_interval(), now),
            fps: FpsTracker::new(now),
            render_config,
            step_pending: false,
            start_time: now,
            shutdown,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{}", message);
        self.error.get_or_insert(message);
        self.shutdown.cancel();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Frame boundary: nothing is mid-step here
        if self.shutdown.is_cancelled() {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if self.clock.is_due(now) {
            self.clock.tick(now);
            self.step_pending = true;
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Cybweb")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, format!("Failed to create window: {}", e)),
        };

        let render_system =
            match pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.web)) {
                Ok(render_system) => render_system,
                Err(e) => return self.fail(event_loop, e),
            };

        log::info!("Cybweb is running, press ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown.cancel(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown.cancel(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

impl App {
    /// Step the web if a tick is pending, then draw it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        if self.step_pending {
            self.step_pending = false;
            self.web.update();
            log_stats(&self.web);
        }

        let time_s = self.start_time.elapsed().as_secs_f32();
        render_system.update_vertices(self.web.vertices());
        render_system.update_uniforms(&frame_uniforms(&self.camera, time_s));

        match render_system.render(self.render_config.clear_color) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return self.fail(event_loop, "Render error: out of GPU memory".to_string());
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(fps) = self.fps.record_frame(Instant::now()) {
            log::debug!("FPS: {:.1}", fps);
        }
    }
}

/// View, projection and light for a frame at `time_s`
fn frame_uniforms(camera: &CameraSystem, time_s: f32) -> Uniforms {
    Uniforms::new(
        camera.view_matrix(time_s),
        camera.projection_matrix(),
        camera.light_direction(time_s, SystemTime::now()),
    )
}

fn log_stats(web: &WebSystem) {
    if web.steps() % STATS_INTERVAL_STEPS == 0 {
        log::debug!(
            "step {}: max |z| = {:.4}, energy = {:.4}",
            web.steps(),
            web.field().max_amplitude(),
            web.field().energy()
        );
    }
}

/// Headless mode: simulate, render the final state offscreen, save it
fn run_snapshot(
    mut web: WebSystem,
    camera: &CameraSystem,
    render_config: &RenderConfig,
    snapshot: &SnapshotConfig,
    shutdown: &ShutdownToken,
) -> Result<(), String> {
    let renderer = pollster::block_on(OffscreenRenderer::new(
        render_config.window_width,
        render_config.window_height,
        &web,
    ))?;

    for _ in 0..snapshot.frames {
        if shutdown.is_cancelled() {
            log::info!("Snapshot cancelled after {} steps", web.steps());
            return Ok(());
        }
        web.update();
        log_stats(&web);
    }

    // Time the camera would have reached at the configured frame rate
    let time_s = snapshot.frames as f32 / render_config.fps;
    renderer.update_vertices(web.vertices());
    renderer.update_uniforms(&frame_uniforms(camera, time_s));
    renderer.render(render_config.clear_color);
    renderer.capture(&snapshot.output)?;

    log::info!(
        "Saved frame {} to {}",
        snapshot.frames,
        snapshot.output.display()
    );
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let render_config = args.render_config();
    render_config.validate()?;

    let web = WebSystem::new(&args.web_config(), args.wave_params())?;
    let camera = CameraSystem::new(
        args.camera_preset(),
        ProjectionParams::with_aspect(render_config.aspect_ratio()),
        args.light_params(),
    );
    let shutdown = ShutdownToken::new();

    if let Some(snapshot) = args.snapshot_config() {
        return Ok(run_snapshot(
            web,
            &camera,
            &render_config,
            &snapshot,
            &shutdown,
        )?);
    }

    let mut app = App::new(web, camera, render_config, shutdown);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => {
            log::info!("Success!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
