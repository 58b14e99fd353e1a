// src/platform.rs
//
// Logging, window creation, GPU bootstrap and the shared event loop.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    monitor::MonitorHandle,
    window::{Fullscreen, Window, WindowBuilder},
};

use crate::settings::{DisplaySettings, WindowMode, WindowPlan};

pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            // A second init only means a logger is already installed.
            let _ = console_log::init_with_level(log::Level::Warn);
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }
}

fn fullscreen_for(plan: &WindowPlan, monitor: Option<MonitorHandle>) -> Option<Fullscreen> {
    match plan.mode {
        WindowMode::Windowed => None,
        WindowMode::Native => Some(Fullscreen::Borderless(monitor)),
        WindowMode::Exclusive => {
            let mode = monitor.as_ref().and_then(|m| {
                m.video_modes()
                    .filter(|v| v.size() == PhysicalSize::new(plan.width, plan.height))
                    .max_by_key(|v| (v.bit_depth(), v.refresh_rate_millihertz()))
            });
            match mode {
                Some(mode) => Some(Fullscreen::Exclusive(mode)),
                None => {
                    log::warn!(
                        "No {}x{} video mode on the primary monitor, using borderless fullscreen",
                        plan.width,
                        plan.height
                    );
                    Some(Fullscreen::Borderless(monitor))
                }
            }
        }
    }
}

/// Opens the demo window as `settings` asks, against the primary monitor.
pub fn create_window(
    event_loop: &EventLoop<()>,
    title: &str,
    settings: &DisplaySettings,
) -> Result<(Arc<Window>, WindowPlan)> {
    let monitor = event_loop.primary_monitor();
    let monitor_size = monitor.as_ref().map(|m| {
        let size = m.size();
        (size.width, size.height)
    });
    let plan = settings.resolve(monitor_size)?;
    log::info!("Opening {}x{} window ({:?})", plan.width, plan.height, plan.mode);

    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(plan.width, plan.height))
        .with_fullscreen(fullscreen_for(&plan, monitor))
        .build(event_loop)
        .context("failed to open window")?;
    Ok((Arc::new(window), plan))
}

pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl GpuContext {
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create rendering surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: Some("Demo Device"),
                },
                None,
            )
            .await
            .context("failed to create graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are authored as plain values, so skip the sRGB encode when possible.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self { surface, device, queue, config, size })
    }

    /// Reconfigures the surface; zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> bool {
        if new_size.width == 0 || new_size.height == 0 {
            return false;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}

/// What the shared event loop needs from a demo.
pub trait Demo {
    /// Returns true when the event was consumed.
    fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool;
    fn update(&mut self, dt: f32);
    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError>;
    fn resize(&mut self, new_size: PhysicalSize<u32>);
    fn size(&self) -> PhysicalSize<u32>;
    fn exit_requested(&self) -> bool;
}

pub fn run_event_loop<D: Demo + 'static>(event_loop: EventLoop<()>, window: Arc<Window>, mut demo: D) -> Result<()> {
    let mut last_time = std::time::Instant::now();
    log::info!("Main loop started");

    event_loop
        .run(move |event, target: &EventLoopWindowTarget<()>| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                    if !demo.handle_window_event(event, &window) {
                        match event {
                            WindowEvent::CloseRequested => target.exit(),
                            WindowEvent::Resized(physical_size) => demo.resize(*physical_size),
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    if demo.exit_requested() {
                        target.exit();
                        return;
                    }
                    let now = std::time::Instant::now();
                    let dt = (now - last_time).as_secs_f32();
                    last_time = now;

                    demo.update(dt);
                    match demo.render(&window) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => demo.resize(demo.size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            target.exit();
                        }
                        Err(e) => log::warn!("Skipping frame: {e:?}"),
                    }

                    if !target.exiting() {
                        window.request_redraw();
                    }
                }
                Event::LoopExiting => log::info!("Shutting down"),
                _ => {}
            }
        })
        .context("event loop terminated abnormally")
}
