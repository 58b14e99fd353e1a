// src/bin/shadows_2d.rs

use anyhow::{Context, Result};
use fixed_demos::platform::{create_window, init_logging, run_event_loop};
use fixed_demos::settings::DisplaySettings;
use fixed_demos::shadows_app::ShadowsApp;
use winit::event_loop::EventLoop;

async fn run() -> Result<()> {
    let settings = DisplaySettings::shadows().with_env_overrides("SHADOWS");
    log::info!("Initialising 2D shadows demo");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (window, _plan) = create_window(&event_loop, "Shadows2DFixed", &settings)?;
    let app = ShadowsApp::new(window.clone(), &settings).await?;
    run_event_loop(event_loop, window, app)
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
