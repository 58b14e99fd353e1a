// src/bin/voxel_environment.rs

use anyhow::{Context, Result};
use fixed_demos::platform::{create_window, init_logging, run_event_loop};
use fixed_demos::settings::DisplaySettings;
use fixed_demos::voxel_app::VoxelApp;
use winit::event_loop::EventLoop;

async fn run() -> Result<()> {
    let settings = DisplaySettings::voxel().with_env_overrides("VOXEL");
    log::info!("Initialising voxel environment");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (window, plan) = create_window(&event_loop, "VoxelEnvironment", &settings)?;
    log::debug!("Window aspect {:.3}", plan.aspect());
    let app = VoxelApp::new(window.clone(), &settings).await?;
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
