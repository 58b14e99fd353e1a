// src/settings.rs

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub window_width: u32,
    pub window_height: u32,
    pub vertical_retrace: bool,
    pub fullscreen: bool,
    pub fullscreen_width: u32,
    pub fullscreen_height: u32,
    /// Use the monitor's own resolution instead of `fullscreen_width`/`fullscreen_height`.
    pub native_fullscreen_force: bool,
}

impl DisplaySettings {
    pub fn shadows() -> Self {
        Self {
            window_width: 640,
            window_height: 640,
            vertical_retrace: true,
            fullscreen: false,
            fullscreen_width: 640,
            fullscreen_height: 480,
            native_fullscreen_force: true,
        }
    }

    pub fn voxel() -> Self {
        Self {
            window_width: 740,
            window_height: 480,
            vertical_retrace: true,
            fullscreen: true,
            fullscreen_width: 740,
            fullscreen_height: 480,
            native_fullscreen_force: true,
        }
    }

    /// Applies `<PREFIX>_WINDOWED` and `<PREFIX>_VSYNC` from the process environment.
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_overrides(prefix, |key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let windowed_key = format!("{prefix}_WINDOWED");
        if let Some(value) = lookup(&windowed_key) {
            match parse_flag(&value) {
                Some(true) => {
                    self.fullscreen = false;
                    self.native_fullscreen_force = false;
                }
                Some(false) => {}
                None => log::warn!("Ignoring {windowed_key}={value:?}: expected 0 or 1"),
            }
        }

        let vsync_key = format!("{prefix}_VSYNC");
        if let Some(value) = lookup(&vsync_key) {
            match parse_flag(&value) {
                Some(flag) => self.vertical_retrace = flag,
                None => log::warn!("Ignoring {vsync_key}={value:?}: expected 0 or 1"),
            }
        }
        self
    }

    /// Chooses the window size and mode. `monitor` is the primary monitor's
    /// resolution, needed for any fullscreen mode. Forcing native fullscreen
    /// implies fullscreen even when `fullscreen` is off.
    pub fn resolve(&self, monitor: Option<(u32, u32)>) -> Result<WindowPlan> {
        if !self.fullscreen && !self.native_fullscreen_force {
            return Ok(WindowPlan {
                width: self.window_width,
                height: self.window_height,
                mode: WindowMode::Windowed,
            });
        }

        let (monitor_width, monitor_height) =
            monitor.ok_or_else(|| anyhow!("failed to query primary video mode"))?;
        let plan = if self.native_fullscreen_force {
            WindowPlan {
                width: monitor_width,
                height: monitor_height,
                mode: WindowMode::Native,
            }
        } else {
            WindowPlan {
                width: self.fullscreen_width,
                height: self.fullscreen_height,
                mode: WindowMode::Exclusive,
            }
        };
        Ok(plan)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Windowed,
    /// Exclusive fullscreen at the requested resolution.
    Exclusive,
    /// Borderless fullscreen at the monitor's resolution.
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub width: u32,
    pub height: u32,
    pub mode: WindowMode,
}

impl WindowPlan {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
