//! Rendering, frame pacing and snapshot configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::WebError;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Simulation/render rate (frames per second)
    /// 15 fps is plenty for a background and keeps the GPU idle
    pub fps: f32,

    /// Background colour (linear RGB)
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fps: 15.0,
            clear_color: [0.1, 0.0, 0.0],
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    /// Wall-clock time between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    pub fn validate(&self) -> Result<(), WebError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(WebError::InvalidParams(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(WebError::InvalidParams(format!(
                "window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }
}

/// Headless mode: render a fixed number of frames and save the last one
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// PNG output path
    pub output: PathBuf,

    /// Number of simulation steps before the capture
    pub frames: usize,
}

impl SnapshotConfig {
    pub fn new(output: PathBuf, frames: usize) -> Self {
        Self { output, frames }
    }
}
