//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::params::{
    CameraPreset, FixedCamera, InitialHeights, LightParams, LightRotation, OrbitCamera,
    RenderConfig, SnapshotConfig, WaveParams, WebConfig,
};

/// Initial height mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitMode {
    /// Start on the rest plane
    Flat,
    /// Start with a random perturbation of `--amplitude`
    Random,
}

/// Camera preset name
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CameraMode {
    Orbit,
    Fixed,
}

/// Light azimuth source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LightMode {
    /// Follow the wall clock, one turn per day
    Clock,
    /// Spin at a constant rate
    Spin,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cybweb")]
#[command(about = "Animated wave-driven web, in a window or rendered to PNG", long_about = None)]
pub struct Args {
    /// Vertices per row
    #[arg(long, default_value_t = 16)]
    pub width: usize,

    /// Number of rows
    #[arg(long, default_value_t = 9)]
    pub height: usize,

    /// Initial heights
    #[arg(long, value_enum, default_value_t = InitMode::Flat)]
    pub init: InitMode,

    /// Amplitude of the random initial heights
    #[arg(long, default_value_t = 0.25)]
    pub amplitude: f32,

    /// RNG seed for initial heights and excitation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Chance per step that a left-edge vertex is kicked
    #[arg(long, default_value_t = 1.0 / 128.0)]
    pub excitation_probability: f32,

    /// Force applied to a kicked vertex
    #[arg(long, default_value_t = 2.0)]
    pub excitation_force: f32,

    /// Frames per second
    #[arg(long, default_value_t = 15.0)]
    pub fps: f32,

    /// Camera preset
    #[arg(long, value_enum, default_value_t = CameraMode::Orbit)]
    pub camera: CameraMode,

    /// Light rotation
    #[arg(long, value_enum, default_value_t = LightMode::Clock)]
    pub light: LightMode,

    /// Hours added to UTC for the clock-driven light
    #[arg(long, value_name = "HOURS", default_value_t = 0.0, allow_negative_numbers = true)]
    pub utc_offset: f32,

    /// Render headless and save the last frame to this PNG
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Steps to simulate before the snapshot
    #[arg(long, default_value_t = 120)]
    pub frames: usize,

    /// Window (or snapshot) width in pixels
    #[arg(long, default_value_t = 1280)]
    pub window_width: u32,

    /// Window (or snapshot) height in pixels
    #[arg(long, default_value_t = 720)]
    pub window_height: u32,
}

impl Args {
    pub fn web_config(&self) -> WebConfig {
        let initial_heights = match self.init {
            InitMode::Flat => InitialHeights::Flat,
            InitMode::Random => InitialHeights::Randomized {
                amplitude: self.amplitude,
            },
        };
        WebConfig {
            width: self.width,
            height: self.height,
            initial_heights,
            seed: self.seed,
        }
    }

    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            excitation_probability: self.excitation_probability,
            excitation_force: self.excitation_force,
            ..WaveParams::default()
        }
    }

    pub fn camera_preset(&self) -> CameraPreset {
        match self.camera {
            CameraMode::Orbit => CameraPreset::Orbit(OrbitCamera::default()),
            CameraMode::Fixed => CameraPreset::Fixed(FixedCamera::default()),
        }
    }

    pub fn light_params(&self) -> LightParams {
        let rotation = match self.light {
            LightMode::Clock => LightRotation::TimeOfDay {
                utc_offset_hours: self.utc_offset,
            },
            LightMode::Spin => LightRotation::Spin { rad_per_s: 2.0 },
        };
        LightParams {
            rotation,
            ..LightParams::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.window_width,
            window_height: self.window_height,
            fps: self.fps,
            ..RenderConfig::default()
        }
    }

    /// Snapshot configuration if headless mode is requested
    pub fn snapshot_config(&self) -> Option<SnapshotConfig> {
        self.snapshot
            .clone()
            .map(|output| SnapshotConfig::new(output, self.frames))
    }
}
