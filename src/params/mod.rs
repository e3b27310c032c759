//! Parameter definitions with documented units and semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (normalized device units, seconds, radians)
//! - Documented ranges and meanings
//! - Validation where a bad value would corrupt the simulation

mod camera;
mod render;
mod web;

// Re-export all types
pub use camera::{
    CameraPreset, FixedCamera, LightParams, LightRotation, OrbitCamera, ProjectionParams,
};
pub use render::{RenderConfig, SnapshotConfig};
pub use web::{InitialHeights, WaveParams, WebConfig};
