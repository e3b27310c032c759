//! Camera, projection and light configuration.

/// Camera circling slowly above the web centre
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Height of the eye above the rest plane
    pub distance: f32,

    /// Radius of the circle traced by the eye
    pub radius: f32,

    /// Orbit speed (radians per second)
    pub angular_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 0.5,
            radius: 0.05,
            angular_speed: 0.5,
        }
    }
}

/// Stationary camera
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Eye position
    pub position: [f32; 3],

    /// Look-at target
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 1.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    /// Orbit preset: slow circle above the web
    Orbit(OrbitCamera),

    /// Fixed preset: straight down onto the web
    Fixed(FixedCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Orbit(OrbitCamera::default())
    }
}

/// Perspective projection with independent horizontal and vertical field of view
#[derive(Debug, Clone)]
pub struct ProjectionParams {
    /// Horizontal field of view (radians, `m00 = 1/tan(hfov)`)
    pub hfov_rad: f32,

    /// Vertical field of view (radians, `m11 = 1/tan(vfov)`)
    pub vfov_rad: f32,

    /// Near clipping plane
    pub near: f32,

    /// Far clipping plane
    pub far: f32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            hfov_rad: 0.75,
            vfov_rad: 0.75 * 9.0 / 16.0,
            near: 0.01,
            far: 4.0,
        }
    }
}

impl ProjectionParams {
    /// Default projection with the vertical field of view scaled to `aspect`
    pub fn with_aspect(aspect: f32) -> Self {
        let defaults = Self::default();
        Self {
            vfov_rad: defaults.hfov_rad / aspect,
            ..defaults
        }
    }
}

/// Where the light azimuth comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightRotation {
    /// One revolution per day, following the wall clock
    TimeOfDay { utc_offset_hours: f32 },

    /// Constant spin driven by elapsed time
    Spin { rad_per_s: f32 },
}

/// Directional light
#[derive(Debug, Clone)]
pub struct LightParams {
    /// Angle between the light and the plane normal (radians)
    pub elevation_rad: f32,

    /// Azimuth source
    pub rotation: LightRotation,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            elevation_rad: 0.5,
            rotation: LightRotation::TimeOfDay {
                utc_offset_hours: 0.0,
            },
        }
    }
}
