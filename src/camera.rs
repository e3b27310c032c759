//! Camera path, projection and light direction.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::{SystemTime, UNIX_EPOCH};

use glam::{Mat4, Vec3, Vec4};

use crate::params::{
    CameraPreset, FixedCamera, LightParams, LightRotation, OrbitCamera, ProjectionParams,
};

/// Camera system producing view/projection matrices and the light vector
pub struct CameraSystem {
    preset: CameraPreset,
    projection: ProjectionParams,
    light: LightParams,
}

impl CameraSystem {
    /// Create new camera system with specified preset
    pub fn new(preset: CameraPreset, projection: ProjectionParams, light: LightParams) -> Self {
        Self {
            preset,
            projection,
            light,
        }
    }

    /// Compute camera position and look-at target for given time
    ///
    /// # Returns
    /// Tuple of (eye_position, target_position)
    pub fn compute_position_and_target(&self, time_s: f32) -> (Vec3, Vec3) {
        match &self.preset {
            CameraPreset::Orbit(params) => Self::compute_orbit_path(params, time_s),
            CameraPreset::Fixed(params) => Self::compute_fixed_path(params),
        }
    }

    /// Eye circles at `radius` around the axis, `distance` above the plane
    fn compute_orbit_path(p: &OrbitCamera, time_s: f32) -> (Vec3, Vec3) {
        let angle = time_s * p.angular_speed;
        let eye = Vec3::new(p.radius * angle.cos(), p.radius * angle.sin(), p.distance);
        (eye, Vec3::ZERO)
    }

    fn compute_fixed_path(p: &FixedCamera) -> (Vec3, Vec3) {
        (Vec3::from_array(p.position), Vec3::from_array(p.target))
    }

    /// View matrix for given time
    pub fn view_matrix(&self, time_s: f32) -> Mat4 {
        let (eye, target) = self.compute_position_and_target(time_s);
        // The web lies in the XY plane, so +Y is "up" on screen
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let p = &self.projection;
        perspective(p.hfov_rad, p.vfov_rad, p.near, p.far)
    }

    /// Light direction for the current frame
    ///
    /// # Arguments
    /// * `time_s` - Seconds since startup (spin mode)
    /// * `now` - Wall-clock time (time-of-day mode)
    pub fn light_direction(&self, time_s: f32, now: SystemTime) -> Vec3 {
        let unix_secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let azimuth = light_azimuth(self.light.rotation, time_s, unix_secs);
        light_vector(self.light.elevation_rad, azimuth)
    }
}

/// Perspective projection with separate horizontal and vertical field of view.
///
/// Right-handed, looking down -Z, depth mapped to `[0, 1]`.
pub fn perspective(hfov_rad: f32, vfov_rad: f32, near: f32, far: f32) -> Mat4 {
    let depth = near - far;
    Mat4::from_cols(
        Vec4::new(1.0 / hfov_rad.tan(), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / vfov_rad.tan(), 0.0, 0.0),
        Vec4::new(0.0, 0.0, far / depth, -1.0),
        Vec4::new(0.0, 0.0, near * far / depth, 0.0),
    )
}

/// Light azimuth (radians)
///
/// Time of day maps midnight to -π/2, so the light sweeps once per day.
pub fn light_azimuth(rotation: LightRotation, time_s: f32, unix_secs: f64) -> f32 {
    match rotation {
        LightRotation::TimeOfDay { utc_offset_hours } => {
            let hours = (unix_secs / 3600.0 + utc_offset_hours as f64).rem_euclid(24.0) as f32;
            TAU * hours / 24.0 - FRAC_PI_2
        }
        LightRotation::Spin { rad_per_s } => time_s * rad_per_s,
    }
}

/// Unit vector at `elevation` from +Z, rotated by `azimuth` around Z
pub fn light_vector(elevation_rad: f32, azimuth_rad: f32) -> Vec3 {
    let s = elevation_rad.sin();
    Vec3::new(s * azimuth_rad.cos(), s * azimuth_rad.sin(), elevation_rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit_camera() -> CameraSystem {
        CameraSystem::new(
            CameraPreset::default(),
            ProjectionParams::default(),
            LightParams::default(),
        )
    }

    #[test]
    fn test_orbit_position_at_t0() {
        let camera = orbit_camera();
        let (eye, target) = camera.compute_position_and_target(0.0);
        assert!((eye - Vec3::new(0.05, 0.0, 0.5)).length() < 1e-6);
        assert_eq!(target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_keeps_radius_and_height() {
        let camera = orbit_camera();
        for t in 0..50 {
            let (eye, _) = camera.compute_position_and_target(t as f32 * 0.7);
            assert!((eye.truncate().length() - 0.05).abs() < 1e-5);
            assert_eq!(eye.z, 0.5);
        }
    }

    #[test]
    fn test_view_looks_at_target() {
        let camera = orbit_camera();
        let view = camera.view_matrix(3.0);
        let target = view.transform_point3(Vec3::ZERO);
        // Target lands on the -Z axis in view space
        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!(target.z < 0.0);
    }

    #[test]
    fn test_projection_depth_range() {
        let proj = perspective(0.75, 0.42, 0.01, 4.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.01));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -4.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_projection_field_of_view() {
        let proj = perspective(0.75, 0.42, 0.01, 4.0);
        assert!((proj.x_axis.x - 1.0 / 0.75f32.tan()).abs() < 1e-6);
        assert!((proj.y_axis.y - 1.0 / 0.42f32.tan()).abs() < 1e-6);
    }

    #[test]
    fn test_projection_for_widescreen_matches_default() {
        let wide = ProjectionParams::with_aspect(16.0 / 9.0);
        let default = ProjectionParams::default();
        assert!((wide.vfov_rad - default.vfov_rad).abs() < 1e-6);
        assert_eq!(wide.hfov_rad, default.hfov_rad);
    }

    #[test]
    fn test_light_vector_is_unit() {
        for azimuth in [0.0, 1.0, 2.5, -3.0] {
            assert!((light_vector(0.5, azimuth).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_time_of_day_azimuth() {
        let rotation = LightRotation::TimeOfDay {
            utc_offset_hours: 0.0,
        };
        let midnight = 86_400.0 * 20_000.0;
        assert!((light_azimuth(rotation, 0.0, midnight) + FRAC_PI_2).abs() < 1e-5);
        assert!(light_azimuth(rotation, 0.0, midnight + 6.0 * 3600.0).abs() < 1e-5);

        let shifted = LightRotation::TimeOfDay {
            utc_offset_hours: 6.0,
        };
        assert!(light_azimuth(shifted, 0.0, midnight).abs() < 1e-5);
    }

    #[test]
    fn test_spin_azimuth() {
        let rotation = LightRotation::Spin { rad_per_s: 2.0 };
        assert_eq!(light_azimuth(rotation, 1.5, 0.0), 3.0);
    }
}
