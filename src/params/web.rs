//! Web mesh layout and wave integrator parameters.

use crate::error::WebError;

/// How vertex heights are set before the first step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialHeights {
    /// Every vertex starts on the rest plane (z = 0)
    Flat,

    /// Each z is drawn uniformly from `[-amplitude, amplitude)`
    Randomized { amplitude: f32 },
}

impl Default for InitialHeights {
    fn default() -> Self {
        Self::Flat
    }
}

/// Grid layout and initial condition
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Vertices per row
    pub width: usize,

    /// Number of rows
    pub height: usize,

    /// Initial z values
    pub initial_heights: InitialHeights,

    /// Seed for the initial perturbation and the excitation draws
    pub seed: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 9, // 16:9 like the screen it covers
            initial_heights: InitialHeights::Flat,
            seed: 42,
        }
    }
}

/// Constants of the height-field integrator
///
/// Force on vertex `i`:
/// `-coupling * Σ(z[i] - z[n]) - restoring * z[i] - damping * (z[i] - z_prev[i])`
#[derive(Debug, Clone)]
pub struct WaveParams {
    /// Neighbour spring strength (dimensionless)
    pub coupling: f32,

    /// Pull towards the rest plane
    pub restoring: f32,

    /// Velocity-proportional drag
    pub damping: f32,

    /// Fixed simulated time per step, independent of wall-clock frame time
    pub time_step: f32,

    /// Chance per step that a left-column vertex is kicked (0..=1)
    pub excitation_probability: f32,

    /// Force applied to a kicked vertex instead of the force law
    pub excitation_force: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            coupling: 0.1,
            restoring: 0.125,
            damping: 0.5,
            time_step: 0.1,
            excitation_probability: 1.0 / 128.0,
            excitation_force: 2.0,
        }
    }
}

impl WaveParams {
    /// Same constants with the random kicks switched off
    pub fn without_excitation(&self) -> Self {
        Self {
            excitation_probability: 0.0,
            ..self.clone()
        }
    }

    /// Reject values that would make the integrator blow up or misbehave
    pub fn validate(&self) -> Result<(), WebError> {
        let non_negative = [
            ("coupling", self.coupling),
            ("restoring", self.restoring),
            ("damping", self.damping),
            ("time_step", self.time_step),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(WebError::InvalidParams(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.excitation_probability) {
            return Err(WebError::InvalidParams(format!(
                "excitation_probability must be within [0, 1], got {}",
                self.excitation_probability
            )));
        }

        if !self.excitation_force.is_finite() {
            return Err(WebError::InvalidParams(format!(
                "excitation_force must be finite, got {}",
                self.excitation_force
            )));
        }

        Ok(())
    }
}
