// All tunable simulation constants and the user-facing parameter record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

// Decision engine
pub const N_DIRECTIONS: usize = 3;
pub const TURN_PENALTY: f32 = 0.5;
pub const STEP_SIZE: f32 = 1.0;

// Field
pub const DIFFUSION_RADIUS: usize = 1;
pub const DIFFUSION_SIGMA_EPSILON: f32 = 1e-4;
pub const MAX_KERNEL_LEN: usize = 64;

// Rendering
pub const RENDER_MAX_PHEROMONE: f64 = 10.0;
pub const COLOR_NEST: [u8; 4] = [255, 255, 255, 255];
pub const COLOR_FOOD: [u8; 4] = [255, 0, 0, 255];
pub const COLOR_WALL: [u8; 4] = [50, 50, 50, 255];
pub const COLOR_ANT_SEARCHING: [u8; 4] = [0, 0, 255, 255];
pub const COLOR_ANT_CARRYING: [u8; 4] = [255, 200, 0, 255];

// Viewer
pub const WINDOW_WIDTH: i32 = 1000;
pub const WINDOW_HEIGHT: i32 = 1000;
pub const DEFAULT_STEPS_PER_FRAME: u32 = 5;
pub const STATS_CAPACITY: usize = 600;
pub const STATS_SAMPLE_INTERVAL: u32 = 50;

pub fn to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Parameters of one ant colony simulation. Every field has a default, so a
/// JSON config only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub n_ants: usize,
    pub pheromone_deposit_amount: f32,
    /// Constant the nest (channel 0) and food (channel 1) cells are pinned to every tick.
    pub nest_pheromone_deposit_amount: f32,
    pub pheromone_evaporation_rate: f32,
    pub beta_uniformity: f32,
    pub beta_straight: f32,
    pub sigma_diffusion: f32,
    pub pheromone_truncation_threshold: f32,
    pub sense_distance: usize,
    pub sense_angle: f32,
    pub turn_angle: f32,
    pub only_wall_turn_angle: f32,
    pub seed: u64,
    pub infinite_food: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            n_ants: 1000,
            pheromone_deposit_amount: 1.0,
            nest_pheromone_deposit_amount: 100.0,
            pheromone_evaporation_rate: 0.003,
            beta_uniformity: 0.0001,
            beta_straight: 0.0,
            sigma_diffusion: 0.4,
            pheromone_truncation_threshold: 0.0001,
            sense_distance: 15,
            sense_angle: to_radians(30.0),
            turn_angle: to_radians(20.0),
            only_wall_turn_angle: to_radians(45.0),
            seed: 42,
            infinite_food: true,
        }
    }
}

impl SimConfig {
    pub fn with_shape(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid shape must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(SimError::InvalidConfig("grid shape exceeds i32 range".into()));
        }
        if self.sense_distance == 0 {
            return Err(SimError::InvalidConfig("sense_distance must be at least 1".into()));
        }
        // Probes are wrapped by a single extent, so they must not reach further than one grid.
        if self.sense_distance >= self.width.min(self.height) {
            return Err(SimError::InvalidConfig(format!(
                "sense_distance {} must be smaller than the grid extent {}",
                self.sense_distance,
                self.width.min(self.height)
            )));
        }
        if !(0.0..=1.0).contains(&self.pheromone_evaporation_rate) {
            return Err(SimError::InvalidConfig(format!(
                "pheromone_evaporation_rate must lie in [0, 1], got {}",
                self.pheromone_evaporation_rate
            )));
        }
        let non_negative = [
            ("pheromone_deposit_amount", self.pheromone_deposit_amount),
            ("nest_pheromone_deposit_amount", self.nest_pheromone_deposit_amount),
            ("sigma_diffusion", self.sigma_diffusion),
            ("pheromone_truncation_threshold", self.pheromone_truncation_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        // Biases may be negative; exploration weights are clamped at zero.
        for (name, value) in [("beta_uniformity", self.beta_uniformity), ("beta_straight", self.beta_straight)] {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Diffusion runs only when sigma is above a small epsilon.
    pub fn diffusion_enabled(&self) -> bool {
        self.sigma_diffusion > DIFFUSION_SIGMA_EPSILON
    }
}
