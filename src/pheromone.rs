use macroquad::math::IVec2;

use crate::channels::{Pheromones, FOOD, HOME};
use crate::config::{SimConfig, DIFFUSION_RADIUS};
use crate::diffusion::{self, GaussianKernel};
use crate::grid::{CellValue, Grid};
use crate::masks::Masks;

/// Two-channel pheromone grid: channel 0 leads home, channel 1 leads to food.
pub struct PheromoneField {
    pub cells: Grid<Pheromones>,
    scratch: Grid<Pheromones>,
}

impl PheromoneField {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::zeros(width, height),
            scratch: Grid::zeros(width, height),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    pub fn sample(&self, cell: IVec2, channel: usize) -> f64 {
        self.cells[cell].get(channel)
    }

    /// Add pheromone to one channel of a cell.
    pub fn deposit(&mut self, cell: IVec2, channel: usize, amount: f64) {
        self.cells[cell].0[channel] += amount;
    }

    /// Pin nest cells (home channel) and food cells (food channel) to a constant.
    pub fn emit_sources(&mut self, nest_positions: &[IVec2], masks: &Masks, amount: f64) {
        for &nest in nest_positions {
            self.cells[nest].set(HOME, amount);
        }
        for (cell, &has_food) in self.cells.as_mut_slice().iter_mut().zip(masks.food.iter()) {
            if has_food {
                cell.set(FOOD, amount);
            }
        }
    }

    /// Blur both channels jointly. Skipped entirely when sigma is below the
    /// diffusion epsilon.
    pub fn diffuse(&mut self, config: &SimConfig) {
        if !config.diffusion_enabled() {
            return;
        }
        debug_assert_eq!(DIFFUSION_RADIUS, 1);
        let kernel = GaussianKernel::unit(config.sigma_diffusion as f64);
        diffusion::blur_in_place(&mut self.cells, &mut self.scratch, &kernel);
    }

    /// Exponential decay followed by truncation of small (and negative) values to zero.
    pub fn evaporate(&mut self, rate: f32, truncation_threshold: f32) {
        let keep = 1.0 - rate as f64;
        let threshold = truncation_threshold as f64;
        self.cells.apply(|v| {
            let v = v * keep;
            if v < threshold {
                0.0
            } else {
                v
            }
        });
    }

    pub fn clear(&mut self) {
        self.cells.fill(Pheromones::zero());
    }

    pub fn total(&self, channel: usize) -> f64 {
        self.cells.iter().map(|c| c.get(channel)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::ivec2;

    #[test]
    fn deposit_adds_to_requested_channel_only() {
        let mut field = PheromoneField::new(3, 3);
        field.deposit(ivec2(1, 2), FOOD, 0.75);
        field.deposit(ivec2(1, 2), FOOD, 0.25);
        assert_eq!(field.sample(ivec2(1, 2), FOOD), 1.0);
        assert_eq!(field.sample(ivec2(1, 2), HOME), 0.0);
    }

    #[test]
    fn emit_sources_force_sets_rather_than_adds() {
        let mut field = PheromoneField::new(3, 3);
        let mut masks = Masks::new(3, 3);
        masks.food[(2, 2)] = true;
        field.deposit(ivec2(0, 0), HOME, 500.0);
        field.deposit(ivec2(2, 2), FOOD, 7.0);

        field.emit_sources(&[ivec2(0, 0)], &masks, 100.0);

        assert_eq!(field.sample(ivec2(0, 0), HOME), 100.0);
        assert_eq!(field.sample(ivec2(2, 2), FOOD), 100.0);
        assert_eq!(field.sample(ivec2(2, 2), HOME), 0.0);
    }

    #[test]
    fn evaporation_truncates_below_threshold() {
        let mut field = PheromoneField::new(2, 1);
        field.deposit(ivec2(0, 0), HOME, 1.0);
        field.deposit(ivec2(1, 0), HOME, 0.001);
        field.cells[(1, 0)].set(FOOD, -0.5);

        field.evaporate(0.5, 0.01);

        assert_eq!(field.sample(ivec2(0, 0), HOME), 0.5);
        assert_eq!(field.sample(ivec2(1, 0), HOME), 0.0);
        assert_eq!(field.sample(ivec2(1, 0), FOOD), 0.0);
    }

    #[test]
    fn diffusion_below_epsilon_is_a_no_op() {
        let mut field = PheromoneField::new(4, 4);
        field.deposit(ivec2(2, 2), HOME, 3.0);
        let before = field.cells.clone();

        let config = SimConfig {
            sigma_diffusion: 0.00005,
            ..SimConfig::default()
        };
        field.diffuse(&config);
        assert_eq!(field.cells, before);
    }

    #[test]
    fn diffusion_spreads_and_conserves() {
        let mut field = PheromoneField::new(6, 6);
        field.deposit(ivec2(0, 0), FOOD, 1.0);
        field.diffuse(&SimConfig::default());

        assert!(field.sample(ivec2(5, 0), FOOD) > 0.0);
        assert!(field.sample(ivec2(0, 5), FOOD) > 0.0);
        assert!(field.sample(ivec2(0, 0), FOOD) < 1.0);
        assert!((field.total(FOOD) - 1.0).abs() < 1e-9);
    }
}
