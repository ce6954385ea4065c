use macroquad::math::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::ant::Ant;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::grid::Grid;
use crate::masks::{self, Masks};
use crate::pheromone::PheromoneField;
use crate::render;
use crate::sensing::{self, StepOutcome};
use crate::world::World;

/// One ant colony: field, masks, ants, counters and the shared random stream.
///
/// All randomness comes from a single seeded generator consumed in ant order
/// (index 0 first) during `ready()` and `step()`. Reordering ants changes the
/// draw sequence and therefore the outcome.
pub struct AntSimulation {
    config: SimConfig,
    world: World,
    ants: Vec<Ant>,
    field: PheromoneField,
    masks: Masks,
    nest_positions: Vec<IVec2>,
    food_collected: u64,
    food_at_nest: u64,
    last_pickups: Vec<IVec2>,
    rng: ChaCha8Rng,
    tick_count: u64,
}

impl AntSimulation {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let (width, height) = config.shape();
        debug!(width, height, ants = config.n_ants, seed = config.seed, "creating simulation");
        Ok(Self {
            world: World::new(width, height),
            ants: vec![Ant::default(); config.n_ants],
            field: PheromoneField::new(width, height),
            masks: Masks::new(width, height),
            nest_positions: Vec::new(),
            food_collected: 0,
            food_at_nest: 0,
            last_pickups: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick_count: 0,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace tunable parameters between ticks. Shape, population and seed
    /// are fixed at construction and must not change.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), SimError> {
        config.validate()?;
        if config.shape() != self.config.shape() || config.n_ants != self.config.n_ants {
            return Err(SimError::InvalidConfig(
                "shape and ant count are fixed for the lifetime of a simulation".into(),
            ));
        }
        self.config = config;
        Ok(())
    }

    pub fn set_passable_mask(&mut self, mask: &Grid<u8>) -> Result<(), SimError> {
        masks::load_mask("passable", &mut self.masks.passable, mask)
    }

    pub fn set_nest_mask(&mut self, mask: &Grid<u8>) -> Result<(), SimError> {
        masks::load_mask("nest", &mut self.masks.nest, mask)
    }

    pub fn set_food_mask(&mut self, mask: &Grid<u8>) -> Result<(), SimError> {
        masks::load_mask("food", &mut self.masks.food, mask)
    }

    /// Collect nest cells and drop every ant on a random one with a random heading.
    pub fn ready(&mut self) -> Result<(), SimError> {
        self.nest_positions = self.masks.nest_positions();
        if self.nest_positions.is_empty() {
            return Err(SimError::NoNestCells);
        }
        for ant in &mut self.ants {
            let cell = self.nest_positions[self.rng.gen_range(0..self.nest_positions.len())];
            let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
            *ant = Ant::at_nest(cell, heading);
        }
        info!(
            ants = self.ants.len(),
            nest_cells = self.nest_positions.len(),
            food_cells = self.masks.food_cell_count(),
            "colony placed"
        );
        Ok(())
    }

    /// Advance by one tick: move and deposit per ant, pin sources, diffuse, evaporate.
    pub fn step(&mut self) {
        self.last_pickups.clear();
        let deposit = self.config.pheromone_deposit_amount;

        for ant in &mut self.ants {
            let outcome = sensing::update_ant(ant, &self.field, &self.masks, &self.world, &self.config, &mut self.rng);
            match outcome {
                StepOutcome::PickedUp(cell) => {
                    self.food_collected += 1;
                    self.last_pickups.push(cell);
                }
                StepOutcome::DroppedOff(_) => self.food_at_nest += 1,
                StepOutcome::Moved | StepOutcome::Blocked => {}
            }
            // The trail channel is read after the arrival check, so a freshly
            // loaded ant already marks the food trail on its pickup cell.
            let amount = deposit * ant.pheromone_drop_multiplier;
            self.field.deposit(ant.grid_position, ant.trail_channel(), amount as f64);
        }

        self.field.emit_sources(
            &self.nest_positions,
            &self.masks,
            self.config.nest_pheromone_deposit_amount as f64,
        );
        self.field.diffuse(&self.config);
        self.field
            .evaporate(self.config.pheromone_evaporation_rate, self.config.pheromone_truncation_threshold);

        self.tick_count += 1;
    }

    /// Paint the field, masks and ants into a caller-owned RGBA buffer of
    /// exactly `width * height * 4` bytes. Panics on a smaller buffer.
    pub fn draw(&self, buffer: &mut [u8]) {
        render::draw_frame(&self.field, &self.masks, &self.ants, buffer);
    }

    pub fn food_collected(&self) -> u64 {
        self.food_collected
    }

    pub fn food_at_nest(&self) -> u64 {
        self.food_at_nest
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn nest_positions(&self) -> &[IVec2] {
        &self.nest_positions
    }

    /// Cells where ants picked up food during the last `step()`.
    pub fn last_pickups(&self) -> &[IVec2] {
        &self.last_pickups
    }

    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    pub fn passable_mask_mut(&mut self) -> &mut Grid<bool> {
        &mut self.masks.passable
    }

    pub fn nest_mask_mut(&mut self) -> &mut Grid<bool> {
        &mut self.masks.nest
    }

    pub fn food_mask_mut(&mut self) -> &mut Grid<bool> {
        &mut self.masks.food
    }

    pub fn carrying_count(&self) -> usize {
        self.ants.iter().filter(|a| a.carrying_food).count()
    }

    /// Drop all pheromone; masks, ants and counters are untouched.
    pub fn clear_pheromones(&mut self) {
        self.field.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{FOOD, HOME};
    use crate::diffusion::GaussianKernel;
    use macroquad::math::ivec2;

    fn small_config(width: usize, height: usize, n_ants: usize) -> SimConfig {
        SimConfig {
            n_ants,
            sense_distance: 2,
            ..SimConfig::default().with_shape(width, height)
        }
    }

    fn with_nest(mut sim: AntSimulation, cells: &[(usize, usize)]) -> AntSimulation {
        for &c in cells {
            sim.nest_mask_mut()[c] = true;
        }
        sim
    }

    #[test]
    fn ready_without_nest_fails() {
        let mut sim = AntSimulation::new(small_config(8, 8, 3)).unwrap();
        assert!(matches!(sim.ready(), Err(SimError::NoNestCells)));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SimConfig {
            pheromone_evaporation_rate: -0.1,
            ..small_config(8, 8, 1)
        };
        assert!(AntSimulation::new(config).is_err());
    }

    #[test]
    fn ready_places_every_ant_on_a_nest_cell() {
        let sim = AntSimulation::new(small_config(16, 16, 40)).unwrap();
        let mut sim = with_nest(sim, &[(3, 3), (12, 7)]);
        sim.ready().unwrap();

        for ant in sim.ants() {
            assert!(sim.masks().nest[ant.grid_position]);
            assert_eq!(ant.position, ant.grid_position.as_vec2());
            assert!((0.0..std::f32::consts::TAU).contains(&ant.heading));
        }
        assert_eq!(sim.nest_positions(), &[ivec2(3, 3), ivec2(12, 7)]);
    }

    #[test]
    fn mask_setters_check_shape() {
        let mut sim = AntSimulation::new(small_config(8, 6, 1)).unwrap();
        let wrong = Grid::new(6, 8, 1u8);
        assert!(matches!(
            sim.set_food_mask(&wrong),
            Err(SimError::ShapeMismatch { mask: "food", .. })
        ));
        let right = Grid::new(8, 6, 1u8);
        sim.set_nest_mask(&right).unwrap();
        assert!(sim.masks().nest.iter().all(|&v| v));
    }

    #[test]
    fn sources_are_pinned_after_emission() {
        let config = SimConfig {
            pheromone_evaporation_rate: 0.0,
            sigma_diffusion: 0.0,
            ..small_config(8, 8, 1)
        };
        let mut sim = with_nest(AntSimulation::new(config).unwrap(), &[(1, 1)]);
        sim.food_mask_mut()[(6, 6)] = true;
        sim.ready().unwrap();
        sim.step();

        assert_eq!(sim.field().sample(ivec2(1, 1), HOME), 100.0);
        assert_eq!(sim.field().sample(ivec2(6, 6), FOOD), 100.0);
    }

    #[test]
    fn searching_ant_lays_home_trail() {
        let config = SimConfig {
            pheromone_evaporation_rate: 0.0,
            sigma_diffusion: 0.0,
            nest_pheromone_deposit_amount: 0.0,
            ..small_config(16, 16, 1)
        };
        let mut sim = with_nest(AntSimulation::new(config).unwrap(), &[(8, 8)]);
        sim.ready().unwrap();
        sim.step();

        let ant = &sim.ants()[0];
        assert!(!ant.carrying_food);
        assert_eq!(sim.field().sample(ant.grid_position, HOME), 1.0);
        assert_eq!(sim.field().total(FOOD), 0.0);
    }

    #[test]
    fn deposit_is_scaled_by_terrain_multiplier() {
        let config = SimConfig {
            pheromone_evaporation_rate: 0.0,
            sigma_diffusion: 0.0,
            nest_pheromone_deposit_amount: 0.0,
            ..small_config(16, 16, 1)
        };
        let mut sim = with_nest(AntSimulation::new(config).unwrap(), &[(12, 12)]);
        // Only the straight far probe of an ant at (5, 5) facing +x is walled.
        sim.passable_mask_mut()[(7, 5)] = false;
        sim.ready().unwrap();
        sim.ants[0] = Ant::at_nest(ivec2(5, 5), 0.0);

        sim.step();

        let ant = &sim.ants()[0];
        let expected = 2.0f32 / 3.0;
        assert!((ant.pheromone_drop_multiplier - expected).abs() < 1e-6);
        // Every candidate step from (5, 5) rounds to (6, 5).
        assert_eq!(ant.grid_position, ivec2(6, 5));
        let laid = sim.field().sample(ivec2(6, 5), HOME);
        assert!((laid - expected as f64).abs() < 1e-6, "deposited {laid}");
        assert_eq!(sim.field().total(HOME), laid);
    }

    #[test]
    fn emission_precedes_diffusion_and_evaporation() {
        let config = small_config(9, 9, 0);
        let mut sim = with_nest(AntSimulation::new(config).unwrap(), &[(4, 4)]);
        sim.ready().unwrap();
        sim.step();

        let config = sim.config();
        let kernel = GaussianKernel::unit(config.sigma_diffusion as f64);
        let weights = kernel.weights();
        let (k0, k1) = (weights[1], weights[0]);
        let keep = 1.0 - config.pheromone_evaporation_rate as f64;
        let level = config.nest_pheromone_deposit_amount as f64;

        let centre = sim.field().sample(ivec2(4, 4), HOME);
        let side = sim.field().sample(ivec2(5, 4), HOME);
        let corner = sim.field().sample(ivec2(5, 5), HOME);
        assert!((centre - level * k0 * k0 * keep).abs() < 1e-9, "centre {centre}");
        assert!((side - level * k1 * k0 * keep).abs() < 1e-9, "side {side}");
        assert!((corner - level * k1 * k1 * keep).abs() < 1e-9, "corner {corner}");
        assert_eq!(sim.field().total(FOOD), 0.0);
    }

    #[test]
    fn set_config_keeps_shape_fixed() {
        let mut sim = AntSimulation::new(small_config(8, 8, 2)).unwrap();
        let mut tuned = sim.config().clone();
        tuned.pheromone_evaporation_rate = 0.1;
        sim.set_config(tuned).unwrap();
        assert_eq!(sim.config().pheromone_evaporation_rate, 0.1);

        let resized = small_config(9, 8, 2);
        assert!(sim.set_config(resized).is_err());
    }
}
