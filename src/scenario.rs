//! Setup-time mask builders. These play the role of the external collaborator
//! that sculpts terrain, nest and food before `ready()`.

use std::f64::consts::TAU;
use std::str::FromStr;

use noise::{Fbm, NoiseFn, Perlin};
use serde::Serialize;
use tracing::debug;

use crate::error::SimError;
use crate::grid::Grid;
use crate::morphology;
use crate::simulation::AntSimulation;

const LAND: u8 = 255;
const ROCK: u8 = 0;

/// Layout reference size; arena distances below are for a 1000x1000 grid and
/// scale with the smaller grid extent.
const REFERENCE_EXTENT: f32 = 1000.0;
const ARENA_BORDER: f32 = 80.0;
const ARENA_WALL_HALF_WIDTH: f32 = 15.0;
const SOURCE_RADIUS: f32 = 50.0;
const SOURCE_MARGIN: f32 = 200.0;
const CAVE_ROCK_THRESHOLD: f64 = 0.25;
const CAVE_FEATURES_PER_EXTENT: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Scenario {
    /// Walled border, a diagonal barrier, nest top-left and food bottom-right.
    Arena,
    /// No obstacles at all.
    Open,
    /// Fractal-noise rock on a wrapping world.
    Caves,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Arena, Scenario::Open, Scenario::Caves];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Arena => "arena",
            Scenario::Open => "open",
            Scenario::Caves => "caves",
        }
    }
}

impl FromStr for Scenario {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "arena" | "default" => Ok(Scenario::Arena),
            "open" | "empty" => Ok(Scenario::Open),
            "caves" | "noise" => Ok(Scenario::Caves),
            _ => Err(SimError::UnknownScenario(value.to_string())),
        }
    }
}

/// Byte masks (non-zero = set) ready for the simulation's mask setters.
#[derive(Clone, Debug)]
pub struct ScenarioMasks {
    pub passable: Grid<u8>,
    pub nest: Grid<u8>,
    pub food: Grid<u8>,
}

impl ScenarioMasks {
    pub fn apply(&self, sim: &mut AntSimulation) -> Result<(), SimError> {
        sim.set_passable_mask(&self.passable)?;
        sim.set_nest_mask(&self.nest)?;
        sim.set_food_mask(&self.food)?;
        Ok(())
    }
}

fn scaled(value: f32, scale: f32) -> i32 {
    (value * scale).round() as i32
}

fn paint_disc(grid: &mut Grid<u8>, cx: i32, cy: i32, radius: i32, value: u8) {
    let (width, height) = grid.shape();
    for y in (cy - radius).max(0)..=(cy + radius).min(height as i32 - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(width as i32 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= radius * radius {
                grid[(x as usize, y as usize)] = value;
            }
        }
    }
}

fn arena_terrain(width: usize, height: usize, scale: f32) -> Grid<u8> {
    let mut land = Grid::new(width, height, LAND);
    let border = scaled(ARENA_BORDER, scale).max(1) as usize;
    let half_wall = scaled(ARENA_WALL_HALF_WIDTH, scale);
    let (w, h) = (width as i32, height as i32);

    for y in 0..height {
        for x in 0..width {
            if x < border || x >= width.saturating_sub(border) || y < border || y >= height.saturating_sub(border) {
                land[(x, y)] = ROCK;
            }
        }
    }

    // 45 degree barrier from the top-right towards the bottom-left.
    for x in (w / 4 + 1)..w {
        let center_y = (w * 3 / 4 - x) + h / 4;
        for offset in -half_wall..=half_wall {
            let y = center_y + offset;
            if (0..h).contains(&y) {
                land[(x as usize, y as usize)] = ROCK;
            }
        }
    }

    // Round the corners off the hand-drawn shapes.
    let radius = |r: f32| scaled(r, scale).max(0) as u32;
    let land = morphology::open(&land, radius(25.0));
    let land = morphology::close(&land, radius(5.0));
    let land = morphology::open(&land, radius(10.0));
    morphology::erode(&land, radius(7.0))
}

/// Sample `noise` at `(u, v)` in `[0, 1)^2` on a torus embedded in 4-D, so
/// the pattern repeats across both grid edges.
fn torus_sample(noise: &impl NoiseFn<f64, 4>, u: f64, v: f64) -> f64 {
    let (au, av) = (u * TAU, v * TAU);
    let r = CAVE_FEATURES_PER_EXTENT / TAU;
    noise.get([au.cos() * r, au.sin() * r, av.cos() * r, av.sin() * r])
}

fn cave_terrain(width: usize, height: usize, seed: u64) -> Grid<u8> {
    let fbm: Fbm<Perlin> = Fbm::new(seed as u32);
    let mut land = Grid::new(width, height, LAND);
    for y in 0..height {
        for x in 0..width {
            let u = x as f64 / width as f64;
            let v = y as f64 / height as f64;
            if torus_sample(&fbm, u, v) > CAVE_ROCK_THRESHOLD {
                land[(x, y)] = ROCK;
            }
        }
    }
    land
}

/// Build the masks of `scenario` for a `width` x `height` grid.
pub fn build(scenario: Scenario, width: usize, height: usize, seed: u64) -> ScenarioMasks {
    let scale = width.min(height) as f32 / REFERENCE_EXTENT;
    let mut passable = match scenario {
        Scenario::Arena => arena_terrain(width, height, scale),
        Scenario::Open => Grid::new(width, height, LAND),
        Scenario::Caves => cave_terrain(width, height, seed),
    };

    let radius = scaled(SOURCE_RADIUS, scale).max(1);
    let margin = scaled(SOURCE_MARGIN, scale);
    let nest_center = (radius + margin, radius + margin);
    let food_center = (width as i32 - radius - margin, height as i32 - radius - margin);

    let mut nest = Grid::new(width, height, 0u8);
    let mut food = Grid::new(width, height, 0u8);
    paint_disc(&mut nest, nest_center.0, nest_center.1, radius, LAND);
    paint_disc(&mut food, food_center.0, food_center.1, radius, LAND);

    // Sources are always reachable ground.
    paint_disc(&mut passable, nest_center.0, nest_center.1, radius, LAND);
    paint_disc(&mut passable, food_center.0, food_center.1, radius, LAND);

    debug!(
        scenario = scenario.label(),
        width,
        height,
        rock = passable.iter().filter(|&&v| v == ROCK).count(),
        "built scenario masks"
    );
    ScenarioMasks { passable, nest, food }
}

/// Finite-food policy: clear the food cells picked up during the last tick.
/// Does nothing when the simulation is configured with infinite food.
pub fn deplete_picked_food(sim: &mut AntSimulation) -> usize {
    if sim.config().infinite_food {
        return 0;
    }
    let picked = sim.last_pickups().to_vec();
    let food = sim.food_mask_mut();
    let mut cleared = 0;
    for cell in picked {
        if food[cell] {
            food[cell] = false;
            cleared += 1;
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn parses_labels_and_aliases() {
        assert_eq!("Arena".parse::<Scenario>().unwrap(), Scenario::Arena);
        assert_eq!("noise".parse::<Scenario>().unwrap(), Scenario::Caves);
        for scenario in Scenario::ALL {
            assert_eq!(scenario.label().parse::<Scenario>().unwrap(), scenario);
        }
        assert!(matches!("maze".parse::<Scenario>(), Err(SimError::UnknownScenario(_))));
    }

    #[test]
    fn arena_has_walls_nest_and_food() {
        let masks = build(Scenario::Arena, 100, 100, 1);
        assert_eq!(masks.passable[(0, 0)], ROCK);
        assert_eq!(masks.passable[(99, 50)], ROCK);
        assert!(masks.nest.iter().any(|&v| v > 0));
        assert!(masks.food.iter().any(|&v| v > 0));
        assert_eq!(masks.nest[(25, 25)], LAND);
        assert_eq!(masks.food[(75, 75)], LAND);
        assert_eq!(masks.passable[(25, 25)], LAND);
    }

    #[test]
    fn open_scenario_is_fully_passable() {
        let masks = build(Scenario::Open, 40, 30, 0);
        assert!(masks.passable.iter().all(|&v| v == LAND));
    }

    #[test]
    fn caves_are_seeded() {
        let a = build(Scenario::Caves, 64, 64, 5);
        let b = build(Scenario::Caves, 64, 64, 5);
        assert_eq!(a.passable, b.passable);
    }

    #[test]
    fn cave_noise_wraps_across_edges() {
        let fbm: Fbm<Perlin> = Fbm::new(9);
        for i in 0..20 {
            let t = i as f64 / 20.0;
            assert!((torus_sample(&fbm, 0.0, t) - torus_sample(&fbm, 1.0, t)).abs() < 1e-9);
            assert!((torus_sample(&fbm, t, 0.0) - torus_sample(&fbm, t, 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn caves_have_no_seam_at_the_border() {
        // Rock along the wrap seam should agree with its wrapped neighbour about
        // as often as any interior pair of adjacent columns does.
        let masks = build(Scenario::Caves, 128, 128, 3);
        let agree = |a: usize, b: usize| (0..128).filter(|&y| masks.passable[(a, y)] == masks.passable[(b, y)]).count();
        let seam = agree(127, 0);
        let interior = (0..127).map(|x| agree(x, x + 1)).sum::<usize>() / 127;
        assert!(seam + 20 >= interior, "seam {seam} vs interior {interior}");
    }

    #[test]
    fn depletion_only_applies_to_finite_food() {
        let config = SimConfig {
            n_ants: 1,
            sense_distance: 2,
            infinite_food: false,
            pheromone_evaporation_rate: 0.0,
            sigma_diffusion: 0.0,
            ..SimConfig::default().with_shape(6, 6)
        };
        let mut sim = AntSimulation::new(config).unwrap();
        sim.nest_mask_mut()[(2, 2)] = true;
        // Surround the nest with food so the first move always lands on it.
        for y in 1..=3 {
            for x in 1..=3 {
                if (x, y) != (2, 2) {
                    sim.food_mask_mut()[(x, y)] = true;
                }
            }
        }
        sim.ready().unwrap();
        sim.step();

        assert_eq!(sim.food_collected(), 1);
        let picked = sim.last_pickups()[0];
        assert_eq!(deplete_picked_food(&mut sim), 1);
        assert!(!sim.masks().food[picked]);
    }
}
