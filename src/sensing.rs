//! Per-ant sensing and movement decision.
//!
//! Each tick an ant probes three candidate headings (straight, left, right).
//! Per candidate a near probe one unit away tests whether the next step is
//! passable, and a far probe at `sense_distance` samples pheromone and looks
//! for the ant's current target (nest when carrying food, food otherwise).

use macroquad::math::{IVec2, Vec2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::trace;

use crate::ant::{Ant, TurnDirection};
use crate::config::{SimConfig, N_DIRECTIONS, STEP_SIZE, TURN_PENALTY};
use crate::masks::Masks;
use crate::pheromone::PheromoneField;
use crate::world::World;

/// Candidate heading relative to the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    Straight,
    Left,
    Right,
}

impl Candidate {
    /// Probe order; also the order of the weight vector handed to the sampler.
    pub const ALL: [Candidate; N_DIRECTIONS] = [Candidate::Straight, Candidate::Left, Candidate::Right];

    pub fn turn(self) -> Option<TurnDirection> {
        match self {
            Candidate::Straight => None,
            Candidate::Left => Some(TurnDirection::Left),
            Candidate::Right => Some(TurnDirection::Right),
        }
    }

    pub fn angle_offset(self, sense_angle: f32) -> f32 {
        self.turn().map_or(0.0, |dir| dir.signed(sense_angle))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub candidate: Candidate,
    pub near: IVec2,
    pub far: IVec2,
    pub near_passable: bool,
    pub far_passable: bool,
    pub is_target: bool,
    pub pheromone: f64,
}

/// Everything one ant perceives this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    pub probes: [Probe; N_DIRECTIONS],
}

impl Perception {
    pub fn near_passable_count(&self) -> usize {
        self.probes.iter().filter(|p| p.near_passable).count()
    }

    pub fn far_passable_count(&self) -> usize {
        self.probes.iter().filter(|p| p.far_passable).count()
    }

    pub fn is_blocked(&self) -> bool {
        self.near_passable_count() == 0
    }

    /// Near-passable fraction times far-passable fraction.
    pub fn drop_multiplier(&self) -> f32 {
        let n = N_DIRECTIONS as f32;
        (self.far_passable_count() as f32 / n) * (self.near_passable_count() as f32 / n)
    }

    /// Visible target heading. When several far probes see the target the
    /// last one in probe order wins.
    pub fn target(&self) -> Option<Candidate> {
        self.probes.iter().rev().find(|p| p.is_target).map(|p| p.candidate)
    }

    /// Weights for the exploration draw, in `Candidate::ALL` order.
    pub fn exploration_weights(&self, config: &SimConfig) -> [f32; N_DIRECTIONS] {
        let mut weights = [0.0f32; N_DIRECTIONS];
        for (i, probe) in self.probes.iter().enumerate() {
            let mut w = probe.pheromone as f32 + config.beta_uniformity;
            if probe.candidate == Candidate::Straight {
                w += config.beta_straight;
            }
            w = w.max(0.0);
            if probe.candidate != Candidate::Straight {
                w *= 1.0 - TURN_PENALTY;
            }
            if !probe.near_passable {
                w = 0.0;
            }
            weights[i] = w;
        }
        weights
    }
}

pub fn perceive(ant: &Ant, field: &PheromoneField, masks: &Masks, world: &World, config: &SimConfig) -> Perception {
    let target_mask = if ant.carrying_food { &masks.nest } else { &masks.food };
    let channel = ant.seeking_channel();
    let sense_distance = config.sense_distance as f32;

    let probes = Candidate::ALL.map(|candidate| {
        let dir = Vec2::from_angle(ant.heading + candidate.angle_offset(config.sense_angle));
        let near = world.round_and_wrap(ant.position + dir);
        let far = world.round_and_wrap(ant.position + dir * sense_distance);
        Probe {
            candidate,
            near,
            far,
            near_passable: masks.passable[near],
            far_passable: masks.passable[far],
            is_target: target_mask[far],
            pheromone: field.sample(far, channel),
        }
    });

    Perception { probes }
}

/// Draw an index from `weights`. If every weight is zero (or the vector is
/// otherwise unsampleable) fall back to a uniform pick. Consumes exactly one
/// draw from `rng` either way.
pub fn sample_direction<R: Rng>(weights: &[f32; N_DIRECTIONS], rng: &mut R) -> usize {
    let total: f32 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return rng.gen_range(0..N_DIRECTIONS);
    }
    match WeightedIndex::new(weights.iter().copied()) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..N_DIRECTIONS),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No passable cell right ahead; the ant turned in place.
    Blocked,
    Moved,
    PickedUp(IVec2),
    DroppedOff(IVec2),
}

/// Advance one ant by one tick: perceive, choose a heading, step, and handle
/// arrival at its target.
pub fn update_ant<R: Rng>(
    ant: &mut Ant,
    field: &PheromoneField,
    masks: &Masks,
    world: &World,
    config: &SimConfig,
    rng: &mut R,
) -> StepOutcome {
    let perception = perceive(ant, field, masks, world, config);
    ant.pheromone_drop_multiplier = perception.drop_multiplier();

    if perception.is_blocked() {
        // Forced turn flips direction on every blocked tick.
        ant.pheromone_drop_multiplier = 0.0;
        let direction = ant.last_turn_direction;
        ant.heading += direction.signed(config.only_wall_turn_angle);
        ant.last_turn_direction = direction.flipped();
        return StepOutcome::Blocked;
    }

    let choice = match perception.target() {
        Some(candidate) => candidate,
        None => {
            let weights = perception.exploration_weights(config);
            Candidate::ALL[sample_direction(&weights, rng)]
        }
    };
    if let Some(direction) = choice.turn() {
        ant.turn(direction, config.turn_angle);
    }

    ant.position = world.wrap(ant.position + Vec2::from_angle(ant.heading) * STEP_SIZE);
    ant.grid_position = world.round_and_wrap(ant.position);
    ant.age += 1;

    let cell = ant.grid_position;
    match (ant.carrying_food, masks.nest[cell], masks.food[cell]) {
        (true, true, _) => {
            ant.carrying_food = false;
            ant.turn_around();
            ant.time_since_home = 0;
            trace!(x = cell.x, y = cell.y, "food dropped at nest");
            return StepOutcome::DroppedOff(cell);
        }
        (false, _, true) => {
            ant.carrying_food = true;
            ant.turn_around();
            ant.time_since_food = 0;
            trace!(x = cell.x, y = cell.y, "food picked up");
            return StepOutcome::PickedUp(cell);
        }
        (true, false, _) => ant.time_since_home += 1,
        (false, _, false) => ant.time_since_food += 1,
    }
    StepOutcome::Moved
}
