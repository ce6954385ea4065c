use macroquad::math::{IVec2, Vec2};

use crate::channels::{FOOD, HOME};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TurnDirection {
    #[default]
    Left,
    Right,
}

impl TurnDirection {
    pub fn flipped(self) -> Self {
        match self {
            TurnDirection::Left => TurnDirection::Right,
            TurnDirection::Right => TurnDirection::Left,
        }
    }

    /// Heading change for this direction: left turns are negative.
    pub fn signed(self, angle: f32) -> f32 {
        match self {
            TurnDirection::Left => -angle,
            TurnDirection::Right => angle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ant {
    pub position: Vec2,
    pub grid_position: IVec2,
    /// Radians.
    pub heading: f32,
    pub carrying_food: bool,
    pub age: u64,
    pub time_since_home: u64,
    pub time_since_food: u64,
    pub last_turn_direction: TurnDirection,
    /// Recomputed every tick from local passability, in [0, 1].
    pub pheromone_drop_multiplier: f32,
}

impl Default for Ant {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            grid_position: IVec2::ZERO,
            heading: 0.0,
            carrying_food: false,
            age: 0,
            time_since_home: 0,
            time_since_food: 0,
            last_turn_direction: TurnDirection::Left,
            pheromone_drop_multiplier: 1.0,
        }
    }
}

impl Ant {
    /// Fresh ant standing on `cell` facing `heading`.
    pub fn at_nest(cell: IVec2, heading: f32) -> Self {
        Self {
            position: cell.as_vec2(),
            grid_position: cell,
            heading,
            ..Self::default()
        }
    }

    pub fn turn(&mut self, direction: TurnDirection, angle: f32) {
        self.last_turn_direction = direction;
        self.heading += direction.signed(angle);
    }

    /// Channel the ant follows: home trail when carrying food, food trail otherwise.
    pub fn seeking_channel(&self) -> usize {
        if self.carrying_food {
            HOME
        } else {
            FOOD
        }
    }

    /// Channel the ant lays: a trail back to where it came from, so carriers
    /// mark the way to food and searchers mark the way home.
    pub fn trail_channel(&self) -> usize {
        if self.carrying_food {
            FOOD
        } else {
            HOME
        }
    }

    /// Reverse heading by pi.
    pub fn turn_around(&mut self) {
        self.heading += std::f32::consts::PI;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::ivec2;

    #[test]
    fn turning_records_direction_and_sign() {
        let mut ant = Ant::default();
        ant.turn(TurnDirection::Right, 0.5);
        assert_eq!(ant.heading, 0.5);
        assert_eq!(ant.last_turn_direction, TurnDirection::Right);
        ant.turn(TurnDirection::Left, 0.25);
        assert_eq!(ant.heading, 0.25);
        assert_eq!(ant.last_turn_direction, TurnDirection::Left);
    }

    #[test]
    fn at_nest_keeps_grid_position_consistent() {
        let ant = Ant::at_nest(ivec2(3, 4), 1.0);
        assert_eq!(ant.position, Vec2::new(3.0, 4.0));
        assert_eq!(ant.grid_position, ivec2(3, 4));
        assert!(!ant.carrying_food);
    }
}
