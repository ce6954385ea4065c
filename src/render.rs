//! RGBA snapshot of the simulation for the viewer and headless captures.

use crate::ant::Ant;
use crate::channels::{FOOD, HOME};
use crate::config::{
    COLOR_ANT_CARRYING, COLOR_ANT_SEARCHING, COLOR_FOOD, COLOR_NEST, COLOR_WALL, RENDER_MAX_PHEROMONE,
};
use crate::masks::Masks;
use crate::pheromone::PheromoneField;

/// Map a pheromone concentration to 0..=255, saturating at the render max.
pub fn intensity(value: f64) -> u8 {
    (value.clamp(0.0, RENDER_MAX_PHEROMONE) * 255.0 / RENDER_MAX_PHEROMONE) as u8
}

/// Write one frame into `buffer` (`width * height * 4` bytes, row-major RGBA).
///
/// Layering, bottom to top: pheromone background (food trail red, home trail
/// green), nest white, food red, impassable dark gray, then ants. Sizing the
/// buffer is the caller's job; debug builds assert it.
pub fn draw_frame(field: &PheromoneField, masks: &Masks, ants: &[Ant], buffer: &mut [u8]) {
    let (width, height) = field.shape();
    debug_assert_eq!(buffer.len(), width * height * 4, "draw buffer has wrong size");

    let cells = field.cells.as_slice();
    for (i, pixel) in buffer.chunks_exact_mut(4).enumerate().take(cells.len()) {
        let color = if !masks.passable[i] {
            COLOR_WALL
        } else if masks.food[i] {
            COLOR_FOOD
        } else if masks.nest[i] {
            COLOR_NEST
        } else {
            let cell = &cells[i];
            [intensity(cell.get(FOOD)), intensity(cell.get(HOME)), 0, 255]
        };
        pixel.copy_from_slice(&color);
    }

    for ant in ants {
        let i = (ant.grid_position.y as usize * width + ant.grid_position.x as usize) * 4;
        let color = if ant.carrying_food {
            COLOR_ANT_CARRYING
        } else {
            COLOR_ANT_SEARCHING
        };
        buffer[i..i + 4].copy_from_slice(&color);
    }
}
