use macroquad::math::{ivec2, IVec2};
use tracing::debug;

use crate::error::SimError;
use crate::grid::Grid;

/// Static terrain masks, populated before `ready()` and read-only while stepping.
#[derive(Clone, Debug)]
pub struct Masks {
    pub passable: Grid<bool>,
    pub nest: Grid<bool>,
    pub food: Grid<bool>,
}

impl Masks {
    /// Everything passable, no nest, no food.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            passable: Grid::new(width, height, true),
            nest: Grid::new(width, height, false),
            food: Grid::new(width, height, false),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.passable.shape()
    }

    pub fn nest_positions(&self) -> Vec<IVec2> {
        self.nest
            .indexed_iter()
            .filter(|(_, _, &is_nest)| is_nest)
            .map(|(x, y, _)| ivec2(x as i32, y as i32))
            .collect()
    }

    pub fn food_cell_count(&self) -> usize {
        self.food.iter().filter(|&&f| f).count()
    }
}

/// Copy a byte grid (non-zero = set) into a boolean mask of the same shape.
pub fn load_mask(name: &'static str, target: &mut Grid<bool>, source: &Grid<u8>) -> Result<(), SimError> {
    if source.shape() != target.shape() {
        return Err(SimError::ShapeMismatch {
            mask: name,
            expected: target.shape(),
            found: source.shape(),
        });
    }
    for (dst, &src) in target.as_mut_slice().iter_mut().zip(source.iter()) {
        *dst = src > 0;
    }
    debug!(mask = name, set = target.iter().filter(|&&v| v).count(), "loaded mask");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_mask_thresholds_bytes() {
        let mut mask = Grid::new(2, 2, false);
        let bytes = Grid::from_vec(2, 2, vec![0, 1, 255, 0]).unwrap();
        load_mask("nest", &mut mask, &bytes).unwrap();
        assert_eq!(mask.as_slice(), &[false, true, true, false]);
    }

    #[test]
    fn load_mask_rejects_shape_mismatch() {
        let mut mask = Grid::new(3, 2, false);
        let bytes = Grid::new(2, 3, 1u8);
        let err = load_mask("food", &mut mask, &bytes).unwrap_err();
        match err {
            SimError::ShapeMismatch { mask, expected, found } => {
                assert_eq!(mask, "food");
                assert_eq!(expected, (3, 2));
                assert_eq!(found, (2, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nest_positions_are_row_major() {
        let mut masks = Masks::new(3, 3);
        masks.nest[(2, 0)] = true;
        masks.nest[(0, 1)] = true;
        assert_eq!(masks.nest_positions(), vec![ivec2(2, 0), ivec2(0, 1)]);
    }
}
