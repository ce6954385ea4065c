use std::ops::{Index, IndexMut};

use macroquad::math::IVec2;

use crate::channels::Channels;
use crate::error::SimError;

/// Cell types the diffusion operator and scalar grid ops can work with.
pub trait CellValue: Copy {
    fn zero() -> Self;

    /// `self += value * weight`, per channel.
    fn add_weighted(&mut self, value: &Self, weight: f64);

    fn map_components(&mut self, f: impl FnMut(f64) -> f64);
}

impl CellValue for f64 {
    fn zero() -> Self {
        0.0
    }

    fn add_weighted(&mut self, value: &Self, weight: f64) {
        *self += value * weight;
    }

    fn map_components(&mut self, mut f: impl FnMut(f64) -> f64) {
        *self = f(*self);
    }
}

impl CellValue for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add_weighted(&mut self, value: &Self, weight: f64) {
        *self += (*value as f64 * weight) as f32;
    }

    fn map_components(&mut self, mut f: impl FnMut(f64) -> f64) {
        *self = f(*self as f64) as f32;
    }
}

impl<const N: usize> CellValue for Channels<N> {
    fn zero() -> Self {
        Channels([0.0; N])
    }

    fn add_weighted(&mut self, value: &Self, weight: f64) {
        for (acc, v) in self.0.iter_mut().zip(value.0.iter()) {
            *acc += v * weight;
        }
    }

    fn map_components(&mut self, mut f: impl FnMut(f64) -> f64) {
        for v in &mut self.0 {
            *v = f(*v);
        }
    }
}

/// Dense row-major 2-D array. Coordinates must already be wrapped into the
/// grid before indexing; out-of-range access panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            cells: vec![fill; width * height],
            width,
            height,
        }
    }

    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, SimError> {
        if cells.len() != width * height {
            return Err(SimError::BufferSize {
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self { cells, width, height })
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn map<U: Clone>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            cells: self.cells.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn linear_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside {}x{}", self.width, self.height);
        y * self.width + x
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate `(x, y, &cell)` in row-major order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % width, i / width, c))
    }
}

impl<T: CellValue> Grid<T> {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            cells: vec![T::zero(); width * height],
            width,
            height,
        }
    }

    pub fn add_scalar(&mut self, value: f64) {
        self.apply(|v| v + value);
    }

    pub fn sub_scalar(&mut self, value: f64) {
        self.apply(|v| v - value);
    }

    pub fn mul_scalar(&mut self, value: f64) {
        self.apply(|v| v * value);
    }

    pub fn div_scalar(&mut self, value: f64) {
        self.apply(|v| v / value);
    }

    /// Apply `f` to every channel of every cell.
    pub fn apply(&mut self, mut f: impl FnMut(f64) -> f64) {
        for cell in &mut self.cells {
            cell.map_components(&mut f);
        }
    }
}

/// Per-channel `(min, max)` over the whole grid.
pub fn channel_min_max<const N: usize>(grid: &Grid<Channels<N>>) -> ([f64; N], [f64; N]) {
    let mut min = [f64::INFINITY; N];
    let mut max = [f64::NEG_INFINITY; N];
    for cell in grid.iter() {
        for c in 0..N {
            min[c] = min[c].min(cell.0[c]);
            max[c] = max[c].max(cell.0[c]);
        }
    }
    (min, max)
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.cells[index]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        let i = self.linear_index(x, y);
        &self.cells[i]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let i = self.linear_index(x, y);
        &mut self.cells[i]
    }
}

impl<T> Index<IVec2> for Grid<T> {
    type Output = T;

    fn index(&self, cell: IVec2) -> &T {
        &self[(cell.x as usize, cell.y as usize)]
    }
}

impl<T> IndexMut<IVec2> for Grid<T> {
    fn index_mut(&mut self, cell: IVec2) -> &mut T {
        &mut self[(cell.x as usize, cell.y as usize)]
    }
}
