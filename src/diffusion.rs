//! Separable Gaussian blur with toroidal wrap-around, used as the pheromone
//! field's diffusion step.

use crate::config::MAX_KERNEL_LEN;
use crate::error::SimError;
use crate::grid::{CellValue, Grid};

/// Normalized 1-D Gaussian kernel of length `2r + 1`, held on the stack.
#[derive(Clone, Copy, Debug)]
pub struct GaussianKernel {
    weights: [f64; MAX_KERNEL_LEN],
    radius: usize,
}

impl GaussianKernel {
    pub fn new(radius: usize, sigma: f64) -> Result<Self, SimError> {
        if 2 * radius + 1 > MAX_KERNEL_LEN {
            return Err(SimError::KernelTooLarge { radius });
        }
        Ok(Self::build(radius, sigma))
    }

    /// Radius-1 kernel; always fits the buffer.
    pub fn unit(sigma: f64) -> Self {
        Self::build(1, sigma)
    }

    fn build(radius: usize, sigma: f64) -> Self {
        let mut weights = [0.0; MAX_KERNEL_LEN];
        let r = radius as i64;
        let mut sum = 0.0;
        for i in -r..=r {
            let v = (-((i * i) as f64) / (2.0 * sigma * sigma)).exp();
            weights[(i + r) as usize] = v;
            sum += v;
        }
        for w in &mut weights[..2 * radius + 1] {
            *w /= sum;
        }
        Self { weights, radius }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights[..2 * self.radius + 1]
    }
}

#[inline]
fn wrap_index(i: i64, n: i64) -> usize {
    i.rem_euclid(n) as usize
}

fn blur_rows<T: CellValue>(src: &Grid<T>, dst: &mut Grid<T>, kernel: &GaussianKernel) {
    let (width, height) = src.shape();
    let r = kernel.radius() as i64;
    let weights = kernel.weights();
    let src_cells = src.as_slice();
    let dst_cells = dst.as_mut_slice();
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let mut acc = T::zero();
            for (k, w) in weights.iter().enumerate() {
                let ix = wrap_index(x as i64 + k as i64 - r, width as i64);
                acc.add_weighted(&src_cells[row + ix], *w);
            }
            dst_cells[row + x] = acc;
        }
    }
}

fn blur_cols<T: CellValue>(src: &Grid<T>, dst: &mut Grid<T>, kernel: &GaussianKernel) {
    let (width, height) = src.shape();
    let r = kernel.radius() as i64;
    let weights = kernel.weights();
    let src_cells = src.as_slice();
    let dst_cells = dst.as_mut_slice();
    for y in 0..height {
        for x in 0..width {
            let mut acc = T::zero();
            for (k, w) in weights.iter().enumerate() {
                let iy = wrap_index(y as i64 + k as i64 - r, height as i64);
                acc.add_weighted(&src_cells[iy * width + x], *w);
            }
            dst_cells[y * width + x] = acc;
        }
    }
}

fn check_shape<T>(name: &'static str, expected: (usize, usize), grid: &Grid<T>) -> Result<(), SimError> {
    if grid.shape() != expected {
        return Err(SimError::ShapeMismatch {
            mask: name,
            expected,
            found: grid.shape(),
        });
    }
    Ok(())
}

/// Blur `src` along x into `scratch`, then along y from `scratch` into `dst`.
pub fn gaussian_separable_wrap<T: CellValue>(
    src: &Grid<T>,
    scratch: &mut Grid<T>,
    dst: &mut Grid<T>,
    radius: usize,
    sigma: f64,
) -> Result<(), SimError> {
    check_shape("scratch", src.shape(), scratch)?;
    check_shape("destination", src.shape(), dst)?;
    let kernel = GaussianKernel::new(radius, sigma)?;
    blur_rows(src, scratch, &kernel);
    blur_cols(scratch, dst, &kernel);
    Ok(())
}

/// Same as [`gaussian_separable_wrap`] with source and destination being the
/// same grid. The caller guarantees `scratch` has the grid's shape.
pub(crate) fn blur_in_place<T: CellValue>(grid: &mut Grid<T>, scratch: &mut Grid<T>, kernel: &GaussianKernel) {
    debug_assert_eq!(grid.shape(), scratch.shape());
    blur_rows(grid, scratch, kernel);
    blur_cols(scratch, grid, kernel);
}
