/// Fixed-size numeric tuple used as a multi-valued grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channels<const N: usize>(pub [f64; N]);

/// Two-channel pheromone cell: 0 = home trail, 1 = food trail.
pub type Pheromones = Channels<2>;

pub const HOME: usize = 0;
pub const FOOD: usize = 1;

impl<const N: usize> Default for Channels<N> {
    fn default() -> Self {
        Self([0.0; N])
    }
}

impl<const N: usize> Channels<N> {
    pub const fn splat(value: f64) -> Self {
        Self([value; N])
    }

    pub fn get(&self, channel: usize) -> f64 {
        self.0[channel]
    }

    pub fn set(&mut self, channel: usize, value: f64) {
        self.0[channel] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        let mut out = *self;
        for v in &mut out.0 {
            *v = f(*v);
        }
        out
    }

    fn zip_with(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let mut out = *self;
        for (a, b) in out.0.iter_mut().zip(other.0.iter()) {
            *a = f(*a, *b);
        }
        out
    }

    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }
}
