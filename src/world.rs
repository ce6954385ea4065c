use macroquad::math::{ivec2, IVec2, Vec2};

/// Toroidal extent of the grid.
///
/// Wrapping is a single add/subtract of the extent per axis, not a modulo:
/// it is only correct for points displaced by at most one extent from the
/// grid. Agents move one unit per tick and probe at most `sense_distance`
/// away, so this holds as long as `sense_distance` stays below the grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct World {
    pub width: i32,
    pub height: i32,
}

impl World {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    /// Wrap a continuous position back onto the torus.
    pub fn wrap(&self, mut pos: Vec2) -> Vec2 {
        let (w, h) = (self.width as f32, self.height as f32);
        if pos.x < 0.0 {
            pos.x += w;
        }
        if pos.x >= w {
            pos.x -= w;
        }
        if pos.y < 0.0 {
            pos.y += h;
        }
        if pos.y >= h {
            pos.y -= h;
        }
        pos
    }

    /// Wrap an integer cell coordinate back onto the torus.
    pub fn wrap_cell(&self, mut cell: IVec2) -> IVec2 {
        if cell.x < 0 {
            cell.x += self.width;
        }
        if cell.x >= self.width {
            cell.x -= self.width;
        }
        if cell.y < 0 {
            cell.y += self.height;
        }
        if cell.y >= self.height {
            cell.y -= self.height;
        }
        cell
    }

    /// Round half away from zero, then wrap.
    pub fn round_and_wrap(&self, pos: Vec2) -> IVec2 {
        self.wrap_cell(ivec2(pos.x.round() as i32, pos.y.round() as i32))
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }
}
