//! Disc-shaped morphology over byte masks, used once at setup time to
//! sculpt obstacle masks. Pixels outside the grid are ignored (no wrap).

use crate::grid::Grid;

/// `(dy, half_width)` for every row of a disc of `radius`: the row spans
/// `dx` in `-half_width..=half_width`, i.e. `dx * dx + dy * dy <= radius * radius`.
fn disc_rows(radius: i32) -> Vec<(i32, i32)> {
    (-radius..=radius)
        .map(|dy| {
            let rem = radius * radius - dy * dy;
            let mut half = 0;
            while (half + 1) * (half + 1) <= rem {
                half += 1;
            }
            (dy, half)
        })
        .collect()
}

/// Replace each pixel by the disc neighbour that `prefer(candidate, current)`
/// favours. `a < b` gives erosion, `a > b` dilation.
///
/// Works row by row: `span` holds, per pixel, the preferred value over a
/// horizontal window of growing half-width, and each disc row folds the
/// window of its own half-width into the output.
pub fn disc_morph<T: Copy>(src: &Grid<T>, radius: u32, prefer: impl Fn(&T, &T) -> bool) -> Grid<T> {
    let (width, height) = src.shape();
    let radius = radius as i32;
    let rows = disc_rows(radius);
    let pixels = src.as_slice();
    let mut span = src.clone();
    let mut out = src.clone();

    for half in 0..=radius {
        if half > 0 {
            let h = half as usize;
            for y in 0..height {
                let src_row = &pixels[y * width..(y + 1) * width];
                let span_row = &mut span.as_mut_slice()[y * width..(y + 1) * width];
                for (x, value) in span_row.iter_mut().enumerate() {
                    if x >= h && prefer(&src_row[x - h], value) {
                        *value = src_row[x - h];
                    }
                    if x + h < width && prefer(&src_row[x + h], value) {
                        *value = src_row[x + h];
                    }
                }
            }
        }

        for &(dy, _) in rows.iter().filter(|&&(_, row_half)| row_half == half) {
            for y in 0..height {
                let sy = y as i32 + dy;
                if sy < 0 || sy >= height as i32 {
                    continue;
                }
                let sy = sy as usize;
                let span_row = &span.as_slice()[sy * width..(sy + 1) * width];
                let out_row = &mut out.as_mut_slice()[y * width..(y + 1) * width];
                for (value, candidate) in out_row.iter_mut().zip(span_row) {
                    if prefer(candidate, value) {
                        *value = *candidate;
                    }
                }
            }
        }
    }
    out
}

pub fn erode<T: Copy + PartialOrd>(src: &Grid<T>, radius: u32) -> Grid<T> {
    disc_morph(src, radius, |a, b| a < b)
}

pub fn dilate<T: Copy + PartialOrd>(src: &Grid<T>, radius: u32) -> Grid<T> {
    disc_morph(src, radius, |a, b| a > b)
}

/// Erosion then dilation: removes features thinner than the disc.
pub fn open<T: Copy + PartialOrd>(src: &Grid<T>, radius: u32) -> Grid<T> {
    dilate(&erode(src, radius), radius)
}

/// Dilation then erosion: fills gaps narrower than the disc.
pub fn close<T: Copy + PartialOrd>(src: &Grid<T>, radius: u32) -> Grid<T> {
    erode(&dilate(src, radius), radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn blank(width: usize, height: usize) -> Grid<u8> {
        Grid::new(width, height, 0)
    }

    #[test]
    fn dilation_grows_a_point_into_a_disc() {
        let mut g = blank(7, 7);
        g[(3, 3)] = 255;
        let d = dilate(&g, 2);
        assert_eq!(d[(3, 1)], 255);
        assert_eq!(d[(5, 3)], 255);
        assert_eq!(d[(4, 4)], 255);
        assert_eq!(d[(5, 5)], 0);
        assert_eq!(d.iter().filter(|&&v| v > 0).count(), 13);
    }

    #[test]
    fn erosion_removes_thin_lines() {
        let mut g = blank(9, 9);
        for x in 0..9 {
            g[(x, 4)] = 255;
        }
        assert!(erode(&g, 1).iter().all(|&v| v == 0));
    }

    #[test]
    fn opening_keeps_large_blobs_and_drops_specks() {
        let mut g = blank(12, 12);
        for y in 2..9 {
            for x in 2..9 {
                g[(x, y)] = 255;
            }
        }
        g[(11, 0)] = 255;
        let o = open(&g, 1);
        assert_eq!(o[(5, 5)], 255);
        assert_eq!(o[(11, 0)], 0);
    }

    #[test]
    fn closing_fills_pinholes() {
        let mut g = Grid::new(8, 8, 255u8);
        g[(4, 4)] = 0;
        assert_eq!(close(&g, 1)[(4, 4)], 255);
    }

    fn brute_force(src: &Grid<u8>, radius: i32, prefer: impl Fn(&u8, &u8) -> bool) -> Grid<u8> {
        let (width, height) = src.shape();
        let mut out = src.clone();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let mut value = src[(x as usize, y as usize)];
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        let (ix, iy) = (x + dx, y + dy);
                        if dx * dx + dy * dy > radius * radius
                            || ix < 0
                            || iy < 0
                            || ix >= width as i32
                            || iy >= height as i32
                        {
                            continue;
                        }
                        let candidate = src[(ix as usize, iy as usize)];
                        if prefer(&candidate, &value) {
                            value = candidate;
                        }
                    }
                }
                out[(x as usize, y as usize)] = value;
            }
        }
        out
    }

    #[test]
    fn row_spans_match_full_disc_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let cells: Vec<u8> = (0..37 * 23).map(|_| rng.gen()).collect();
        let g = Grid::from_vec(37, 23, cells).unwrap();
        for radius in 0..8 {
            assert_eq!(erode(&g, radius as u32), brute_force(&g, radius, |a, b| a < b), "erode r={radius}");
            assert_eq!(dilate(&g, radius as u32), brute_force(&g, radius, |a, b| a > b), "dilate r={radius}");
        }
    }

    #[test]
    fn disc_rows_follow_the_circle() {
        assert_eq!(disc_rows(0), vec![(0, 0)]);
        assert_eq!(disc_rows(2), vec![(-2, 0), (-1, 1), (0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn full_size_arena_pass_is_fast() {
        let mut g = Grid::new(400, 400, 255u8);
        for x in 0..400 {
            g[(x, 200)] = 0;
        }
        let start = std::time::Instant::now();
        let opened = open(&g, 25);
        assert!(start.elapsed().as_secs() < 30);
        assert_eq!(opened[(0, 0)], 255);
        assert_eq!(opened[(100, 200)], 0);
    }

    #[test]
    fn custom_strategy_is_honoured() {
        let g = Grid::from_vec(3, 1, vec![1, 5, 3]).unwrap();
        // Prefer values closest to 3.
        let out = disc_morph(&g, 1, |a: &i32, b: &i32| (a - 3).abs() < (b - 3).abs());
        assert_eq!(out.as_slice(), &[1, 3, 3]);
    }
}
