//! 3-D vote accumulator and the quarter-symmetry voting pass.

use crate::lut::CircleLut;
use crate::{HoughError, Roi};

/// Vote histogram over `(x, y, radius)`, stored flat in row-major order
/// with linear index `ri * h * w + y * w + x`.
///
/// Counts are `u32`; the vote magnitude is bounded by
/// `4 * lut_size * edge_pixel_count`, which stays far below `u32::MAX`
/// for any ROI sized for interactive latency.
#[derive(Clone, Debug)]
pub struct Accumulator {
    w: usize,
    h: usize,
    depth: usize,
    data: Vec<u32>,
}

impl Accumulator {
    /// Allocate a zeroed `w x h x depth` histogram.
    ///
    /// Allocation is fallible: an oversized request surfaces as
    /// [`HoughError::Alloc`] instead of aborting the process.
    pub fn new(w: usize, h: usize, depth: usize) -> Result<Self, HoughError> {
        let cells = w
            .checked_mul(h)
            .and_then(|p| p.checked_mul(depth))
            .ok_or(HoughError::Alloc { cells: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| HoughError::Alloc { cells })?;
        data.resize(cells, 0);
        Ok(Self { w, h, depth, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Vote count at `(x, y)` in radius plane `ri`.
    #[inline]
    pub fn at(&self, x: usize, y: usize, ri: usize) -> u32 {
        self.data[ri * self.h * self.w + y * self.w + x]
    }

    /// Sum of all votes in radius plane `ri`.
    pub fn plane_total(&self, ri: usize) -> u64 {
        let plane = self.h * self.w;
        self.data[ri * plane..(ri + 1) * plane]
            .iter()
            .map(|&v| v as u64)
            .sum()
    }

    /// Increment `(a, b, ri)` if `(a, b)` lies inside the histogram.
    /// Each reflected point is bounds-checked independently.
    #[inline]
    fn bump(&mut self, a: i64, b: i64, ri: usize) {
        if a >= 0 && b >= 0 && (a as usize) < self.w && (b as usize) < self.h {
            self.data[ri * self.h * self.w + (b as usize) * self.w + a as usize] += 1;
        }
    }
}

/// Scan the ROI of `mask` and cast votes for every edge pixel.
///
/// For each nonzero pixel, each radius row (processed high to low; the
/// order does not affect results) and each retained offset `(dx, dy)`,
/// the four reflected points `(x +- dx, y +- dy)` are voted. Mirror
/// images coincide when the offset lies on an axis; each distinct point
/// is voted exactly once.
///
/// Coordinates and votes are ROI-local: the accumulator must be sized
/// `roi.width() x roi.height() x lut.depth()`.
pub fn vote_circles(
    mask: &[u8],
    mask_width: usize,
    roi: Roi,
    lut: &CircleLut,
    acc: &mut Accumulator,
) {
    debug_assert_eq!(acc.width(), roi.width());
    debug_assert_eq!(acc.height(), roi.height());
    debug_assert_eq!(acc.depth(), lut.depth());

    for y in 0..roi.height() {
        let row_base = (roi.y0 + y) * mask_width + roi.x0;
        for x in 0..roi.width() {
            if mask[row_base + x] == 0 {
                continue;
            }
            let cx = x as i64;
            let cy = y as i64;
            for ri in (0..lut.depth()).rev() {
                for &(dx, dy) in lut.row(ri) {
                    let dx = dx as i64;
                    let dy = dy as i64;
                    acc.bump(cx + dx, cy + dy, ri);
                    if dy != 0 {
                        acc.bump(cx + dx, cy - dy, ri);
                    }
                    if dx != 0 {
                        acc.bump(cx - dx, cy + dy, ri);
                        if dy != 0 {
                            acc.bump(cx - dx, cy - dy, ri);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AngularMode;

    fn single_pixel_mask(w: usize, h: usize, x: usize, y: usize) -> Vec<u8> {
        let mut mask = vec![0u8; w * h];
        mask[y * w + x] = 255;
        mask
    }

    #[test]
    fn single_pixel_never_double_votes_a_cell() {
        let (w, h) = (41, 41);
        let mask = single_pixel_mask(w, h, 20, 20);
        let lut = CircleLut::build(5, 7, AngularMode::Fixed(64)).unwrap();
        let mut acc = Accumulator::new(w, h, lut.depth()).unwrap();
        vote_circles(&mask, w, Roi::full(w, h), &lut, &mut acc);

        for ri in 0..acc.depth() {
            for y in 0..h {
                for x in 0..w {
                    assert!(
                        acc.at(x, y, ri) <= 1,
                        "cell ({x},{y},{ri}) voted more than once"
                    );
                }
            }
        }
    }

    #[test]
    fn plane_totals_match_distinct_reflection_counts() {
        // Pixel deep inside the raster: every reflected point lands in
        // bounds, so the plane total is exactly votes_per_pass.
        let (w, h) = (41, 41);
        let mask = single_pixel_mask(w, h, 20, 20);
        let lut = CircleLut::build(5, 7, AngularMode::Fixed(64)).unwrap();
        let mut acc = Accumulator::new(w, h, lut.depth()).unwrap();
        vote_circles(&mask, w, Roi::full(w, h), &lut, &mut acc);

        for ri in 0..lut.depth() {
            assert_eq!(acc.plane_total(ri), lut.votes_per_pass(ri) as u64);
        }
    }

    #[test]
    fn border_votes_are_clipped_per_point() {
        // Pixel in the top-left corner: only the (+dx, +dy) quadrant can
        // land in bounds, the mirrored points are dropped one by one.
        let (w, h) = (30, 30);
        let mask = single_pixel_mask(w, h, 0, 0);
        let lut = CircleLut::build(6, 6, AngularMode::Fixed(48)).unwrap();
        let mut acc = Accumulator::new(w, h, lut.depth()).unwrap();
        vote_circles(&mask, w, Roi::full(w, h), &lut, &mut acc);

        let in_quadrant = lut.row(0).len() as u64;
        assert_eq!(acc.plane_total(0), in_quadrant);
    }

    #[test]
    fn empty_roi_accumulates_nothing() {
        let (w, h) = (16, 16);
        let mask = vec![255u8; w * h];
        let lut = CircleLut::build(2, 3, AngularMode::Fixed(32)).unwrap();
        let roi = Roi {
            x0: 8,
            y0: 8,
            x1: 8,
            y1: 8,
        };
        let mut acc = Accumulator::new(roi.width(), roi.height(), lut.depth()).unwrap();
        vote_circles(&mask, w, roi, &lut, &mut acc);
        assert_eq!(acc.plane_total(0), 0);
        assert_eq!(acc.plane_total(1), 0);
    }
}
