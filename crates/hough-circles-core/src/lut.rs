//! Precomputed per-radius circle offsets sampling one quarter of the
//! circle, so the voting loop works with integer adds only.

use crate::{AngularMode, HoughError};
use std::f64::consts::FRAC_PI_2;

/// Quarter-circle offset table for a contiguous radius range.
///
/// For each radius, `mode / 4` angles are sampled evenly over
/// `[0, pi/2)` and rounded to integer pixel offsets. Rounding makes
/// neighboring samples collapse onto the same pixel at small radii, so
/// consecutive duplicates are suppressed per row and rows end up with
/// different lengths. The voting loop consumes each row's own length;
/// there is no shared sample count across radii.
///
/// A `mode` below 4 samples no angles at all and yields empty rows.
#[derive(Clone, Debug)]
pub struct CircleLut {
    rmin: u32,
    rows: Vec<Vec<(i32, i32)>>,
}

impl CircleLut {
    /// Build the table for radii `rmin..=rmax`.
    ///
    /// Validates the arguments before allocating anything: `rmax < rmin`
    /// and a non-positive resolved `mode` are rejected.
    pub fn build(rmin: u32, rmax: u32, mode: AngularMode) -> Result<Self, HoughError> {
        if rmax < rmin {
            return Err(HoughError::EmptyRadiusRange { rmin, rmax });
        }
        let subdivisions = mode.resolve(rmax)?;
        let samples = (subdivisions / 4) as usize;
        let depth = (rmax - rmin + 1) as usize;

        let mut rows: Vec<Vec<(i32, i32)>> = Vec::new();
        rows.try_reserve_exact(depth)
            .map_err(|_| HoughError::Alloc { cells: depth })?;

        let step = FRAC_PI_2 / samples.max(1) as f64;
        for ri in 0..depth {
            let r = (rmin + ri as u32) as f64;
            let mut row: Vec<(i32, i32)> = Vec::new();
            for k in 0..samples {
                let theta = k as f64 * step;
                let entry = (
                    round_half_away(r * theta.cos()),
                    round_half_away(r * theta.sin()),
                );
                // adjacent-duplicate suppression, not global dedup
                if row.last() != Some(&entry) {
                    row.push(entry);
                }
            }
            rows.push(row);
        }

        Ok(Self { rmin, rows })
    }

    /// Smallest radius covered by the table.
    #[inline]
    pub fn rmin(&self) -> u32 {
        self.rmin
    }

    /// Number of radius rows.
    #[inline]
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    /// Actual radius of row `ri`.
    #[inline]
    pub fn radius(&self, ri: usize) -> u32 {
        self.rmin + ri as u32
    }

    /// First-quadrant offsets retained for row `ri`.
    #[inline]
    pub fn row(&self, ri: usize) -> &[(i32, i32)] {
        &self.rows[ri]
    }

    /// Number of distinct reflected points one edge pixel votes for in
    /// row `ri`.
    ///
    /// An entry contributes 4 votes in general, 2 when it lies on an
    /// axis (`dx == 0` or `dy == 0`), and 1 when it is the origin, since
    /// coincident mirror images are voted only once.
    pub fn votes_per_pass(&self, ri: usize) -> u32 {
        self.rows[ri]
            .iter()
            .map(|&(dx, dy)| match (dx == 0, dy == 0) {
                (true, true) => 1,
                (true, false) | (false, true) => 2,
                (false, false) => 4,
            })
            .sum()
    }
}

/// Round half away from zero: `floor(v + 0.5)` for `v >= 0`,
/// `ceil(v - 0.5)` otherwise.
#[inline]
pub(crate) fn round_half_away(v: f64) -> i32 {
    if v >= 0.0 {
        (v + 0.5).floor() as i32
    } else {
        (v - 0.5).ceil() as i32
    }
}
