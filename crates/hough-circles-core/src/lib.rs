//! Core primitives for detecting circles of a known radius range in a
//! binary edge mask via a circular Hough transform.
//!
//! # Overview
//!
//! The detector runs four stages over a caller-owned mask:
//!
//! - [`lut`] – per-radius quarter-circle offset tables, precomputed once
//!   per call so the voting loop never touches trigonometry.
//! - [`accum`] – the 3-D vote accumulator, filled by reflecting each
//!   first-quadrant offset into all four quadrants.
//! - [`extract`] – threshold scan emitting candidates in deterministic
//!   linear-index order.
//! - [`cluster`] – greedy merge of duplicate candidates into
//!   running-centroid clusters, one [`Detection`] per cluster.
//!
//! [`detect::detect_circles`] wires the stages together; everything it
//! allocates lives for exactly one invocation, so independent calls are
//! safe to run concurrently.
//!
//! The mask is a raw `&[u8]` in row-major layout, `0` meaning background
//! and any nonzero value meaning an edge pixel. Producing that mask
//! (thresholding, Canny, ...) is the caller's business.
//!
//! # Features
//!
//! - `tracing` – emits `tracing` spans around the pipeline entry points.
//!   This does not change results, only observability.

pub mod accum;
pub mod cluster;
pub mod detect;
pub mod extract;
pub mod lut;

pub use crate::accum::{vote_circles, Accumulator};
pub use crate::cluster::merge_candidates;
pub use crate::detect::{
    detect_circles, detect_circles_roi, detect_circles_with_trace, HoughResult,
};
pub use crate::extract::Candidate;
pub use crate::lut::CircleLut;

use std::fmt;

/// Number of angular subdivisions of the full circle used when sampling
/// the lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngularMode {
    /// Derive the subdivision count as `8 * rmax`.
    Auto,
    /// Explicit subdivision count; must be positive.
    Fixed(u32),
}

impl AngularMode {
    /// Resolve to a concrete subdivision count for the given `rmax`.
    pub fn resolve(self, rmax: u32) -> Result<u32, HoughError> {
        let mode = match self {
            AngularMode::Auto => rmax.saturating_mul(8),
            AngularMode::Fixed(mode) => mode,
        };
        if mode == 0 {
            return Err(HoughError::InvalidMode { mode });
        }
        Ok(mode)
    }
}

/// Tunable parameters for circle detection.
#[derive(Clone, Debug)]
pub struct HoughParams {
    /// Smallest radius searched, in pixels.
    pub rmin: u32,
    /// Largest radius searched, in pixels; must be `>= rmin`.
    pub rmax: u32,
    /// Angular sampling density for the lookup table.
    pub mode: AngularMode,
    /// Accumulator cells must hold strictly more votes than this to
    /// become candidates.
    pub min_votes: u32,
    /// Half-size of the cluster bounding box (`rngSame`), in pixels.
    /// Same-radius candidates falling inside a cluster's box are merged
    /// into it.
    pub merge_radius: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rmin: 10,
            rmax: 40,
            mode: AngularMode::Auto,
            min_votes: 10,
            merge_radius: 2,
        }
    }
}

impl HoughParams {
    /// Number of radius planes in the accumulator.
    #[inline]
    pub fn depth_r(&self) -> usize {
        (self.rmax.saturating_sub(self.rmin) + 1) as usize
    }
}

/// Rectangular region of the mask scanned for edge pixels.
///
/// `x1`/`y1` are exclusive. Votes are accumulated in ROI-local
/// coordinates; reported detections are shifted back by the ROI origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Roi {
    /// The full `w x h` raster.
    pub fn full(w: usize, h: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: w,
            y1: h,
        }
    }

    /// Intersect with the `w x h` raster bounds.
    pub fn clamp_to(self, w: usize, h: usize) -> Self {
        Self {
            x0: self.x0.min(w),
            y0: self.y0.min(h),
            x1: self.x1.min(w),
            y1: self.y1.min(h),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }
}

/// One detected circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detection {
    /// Center, in full-image pixels.
    pub center_x: u32,
    pub center_y: u32,
    /// Radius, in pixels.
    pub radius: u32,
    /// Highest vote count among the merged candidates.
    pub max_votes: u32,
    /// Number of candidates merged into this detection.
    pub num_merged: u32,
}

/// Errors reported by the detector.
///
/// All argument validation happens before any allocation or voting; a
/// returned error always means zero detections were produced, never a
/// partial result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoughError {
    /// Resolved angular subdivision count was not positive.
    InvalidMode { mode: u32 },
    /// `rmax < rmin`.
    EmptyRadiusRange { rmin: u32, rmax: u32 },
    /// Lookup-table or accumulator allocation failed.
    Alloc { cells: usize },
}

impl HoughError {
    /// Numeric code exposed by the historical host interface.
    ///
    /// `Ok` corresponds to `ERR_OK` (0); argument violations map to
    /// `ERR_ARG` (-2) and allocation failures to `ERR_MEM_ALLOC` (3).
    pub fn code(&self) -> i32 {
        match self {
            HoughError::InvalidMode { .. } | HoughError::EmptyRadiusRange { .. } => -2,
            HoughError::Alloc { .. } => 3,
        }
    }
}

impl fmt::Display for HoughError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoughError::InvalidMode { mode } => {
                write!(f, "angular mode must be positive (got {mode})")
            }
            HoughError::EmptyRadiusRange { rmin, rmax } => {
                write!(f, "empty radius range: rmin={rmin} > rmax={rmax}")
            }
            HoughError::Alloc { cells } => {
                write!(f, "failed to allocate {cells} cells")
            }
        }
    }
}

impl std::error::Error for HoughError {}
