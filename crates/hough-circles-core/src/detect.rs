//! The four-stage detection pipeline: lookup table, voting, extraction,
//! clustering.

use crate::accum::{vote_circles, Accumulator};
use crate::cluster::merge_candidates;
use crate::extract::extract_candidates;
use crate::lut::CircleLut;
use crate::{Detection, HoughError, HoughParams, Roi};
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Timed detection outcome with per-stage profiling data.
pub struct HoughResult {
    /// Final detections (in full-image coordinates).
    pub detections: Vec<Detection>,
    /// Time spent building the lookup table (milliseconds).
    pub lut_ms: f64,
    /// Time spent casting votes (milliseconds).
    pub vote_ms: f64,
    /// Time spent extracting candidates (milliseconds).
    pub extract_ms: f64,
    /// Time spent merging clusters (milliseconds).
    pub cluster_ms: f64,
}

/// Detect circles in the whole `w x h` mask.
///
/// `mask` is row-major, `0` = background, nonzero = edge. All buffers
/// are allocated fresh for this call and dropped before it returns.
pub fn detect_circles(
    mask: &[u8],
    w: usize,
    h: usize,
    params: &HoughParams,
) -> Result<Vec<Detection>, HoughError> {
    detect_circles_roi(mask, w, h, Roi::full(w, h), params)
}

/// Detect circles inside an ROI of the mask.
///
/// Voting and clustering run in ROI-local coordinates; reported centers
/// are shifted back by the ROI origin. The ROI is intersected with the
/// mask bounds first.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(mask, params),
        fields(rmin = params.rmin, rmax = params.rmax)
    )
)]
pub fn detect_circles_roi(
    mask: &[u8],
    w: usize,
    h: usize,
    roi: Roi,
    params: &HoughParams,
) -> Result<Vec<Detection>, HoughError> {
    debug_assert!(mask.len() >= w * h);
    let roi = roi.clamp_to(w, h);

    // Argument validation (and the whole lookup table) precede the
    // accumulator allocation; a failure here means nothing was voted.
    let lut = CircleLut::build(params.rmin, params.rmax, params.mode)?;
    let mut acc = Accumulator::new(roi.width(), roi.height(), lut.depth())?;
    vote_circles(mask, w, roi, &lut, &mut acc);

    let candidates = extract_candidates(&acc, params.rmin, params.min_votes);
    let mut detections = merge_candidates(&candidates, params.merge_radius);

    if roi.x0 != 0 || roi.y0 != 0 {
        for d in &mut detections {
            d.center_x += roi.x0 as u32;
            d.center_y += roi.y0 as u32;
        }
    }
    Ok(detections)
}

/// [`detect_circles`] with a per-stage wall-clock breakdown.
///
/// Useful for tuning the radius range and ROI against the
/// `O(edge_pixels * depth_r * lut_size * 4)` voting cost.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(mask, params),
        fields(rmin = params.rmin, rmax = params.rmax)
    )
)]
pub fn detect_circles_with_trace(
    mask: &[u8],
    w: usize,
    h: usize,
    params: &HoughParams,
) -> Result<HoughResult, HoughError> {
    debug_assert!(mask.len() >= w * h);
    let roi = Roi::full(w, h);

    let lut_started = Instant::now();
    let lut = CircleLut::build(params.rmin, params.rmax, params.mode)?;
    let lut_ms = lut_started.elapsed().as_secs_f64() * 1000.0;

    let vote_started = Instant::now();
    let mut acc = Accumulator::new(roi.width(), roi.height(), lut.depth())?;
    vote_circles(mask, w, roi, &lut, &mut acc);
    let vote_ms = vote_started.elapsed().as_secs_f64() * 1000.0;

    let extract_started = Instant::now();
    let candidates = extract_candidates(&acc, params.rmin, params.min_votes);
    let extract_ms = extract_started.elapsed().as_secs_f64() * 1000.0;

    let cluster_started = Instant::now();
    let detections = merge_candidates(&candidates, params.merge_radius);
    let cluster_ms = cluster_started.elapsed().as_secs_f64() * 1000.0;

    Ok(HoughResult {
        detections,
        lut_ms,
        vote_ms,
        extract_ms,
        cluster_ms,
    })
}
