//! Threshold scan over the filled accumulator.

use crate::accum::Accumulator;

/// One accumulator cell above the vote threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// ROI-local center, in pixels.
    pub x: u32,
    pub y: u32,
    /// Actual radius (not the radius index).
    pub radius: u32,
    pub votes: u32,
}

/// Emit every cell holding strictly more than `min_votes` votes.
///
/// Cells are enumerated in increasing linear-index order (radius most
/// significant, then y, then x), so the output is deterministic and
/// reproducible for identical inputs. The cluster merger relies on this
/// ordering.
pub fn extract_candidates(acc: &Accumulator, rmin: u32, min_votes: u32) -> Vec<Candidate> {
    let mut out = Vec::new();
    for ri in 0..acc.depth() {
        for y in 0..acc.height() {
            for x in 0..acc.width() {
                let votes = acc.at(x, y, ri);
                if votes > min_votes {
                    out.push(Candidate {
                        x: x as u32,
                        y: y as u32,
                        radius: rmin + ri as u32,
                        votes,
                    });
                }
            }
        }
    }
    out
}
