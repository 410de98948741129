//! Greedy merge of duplicate candidates into running-centroid clusters.
//!
//! A true circle leaves a tight cloud of above-threshold cells around
//! its center; this pass collapses each cloud into one detection. The
//! merge is a single greedy scan, order-sensitive by design: a candidate
//! joins the *first* open cluster of its radius whose current bounding
//! box contains it, and the box recenters on the running centroid after
//! every merge. True duplicate votes are numerous and spatially tight
//! relative to the merge radius, which is why the approximation is
//! acceptable; it is not global nearest-neighbor clustering.

use crate::extract::Candidate;
use crate::Detection;

struct Cluster {
    radius: u32,
    vote_max: u32,
    x_min: i64,
    x_max: i64,
    y_min: i64,
    y_max: i64,
    x_sum: u64,
    y_sum: u64,
    n: u32,
}

impl Cluster {
    fn seed(c: &Candidate, rng: i64) -> Self {
        let x = c.x as i64;
        let y = c.y as i64;
        Self {
            radius: c.radius,
            vote_max: c.votes,
            x_min: x - rng,
            x_max: x + rng,
            y_min: y - rng,
            y_max: y + rng,
            x_sum: c.x as u64,
            y_sum: c.y as u64,
            n: 1,
        }
    }

    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    fn absorb(&mut self, c: &Candidate, rng: i64) {
        self.x_sum += c.x as u64;
        self.y_sum += c.y as u64;
        self.n += 1;
        // box follows the running centroid, not the seed point
        let x_ave = (self.x_sum / self.n as u64) as i64;
        let y_ave = (self.y_sum / self.n as u64) as i64;
        self.x_min = x_ave - rng;
        self.x_max = x_ave + rng;
        self.y_min = y_ave - rng;
        self.y_max = y_ave + rng;
        self.vote_max = self.vote_max.max(c.votes);
    }

    fn into_detection(self) -> Detection {
        Detection {
            center_x: (self.x_sum / self.n as u64) as u32,
            center_y: (self.y_sum / self.n as u64) as u32,
            radius: self.radius,
            max_votes: self.vote_max,
            num_merged: self.n,
        }
    }
}

/// Merge candidates (in extractor order) into detections.
///
/// `merge_radius` is the box half-size in pixels; with a zero radius
/// only candidates at the exact same cell merge.
pub fn merge_candidates(candidates: &[Candidate], merge_radius: u32) -> Vec<Detection> {
    let rng = merge_radius as i64;
    let mut clusters: Vec<Cluster> = Vec::new();

    'next: for c in candidates {
        let x = c.x as i64;
        let y = c.y as i64;
        for cluster in clusters.iter_mut() {
            if cluster.radius == c.radius && cluster.contains(x, y) {
                cluster.absorb(c, rng);
                continue 'next;
            }
        }
        clusters.push(Cluster::seed(c, rng));
    }

    clusters.into_iter().map(Cluster::into_detection).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(x: u32, y: u32, radius: u32, votes: u32) -> Candidate {
        Candidate {
            x,
            y,
            radius,
            votes,
        }
    }

    #[test]
    fn lone_candidate_becomes_a_detection() {
        let out = merge_candidates(&[cand(10, 12, 7, 33)], 2);
        assert_eq!(
            out,
            vec![Detection {
                center_x: 10,
                center_y: 12,
                radius: 7,
                max_votes: 33,
                num_merged: 1,
            }]
        );
    }

    #[test]
    fn centers_one_box_gap_apart_stay_distinct() {
        // 2 * rng + 1 apart: the second candidate falls just outside the
        // first cluster's box.
        let rng = 3;
        let out = merge_candidates(&[cand(10, 10, 5, 8), cand(17, 10, 5, 9)], rng);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].center_x, out[0].num_merged), (10, 1));
        assert_eq!((out[1].center_x, out[1].num_merged), (17, 1));
    }

    #[test]
    fn centers_half_a_radius_apart_merge() {
        let rng = 4;
        let out = merge_candidates(&[cand(10, 10, 5, 8), cand(12, 10, 5, 9)], rng);
        assert_eq!(
            out,
            vec![Detection {
                center_x: 11,
                center_y: 10,
                radius: 5,
                max_votes: 9,
                num_merged: 2,
            }]
        );
    }

    #[test]
    fn same_center_different_radius_never_merges() {
        let out = merge_candidates(&[cand(10, 10, 5, 8), cand(10, 10, 6, 8)], 4);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].radius, 5);
        assert_eq!(out[1].radius, 6);
    }

    #[test]
    fn box_recenters_after_every_merge() {
        // (13, 10) is outside the seed box [8, 12] but inside the box
        // recentred on the running centroid after the second merge.
        let rng = 2;
        let out = merge_candidates(
            &[cand(10, 10, 5, 1), cand(12, 10, 5, 2), cand(13, 10, 5, 3)],
            rng,
        );
        assert_eq!(
            out,
            vec![Detection {
                center_x: 11, // floor(35 / 3)
                center_y: 10,
                radius: 5,
                max_votes: 3,
                num_merged: 3,
            }]
        );
    }

    #[test]
    fn first_match_is_order_sensitive() {
        // The greedy scan is pinned behavior: the same candidate set in
        // a different order produces different clusters.
        let rng = 2;
        let a = cand(10, 10, 5, 1);
        let b = cand(14, 10, 5, 1);
        let c = cand(12, 10, 5, 1);

        let forward = merge_candidates(&[a, b, c], rng);
        assert_eq!(forward.len(), 2);
        assert_eq!((forward[0].center_x, forward[0].num_merged), (11, 2));
        assert_eq!((forward[1].center_x, forward[1].num_merged), (14, 1));

        let reversed = merge_candidates(&[c, b, a], rng);
        assert_eq!(reversed.len(), 2);
        assert_eq!((reversed[0].center_x, reversed[0].num_merged), (13, 2));
        assert_eq!((reversed[1].center_x, reversed[1].num_merged), (10, 1));
    }

    #[test]
    fn zero_merge_radius_only_collapses_identical_cells() {
        let out = merge_candidates(
            &[cand(10, 10, 5, 1), cand(10, 10, 5, 4), cand(11, 10, 5, 2)],
            0,
        );
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].max_votes, out[0].num_merged), (4, 2));
        assert_eq!((out[1].center_x, out[1].num_merged), (11, 1));
    }

    #[test]
    fn widening_the_merge_radius_never_adds_detections() {
        let cands = [
            cand(10, 10, 7, 5),
            cand(11, 10, 7, 6),
            cand(10, 11, 7, 4),
            cand(30, 30, 7, 9),
            cand(40, 10, 7, 3),
            cand(41, 10, 7, 3),
            cand(10, 10, 9, 7),
        ];
        let mut previous = usize::MAX;
        for rng in 0..=6u32 {
            let count = merge_candidates(&cands, rng).len();
            assert!(
                count <= previous,
                "rng={rng} produced {count} detections, more than {previous}"
            );
            previous = count;
        }
    }
}
