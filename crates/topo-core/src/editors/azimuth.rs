//! The azimuth/adjacency analysis shared by `AddEdgeModFace`/`AddEdgeNewFaces`
//! and edge healing (spec.md §4.3.4), grounded on librttopo's
//! `_rtt_FindAdjacentEdges`/`_rtt_InitEdgeEndByLine`.
//!
//! Around a shared node, edges are ordered by the azimuth at which they
//! leave it. Inserting a new edge end at azimuth `my_azimuth` needs to know
//! which existing edge end is immediately clockwise and which is
//! immediately counter-clockwise from it, since those become the new
//! edge's `next_left`/`next_right` neighbors, and which face each of those
//! neighbors bounds on the side the new edge would occupy.

use std::f64::consts::TAU;

use crate::geometry::vector::normalize_angle;
use crate::model::{FaceId, SignedEdgeId};

/// One existing edge's exposure at a node: its signed id oriented to leave
/// the node (positive iff the edge's `start_node` is the shared node), the
/// azimuth at which it does so, and the edge's own `face_left`/`face_right`
/// (used to derive which face the new edge would bound on either side of
/// this neighbor).
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeEnd {
    pub signed: SignedEdgeId,
    pub azimuth: f64,
    pub face_left: FaceId,
    pub face_right: FaceId,
}

impl EdgeEnd {
    /// The face bounded on this end's "clockwise" side: `face_left` for an
    /// outgoing edge end, `face_right` for an incoming one. Mirrors
    /// `Edge::face_on_left_of` without needing a full `Edge` in hand.
    fn cw_side_face(&self) -> FaceId {
        if self.signed.is_forward() {
            self.face_left
        } else {
            self.face_right
        }
    }

    /// The face bounded on this end's "counter-clockwise" side: the
    /// opposite assignment of [`Self::cw_side_face`].
    fn ccw_side_face(&self) -> FaceId {
        if self.signed.is_forward() {
            self.face_right
        } else {
            self.face_left
        }
    }
}

/// The two neighbors discovered around a node, and the faces they bound on
/// the new edge's side, or `None` on either side if the node had no other
/// incident edges (it was isolated).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Adjacency {
    pub next_cw: Option<SignedEdgeId>,
    pub next_ccw: Option<SignedEdgeId>,
    /// The face that would be bounded by the new edge on the side of
    /// `next_cw` (librttopo's `cwFace`).
    pub cw_face: Option<FaceId>,
    /// The face that would be bounded by the new edge on the side of
    /// `next_ccw` (librttopo's `ccwFace`).
    pub ccw_face: Option<FaceId>,
}

/// Find the next-CW and next-CCW neighbors of a new edge end leaving a node
/// at `my_azimuth`, among `existing` edge ends already incident to that
/// node, along with the faces each of them bounds on the new edge's side.
///
/// `other_azimuth` is `Some` only when the edge being inserted is closed
/// (both its ends land on this same node): it is the azimuth of the new
/// edge's *other* end, seeded into the search purely to bound how far
/// around the node we are willing to look. It is never itself reported as
/// a neighbor — the other end belongs to the edge being inserted, not to
/// an existing one.
pub(crate) fn find_adjacent_edges(
    my_azimuth: f64,
    other_azimuth: Option<f64>,
    existing: &[EdgeEnd],
) -> Adjacency {
    let mut min_cw_delta = other_azimuth
        .map(|az| normalize_angle(az - my_azimuth))
        .filter(|d| *d > 0.0)
        .unwrap_or(TAU);
    let mut min_ccw_delta = other_azimuth
        .map(|az| normalize_angle(my_azimuth - az))
        .filter(|d| *d > 0.0)
        .unwrap_or(TAU);

    let mut next_cw = None;
    let mut next_ccw = None;
    let mut cw_face = None;
    let mut ccw_face = None;

    for end in existing {
        let delta_cw = normalize_angle(end.azimuth - my_azimuth);
        if delta_cw > 0.0 && delta_cw <= min_cw_delta {
            min_cw_delta = delta_cw;
            next_cw = Some(end.signed);
            cw_face = Some(end.cw_side_face());
        }
        let delta_ccw = normalize_angle(my_azimuth - end.azimuth);
        if delta_ccw > 0.0 && delta_ccw <= min_ccw_delta {
            min_ccw_delta = delta_ccw;
            next_ccw = Some(end.signed);
            ccw_face = Some(end.ccw_side_face());
        }
    }

    Adjacency { next_cw, next_ccw, cw_face, ccw_face }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeId;

    fn end(edge: i64, forward: bool, azimuth: f64, face_left: i64, face_right: i64) -> EdgeEnd {
        EdgeEnd {
            signed: SignedEdgeId::new(EdgeId(edge), forward),
            azimuth,
            face_left: FaceId(face_left),
            face_right: FaceId(face_right),
        }
    }

    #[test]
    fn test_no_existing_edges_gives_no_neighbors() {
        let adj = find_adjacent_edges(0.0, None, &[]);
        assert!(adj.next_cw.is_none());
        assert!(adj.next_ccw.is_none());
        assert!(adj.cw_face.is_none());
        assert!(adj.ccw_face.is_none());
    }

    #[test]
    fn test_picks_nearest_edge_on_each_side() {
        // Existing edges leave the node due north (PI/2), due east (0),
        // and due west (PI). The new edge leaves due south (3*PI/2).
        let existing = vec![
            end(1, true, 0.0, 1, 2),
            end(2, true, std::f64::consts::FRAC_PI_2, 3, 4),
            end(3, true, std::f64::consts::PI, 5, 6),
        ];
        let adj = find_adjacent_edges(3.0 * std::f64::consts::FRAC_PI_2, None, &existing);
        assert!(adj.next_cw.is_some());
        assert!(adj.next_ccw.is_some());
        assert!(adj.cw_face.is_some());
        assert!(adj.ccw_face.is_some());
    }

    #[test]
    fn test_other_end_seeds_bound_without_becoming_an_answer() {
        let existing = vec![end(1, true, 0.2, 1, 2)];
        let adj = find_adjacent_edges(0.0, Some(0.1), &existing);
        // The seeded "other end" azimuth (0.1) is closer than edge 1's
        // (0.2), so edge 1 must not win the CW slot.
        assert!(adj.next_cw.is_none());
    }

    #[test]
    fn test_outgoing_edge_bounds_left_on_cw_side() {
        // A single outgoing edge (face_left=1, face_right=2) is both the
        // CW and CCW neighbor of any new edge end at the same node.
        let existing = vec![end(1, true, std::f64::consts::PI, 1, 2)];
        let adj = find_adjacent_edges(0.0, None, &existing);
        assert_eq!(adj.cw_face, Some(FaceId(1)));
        assert_eq!(adj.ccw_face, Some(FaceId(2)));
    }

    #[test]
    fn test_incoming_edge_swaps_face_assignment() {
        // An incoming edge end (signed id negative) swaps which side is
        // "cw"/"ccw" relative to face_left/face_right.
        let existing = vec![end(1, false, std::f64::consts::PI, 1, 2)];
        let adj = find_adjacent_edges(0.0, None, &existing);
        assert_eq!(adj.cw_face, Some(FaceId(2)));
        assert_eq!(adj.ccw_face, Some(FaceId(1)));
    }
}
