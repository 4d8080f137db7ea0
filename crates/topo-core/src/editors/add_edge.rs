//! `AddEdgeModFace`/`AddEdgeNewFaces` (spec.md §4.3.4), grounded on
//! librttopo's `_rtt_AddEdge`: the azimuth/adjacency analysis at each
//! endpoint determines the new edge's linkage and bounded faces, then
//! `_AddFaceSplit` is invoked on both sides to detect a newly closed ring.

use crate::backend::TopologyBackend;
use crate::editors::azimuth::{find_adjacent_edges, EdgeEnd};
use crate::editors::face_split::{add_face_split, FaceSplitOutcome};
use crate::editors::{check_edge_crossing, fetch_edge, fetch_node};
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, EdgeId, FaceId, NodeId, SignedEdgeId};

/// Insert a new edge, reusing the prior face id for whichever side of the
/// new ring survives (spec.md §4.3.4: "whether the prior face id
/// survives").
#[tracing::instrument(skip(topo, line))]
pub fn add_edge_mod_face<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    start_node: NodeId,
    end_node: NodeId,
    line: Line2d,
    skip_checks: bool,
) -> Result<EdgeId, TopoError> {
    add_edge(topo, start_node, end_node, line, skip_checks, true)
}

/// Insert a new edge, always minting brand-new faces for both sides of a
/// closed ring and deleting the prior face.
#[tracing::instrument(skip(topo, line))]
pub fn add_edge_new_faces<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    start_node: NodeId,
    end_node: NodeId,
    line: Line2d,
    skip_checks: bool,
) -> Result<EdgeId, TopoError> {
    add_edge(topo, start_node, end_node, line, skip_checks, false)
}

fn edge_ends_at<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    node: NodeId,
) -> Result<Vec<EdgeEnd>, TopoError> {
    let incident = topo.backend().get_edge_by_node(&[node], EdgeFields::ALL)?;
    let mut ends = Vec::new();
    for edge in &incident {
        if edge.start_node == node {
            let az = topo.geom().azimuth(edge.geom.first(), edge.geom.points()[1]);
            ends.push(EdgeEnd {
                signed: SignedEdgeId::new(edge.edge_id, true),
                azimuth: az,
                face_left: edge.face_left,
                face_right: edge.face_right,
            });
        }
        if edge.end_node == node {
            let last = edge.geom.len() - 1;
            let az = topo.geom().azimuth(edge.geom.last(), edge.geom.points()[last - 1]);
            ends.push(EdgeEnd {
                signed: SignedEdgeId::new(edge.edge_id, false),
                azimuth: az,
                face_left: edge.face_left,
                face_right: edge.face_right,
            });
        }
    }
    Ok(ends)
}

fn relink<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    target: SignedEdgeId,
    value: SignedEdgeId,
) -> Result<(), TopoError> {
    let mut edge = fetch_edge(topo, target.edge_id())?;
    if target.is_forward() {
        edge.next_left = value;
    } else {
        edge.next_right = value;
    }
    topo.backend_mut().update_edges_by_id(vec![edge])
}

fn add_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    start_node: NodeId,
    end_node: NodeId,
    line: Line2d,
    skip_checks: bool,
    mod_face: bool,
) -> Result<EdgeId, TopoError> {
    topo.check_interrupted()?;

    if line.len() < 2 {
        return Err(TopoError::EmptyGeometry);
    }
    if !skip_checks && !topo.geom().is_simple(&line) {
        return Err(TopoError::GeometryNotSimple);
    }

    let mut s = fetch_node(topo, start_node)?;
    let mut e = fetch_node(topo, end_node)?;

    // Faces carried by isolated endpoints must agree with each other.
    let mut face_from_nodes: Option<FaceId> = None;
    for node in [&s, &e] {
        if let Some(f) = node.containing_face {
            match face_from_nodes {
                None => face_from_nodes = Some(f),
                Some(existing) if existing != f => {
                    return Err(TopoError::CrossesFaceBoundary);
                }
                _ => {}
            }
        }
    }
    let mut face_left = face_from_nodes;
    let mut face_right = face_from_nodes;

    if !skip_checks {
        if !line.first().exactly_eq(&s.geom) || !line.last().exactly_eq(&e.geom) {
            return Err(TopoError::EndpointMismatch);
        }
        check_edge_crossing(topo, start_node, end_node, &line, None)?;
    }

    let edge_id = topo.backend_mut().get_next_edge_id()?;
    let is_closed = start_node == end_node;

    let last = line.len() - 1;
    let my_az_start = topo.geom().azimuth(line.first(), line.points()[1]);
    let my_az_end = topo.geom().azimuth(line.last(), line.points()[last - 1]);

    let start_ends = edge_ends_at(topo, start_node)?;
    let end_ends = edge_ends_at(topo, end_node)?;

    let start_adj = find_adjacent_edges(
        my_az_start,
        if is_closed { Some(my_az_end) } else { None },
        &start_ends,
    );
    let end_adj = find_adjacent_edges(
        my_az_end,
        if is_closed { Some(my_az_start) } else { None },
        &end_ends,
    );

    for (node, adj) in [(start_node, &start_adj), (end_node, &end_adj)] {
        if let (Some(cw), Some(ccw)) = (adj.cw_face, adj.ccw_face) {
            if cw != ccw {
                return Err(TopoError::corrupted(format!(
                    "adjacent edges at node {node} bind different faces ({cw} and {ccw})"
                )));
            }
        }
    }

    let start_was_isolated = start_ends.is_empty();
    let (next_right, prev_left) = if !start_was_isolated {
        let next_right = start_adj.next_cw.unwrap_or_else(|| SignedEdgeId::new(edge_id, false));
        let prev_left = start_adj
            .next_ccw
            .map(|s| s.reversed())
            .unwrap_or_else(|| SignedEdgeId::new(edge_id, true));
        if face_right.is_none() {
            face_right = start_adj.cw_face;
        }
        if face_left.is_none() {
            face_left = start_adj.ccw_face;
        }
        (next_right, prev_left)
    } else if is_closed {
        (SignedEdgeId::new(edge_id, false), SignedEdgeId::new(edge_id, true))
    } else {
        (SignedEdgeId::new(edge_id, true), SignedEdgeId::new(edge_id, false))
    };

    let end_was_isolated = end_ends.is_empty();
    let (next_left, prev_right) = if !end_was_isolated {
        let next_left = end_adj.next_cw.unwrap_or_else(|| SignedEdgeId::new(edge_id, true));
        let prev_right = end_adj
            .next_ccw
            .map(|s| s.reversed())
            .unwrap_or_else(|| SignedEdgeId::new(edge_id, false));
        if face_right.is_none() {
            face_right = end_adj.ccw_face;
        }
        if face_left.is_none() {
            face_left = end_adj.cw_face;
        }
        (next_left, prev_right)
    } else if is_closed {
        (SignedEdgeId::new(edge_id, true), SignedEdgeId::new(edge_id, false))
    } else {
        (SignedEdgeId::new(edge_id, false), SignedEdgeId::new(edge_id, true))
    };

    let (face_left, face_right) = match (face_left, face_right) {
        (Some(l), Some(r)) if l == r => (l, r),
        (Some(l), Some(r)) => {
            return Err(TopoError::corrupted(format!(
                "left ({l}) / right ({r}) face mismatch: invalid topology"
            )))
        }
        _ => return Err(TopoError::corrupted("could not derive edge face from linked primitives")),
    };

    let new_edge = Edge {
        edge_id,
        start_node,
        end_node,
        face_left,
        face_right,
        next_left,
        next_right,
        geom: line,
    };
    topo.backend_mut().insert_edges(vec![new_edge])?;

    if prev_left.edge_id() != edge_id {
        relink(topo, prev_left, SignedEdgeId::new(edge_id, true))?;
    }
    if prev_right.edge_id() != edge_id {
        relink(topo, prev_right, SignedEdgeId::new(edge_id, false))?;
    }

    if start_was_isolated {
        s.containing_face = None;
        topo.backend_mut().update_nodes_by_id(vec![s])?;
    }
    if end_was_isolated {
        e.containing_face = None;
        topo.backend_mut().update_nodes_by_id(vec![e])?;
    }

    // Face-split analysis: `_AddFaceSplit` on the left side (our
    // direction) and, for `AddEdgeNewFaces`, also on the reverse.
    let mut mbr_only_refresh = false;
    let new_face1 = if !mod_face {
        match add_face_split(topo, SignedEdgeId::new(edge_id, false), face_left, false)? {
            FaceSplitOutcome::NoSplit => return Ok(edge_id),
            FaceSplitOutcome::NoFaceCreated => None,
            FaceSplitOutcome::NewFace(f) => Some(f),
        }
    } else {
        None
    };

    let new_face = match add_face_split(topo, SignedEdgeId::new(edge_id, true), face_left, false)? {
        FaceSplitOutcome::NoSplit => return Ok(edge_id),
        FaceSplitOutcome::NoFaceCreated => {
            if mod_face {
                // Face on the left is still the universe: must be forming
                // a maximal ring there, so the other side creates it.
                match add_face_split(topo, SignedEdgeId::new(edge_id, false), face_left, false)? {
                    FaceSplitOutcome::NewFace(f) => Some(f),
                    _ => return Ok(edge_id),
                }
            } else {
                None
            }
        }
        FaceSplitOutcome::NewFace(f) => {
            if mod_face {
                // Shrink the other side's existing face MBR in place.
                add_face_split(topo, SignedEdgeId::new(edge_id, false), face_left, true)?;
                mbr_only_refresh = true;
            }
            Some(f)
        }
    };

    if !face_left.is_universe() {
        if let Some(f1) = new_face1 {
            topo.backend_mut().update_topo_geom_face_split(face_left, f1, false)?;
        }
        if let Some(f) = new_face {
            topo.backend_mut().update_topo_geom_face_split(face_left, f, false)?;
        }
        if mbr_only_refresh {
            topo.backend_mut().update_topo_geom_face_split(face_left, face_left, true)?;
        }
        if !mod_face {
            topo.backend_mut().delete_faces_by_id(&[face_left])?;
        }
    }

    Ok(edge_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::add_iso_node;
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::point::Point2d;
    use crate::model::FaceId;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_single_edge_between_isolated_nodes_bounds_universe_on_both_sides() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        let edge_id = add_edge_mod_face(&mut topo, n1, n2, line, false).unwrap();

        let edge = fetch_edge(&topo, edge_id).unwrap();
        assert_eq!(edge.face_left, FaceId::UNIVERSE);
        assert_eq!(edge.face_right, FaceId::UNIVERSE);
    }

    #[test]
    fn test_closing_a_triangle_creates_a_new_face() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let n3 = add_iso_node(&mut topo, None, Point2d::new(5.0, 8.0), false).unwrap();

        add_edge_mod_face(
            &mut topo,
            n1,
            n2,
            Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]),
            false,
        )
        .unwrap();
        add_edge_mod_face(
            &mut topo,
            n2,
            n3,
            Line2d::new(vec![Point2d::new(10.0, 0.0), Point2d::new(5.0, 8.0)]),
            false,
        )
        .unwrap();
        let closing = add_edge_mod_face(
            &mut topo,
            n3,
            n1,
            Line2d::new(vec![Point2d::new(5.0, 8.0), Point2d::new(0.0, 0.0)]),
            false,
        )
        .unwrap();

        let edge = fetch_edge(&topo, closing).unwrap();
        assert!(edge.face_left != FaceId::UNIVERSE || edge.face_right != FaceId::UNIVERSE);
    }

    #[test]
    fn test_rejects_different_containing_faces() {
        let mut topo = fresh();
        // Fabricate a second real face by hand so the two endpoints can
        // legitimately disagree.
        let n1 = add_iso_node(&mut topo, Some(FaceId::UNIVERSE), Point2d::new(0.0, 0.0), true).unwrap();
        let n2 = add_iso_node(&mut topo, Some(FaceId(7)), Point2d::new(10.0, 0.0), true).unwrap();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        let err = add_edge_mod_face(&mut topo, n1, n2, line, true).unwrap_err();
        assert!(matches!(err, TopoError::CrossesFaceBoundary));
    }
}
