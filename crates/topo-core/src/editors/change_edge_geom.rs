//! `ChangeEdgeGeom` (spec.md §4.3.6), grounded on librttopo's
//! `rtt_ChangeEdgeGeom`: replace an edge's geometry in place while
//! preserving its topological role — same endpoints, same winding if
//! closed, no new crossings, no node swept over by the motion, and no
//! twist of the edge-end ordering at either endpoint.

use crate::editors::azimuth::{find_adjacent_edges, EdgeEnd};
use crate::editors::{check_edge_crossing, fetch_edge, fetch_face};
use crate::backend::TopologyBackend;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::handle::Topology;
use crate::model::{EdgeFields, EdgeId, NodeId};

/// Edge ends incident to `node`, excluding `skip`, in the shape
/// `find_adjacent_edges` wants.
fn edge_ends_at_excluding<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    node: NodeId,
    skip: EdgeId,
) -> Result<Vec<EdgeEnd>, TopoError> {
    let incident = topo.backend().get_edge_by_node(&[node], EdgeFields::ALL)?;
    let mut ends = Vec::new();
    for edge in &incident {
        if edge.edge_id == skip {
            continue;
        }
        if edge.start_node == node {
            ends.push(EdgeEnd {
                signed: crate::model::SignedEdgeId::new(edge.edge_id, true),
                azimuth: topo.geom().azimuth(edge.geom.first(), edge.geom.points()[1]),
                face_left: edge.face_left,
                face_right: edge.face_right,
            });
        }
        if edge.end_node == node {
            let last = edge.geom.len() - 1;
            ends.push(EdgeEnd {
                signed: crate::model::SignedEdgeId::new(edge.edge_id, false),
                azimuth: topo.geom().azimuth(edge.geom.last(), edge.geom.points()[last - 1]),
                face_left: edge.face_left,
                face_right: edge.face_right,
            });
        }
    }
    Ok(ends)
}

/// The next-CW/next-CCW neighbor pair of `edge_id` at `node`, using
/// `line`'s geometry for the azimuth leaving `node` rather than the
/// edge's stored geometry — lets us compare "what the neighbors would be
/// under the old line" against "what they'd be under the new line"
/// without mutating anything in between.
fn neighbors_under<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    edge_id: EdgeId,
    node: NodeId,
    leaving: crate::geometry::point::Point2d,
    second: crate::geometry::point::Point2d,
) -> Result<(Option<crate::model::SignedEdgeId>, Option<crate::model::SignedEdgeId>), TopoError> {
    let others = edge_ends_at_excluding(topo, node, edge_id)?;
    let az = topo.geom().azimuth(leaving, second);
    let adj = find_adjacent_edges(az, None, &others);
    Ok((adj.next_cw, adj.next_ccw))
}

/// Replace `edge`'s geometry with `line`, which must still run between the
/// same two node coordinates, not cross/overlap any other edge, preserve
/// winding if the edge is closed, sweep no node into or out of its motion
/// area, and leave both endpoints' CW/CCW edge ordering unchanged.
#[tracing::instrument(skip(topo, line))]
pub fn change_edge_geom<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    line: Line2d,
) -> Result<(), TopoError> {
    topo.check_interrupted()?;
    let mut old = fetch_edge(topo, edge_id)?;

    if !topo.geom().is_simple(&line) {
        return Err(TopoError::GeometryNotSimple);
    }
    if !line.first().exactly_eq(&old.geom.first()) || !line.last().exactly_eq(&old.geom.last()) {
        return Err(TopoError::EndpointMismatch);
    }
    if old.is_closed() && old.geom.is_counter_clockwise() != line.is_counter_clockwise() {
        return Err(TopoError::CorruptedTopology {
            detail: format!("edge {edge_id} winding changed under ChangeEdgeGeom"),
        });
    }

    check_edge_crossing(topo, old.start_node, old.end_node, &line, Some(edge_id))?;

    // Motion-area check: the ring swept by each geometry (closed by
    // repeating its first vertex if open) must agree on which of the
    // topology's other nodes it contains. `_CheckEdgeCrossing` already
    // excluded the endpoints from consideration; this loop does the same.
    let old_ring = topo.geom().make_valid_ring(&old.geom);
    let new_ring = topo.geom().make_valid_ring(&line);
    let old_polygon = crate::geometry::polygon::Polygon::new(old_ring.clone(), vec![]);
    let new_polygon = crate::geometry::polygon::Polygon::new(new_ring.clone(), vec![]);
    let motion_bbox = old_ring.bounding_box().union(&new_ring.bounding_box());

    for node in topo.backend().get_node_within_box2d(motion_bbox, crate::model::NodeFields::ALL, None)? {
        if node.node_id == old.start_node || node.node_id == old.end_node {
            continue;
        }
        let in_old = topo.geom().covers(&old_polygon, node.geom);
        let in_new = topo.geom().covers(&new_polygon, node.geom);
        if in_old != in_new {
            return Err(TopoError::EdgeMotionCollision { edge: edge_id, node: node.node_id });
        }
    }

    // Azimuth preservation at each endpoint.
    let (old_start_cw, old_start_ccw) = neighbors_under(
        topo,
        edge_id,
        old.start_node,
        old.geom.first(),
        old.geom.points()[1],
    )?;
    let (new_start_cw, new_start_ccw) = neighbors_under(
        topo,
        edge_id,
        old.start_node,
        line.first(),
        line.points()[1],
    )?;
    if old_start_cw != new_start_cw || old_start_ccw != new_start_ccw {
        return Err(TopoError::EdgeTwistAroundEndpoint { edge: edge_id });
    }

    let old_last = old.geom.len() - 1;
    let new_last = line.len() - 1;
    let (old_end_cw, old_end_ccw) = neighbors_under(
        topo,
        edge_id,
        old.end_node,
        old.geom.last(),
        old.geom.points()[old_last - 1],
    )?;
    let (new_end_cw, new_end_ccw) = neighbors_under(
        topo,
        edge_id,
        old.end_node,
        line.last(),
        line.points()[new_last - 1],
    )?;
    if old_end_cw != new_end_cw || old_end_ccw != new_end_ccw {
        return Err(TopoError::EdgeTwistAroundEndpoint { edge: edge_id });
    }

    let face_left = old.face_left;
    let face_right = old.face_right;
    old.geom = line;
    topo.backend_mut().update_edges_by_id(vec![old])?;

    for face in [face_left, face_right] {
        if face.is_universe() {
            continue;
        }
        let mut row = fetch_face(topo, face)?;
        let polygon = crate::face::get_face_geometry(topo, face)?;
        row.mbr = polygon.bounding_box();
        topo.backend_mut().update_faces_by_id(vec![row])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_iso_edge, add_iso_node};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::point::Point2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_bows_a_straight_edge_without_crossing_anything() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let edge_id = add_iso_edge(
            &mut topo,
            n1,
            n2,
            Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]),
        )
        .unwrap();

        let bowed = Line2d::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(5.0, 3.0),
            Point2d::new(10.0, 0.0),
        ]);
        assert!(change_edge_geom(&mut topo, edge_id, bowed.clone()).is_ok());
        let updated = fetch_edge(&topo, edge_id).unwrap();
        assert_eq!(updated.geom, bowed);
    }

    #[test]
    fn test_rejects_endpoint_mismatch() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let edge_id = add_iso_edge(
            &mut topo,
            n1,
            n2,
            Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]),
        )
        .unwrap();

        let wrong = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(11.0, 0.0)]);
        let err = change_edge_geom(&mut topo, edge_id, wrong).unwrap_err();
        assert!(matches!(err, TopoError::EndpointMismatch));
    }

    #[test]
    fn test_rejects_motion_that_sweeps_over_a_node() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let bystander = add_iso_node(&mut topo, None, Point2d::new(5.0, 5.0), false).unwrap();
        let edge_id = add_iso_edge(
            &mut topo,
            n1,
            n2,
            Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]),
        )
        .unwrap();

        let swept = Line2d::new(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(5.0, 10.0),
            Point2d::new(10.0, 0.0),
        ]);
        let err = change_edge_geom(&mut topo, edge_id, swept).unwrap_err();
        match err {
            TopoError::EdgeMotionCollision { node, .. } => assert_eq!(node, bystander),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
