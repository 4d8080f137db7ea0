//! `AddIsoEdge` (spec.md §4.3.2).

use crate::backend::TopologyBackend;
use crate::editors::{check_edge_crossing, fetch_node};
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::handle::Topology;
use crate::model::{Edge, EdgeId, NodeId, SignedEdgeId};

/// Join two isolated nodes sharing a containing face with a brand-new
/// edge. Both endpoints lose their isolation; the edge's linkage is a
/// self-loop on each side (spec.md §4.3.2).
#[tracing::instrument(skip(topo, line))]
pub fn add_iso_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    start_node: NodeId,
    end_node: NodeId,
    line: Line2d,
) -> Result<EdgeId, TopoError> {
    topo.check_interrupted()?;

    if start_node == end_node {
        return Err(TopoError::ClosedEdge { edge: EdgeId(0) });
    }

    let mut s = fetch_node(topo, start_node)?;
    let mut e = fetch_node(topo, end_node)?;

    if !s.is_isolated() {
        return Err(TopoError::NotIsolated { node: start_node });
    }
    if !e.is_isolated() {
        return Err(TopoError::NotIsolated { node: end_node });
    }

    let face = s.containing_face.unwrap();
    if e.containing_face != Some(face) {
        return Err(TopoError::CrossesFaceBoundary);
    }

    if !line.first().exactly_eq(&s.geom) || !line.last().exactly_eq(&e.geom) {
        return Err(TopoError::EndpointMismatch);
    }
    if !topo.geom().is_simple(&line) {
        return Err(TopoError::GeometryNotSimple);
    }

    check_edge_crossing(topo, start_node, end_node, &line, None)?;

    let edge_id = topo.backend_mut().get_next_edge_id()?;
    let edge = Edge {
        edge_id,
        start_node,
        end_node,
        face_left: face,
        face_right: face,
        next_left: SignedEdgeId::new(edge_id, false),
        next_right: SignedEdgeId::new(edge_id, true),
        geom: line,
    };
    topo.backend_mut().insert_edges(vec![edge])?;

    s.containing_face = None;
    e.containing_face = None;
    topo.backend_mut().update_nodes_by_id(vec![s, e])?;

    Ok(edge_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::add_iso_node;
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::point::Point2d;
    use crate::model::NodeFields;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_joins_two_isolated_nodes_and_clears_isolation() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        let edge = add_iso_edge(&mut topo, n1, n2, line).unwrap();
        assert_eq!(edge, EdgeId(1));

        let rows = topo.backend().get_node_by_id(&[n1, n2], NodeFields::ALL).unwrap();
        assert!(rows.iter().all(|n| n.containing_face.is_none()));
    }

    #[test]
    fn test_rejects_closed_edge() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(0.0, 0.0)]);
        let err = add_iso_edge(&mut topo, n1, n1, line).unwrap_err();
        assert!(matches!(err, TopoError::ClosedEdge { .. }));
    }

    #[test]
    fn test_rejects_endpoint_mismatch() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let line = Line2d::new(vec![Point2d::new(1.0, 1.0), Point2d::new(10.0, 0.0)]);
        assert!(matches!(
            add_iso_edge(&mut topo, n1, n2, line),
            Err(TopoError::EndpointMismatch)
        ));
    }
}
