//! `GetNodeByPoint`/`GetEdgeByPoint` (supplemented feature, SPEC_FULL.md):
//! thin wrappers over the proximity queries `AddPoint` already needs,
//! exposed publicly since embedders reach for the same lookup.

use crate::backend::TopologyBackend;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::point::Point2d;
use crate::handle::Topology;
use crate::model::{EdgeFields, EdgeId, NodeFields, NodeId};

/// The closest node to `point` within `tol`, if any.
pub fn get_node_by_point<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    point: Point2d,
    tol: f64,
) -> Result<Option<NodeId>, TopoError> {
    Ok(topo
        .backend()
        .get_node_within_distance2d(point, tol, NodeFields::ALL, Some(1))?
        .into_iter()
        .next()
        .map(|n| n.node_id))
}

/// The closest edge to `point` within `tol`, if any.
pub fn get_edge_by_point<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    point: Point2d,
    tol: f64,
) -> Result<Option<EdgeId>, TopoError> {
    Ok(topo
        .backend()
        .get_edge_within_distance2d(point, tol, EdgeFields::ALL, Some(1))?
        .into_iter()
        .next()
        .map(|e| e.edge_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_iso_edge, add_iso_node};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::line::Line2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_get_node_by_point_finds_nearest() {
        let mut topo = fresh();
        let n = add_iso_node(&mut topo, None, Point2d::new(3.0, 4.0), false).unwrap();
        assert_eq!(get_node_by_point(&topo, Point2d::new(3.0, 4.0), 1e-6).unwrap(), Some(n));
        assert_eq!(get_node_by_point(&topo, Point2d::new(30.0, 40.0), 1.0).unwrap(), None);
    }

    #[test]
    fn test_get_edge_by_point_finds_nearest() {
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
        assert_eq!(get_edge_by_point(&topo, Point2d::new(5.0, 0.01), 0.1).unwrap(), Some(edge_id));
    }
}
