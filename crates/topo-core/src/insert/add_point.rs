//! `AddPoint`: reuse a coincident node, otherwise split the nearest edge
//! under the point's projection, otherwise drop a brand-new isolated node.

use crate::backend::TopologyBackend;
use crate::config::Tolerance;
use crate::editors::{add_iso_node, change_edge_geom, fetch_edge, mod_edge_split};
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::geometry::point::Point2d;
use crate::handle::Topology;
use crate::model::{EdgeId, NodeId};

/// Insert or reuse a node at `point`. `tol` of `None` resolves to the
/// topology's configured precision, falling back to the machine-scale
/// floor.
#[tracing::instrument(skip(topo))]
pub fn add_point<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    point: Point2d,
    tol: Option<f64>,
) -> Result<NodeId, TopoError> {
    topo.check_interrupted()?;
    let tol = tol.unwrap_or_else(|| topo.tolerance().resolve([point]));

    if let Some(existing) = super::lookup::get_node_by_point(topo, point, tol)? {
        return Ok(existing);
    }

    let candidates = topo
        .backend()
        .get_edge_within_distance2d(point, tol, crate::model::EdgeFields::ALL, None)?;
    for candidate in candidates {
        let prj = topo.geom().closest_point_on_line(point, &candidate.geom);
        if let Some(node) = try_split_at(topo, candidate.edge_id, prj, tol)? {
            return Ok(node);
        }
    }

    add_iso_node(topo, None, point, false)
}

/// Split `edge` at `prj`, repairing the edge's geometry first if `prj`
/// falls just outside what `ModEdgeSplit` accepts due to floating-point
/// drift in the projection (re-prepending the edge's original first
/// vertex if snapping moved it). Returns `Ok(None)` rather than an error
/// so the caller can fall through to the next candidate edge.
fn try_split_at<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    prj: Point2d,
    tol: f64,
) -> Result<Option<NodeId>, TopoError> {
    match mod_edge_split(topo, edge_id, prj, false) {
        Ok(node) => return Ok(Some(node)),
        Err(TopoError::PointNotOnEdge { .. }) => {}
        Err(other) => return Err(other),
    }

    let edge = fetch_edge(topo, edge_id)?;
    let original_first = edge.geom.first();
    let snap_tol = Tolerance::min_tolerance_for([prj]).max(tol);
    let target = Line2d::new(vec![prj, prj]);
    let mut snapped = topo.geom().snap(&edge.geom, &target, snap_tol);
    if !snapped.first().exactly_eq(&original_first) {
        let mut pts = snapped.points().to_vec();
        pts[0] = original_first;
        snapped = Line2d::new(pts);
    }
    change_edge_geom(topo, edge_id, snapped)?;

    match mod_edge_split(topo, edge_id, prj, false) {
        Ok(node) => Ok(Some(node)),
        Err(TopoError::PointNotOnEdge { .. }) => Ok(None),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_iso_edge, add_iso_node};
    use crate::geom::mock::EuclideanKernel;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_repeat_add_point_returns_same_node() {
        let mut topo = fresh();
        let p = Point2d::new(3.0, 4.0);
        let first = add_point(&mut topo, p, Some(0.1)).unwrap();
        let second = add_point(&mut topo, p, Some(0.1)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_point_on_existing_edge_splits_it() {
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

        let node = add_point(&mut topo, Point2d::new(5.0, 0.0), Some(0.1)).unwrap();
        assert_ne!(node, n1);
        assert_ne!(node, n2);

        let head = fetch_edge(&topo, edge_id).unwrap();
        assert_eq!(head.end_node, node);
    }

    #[test]
    fn test_add_point_with_no_neighbors_creates_iso_node() {
        let mut topo = fresh();
        let node = add_point(&mut topo, Point2d::new(100.0, 100.0), Some(0.1)).unwrap();
        let rows = topo
            .backend()
            .get_node_by_id(&[node], crate::model::NodeFields::ALL)
            .unwrap();
        assert_eq!(rows[0].containing_face, Some(crate::model::FaceId::UNIVERSE));
    }
}
