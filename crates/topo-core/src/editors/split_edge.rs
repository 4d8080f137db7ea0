//! `ModEdgeSplit`/`NewEdgesSplit` (spec.md §4.3.5), grounded on librttopo's
//! `_rtt_EdgeSplit` (shared validation) and `rtt_ModEdgeSplit`/
//! `rtt_NewEdgesSplit`.

use crate::backend::TopologyBackend;
use crate::editors::fetch_edge;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::{BoundingBox, Line2d};
use crate::geometry::point::Point2d;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, EdgeId, Node, NodeFields, NodeId, SignedEdgeId};

/// Validate `point` against `edge` and split its geometry, inserting the
/// new (non-isolated) node at the split point. Shared by both split
/// flavors; callers do their own edge bookkeeping afterward.
fn split_core<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    point: Point2d,
    skip_checks: bool,
) -> Result<(Edge, Line2d, Line2d, NodeId), TopoError> {
    topo.check_interrupted()?;
    let old = fetch_edge(topo, edge_id)?;
    let tol = topo.tolerance().resolve([point]);

    if !skip_checks {
        let bbox = BoundingBox::from_point(&point).expanded_by(tol.max(1e-9));
        for node in topo.backend().get_node_within_box2d(bbox, NodeFields::ALL, None)? {
            if node.geom.within(&point, tol) {
                return Err(TopoError::CoincidentNode { existing: node.node_id, tolerance: tol });
            }
        }
    }

    let (head, tail) = topo
        .geom()
        .split(&old.geom, point, tol)
        .ok_or(TopoError::PointNotOnEdge { edge: edge_id })?;

    let node_id = topo.backend_mut().insert_nodes(vec![Node::new(NodeId(0), None, point)])?[0];
    Ok((old, head, tail, node_id))
}

fn relink_next_right<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    at_node: NodeId,
    from: SignedEdgeId,
    to: SignedEdgeId,
    exclude: Option<EdgeId>,
) -> Result<(), TopoError> {
    let candidates = topo.backend().get_edge_by_node(&[at_node], EdgeFields::ALL)?;
    let mut updates = Vec::new();
    for mut edge in candidates {
        if Some(edge.edge_id) == exclude {
            continue;
        }
        if edge.start_node == at_node && edge.next_right == from {
            edge.next_right = to;
            updates.push(edge);
        }
    }
    if updates.is_empty() {
        Ok(())
    } else {
        topo.backend_mut().update_edges_by_id(updates)
    }
}

fn relink_next_left<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    at_node: NodeId,
    from: SignedEdgeId,
    to: SignedEdgeId,
    exclude: Option<EdgeId>,
) -> Result<(), TopoError> {
    let candidates = topo.backend().get_edge_by_node(&[at_node], EdgeFields::ALL)?;
    let mut updates = Vec::new();
    for mut edge in candidates {
        if Some(edge.edge_id) == exclude {
            continue;
        }
        if edge.end_node == at_node && edge.next_left == from {
            edge.next_left = to;
            updates.push(edge);
        }
    }
    if updates.is_empty() {
        Ok(())
    } else {
        topo.backend_mut().update_edges_by_id(updates)
    }
}

/// Split `edge` at `point`, keeping the original edge id for the
/// start-side half and inserting one new edge for the end-side half.
/// Returns the new node's id.
#[tracing::instrument(skip(topo))]
pub fn mod_edge_split<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    point: Point2d,
    skip_checks: bool,
) -> Result<NodeId, TopoError> {
    let (old, head, tail, node_id) = split_core(topo, edge_id, point, skip_checks)?;
    let original_end_node = old.end_node;

    let new_edge_id = topo.backend_mut().get_next_edge_id()?;
    let new_edge = Edge {
        edge_id: new_edge_id,
        start_node: node_id,
        end_node: original_end_node,
        face_left: old.face_left,
        face_right: old.face_right,
        next_left: if old.next_left == SignedEdgeId::new(edge_id, false) {
            SignedEdgeId::new(new_edge_id, false)
        } else {
            old.next_left
        },
        next_right: SignedEdgeId::new(edge_id, false),
        geom: tail,
    };
    topo.backend_mut().insert_edges(vec![new_edge])?;

    let mut updated_old = old;
    updated_old.geom = head;
    updated_old.end_node = node_id;
    updated_old.next_left = SignedEdgeId::new(new_edge_id, true);
    topo.backend_mut().update_edges_by_id(vec![updated_old])?;

    relink_next_right(
        topo,
        original_end_node,
        SignedEdgeId::new(edge_id, false),
        SignedEdgeId::new(new_edge_id, false),
        Some(new_edge_id),
    )?;
    relink_next_left(
        topo,
        original_end_node,
        SignedEdgeId::new(edge_id, false),
        SignedEdgeId::new(new_edge_id, false),
        Some(new_edge_id),
    )?;

    topo.backend_mut().update_topo_geom_edge_split(edge_id, new_edge_id, None)?;
    Ok(node_id)
}

/// Split `edge` at `point`, deleting the original edge and inserting two
/// brand-new edges in its place. Returns the new node's id.
#[tracing::instrument(skip(topo))]
pub fn new_edges_split<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    point: Point2d,
    skip_checks: bool,
) -> Result<NodeId, TopoError> {
    let (old, head, tail, node_id) = split_core(topo, edge_id, point, skip_checks)?;
    let original_start_node = old.start_node;
    let original_end_node = old.end_node;

    topo.backend_mut().delete_edges_by_id(&[edge_id])?;

    let new0_id = topo.backend_mut().get_next_edge_id()?;
    let new1_id = topo.backend_mut().get_next_edge_id()?;

    let new0 = Edge {
        edge_id: new0_id,
        start_node: original_start_node,
        end_node: node_id,
        face_left: old.face_left,
        face_right: old.face_right,
        next_left: SignedEdgeId::new(new1_id, true),
        next_right: if old.next_right == SignedEdgeId::new(edge_id, true) {
            SignedEdgeId::new(new0_id, true)
        } else if old.next_right == SignedEdgeId::new(edge_id, false) {
            SignedEdgeId::new(new1_id, false)
        } else {
            old.next_right
        },
        geom: head,
    };
    let new1 = Edge {
        edge_id: new1_id,
        start_node: node_id,
        end_node: original_end_node,
        face_left: old.face_left,
        face_right: old.face_right,
        next_left: if old.next_left == SignedEdgeId::new(edge_id, false) {
            SignedEdgeId::new(new1_id, false)
        } else if old.next_left == SignedEdgeId::new(edge_id, true) {
            SignedEdgeId::new(new0_id, true)
        } else {
            old.next_left
        },
        next_right: SignedEdgeId::new(new0_id, false),
        geom: tail,
    };
    topo.backend_mut().insert_edges(vec![new0, new1])?;

    relink_next_right(
        topo,
        original_start_node,
        SignedEdgeId::new(edge_id, true),
        SignedEdgeId::new(new1_id, true),
        None,
    )?;
    relink_next_right(
        topo,
        original_end_node,
        SignedEdgeId::new(edge_id, false),
        SignedEdgeId::new(new0_id, false),
        None,
    )?;
    relink_next_left(
        topo,
        original_start_node,
        SignedEdgeId::new(edge_id, true),
        SignedEdgeId::new(new0_id, true),
        None,
    )?;
    relink_next_left(
        topo,
        original_end_node,
        SignedEdgeId::new(edge_id, false),
        SignedEdgeId::new(new1_id, false),
        None,
    )?;

    topo.backend_mut().update_topo_geom_edge_split(edge_id, new0_id, Some(new1_id))?;
    Ok(node_id)
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

    fn seed_edge(topo: &mut Topology<InMemoryBackend, EuclideanKernel>) -> EdgeId {
        let n1 = add_iso_node(topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        add_iso_edge(topo, n1, n2, line).unwrap()
    }

    #[test]
    fn test_mod_edge_split_keeps_old_edge_id_for_first_half() {
        let mut topo = fresh();
        let edge_id = seed_edge(&mut topo);
        let node_id = mod_edge_split(&mut topo, edge_id, Point2d::new(4.0, 0.0), false).unwrap();

        let old = fetch_edge(&topo, edge_id).unwrap();
        assert_eq!(old.end_node, node_id);
        assert!((old.geom.length() - 4.0).abs() < 1e-9);

        let new_edge = fetch_edge(&topo, EdgeId(2)).unwrap();
        assert_eq!(new_edge.start_node, node_id);
        assert!((new_edge.geom.length() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_mod_edge_split_rejects_point_not_on_edge() {
        let mut topo = fresh();
        let edge_id = seed_edge(&mut topo);
        let err = mod_edge_split(&mut topo, edge_id, Point2d::new(4.0, 5.0), false).unwrap_err();
        assert!(matches!(err, TopoError::PointNotOnEdge { .. }));
    }

    #[test]
    fn test_new_edges_split_deletes_original_and_inserts_two() {
        let mut topo = fresh();
        let edge_id = seed_edge(&mut topo);
        let node_id = new_edges_split(&mut topo, edge_id, Point2d::new(4.0, 0.0), false).unwrap();

        assert!(fetch_edge(&topo, edge_id).is_err());
        let e1 = fetch_edge(&topo, EdgeId(2)).unwrap();
        let e2 = fetch_edge(&topo, EdgeId(3)).unwrap();
        assert_eq!(e1.end_node, node_id);
        assert_eq!(e2.start_node, node_id);
        assert!((e1.geom.length() + e2.geom.length() - 10.0).abs() < 1e-9);
    }
}
