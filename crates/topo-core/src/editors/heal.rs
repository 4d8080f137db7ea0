//! `ModEdgeHeal`/`NewEdgeHeal` (spec.md §4.3.10), grounded on librttopo's
//! `_rtt_HealEdges`: weld two edges sharing exactly one node incident to
//! no other edge back into a single edge, dissolving that node.

use crate::backend::TopologyBackend;
use crate::editors::fetch_edge;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, EdgeId, NodeId, SignedEdgeId};

/// Which of the four endpoint pairings joins `e1` and `e2`, and how each
/// edge's geometry/id must be oriented to produce a continuous healed
/// line running from the far end of the edge that ends up first to the
/// far end of the edge that ends up second.
struct HealPlan {
    shared_node: NodeId,
    /// `(edge, reversed)` for the piece that supplies the healed edge's
    /// start side.
    first: (EdgeId, bool),
    /// `(edge, reversed)` for the piece that supplies the healed edge's
    /// end side.
    second: (EdgeId, bool),
}

fn plan_heal(e1: &Edge, e2: &Edge) -> Result<HealPlan, TopoError> {
    if e1.edge_id == e2.edge_id {
        return Err(TopoError::SelfHeal { edge: e1.edge_id });
    }
    if e1.is_closed() {
        return Err(TopoError::ClosedEdge { edge: e1.edge_id });
    }
    if e2.is_closed() {
        return Err(TopoError::ClosedEdge { edge: e2.edge_id });
    }

    if e1.end_node == e2.start_node {
        Ok(HealPlan { shared_node: e1.end_node, first: (e1.edge_id, false), second: (e2.edge_id, false) })
    } else if e1.end_node == e2.end_node {
        Ok(HealPlan { shared_node: e1.end_node, first: (e1.edge_id, false), second: (e2.edge_id, true) })
    } else if e1.start_node == e2.start_node {
        Ok(HealPlan { shared_node: e1.start_node, first: (e1.edge_id, true), second: (e2.edge_id, false) })
    } else if e1.start_node == e2.end_node {
        Ok(HealPlan { shared_node: e1.start_node, first: (e2.edge_id, false), second: (e1.edge_id, false) })
    } else {
        Err(TopoError::EdgesNotConnected { e1: e1.edge_id, e2: e2.edge_id })
    }
}

fn oriented_geom(edge: &Edge, reversed: bool) -> crate::geometry::line::Line2d {
    if reversed {
        edge.geom.reversed()
    } else {
        edge.geom.clone()
    }
}

/// Maps a signed reference to `e1`/`e2` (as used by *other* edges' ring
/// pointers, or by `e1`/`e2`'s own outer-side `next_*` fields) onto the
/// matching signed reference to the healed edge, accounting for whichever
/// of the two source edges ended up reversed in the join.
fn remap(plan: &HealPlan, healed_id: EdgeId, signed: SignedEdgeId) -> SignedEdgeId {
    let (first_id, first_rev) = plan.first;
    let (second_id, second_rev) = plan.second;
    if signed.edge_id() == first_id {
        let used_forward = !first_rev;
        SignedEdgeId::new(healed_id, signed.is_forward() == used_forward)
    } else if signed.edge_id() == second_id {
        let used_forward = !second_rev;
        SignedEdgeId::new(healed_id, signed.is_forward() == used_forward)
    } else {
        signed
    }
}

fn far_end(edge: &Edge, shared_node: NodeId) -> NodeId {
    if edge.start_node == shared_node {
        edge.end_node
    } else {
        edge.start_node
    }
}

/// Shared validation and computation: the healed edge's endpoints,
/// geometry, face assignment and `next_left`/`next_right`, plus the
/// [`HealPlan`] callers use to remap external ring pointers.
fn prepare_heal<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    e1_id: EdgeId,
    e2_id: EdgeId,
) -> Result<(HealPlan, Edge, Edge, Edge), TopoError> {
    topo.check_interrupted()?;
    let e1 = fetch_edge(topo, e1_id)?;
    let e2 = fetch_edge(topo, e2_id)?;
    let plan = plan_heal(&e1, &e2)?;

    let others = topo.backend().get_edge_by_node(&[plan.shared_node], EdgeFields::ALL)?;
    if others.iter().any(|e| e.edge_id != e1_id && e.edge_id != e2_id) {
        return Err(TopoError::OtherEdgesConnected { e1: e1_id, e2: e2_id });
    }
    topo.backend().check_topo_geom_rem_node(plan.shared_node)?;

    let (first_edge, first_rev) = plan.first;
    let (second_edge, second_rev) = plan.second;
    let (first_row, second_row) = if first_edge == e1_id { (&e1, &e2) } else { (&e2, &e1) };

    let signed_first = SignedEdgeId::new(first_edge, !first_rev);
    let signed_second = SignedEdgeId::new(second_edge, !second_rev);

    if first_row.face_on_left_of(signed_first) != second_row.face_on_left_of(signed_second)
        || first_row.face_on_right_of(signed_first) != second_row.face_on_right_of(signed_second)
    {
        return Err(TopoError::corrupted(format!(
            "edges {e1_id} and {e2_id} bound different faces; cannot heal"
        )));
    }

    let start_node = far_end(first_row, plan.shared_node);
    let end_node = far_end(second_row, plan.shared_node);
    let healed_geom = oriented_geom(first_row, first_rev).join(&oriented_geom(second_row, second_rev));

    let healed = Edge {
        edge_id: EdgeId(0),
        start_node,
        end_node,
        face_left: first_row.face_on_left_of(signed_first),
        face_right: first_row.face_on_right_of(signed_first),
        next_left: second_row.next_along_left_of(signed_second),
        next_right: first_row.next_along_right_of(signed_first),
        geom: healed_geom,
    };

    Ok((plan, e1, e2, healed))
}

/// Redirect every edge elsewhere (incident to the healed edge's two far
/// ends) whose `next_left`/`next_right` referenced `e1`/`e2` to reference
/// the healed edge instead, with the orientation `remap` computes.
fn relink_external<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    plan: &HealPlan,
    e1_id: EdgeId,
    e2_id: EdgeId,
    healed_id: EdgeId,
    far_nodes: [NodeId; 2],
) -> Result<(), TopoError> {
    let candidates = topo.backend().get_edge_by_node(&far_nodes, EdgeFields::ALL)?;
    let mut updates = Vec::new();
    for mut other in candidates {
        if other.edge_id == e1_id || other.edge_id == e2_id {
            continue;
        }
        let mut changed = false;
        if other.next_left.edge_id() == e1_id || other.next_left.edge_id() == e2_id {
            other.next_left = remap(plan, healed_id, other.next_left);
            changed = true;
        }
        if other.next_right.edge_id() == e1_id || other.next_right.edge_id() == e2_id {
            other.next_right = remap(plan, healed_id, other.next_right);
            changed = true;
        }
        if changed {
            updates.push(other);
        }
    }
    if updates.is_empty() {
        Ok(())
    } else {
        topo.backend_mut().update_edges_by_id(updates)
    }
}

/// Weld `e1` and `e2`, keeping `e1`'s id for the healed edge.
#[tracing::instrument(skip(topo))]
pub fn mod_edge_heal<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    e1_id: EdgeId,
    e2_id: EdgeId,
) -> Result<(), TopoError> {
    let (plan, _e1, _e2, mut healed) = prepare_heal(topo, e1_id, e2_id)?;
    let healed_id = e1_id;
    healed.edge_id = healed_id;
    healed.next_left = remap(&plan, healed_id, healed.next_left);
    healed.next_right = remap(&plan, healed_id, healed.next_right);

    let far_nodes = [healed.start_node, healed.end_node];
    topo.backend_mut().delete_edges_by_id(&[e2_id])?;
    topo.backend_mut().update_edges_by_id(vec![healed])?;
    relink_external(topo, &plan, e1_id, e2_id, healed_id, far_nodes)?;
    topo.backend_mut().delete_nodes_by_id(&[plan.shared_node])?;
    topo.backend_mut().update_topo_geom_edge_heal(e1_id, e2_id, healed_id)?;
    Ok(())
}

/// Weld `e1` and `e2` into a brand-new edge id, deleting both originals.
#[tracing::instrument(skip(topo))]
pub fn new_edge_heal<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    e1_id: EdgeId,
    e2_id: EdgeId,
) -> Result<EdgeId, TopoError> {
    let (plan, _e1, _e2, mut healed) = prepare_heal(topo, e1_id, e2_id)?;
    let healed_id = topo.backend_mut().get_next_edge_id()?;
    healed.edge_id = healed_id;
    healed.next_left = remap(&plan, healed_id, healed.next_left);
    healed.next_right = remap(&plan, healed_id, healed.next_right);

    let far_nodes = [healed.start_node, healed.end_node];
    topo.backend_mut().delete_edges_by_id(&[e1_id, e2_id])?;
    topo.backend_mut().insert_edges(vec![healed])?;
    relink_external(topo, &plan, e1_id, e2_id, healed_id, far_nodes)?;
    topo.backend_mut().delete_nodes_by_id(&[plan.shared_node])?;
    topo.backend_mut().update_topo_geom_edge_heal(e1_id, e2_id, healed_id)?;
    Ok(healed_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_iso_edge, add_iso_node, mod_edge_split};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::line::Line2d;
    use crate::geometry::point::Point2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_mod_edge_heal_reverses_split() {
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

        mod_edge_split(&mut topo, edge_id, Point2d::new(4.0, 0.0), false).unwrap();
        // The split produced edge_id (now 0..4) and EdgeId(2) (4..10).
        mod_edge_heal(&mut topo, edge_id, EdgeId(2)).unwrap();

        let healed = fetch_edge(&topo, edge_id).unwrap();
        assert_eq!(healed.start_node, n1);
        assert_eq!(healed.end_node, n2);
        assert!((healed.geom.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_heal_rejected() {
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
        let err = mod_edge_heal(&mut topo, edge_id, edge_id).unwrap_err();
        assert!(matches!(err, TopoError::SelfHeal { .. }));
    }

    #[test]
    fn test_disconnected_edges_rejected() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, None, Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, None, Point2d::new(10.0, 0.0), false).unwrap();
        let n3 = add_iso_node(&mut topo, None, Point2d::new(20.0, 0.0), false).unwrap();
        let n4 = add_iso_node(&mut topo, None, Point2d::new(30.0, 0.0), false).unwrap();
        let e1 = add_iso_edge(
            &mut topo,
            n1,
            n2,
            Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]),
        )
        .unwrap();
        let e2 = add_iso_edge(
            &mut topo,
            n3,
            n4,
            Line2d::new(vec![Point2d::new(20.0, 0.0), Point2d::new(30.0, 0.0)]),
        )
        .unwrap();
        let err = mod_edge_heal(&mut topo, e1, e2).unwrap_err();
        assert!(matches!(err, TopoError::EdgesNotConnected { .. }));
    }
}
