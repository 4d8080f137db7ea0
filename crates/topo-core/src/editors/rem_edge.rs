//! `RemEdgeModFace`/`RemEdgeNewFace` (spec.md §4.3.9), grounded on
//! librttopo's `_rtt_RemEdge`: delete an edge, fix up every ring pointer
//! that referenced it, and merge the one or two faces it used to
//! separate into a single flood face.

use crate::backend::TopologyBackend;
use crate::editors::fetch_edge;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, EdgeId, Face, FaceId, NodeFields, SignedEdgeId};

/// Delete `edge`, merging `edge.face_left`/`edge.face_right` into one
/// flood face and returning the flood face's id. `new_face` selects
/// whether the flood face is `face_right` (`RemEdgeModFace`, face_left
/// dissolves) or a freshly minted face spanning both MBRs
/// (`RemEdgeNewFace`).
fn rem_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
    new_face: bool,
) -> Result<FaceId, TopoError> {
    topo.check_interrupted()?;
    topo.backend().check_topo_geom_rem_edge(edge_id)?;
    let edge = fetch_edge(topo, edge_id)?;

    relink_ring_pointers(topo, &edge)?;

    let flood_face = if edge.face_left == edge.face_right {
        edge.face_left
    } else if edge.face_left.is_universe() || edge.face_right.is_universe() {
        FaceId::UNIVERSE
    } else if !new_face {
        edge.face_right
    } else {
        let left = topo
            .backend()
            .get_face_by_id(&[edge.face_left], crate::model::FaceFields::ALL)?
            .into_iter()
            .next()
            .ok_or(TopoError::NonExistentFace(edge.face_left))?;
        let right = topo
            .backend()
            .get_face_by_id(&[edge.face_right], crate::model::FaceFields::ALL)?
            .into_iter()
            .next()
            .ok_or(TopoError::NonExistentFace(edge.face_right))?;
        topo.backend_mut()
            .insert_faces(vec![Face { face_id: FaceId(0), mbr: left.mbr.union(&right.mbr) }])?[0]
    };

    let dissolved: Vec<FaceId> = [edge.face_left, edge.face_right]
        .into_iter()
        .filter(|f| *f != flood_face && !f.is_universe())
        .collect();

    if !dissolved.is_empty() {
        retarget_faces(topo, &dissolved, flood_face)?;
        topo.backend_mut().update_topo_geom_face_heal(&dissolved, flood_face)?;
    }

    topo.backend_mut().delete_edges_by_id(&[edge_id])?;

    for node_id in [edge.start_node, edge.end_node] {
        let remaining = topo.backend().get_edge_by_node(&[node_id], EdgeFields::ALL)?;
        if remaining.iter().all(|e| e.edge_id == edge_id) {
            let mut node = topo
                .backend()
                .get_node_by_id(&[node_id], NodeFields::ALL)?
                .into_iter()
                .next()
                .ok_or(TopoError::NonExistentNode(node_id))?;
            node.containing_face = Some(flood_face);
            topo.backend_mut().update_nodes_by_id(vec![node])?;
        }
    }

    if !dissolved.is_empty() {
        topo.backend_mut().delete_faces_by_id(&dissolved)?;
    }

    Ok(flood_face)
}

/// `RemEdgeModFace`: the flood face reuses `face_right`'s id (`face_left`
/// dissolves, unless either side is the universe).
#[tracing::instrument(skip(topo))]
pub fn rem_edge_mod_face<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
) -> Result<FaceId, TopoError> {
    rem_edge(topo, edge_id, false)
}

/// `RemEdgeNewFace`: a brand-new flood face is minted spanning the union
/// of both dissolved faces' MBRs.
#[tracing::instrument(skip(topo))]
pub fn rem_edge_new_face<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
) -> Result<FaceId, TopoError> {
    rem_edge(topo, edge_id, true)
}

/// Any edge elsewhere whose `next_left`/`next_right` pointed at `edge`
/// (in either direction) gets redirected to skip it, using `edge`'s own
/// linkage fields — the ring continues exactly as if `edge` had never
/// been there.
fn relink_ring_pointers<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge: &Edge,
) -> Result<(), TopoError> {
    let fwd = SignedEdgeId::new(edge.edge_id, true);
    let bwd = SignedEdgeId::new(edge.edge_id, false);
    let replacement_for = |signed: SignedEdgeId| edge.next_along_left_of(signed);

    let candidates = topo
        .backend()
        .get_edge_by_node(&[edge.start_node, edge.end_node], EdgeFields::ALL)?;
    let mut updates = Vec::new();
    for mut other in candidates {
        if other.edge_id == edge.edge_id {
            continue;
        }
        let mut changed = false;
        if other.next_left == fwd {
            other.next_left = replacement_for(fwd);
            changed = true;
        } else if other.next_left == bwd {
            other.next_left = replacement_for(bwd);
            changed = true;
        }
        if other.next_right == fwd {
            other.next_right = replacement_for(fwd);
            changed = true;
        } else if other.next_right == bwd {
            other.next_right = replacement_for(bwd);
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

/// Every edge/node still referencing one of `dissolved` now references
/// `flood_face` instead.
fn retarget_faces<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    dissolved: &[FaceId],
    flood_face: FaceId,
) -> Result<(), TopoError> {
    let edges = topo.backend().get_edge_by_face(dissolved, EdgeFields::ALL, None)?;
    let mut edge_updates = Vec::new();
    for mut e in edges {
        let mut changed = false;
        if dissolved.contains(&e.face_left) {
            e.face_left = flood_face;
            changed = true;
        }
        if dissolved.contains(&e.face_right) {
            e.face_right = flood_face;
            changed = true;
        }
        if changed {
            edge_updates.push(e);
        }
    }
    if !edge_updates.is_empty() {
        topo.backend_mut().update_edges_by_id(edge_updates)?;
    }

    let nodes = topo.backend().get_node_by_face(dissolved, NodeFields::ALL, None)?;
    let mut node_updates = Vec::new();
    for mut n in nodes {
        if n.containing_face.map(|f| dissolved.contains(&f)).unwrap_or(false) {
            n.containing_face = Some(flood_face);
            node_updates.push(n);
        }
    }
    if !node_updates.is_empty() {
        topo.backend_mut().update_nodes_by_id(node_updates)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_edge_mod_face, add_iso_node};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::line::Line2d;
    use crate::geometry::point::Point2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_rem_edge_mod_face_dissolves_triangle_back_into_universe() {
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

        let flood = rem_edge_mod_face(&mut topo, closing).unwrap();
        assert_eq!(flood, FaceId::UNIVERSE);

        let remaining = fetch_edge(&topo, EdgeId(1)).unwrap();
        assert_eq!(remaining.face_left, FaceId::UNIVERSE);
        assert_eq!(remaining.face_right, FaceId::UNIVERSE);
    }
}
