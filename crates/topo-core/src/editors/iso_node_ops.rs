//! `MoveIsoNode`/`RemoveIsoNode` (spec.md §4.3.7).

use crate::backend::TopologyBackend;
use crate::editors::fetch_node;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::BoundingBox;
use crate::geometry::point::Point2d;
use crate::handle::Topology;
use crate::model::{EdgeFields, FaceId, NodeFields, NodeId};

/// Move an isolated node to a new location, staying inside its current
/// containing face and clear of any coincident node or edge interior.
#[tracing::instrument(skip(topo))]
pub fn move_iso_node<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    node_id: NodeId,
    to: Point2d,
) -> Result<(), TopoError> {
    topo.check_interrupted()?;
    let mut node = fetch_node(topo, node_id)?;
    if !node.is_isolated() {
        return Err(TopoError::NotIsolated { node: node_id });
    }

    let current_face = node.containing_face.expect("isolated node carries a containing face");
    let resolved_face = topo.backend().get_face_containing_point(to)?.unwrap_or(FaceId::UNIVERSE);
    if resolved_face != current_face {
        return Err(TopoError::FaceMismatch { node: node_id, face: resolved_face });
    }

    let tol = topo.tolerance().resolve([to]);
    let bbox = BoundingBox::from_point(&to).expanded_by(tol.max(1e-9));

    for other in topo.backend().get_node_within_box2d(bbox, NodeFields::ALL, None)? {
        if other.node_id == node_id {
            continue;
        }
        if other.geom.within(&to, tol) {
            return Err(TopoError::CoincidentNode { existing: other.node_id, tolerance: tol });
        }
    }
    for edge in topo.backend().get_edge_within_box2d(bbox, EdgeFields::ALL, None)? {
        if topo.geom().line_interior_near_point(&edge.geom, to, tol) {
            return Err(TopoError::EdgeCrossesNode { edge: edge.edge_id });
        }
    }

    node.geom = to;
    topo.backend_mut().update_nodes_by_id(vec![node])
}

/// Delete an isolated node.
#[tracing::instrument(skip(topo))]
pub fn remove_iso_node<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    node_id: NodeId,
) -> Result<(), TopoError> {
    topo.check_interrupted()?;
    let node = fetch_node(topo, node_id)?;
    if !node.is_isolated() {
        return Err(TopoError::NotIsolated { node: node_id });
    }
    topo.backend_mut().delete_nodes_by_id(&[node_id])
}
