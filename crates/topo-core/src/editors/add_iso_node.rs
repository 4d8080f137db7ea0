//! `AddIsoNode` (spec.md §4.3.1).

use crate::backend::TopologyBackend;
use crate::editors::fetch_face;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::point::Point2d;
use crate::handle::Topology;
use crate::model::{EdgeFields, FaceId, Node, NodeFields, NodeId};

/// Add an isolated node. `face` of `None` means "unset": the node's
/// containing face is resolved via `getFaceContainingPoint`, defaulting to
/// the universe when no face claims the point. `Some(face)` asserts the
/// point lies in that specific face and is checked unless `skip_checks`.
#[tracing::instrument(skip(topo))]
pub fn add_iso_node<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    face: Option<FaceId>,
    point: Point2d,
    skip_checks: bool,
) -> Result<NodeId, TopoError> {
    topo.check_interrupted()?;
    let tol = topo.tolerance().resolve([point]);

    let face_resolved = match face {
        Some(f) => f,
        None => topo
            .backend()
            .get_face_containing_point(point)?
            .unwrap_or(FaceId::UNIVERSE),
    };

    if !skip_checks {
        let bbox = crate::geometry::line::BoundingBox::from_point(&point).expanded_by(tol.max(1e-9));

        for node in topo.backend().get_node_within_box2d(bbox, NodeFields::ALL, None)? {
            if node.geom.within(&point, tol) {
                return Err(TopoError::CoincidentNode { existing: node.node_id, tolerance: tol });
            }
        }

        for edge in topo.backend().get_edge_within_box2d(bbox, EdgeFields::ALL, None)? {
            if topo.geom().line_interior_near_point(&edge.geom, point, tol) {
                return Err(TopoError::EdgeCrossesNode { edge: edge.edge_id });
            }
        }

        if let Some(f) = face {
            if !f.is_universe() {
                fetch_face(topo, f)?;
                let polygon = crate::face::get_face_geometry(topo, f)?;
                if !topo.geom().covers(&polygon, point) {
                    // The node doesn't exist yet; NodeId(0) stands for
                    // "the node about to be created".
                    return Err(TopoError::FaceMismatch { node: NodeId(0), face: f });
                }
            }
        }
    }

    let rows = topo
        .backend_mut()
        .insert_nodes(vec![Node::new(NodeId(0), Some(face_resolved), point)])?;
    Ok(rows[0])
}
