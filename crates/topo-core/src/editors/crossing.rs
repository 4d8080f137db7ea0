//! `_CheckEdgeCrossing` (spec.md §4.3.3): the validation every edge
//! insertion and `ChangeEdgeGeom` routes through before touching storage.

use crate::backend::TopologyBackend;
use crate::error::TopoError;
use crate::geom::{CrossingRelation, GeometryKernel};
use crate::geometry::line::Line2d;
use crate::handle::Topology;
use crate::model::{EdgeFields, EdgeId, NodeFields, NodeId};

/// Check `line` (to be installed between `start` and `end`) against every
/// existing node and edge whose bounding box meets its own. `exclude` is an
/// edge id to skip entirely — `ChangeEdgeGeom` checks a line against
/// everything but the edge it is replacing.
pub(crate) fn check_edge_crossing<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    start: NodeId,
    end: NodeId,
    line: &Line2d,
    exclude: Option<EdgeId>,
) -> Result<(), TopoError> {
    let tol = topo.tolerance().resolve(line.points().iter().copied());
    let bbox = line.bounding_box().expanded_by(tol);

    for node in topo.backend().get_node_within_box2d(bbox, NodeFields::ALL, None)? {
        if node.node_id == start || node.node_id == end {
            continue;
        }
        if topo.geom().line_interior_near_point(line, node.geom, tol) {
            return Err(TopoError::NodeOnEdge { node: node.node_id });
        }
    }

    for edge in topo.backend().get_edge_within_box2d(bbox, EdgeFields::ALL, None)? {
        if Some(edge.edge_id) == exclude {
            continue;
        }
        match topo.geom().classify_crossing(line, &edge.geom, tol) {
            CrossingRelation::Disjoint => {}
            CrossingRelation::Coincident => {
                return Err(TopoError::CoincidentEdge { other: edge.edge_id })
            }
            CrossingRelation::Overlap => return Err(TopoError::EdgesOverlap { other: edge.edge_id }),
            CrossingRelation::Cross => return Err(TopoError::EdgesCross { other: edge.edge_id }),
        }
    }

    Ok(())
}
