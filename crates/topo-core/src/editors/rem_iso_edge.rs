//! `RemIsoEdge` (spec.md §4.3.8): delete an edge whose two faces coincide
//! and whose endpoints carry no other incident edge, restoring
//! `containing_face` on both.

use crate::backend::TopologyBackend;
use crate::editors::fetch_node;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::handle::Topology;
use crate::model::{EdgeFields, EdgeId};

#[tracing::instrument(skip(topo))]
pub fn rem_iso_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    edge_id: EdgeId,
) -> Result<(), TopoError> {
    topo.check_interrupted()?;
    let edge = topo
        .backend()
        .get_edge_by_id(&[edge_id], EdgeFields::ALL)?
        .into_iter()
        .next()
        .ok_or(TopoError::NonExistentEdge(edge_id))?;

    // "Isolated edge" (spec GLOSSARY): bounds the same face on both sides,
    // and neither endpoint touches any other edge. The spec's taxonomy has
    // no bespoke variant for "this edge isn't isolated" beyond the
    // node-scoped `NotIsolated`; we report it anchored at whichever
    // endpoint carries the offending connectivity (see DESIGN.md).
    if edge.face_left != edge.face_right {
        return Err(TopoError::NotIsolated { node: edge.start_node });
    }

    for node_id in [edge.start_node, edge.end_node] {
        let incident = topo.backend().get_edge_by_node(&[node_id], EdgeFields::ALL)?;
        if incident.iter().any(|e| e.edge_id != edge_id) {
            return Err(TopoError::NotIsolated { node: node_id });
        }
    }

    let face = edge.face_left;
    let mut start = fetch_node(topo, edge.start_node)?;
    let mut end = fetch_node(topo, edge.end_node)?;
    start.containing_face = Some(face);
    end.containing_face = Some(face);

    topo.backend_mut().delete_edges_by_id(&[edge_id])?;
    if start.node_id == end.node_id {
        topo.backend_mut().update_nodes_by_id(vec![start])
    } else {
        topo.backend_mut().update_nodes_by_id(vec![start, end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_iso_edge, add_iso_node};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::line::Line2d;
    use crate::geometry::point::Point2d;
    use crate::model::FaceId;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_removes_edge_and_restores_isolation() {
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

        rem_iso_edge(&mut topo, edge_id).unwrap();

        let rows = fetch_node(&topo, n1).unwrap();
        assert_eq!(rows.containing_face, Some(FaceId::UNIVERSE));
        assert!(topo
            .backend()
            .get_edge_by_id(&[edge_id], EdgeFields::ALL)
            .unwrap()
            .is_empty());
    }
}
