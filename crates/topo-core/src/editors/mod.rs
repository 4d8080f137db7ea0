//! Low-level editors (component C5, spec.md §4.3).
//!
//! One submodule per operation family, plus the two helpers spec.md calls
//! out as shared: `_CheckEdgeCrossing` ([`crossing`]) and the azimuth/
//! adjacency analysis used by `AddEdge*`/healing ([`azimuth`]).

mod crossing;
mod azimuth;
mod face_split;
mod add_iso_node;
mod add_iso_edge;
mod add_edge;
mod split_edge;
mod change_edge_geom;
mod iso_node_ops;
mod rem_iso_edge;
mod rem_edge;
mod heal;

pub use crossing::check_edge_crossing;
pub use add_iso_node::add_iso_node;
pub use add_iso_edge::add_iso_edge;
pub use add_edge::{add_edge_mod_face, add_edge_new_faces};
pub use split_edge::{mod_edge_split, new_edges_split};
pub use change_edge_geom::change_edge_geom;
pub use iso_node_ops::{move_iso_node, remove_iso_node};
pub use rem_iso_edge::rem_iso_edge;
pub use rem_edge::{rem_edge_mod_face, rem_edge_new_face};
pub use heal::{mod_edge_heal, new_edge_heal};

use crate::backend::TopologyBackend;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, EdgeId, Face, FaceFields, FaceId, Node, NodeFields, NodeId};

pub(crate) fn fetch_node<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    id: NodeId,
) -> Result<Node, TopoError> {
    topo.backend()
        .get_node_by_id(&[id], NodeFields::ALL)?
        .into_iter()
        .next()
        .ok_or(TopoError::NonExistentNode(id))
}

pub(crate) fn fetch_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    id: EdgeId,
) -> Result<Edge, TopoError> {
    topo.backend()
        .get_edge_by_id(&[id], EdgeFields::ALL)?
        .into_iter()
        .next()
        .ok_or(TopoError::NonExistentEdge(id))
}

pub(crate) fn fetch_face<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    id: FaceId,
) -> Result<Face, TopoError> {
    if id.is_universe() {
        return Err(TopoError::UniverseHasNoGeometry);
    }
    topo.backend()
        .get_face_by_id(&[id], FaceFields::ALL)?
        .into_iter()
        .next()
        .ok_or(TopoError::NonExistentFace(id))
}
