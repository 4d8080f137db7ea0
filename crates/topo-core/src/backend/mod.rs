//! The storage back-end boundary.
//!
//! Persistence of topology rows is explicitly out of scope for this
//! crate; [`TopologyBackend`] is exactly the operation list the editors
//! and inserters require of a store, and [`mock::InMemoryBackend`] is a
//! reference/test implementation, not a production store.

pub mod mock;

use crate::error::TopoError;
use crate::geometry::line::BoundingBox;
use crate::geometry::point::Point2d;
use crate::model::{Edge, EdgeFields, Face, FaceFields, Node, NodeFields, NodeId, EdgeId, FaceId, SignedEdgeId};

/// The back-end callback interface threaded through every [`crate::Topology`].
/// Every query takes an explicit field mask even though this trait's mock
/// implementation always populates every field — the mask is part of the
/// contract real back ends are expected to honor, not an optimization
/// this crate performs itself.
pub trait TopologyBackend {
    // ---- Topology metadata ----
    fn srid(&self) -> i32;
    fn precision(&self) -> f64;
    fn has_z(&self) -> bool;

    // ---- Bulk fetch by id ----
    fn get_node_by_id(&self, ids: &[NodeId], fields: NodeFields) -> Result<Vec<Node>, TopoError>;
    fn get_edge_by_id(&self, ids: &[EdgeId], fields: EdgeFields) -> Result<Vec<Edge>, TopoError>;
    fn get_face_by_id(&self, ids: &[FaceId], fields: FaceFields) -> Result<Vec<Face>, TopoError>;

    // ---- Bounding-box queries ----
    fn get_node_within_box2d(
        &self,
        bbox: BoundingBox,
        fields: NodeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Node>, TopoError>;
    fn get_edge_within_box2d(
        &self,
        bbox: BoundingBox,
        fields: EdgeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Edge>, TopoError>;
    fn get_face_within_box2d(
        &self,
        bbox: BoundingBox,
        fields: FaceFields,
        limit: Option<usize>,
    ) -> Result<Vec<Face>, TopoError>;

    // ---- Proximity queries ----
    fn get_node_within_distance2d(
        &self,
        point: Point2d,
        distance: f64,
        fields: NodeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Node>, TopoError>;
    fn get_edge_within_distance2d(
        &self,
        point: Point2d,
        distance: f64,
        fields: EdgeFields,
        limit: Option<usize>,
    ) -> Result<Vec<Edge>, TopoError>;

    // ---- Topology-shaped queries ----
    fn get_edge_by_node(&self, node_ids: &[NodeId], fields: EdgeFields) -> Result<Vec<Edge>, TopoError>;
    fn get_edge_by_face(
        &self,
        face_ids: &[FaceId],
        fields: EdgeFields,
        bbox: Option<BoundingBox>,
    ) -> Result<Vec<Edge>, TopoError>;
    fn get_node_by_face(
        &self,
        face_ids: &[FaceId],
        fields: NodeFields,
        bbox: Option<BoundingBox>,
    ) -> Result<Vec<Node>, TopoError>;

    fn get_face_containing_point(&self, point: Point2d) -> Result<Option<FaceId>, TopoError>;

    /// Walk a face ring via `next_left`/`next_right` linkage, as stored by
    /// the back end.
    fn get_ring_edges(
        &self,
        start: SignedEdgeId,
        limit: Option<usize>,
    ) -> Result<Vec<SignedEdgeId>, TopoError>;

    // ---- Id allocation ----
    fn get_next_edge_id(&mut self) -> Result<EdgeId, TopoError>;

    // ---- Mutation ----
    /// Insert rows, ignoring their (placeholder) ids, and return the
    /// back-end-assigned ids in the same order.
    fn insert_nodes(&mut self, rows: Vec<Node>) -> Result<Vec<NodeId>, TopoError>;
    fn insert_edges(&mut self, rows: Vec<Edge>) -> Result<Vec<EdgeId>, TopoError>;
    fn insert_faces(&mut self, rows: Vec<Face>) -> Result<Vec<FaceId>, TopoError>;

    fn update_nodes_by_id(&mut self, rows: Vec<Node>) -> Result<(), TopoError>;
    fn update_edges_by_id(&mut self, rows: Vec<Edge>) -> Result<(), TopoError>;
    fn update_faces_by_id(&mut self, rows: Vec<Face>) -> Result<(), TopoError>;

    fn delete_nodes_by_id(&mut self, ids: &[NodeId]) -> Result<(), TopoError>;
    fn delete_edges_by_id(&mut self, ids: &[EdgeId]) -> Result<(), TopoError>;
    fn delete_faces_by_id(&mut self, ids: &[FaceId]) -> Result<(), TopoError>;

    // ---- TopoGeom hooks ----
    // No-op defaults: most embeddings (and the mock backend) don't layer
    // user feature tables over the topology primitives.

    fn update_topo_geom_edge_split(
        &mut self,
        _old: EdgeId,
        _new1: EdgeId,
        _new2: Option<EdgeId>,
    ) -> Result<(), TopoError> {
        Ok(())
    }

    fn update_topo_geom_face_split(
        &mut self,
        _old_face: FaceId,
        _new_face: FaceId,
        _mbr_only: bool,
    ) -> Result<(), TopoError> {
        Ok(())
    }

    fn update_topo_geom_face_heal(
        &mut self,
        _faces_removed: &[FaceId],
        _new_face: FaceId,
    ) -> Result<(), TopoError> {
        Ok(())
    }

    fn update_topo_geom_edge_heal(
        &mut self,
        _e1: EdgeId,
        _e2: EdgeId,
        _new_edge: EdgeId,
    ) -> Result<(), TopoError> {
        Ok(())
    }

    /// Veto a `RemEdge*` on user-feature grounds.
    fn check_topo_geom_rem_edge(&self, _edge: EdgeId) -> Result<(), TopoError> {
        Ok(())
    }

    /// Veto a heal's implicit node removal on user-feature grounds.
    fn check_topo_geom_rem_node(&self, _node: NodeId) -> Result<(), TopoError> {
        Ok(())
    }
}
