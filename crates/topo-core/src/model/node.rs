use serde::{Deserialize, Serialize};

use super::ids::{FaceId, NodeId};
use crate::geometry::point::Point2d;

/// A node: a point, optionally isolated inside a face.
///
/// `containing_face.is_some()` iff the node has no incident edge. The core
/// never stores both a containing face *and* incident edges for the same
/// node; `containing_face` is cleared the moment an edge is attached and
/// restored the moment the last incident edge is removed or healed away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    /// `Some(face)` iff isolated; `None` means "endpoint of at least one
    /// edge" (the unset sentinel).
    pub containing_face: Option<FaceId>,
    pub geom: Point2d,
}

impl Node {
    pub fn new(node_id: NodeId, containing_face: Option<FaceId>, geom: Point2d) -> Self {
        Self { node_id, containing_face, geom }
    }

    pub fn is_isolated(&self) -> bool {
        self.containing_face.is_some()
    }
}
