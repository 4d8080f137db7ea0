use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, FaceId, NodeId, SignedEdgeId};
use crate::geometry::line::Line2d;

/// A directed edge carrying both left and right face/ring linkage.
/// The directed curve is `geom`; `next_left`/`next_right` encode the
/// implicit half-edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub edge_id: EdgeId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub face_left: FaceId,
    pub face_right: FaceId,
    /// Signed id of the edge walked next when tracing `face_left`
    /// counter-clockwise from this edge's end.
    pub next_left: SignedEdgeId,
    /// Signed id of the edge walked next when tracing `face_right`
    /// counter-clockwise from this edge's start.
    pub next_right: SignedEdgeId,
    pub geom: Line2d,
}

impl Edge {
    pub fn is_closed(&self) -> bool {
        self.start_node == self.end_node
    }

    /// An isolated edge (spec GLOSSARY): `face_left == face_right` and —
    /// the caller must additionally check — neither endpoint has any other
    /// incident edge. This only checks the face-coincidence half.
    pub fn is_self_faced(&self) -> bool {
        self.face_left == self.face_right
    }

    /// The node at the "start" side of a signed traversal.
    pub fn node_at_start_of(&self, signed: SignedEdgeId) -> NodeId {
        debug_assert_eq!(signed.edge_id(), self.edge_id);
        if signed.is_forward() {
            self.start_node
        } else {
            self.end_node
        }
    }

    /// The node at the "end" side of a signed traversal.
    pub fn node_at_end_of(&self, signed: SignedEdgeId) -> NodeId {
        debug_assert_eq!(signed.edge_id(), self.edge_id);
        if signed.is_forward() {
            self.end_node
        } else {
            self.start_node
        }
    }

    /// `next_left` if `signed` is forward, `next_right` reversed if it is
    /// backward — i.e. "the next signed edge when walking `signed`'s left
    /// face", regardless of which physical direction `signed` points.
    pub fn next_along_left_of(&self, signed: SignedEdgeId) -> SignedEdgeId {
        if signed.is_forward() {
            self.next_left
        } else {
            self.next_right.reversed()
        }
    }

    /// `next_right` if `signed` is forward, `next_left` reversed if it is
    /// backward — the mirror of [`Self::next_along_left_of`], used to
    /// derive a healed edge's `next_right` from whichever of its two
    /// source edges supplies the new edge's start side.
    pub fn next_along_right_of(&self, signed: SignedEdgeId) -> SignedEdgeId {
        if signed.is_forward() {
            self.next_right
        } else {
            self.next_left.reversed()
        }
    }

    /// The face bounded when walking `signed`'s left side.
    pub fn face_on_left_of(&self, signed: SignedEdgeId) -> FaceId {
        if signed.is_forward() {
            self.face_left
        } else {
            self.face_right
        }
    }

    /// The face bounded when walking `signed`'s right side.
    pub fn face_on_right_of(&self, signed: SignedEdgeId) -> FaceId {
        if signed.is_forward() {
            self.face_right
        } else {
            self.face_left
        }
    }
}
