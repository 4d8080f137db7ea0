//! The closed failure taxonomy for every public topology operation.
//!
//! Five families: Input / Precondition / External / Structural / Control.
//! Every variant carries structured fields (ids, measured tolerances)
//! rather than an opaque formatted string, so callers can match on and
//! recover from specific failures instead of parsing text.

use crate::model::{EdgeId, FaceId, NodeId};

/// Every way a topology editing operation can fail.
///
/// `CorruptedTopology` and `Backend`/`GeometryEngine` failures are
/// propagated verbatim — never retried, never caught — since they signal
/// invariant breakage or external failure already past this operation's
/// power to repair.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TopoError {
    // ---- Input ----
    #[error("no such topology: {name}")]
    NoSuchTopology { name: String },

    #[error("node {0} does not exist")]
    NonExistentNode(NodeId),

    #[error("edge {0} does not exist")]
    NonExistentEdge(EdgeId),

    #[error("face {0} does not exist")]
    NonExistentFace(FaceId),

    #[error("geometry is empty")]
    EmptyGeometry,

    #[error("geometry is not simple (self-intersects)")]
    GeometryNotSimple,

    // ---- Precondition ----
    #[error("node {existing} is coincident with the new point within tolerance {tolerance}")]
    CoincidentNode { existing: NodeId, tolerance: f64 },

    #[error("edge {edge} crosses the node's point")]
    EdgeCrossesNode { edge: EdgeId },

    #[error("node {node} lies on the interior of the new edge's geometry")]
    NodeOnEdge { node: NodeId },

    #[error("new edge crosses existing edge {other}")]
    EdgesCross { other: EdgeId },

    #[error("new edge overlaps existing edge {other}")]
    EdgesOverlap { other: EdgeId },

    #[error("new edge is coincident with existing edge {other}")]
    CoincidentEdge { other: EdgeId },

    #[error("line endpoints do not match the given nodes' coordinates")]
    EndpointMismatch,

    #[error("node {node} is not isolated")]
    NotIsolated { node: NodeId },

    #[error("node {node} does not lie in face {face}")]
    FaceMismatch { node: NodeId, face: FaceId },

    #[error("edge endpoints lie in different faces and cannot be joined directly")]
    CrossesFaceBoundary,

    #[error("point does not lie on edge {edge}")]
    PointNotOnEdge { edge: EdgeId },

    #[error("edge {edge} is closed and cannot be healed/isolated this way")]
    ClosedEdge { edge: EdgeId },

    #[error("cannot heal an edge with itself")]
    SelfHeal { edge: EdgeId },

    #[error("edges {e1} and {e2} do not share exactly one free endpoint")]
    EdgesNotConnected { e1: EdgeId, e2: EdgeId },

    #[error("the shared node of {e1}/{e2} is incident to other edges besides the two healed")]
    OtherEdgesConnected { e1: EdgeId, e2: EdgeId },

    #[error("new geometry twists around endpoint of edge {edge}: CW/CCW neighbor changed")]
    EdgeTwistAroundEndpoint { edge: EdgeId },

    #[error("motion area of edge {edge}'s geometry change collides with node {node}")]
    EdgeMotionCollision { edge: EdgeId, node: NodeId },

    #[error("the universe face (0) has no geometry")]
    UniverseHasNoGeometry,

    // ---- External ----
    #[error("backend error: {message}")]
    Backend { message: String },

    #[error("geometry engine error: {message}")]
    GeometryEngine { message: String },

    #[error("user feature layer vetoed the structural change: {reason}")]
    UserFeaturesVeto { reason: String },

    // ---- Structural ----
    #[error("corrupted topology detected: {detail}")]
    CorruptedTopology { detail: String },

    // ---- Control ----
    #[error("operation interrupted")]
    Interrupted,
}

impl TopoError {
    /// True for the one failure kind that can never be recovered from by
    /// retrying or adjusting input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TopoError::CorruptedTopology { .. })
    }

    pub fn backend(message: impl Into<String>) -> Self {
        TopoError::Backend { message: message.into() }
    }

    pub fn geometry_engine(message: impl Into<String>) -> Self {
        TopoError::GeometryEngine { message: message.into() }
    }

    pub fn corrupted(detail: impl Into<String>) -> Self {
        TopoError::CorruptedTopology { detail: detail.into() }
    }
}

pub type TopoResult<T> = Result<T, TopoError>;
