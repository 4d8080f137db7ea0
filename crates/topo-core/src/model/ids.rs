use serde::{Deserialize, Serialize};
use std::fmt;

/// A node identifier. Unique within a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i64);

/// An edge identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub i64);

/// A face identifier. `0` is the reserved universe face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(pub i64);

impl FaceId {
    pub const UNIVERSE: FaceId = FaceId(0);

    pub fn is_universe(&self) -> bool {
        *self == FaceId::UNIVERSE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universe() {
            write!(f, "F(universe)")
        } else {
            write!(f, "F{}", self.0)
        }
    }
}

/// A signed reference to an edge: the sign encodes a traversal direction.
/// Positive means "traverse `edge_id` in its stored forward direction",
/// negative means "traverse it in reverse". Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedEdgeId(i64);

impl SignedEdgeId {
    pub fn new(edge: EdgeId, forward: bool) -> Self {
        debug_assert!(edge.0 > 0);
        Self(if forward { edge.0 } else { -edge.0 })
    }

    pub fn from_raw(raw: i64) -> Self {
        debug_assert!(raw != 0);
        Self(raw)
    }

    pub fn edge_id(&self) -> EdgeId {
        EdgeId(self.0.abs())
    }

    pub fn is_forward(&self) -> bool {
        self.0 > 0
    }

    pub fn raw(&self) -> i64 {
        self.0
    }

    pub fn reversed(&self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for SignedEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.0 > 0 { "+" } else { "-" }, self.0.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_edge_roundtrip() {
        let e = EdgeId(5);
        let fwd = SignedEdgeId::new(e, true);
        let rev = SignedEdgeId::new(e, false);
        assert_eq!(fwd.edge_id(), e);
        assert_eq!(rev.edge_id(), e);
        assert!(fwd.is_forward());
        assert!(!rev.is_forward());
        assert_eq!(fwd.reversed(), rev);
    }

    #[test]
    fn test_universe_face() {
        assert!(FaceId::UNIVERSE.is_universe());
        assert!(!FaceId(1).is_universe());
    }
}
