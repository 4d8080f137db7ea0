use serde::{Deserialize, Serialize};

use super::ids::FaceId;
use crate::geometry::line::BoundingBox;

/// A face row. The universe (`FaceId::UNIVERSE`) is never stored — callers
/// that need to refer to the universe's MBR get `None`; it has no geometry
/// and no MBR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub face_id: FaceId,
    pub mbr: BoundingBox,
}

impl Face {
    pub fn new(face_id: FaceId, mbr: BoundingBox) -> Self {
        debug_assert!(!face_id.is_universe(), "the universe face is never a stored row");
        Self { face_id, mbr }
    }
}
