//! Column selectors: a bitmask of which fields to read/write. Editors
//! never fetch more than they need; this is a contract with the back end,
//! not an optimization the core performs itself.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFields: u8 {
        const NODE_ID         = 0b0000_0001;
        const CONTAINING_FACE = 0b0000_0010;
        const GEOM            = 0b0000_0100;
        const ALL = Self::NODE_ID.bits() | Self::CONTAINING_FACE.bits() | Self::GEOM.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EdgeFields: u16 {
        const EDGE_ID    = 0b0000_0000_0001;
        const START_NODE = 0b0000_0000_0010;
        const END_NODE   = 0b0000_0000_0100;
        const FACE_LEFT  = 0b0000_0000_1000;
        const FACE_RIGHT = 0b0000_0001_0000;
        const NEXT_LEFT  = 0b0000_0010_0000;
        const NEXT_RIGHT = 0b0000_0100_0000;
        const GEOM       = 0b0000_1000_0000;
        const ALL = Self::EDGE_ID.bits()
            | Self::START_NODE.bits()
            | Self::END_NODE.bits()
            | Self::FACE_LEFT.bits()
            | Self::FACE_RIGHT.bits()
            | Self::NEXT_LEFT.bits()
            | Self::NEXT_RIGHT.bits()
            | Self::GEOM.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FaceFields: u8 {
        const FACE_ID = 0b0000_0001;
        const MBR     = 0b0000_0010;
        const ALL = Self::FACE_ID.bits() | Self::MBR.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_named_field() {
        assert!(NodeFields::ALL.contains(NodeFields::GEOM));
        assert!(EdgeFields::ALL.contains(EdgeFields::NEXT_RIGHT));
        assert!(FaceFields::ALL.contains(FaceFields::MBR));
    }
}
