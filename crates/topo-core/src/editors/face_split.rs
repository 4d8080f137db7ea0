//! `_AddFaceSplit` (spec.md §4.3.4), grounded on librttopo's
//! `_rtt_AddFaceSplit`: given a signed edge just inserted/relinked, walk
//! the ring it now bounds on its left side and decide whether that ring
//! closes a new face, shrinks/holes an existing one, or changes nothing.

use crate::backend::TopologyBackend;
use crate::editors::{fetch_edge, fetch_face};
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::handle::Topology;
use crate::model::{Face, FaceId, SignedEdgeId};

/// The result of attempting a face split along one ring.
pub(crate) enum FaceSplitOutcome {
    /// The ring walk found the reverse of the starting edge before
    /// closing: both sides of the new edge lie on the same ring, so no
    /// face is created or changed.
    NoSplit,
    /// The ring closed but no face was created (the ring's left side is
    /// still the universe, or only an existing face's MBR was refreshed).
    NoFaceCreated,
    NewFace(FaceId),
}

/// Walk the ring starting at `signed_edge` via the back end's
/// `get_ring_edges`, and either:
/// - detect it is not a real ring (reverse of `signed_edge` appears in it)
///   and report [`FaceSplitOutcome::NoSplit`];
/// - refresh `face`'s MBR in place when `mbr_only` and the ring is a
///   counter-clockwise shrink of a real face;
/// - or insert a brand-new face row, reassign the ring's edges (and any
///   edges/nodes interior to it) to the new face, and report
///   [`FaceSplitOutcome::NewFace`].
pub(crate) fn add_face_split<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    signed_edge: SignedEdgeId,
    face: FaceId,
    mbr_only: bool,
) -> Result<FaceSplitOutcome, TopoError> {
    let ring = topo.backend().get_ring_edges(signed_edge, None)?;
    if ring.iter().any(|&s| s == signed_edge.reversed()) {
        return Ok(FaceSplitOutcome::NoSplit);
    }

    let mut ring_line: Option<Line2d> = None;
    for &signed in &ring {
        let edge = fetch_edge(topo, signed.edge_id())?;
        let piece = if signed.is_forward() {
            edge.geom.clone()
        } else {
            edge.geom.reversed()
        };
        ring_line = Some(match ring_line {
            None => piece,
            Some(acc) => acc.join(&piece),
        });
    }
    let ring_line = ring_line.ok_or_else(|| TopoError::corrupted("empty ring in face split"))?;
    let is_ccw = topo.geom().is_counter_clockwise(&ring_line);
    let ring_mbr = ring_line.bounding_box();

    if face.is_universe() && !is_ccw {
        // The left face of this clockwise ring is still the universe; the
        // other side's call (on -signed_edge) will create the face.
        return Ok(FaceSplitOutcome::NoFaceCreated);
    }

    if mbr_only && !face.is_universe() {
        if is_ccw {
            let mut f = fetch_face(topo, face)?;
            f.mbr = ring_mbr;
            topo.backend_mut().update_faces_by_id(vec![f])?;
        }
        return Ok(FaceSplitOutcome::NoFaceCreated);
    }

    // A clockwise ring inside a real face is a hole: the old face's MBR
    // survives unchanged (a hole never grows the outer boundary). Any
    // other case (ccw ring shrinking a real face, or ccw ring closing a
    // face out of the universe) takes the ring's own bbox.
    let hole_in_real_face = !face.is_universe() && !is_ccw;
    let new_face_mbr = if hole_in_real_face {
        fetch_face(topo, face)?.mbr
    } else {
        ring_mbr
    };

    let new_face_id = topo
        .backend_mut()
        .insert_faces(vec![Face { face_id: FaceId(0), mbr: new_face_mbr }])?[0];

    // When the ring carved a hole, the new face sits *outside* the ring
    // (the hole is removed from it); otherwise the new face is the ring's
    // interior.
    let newface_outside = hole_in_real_face;

    reassign_ring_sides(topo, &ring, new_face_id)?;
    rebind_interior_edges(topo, face, new_face_id, &ring_line, newface_outside)?;
    rebind_interior_nodes(topo, face, new_face_id, &ring_line, newface_outside)?;

    Ok(FaceSplitOutcome::NewFace(new_face_id))
}

/// The ring's own edges always take the new face on the side the ring was
/// walked (forward signed ids get it on the left, backward on the right).
fn reassign_ring_sides<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    ring: &[SignedEdgeId],
    new_face: FaceId,
) -> Result<(), TopoError> {
    let mut updates = Vec::with_capacity(ring.len());
    for &signed in ring {
        let mut edge = fetch_edge(topo, signed.edge_id())?;
        if signed.is_forward() {
            edge.face_left = new_face;
        } else {
            edge.face_right = new_face;
        }
        updates.push(edge);
    }
    topo.backend_mut().update_edges_by_id(updates)
}

/// Scan every other edge still bound by the old face within the new
/// face's MBR and rebind whichever side used to point at `face` to
/// `new_face`, if an interior point of that edge is (or is not, when the
/// new face sits outside the ring) contained in the ring.
fn rebind_interior_edges<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    face: FaceId,
    new_face: FaceId,
    ring_line: &Line2d,
    newface_outside: bool,
) -> Result<(), TopoError> {
    let new_face_mbr = ring_line.bounding_box();
    let candidates = topo
        .backend()
        .get_edge_by_face(&[face], crate::model::EdgeFields::ALL, Some(new_face_mbr))?;

    let polygon = crate::geometry::polygon::Polygon::new(ring_line.clone(), vec![]);
    let mut updates = Vec::new();
    for mut edge in candidates {
        if edge.face_left != face && edge.face_right != face {
            continue;
        }
        let interior = interior_point(&edge.geom);
        let contained = topo.geom().covers(&polygon, interior);
        let belongs_to_new_face = contained != newface_outside;
        if !belongs_to_new_face {
            continue;
        }
        let mut changed = false;
        if edge.face_left == face {
            edge.face_left = new_face;
            changed = true;
        }
        if edge.face_right == face {
            edge.face_right = new_face;
            changed = true;
        }
        if changed {
            updates.push(edge);
        }
    }
    if updates.is_empty() {
        Ok(())
    } else {
        topo.backend_mut().update_edges_by_id(updates)
    }
}

/// Move isolated nodes contained (or not contained, mirroring the edge
/// case) in the new ring from `face` to `new_face`.
fn rebind_interior_nodes<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    face: FaceId,
    new_face: FaceId,
    ring_line: &Line2d,
    newface_outside: bool,
) -> Result<(), TopoError> {
    let new_face_mbr = ring_line.bounding_box();
    let candidates = topo
        .backend()
        .get_node_by_face(&[face], crate::model::NodeFields::ALL, Some(new_face_mbr))?;

    let polygon = crate::geometry::polygon::Polygon::new(ring_line.clone(), vec![]);
    let mut updates = Vec::new();
    for mut node in candidates {
        let contained = topo.geom().covers(&polygon, node.geom);
        if contained == newface_outside {
            continue;
        }
        node.containing_face = Some(new_face);
        updates.push(node);
    }
    if updates.is_empty() {
        Ok(())
    } else {
        topo.backend_mut().update_nodes_by_id(updates)
    }
}

/// A representative point on `line`'s interior, away from either endpoint,
/// robust to short (2-point) lines.
fn interior_point(line: &Line2d) -> crate::geometry::point::Point2d {
    let pts = line.points();
    if pts.len() >= 3 {
        pts[pts.len() / 2]
    } else {
        pts[0].midpoint(&pts[1])
    }
}
