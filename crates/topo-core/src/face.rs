//! Face reconstruction (component C6, spec.md §4.4): turning the edge
//! table's `face_left`/`face_right` linkage back into polygon geometry, and
//! back again into the signed edge sequence that produced it.

use crate::backend::TopologyBackend;
use crate::editors::fetch_face;
use crate::error::TopoError;
use crate::geom::GeometryKernel;
use crate::geometry::line::Line2d;
use crate::geometry::polygon::Polygon;
use crate::handle::Topology;
use crate::model::{Edge, EdgeFields, FaceId, SignedEdgeId};

/// `GetFaceGeometry(face_id)`: assemble every edge bounding `face_id` into
/// a polygon via the geometry kernel's `buildArea`.
pub fn get_face_geometry<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    face_id: FaceId,
) -> Result<Polygon, TopoError> {
    if face_id.is_universe() {
        return Err(TopoError::UniverseHasNoGeometry);
    }
    fetch_face(topo, face_id)?;
    let edges = topo.backend().get_edge_by_face(&[face_id], EdgeFields::ALL, None)?;
    let lines: Vec<Line2d> = edges.iter().map(|e| e.geom.clone()).collect();
    topo.geom().build_area(&lines).ok_or_else(|| {
        TopoError::corrupted(format!("face {face_id} edges do not close into an area"))
    })
}

/// `GetFaceEdges(face_id)`: the signed edge sequence bounding each ring of
/// `face_id`'s reconstructed geometry, outer ring forced clockwise and
/// holes counter-clockwise, each ring rotated so its numerically smallest
/// absolute edge id comes first (spec.md §4.4).
pub fn get_face_edges<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    face_id: FaceId,
) -> Result<Vec<Vec<SignedEdgeId>>, TopoError> {
    let polygon = get_face_geometry(topo, face_id)?;
    let edges = topo.backend().get_edge_by_face(&[face_id], EdgeFields::ALL, None)?;

    let mut rings: Vec<Line2d> = Vec::with_capacity(polygon.holes.len() + 1);
    rings.push(if polygon.outer.is_counter_clockwise() {
        polygon.outer.reversed()
    } else {
        polygon.outer.clone()
    });
    for hole in &polygon.holes {
        rings.push(if hole.is_counter_clockwise() {
            hole.clone()
        } else {
            hole.reversed()
        });
    }

    let mut out = Vec::with_capacity(rings.len());
    for ring in &rings {
        let tol = topo.tolerance().resolve(ring.points().iter().copied());
        out.push(match_ring_to_edges(&edges, face_id, ring, tol)?);
    }
    Ok(out)
}

/// Greedily walk `ring`'s point sequence, consuming edges whose geometry
/// matches the next stretch of points (forward or reversed), skipping
/// dangles (`face_left == face_right`, which never bound a face on both
/// sides of themselves).
fn match_ring_to_edges(
    edges: &[Edge],
    face_id: FaceId,
    ring: &Line2d,
    tol: f64,
) -> Result<Vec<SignedEdgeId>, TopoError> {
    let pts = ring.points();
    let mut cursor = 0usize;
    let mut sequence = Vec::new();
    let guard_limit = edges.len() + 1;
    let mut guard = 0;

    while cursor < pts.len() - 1 {
        guard += 1;
        if guard > guard_limit {
            return Err(TopoError::corrupted(format!("face {face_id} ring did not close")));
        }
        let remaining = pts.len() - cursor;
        let mut found = None;
        for edge in edges {
            if edge.face_left == edge.face_right {
                continue;
            }
            let glen = edge.geom.len();
            if glen == 0 || glen > remaining {
                continue;
            }
            let window = &pts[cursor..cursor + glen];
            let forward_matches = window
                .iter()
                .zip(edge.geom.points())
                .all(|(a, b)| a.within(b, tol));
            let reversed_matches = !forward_matches
                && window
                    .iter()
                    .zip(edge.geom.reversed().points())
                    .all(|(a, b)| a.within(b, tol));
            if forward_matches || reversed_matches {
                let signed = SignedEdgeId::new(edge.edge_id, edge.face_left == face_id);
                found = Some((signed, glen));
                break;
            }
        }
        let (signed, glen) = found.ok_or_else(|| {
            TopoError::corrupted(format!("no edge matches ring segment of face {face_id}"))
        })?;
        sequence.push(signed);
        cursor += glen - 1;
    }

    if let Some(min_pos) = sequence
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| s.edge_id().0)
        .map(|(i, _)| i)
    {
        sequence.rotate_left(min_pos);
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::{add_edge_mod_face, add_iso_node};
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::point::Point2d;
    use crate::model::NodeId;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_universe_has_no_geometry() {
        let topo = fresh();
        assert!(matches!(
            get_face_geometry(&topo, FaceId::UNIVERSE),
            Err(TopoError::UniverseHasNoGeometry)
        ));
    }

    #[test]
    fn test_triangle_face_geometry_round_trips_through_face_edges() {
        let mut topo = fresh();
        let n1 = add_iso_node(&mut topo, Some(FaceId::UNIVERSE), Point2d::new(0.0, 0.0), false).unwrap();
        let n2 = add_iso_node(&mut topo, Some(FaceId::UNIVERSE), Point2d::new(10.0, 0.0), false).unwrap();
        let n3 = add_iso_node(&mut topo, Some(FaceId::UNIVERSE), Point2d::new(5.0, 8.0), false).unwrap();
        let line = |a: NodeId, b: NodeId, pts: &[(f64, f64)]| {
            let _ = (a, b);
            Line2d::new(pts.iter().map(|&(x, y)| Point2d::new(x, y)).collect())
        };
        add_edge_mod_face(
            &mut topo,
            n1,
            n2,
            line(n1, n2, &[(0.0, 0.0), (10.0, 0.0)]),
            false,
        )
        .unwrap();
        add_edge_mod_face(
            &mut topo,
            n2,
            n3,
            line(n2, n3, &[(10.0, 0.0), (5.0, 8.0)]),
            false,
        )
        .unwrap();
        add_edge_mod_face(
            &mut topo,
            n3,
            n1,
            line(n3, n1, &[(5.0, 8.0), (0.0, 0.0)]),
            false,
        )
        .unwrap();

        let huge = crate::geometry::line::BoundingBox {
            min: Point2d::new(-1e9, -1e9),
            max: Point2d::new(1e9, 1e9),
        };
        let faces = topo
            .backend()
            .get_face_within_box2d(huge, crate::model::FaceFields::ALL, None)
            .unwrap();
        let real_face = faces
            .into_iter()
            .find(|f| !f.face_id.is_universe())
            .expect("triangle should have created a real face");

        let rings = get_face_edges(&topo, real_face.face_id).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 3);
    }
}
