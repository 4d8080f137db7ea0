//! `AddPolygon`: node every ring into the topology via `AddLine`, then
//! report which faces the input polygon ends up covering.

use crate::backend::TopologyBackend;
use crate::error::TopoError;
use crate::face::get_face_geometry;
use crate::geom::GeometryKernel;
use crate::geometry::polygon::Polygon;
use crate::handle::Topology;
use crate::model::{FaceFields, FaceId};

use super::add_line::add_line;

/// Node every ring of `polygon` into the topology, then return the ids of
/// every face the polygon covers (a point on each candidate face's
/// surface is tested against the input polygon, not the other way
/// around).
#[tracing::instrument(skip(topo, polygon))]
pub fn add_polygon<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    polygon: Polygon,
    tol: Option<f64>,
) -> Result<Vec<FaceId>, TopoError> {
    topo.check_interrupted()?;
    let resolved_tol = tol.unwrap_or_else(|| {
        topo.tolerance().resolve(
            polygon
                .outer
                .points()
                .iter()
                .copied()
                .chain(polygon.holes.iter().flat_map(|h| h.points().iter().copied())),
        )
    });

    add_line(topo, polygon.outer.clone(), Some(resolved_tol))?;
    for hole in &polygon.holes {
        add_line(topo, hole.clone(), Some(resolved_tol))?;
    }

    let bbox = polygon.bounding_box().expanded_by(resolved_tol);
    let mut covered = Vec::new();
    for face in topo.backend().get_face_within_box2d(bbox, FaceFields::ALL, None)? {
        if face.face_id.is_universe() {
            continue;
        }
        let geometry = get_face_geometry(topo, face.face_id)?;
        let sample = topo.geom().point_on_surface(&geometry);
        if topo.geom().covers(&polygon, sample) {
            covered.push(face.face_id);
        }
    }
    Ok(covered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::line::Line2d;
    use crate::geometry::point::Point2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Line2d {
        Line2d::new(vec![
            Point2d::new(x0, y0),
            Point2d::new(x1, y0),
            Point2d::new(x1, y1),
            Point2d::new(x0, y1),
            Point2d::new(x0, y0),
        ])
    }

    #[test]
    fn test_add_polygon_creates_a_face_and_reports_it_covered() {
        let mut topo = fresh();
        let polygon = Polygon::new(square(0.0, 0.0, 10.0, 10.0), vec![]);
        let faces = add_polygon(&mut topo, polygon, Some(0.01)).unwrap();
        assert_eq!(faces.len(), 1);
        assert_ne!(faces[0], FaceId::UNIVERSE);
    }
}
