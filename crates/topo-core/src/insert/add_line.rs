//! `AddLine`: node the input against the existing topology within
//! tolerance, then add one edge per resulting component, reusing a
//! coincident edge's id where one already exists.

use crate::backend::TopologyBackend;
use crate::editors::add_edge_mod_face;
use crate::error::TopoError;
use crate::geom::{CrossingRelation, GeometryKernel};
use crate::geometry::line::{BoundingBox, Line2d};
use crate::handle::Topology;
use crate::model::{EdgeFields, EdgeId};

use super::add_point::add_point;

/// Node `line` against the topology's existing edges/nodes and add one
/// edge per resulting component, returning their ids in encounter order.
/// Not deduplicated: a pathological snap/difference/intersect sequence can
/// produce two components that coincide with the same existing edge, and
/// both occurrences are returned.
#[tracing::instrument(skip(topo, line))]
pub fn add_line<B: TopologyBackend, G: GeometryKernel>(
    topo: &mut Topology<B, G>,
    line: Line2d,
    tol: Option<f64>,
) -> Result<Vec<EdgeId>, TopoError> {
    topo.check_interrupted()?;
    let tol = tol.unwrap_or_else(|| topo.tolerance().resolve(line.points().iter().copied()));

    let self_noded = topo.geom().self_node(&line)?;

    let noded = node_against_topology(topo, &self_noded, tol)?;
    let components = split_at_topology_nodes(topo, &noded, tol)?;

    let mut edge_ids = Vec::new();
    for component in components {
        topo.check_interrupted()?;
        let component = make_valid_line(&component);
        let Some(component) = component else { continue };

        let start = add_point(topo, component.first(), Some(tol))?;
        let end = add_point(topo, component.last(), Some(tol))?;

        let start_row = crate::editors::fetch_node(topo, start)?;
        let end_row = crate::editors::fetch_node(topo, end)?;
        let mut pts = component.points().to_vec();
        *pts.first_mut().unwrap() = start_row.geom;
        *pts.last_mut().unwrap() = end_row.geom;
        let Some(component) = make_valid_line(&Line2d::new(pts)) else { continue };

        if let Some(existing) = find_coincident_edge(topo, start, &component, tol)? {
            edge_ids.push(existing);
            continue;
        }

        let edge_id = add_edge_mod_face(topo, start, end, component, false)?;
        edge_ids.push(edge_id);
    }

    Ok(edge_ids)
}

/// Fold `line` against every existing edge within `tol` of it: snap onto
/// their union, split off the pieces that coincide (already topology, via
/// `intersection`) from the pieces that don't (`difference`), line-merge
/// the coincident pieces, and union everything back together.
fn node_against_topology<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    line: &Line2d,
    tol: f64,
) -> Result<Vec<Line2d>, TopoError> {
    let bbox = line.bounding_box().expanded_by(tol);
    let neighbors: Vec<Line2d> = topo
        .backend()
        .get_edge_within_box2d(bbox, EdgeFields::ALL, None)?
        .into_iter()
        .map(|e| e.geom)
        .filter(|g| {
            g.points()
                .iter()
                .any(|p| topo.geom().distance_point_to_line(*p, line) <= tol)
                || line
                    .points()
                    .iter()
                    .any(|p| topo.geom().distance_point_to_line(*p, g) <= tol)
        })
        .collect();

    if neighbors.is_empty() {
        return Ok(vec![line.clone()]);
    }

    let snapped = topo.geom().snap_many(line, &neighbors, tol);
    let difference = topo.geom().difference(&snapped, &neighbors);
    let intersection = topo.geom().intersection(&snapped, &neighbors);
    let merged_intersection = topo.geom().line_merge(&intersection);

    let mut combined = difference;
    combined.extend(merged_intersection);
    Ok(topo.geom().union_lines(combined))
}

/// Split every noded piece at every existing node within `tol`, then
/// line-merge to remove any resulting fragment artifacts.
fn split_at_topology_nodes<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    pieces: &[Line2d],
    tol: f64,
) -> Result<Vec<Line2d>, TopoError> {
    let mut bbox = BoundingBox::empty();
    for piece in pieces {
        bbox = bbox.union(&piece.bounding_box());
    }
    bbox = bbox.expanded_by(tol);

    let node_points: Vec<_> = topo
        .backend()
        .get_node_within_box2d(bbox, crate::model::NodeFields::ALL, None)?
        .into_iter()
        .map(|n| n.geom)
        .collect();

    let mut out = Vec::new();
    for piece in pieces {
        let mut fragments = vec![piece.clone()];
        for point in &node_points {
            let mut next = Vec::new();
            for fragment in fragments {
                match topo.geom().split(&fragment, *point, tol) {
                    Some((head, tail)) => {
                        next.push(head);
                        next.push(tail);
                    }
                    None => next.push(fragment),
                }
            }
            fragments = next;
        }
        out.extend(fragments);
    }
    Ok(topo.geom().union_lines(out))
}

/// Drop consecutive duplicate vertices, collapsing degenerate cases;
/// `None` if fewer than two distinct points remain.
fn make_valid_line(line: &Line2d) -> Option<Line2d> {
    let mut pts = Vec::with_capacity(line.len());
    for p in line.points() {
        if pts.last().map(|last: &crate::geometry::point::Point2d| last.exactly_eq(p)).unwrap_or(false) {
            continue;
        }
        pts.push(*p);
    }
    if pts.len() < 2 {
        None
    } else {
        Some(Line2d::new(pts))
    }
}

/// An existing edge incident to `start` whose geometry is coincident with
/// `component` within `tol`, if any — reused rather than duplicated.
fn find_coincident_edge<B: TopologyBackend, G: GeometryKernel>(
    topo: &Topology<B, G>,
    start: crate::model::NodeId,
    component: &Line2d,
    tol: f64,
) -> Result<Option<EdgeId>, TopoError> {
    for edge in topo.backend().get_edge_by_node(&[start], EdgeFields::ALL)? {
        if topo.geom().classify_crossing(&edge.geom, component, tol) == CrossingRelation::Coincident {
            return Ok(Some(edge.edge_id));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::InMemoryBackend;
    use crate::editors::fetch_edge;
    use crate::geom::mock::EuclideanKernel;
    use crate::geometry::point::Point2d;

    fn fresh() -> Topology<InMemoryBackend, EuclideanKernel> {
        Topology::load("t", InMemoryBackend::default(), EuclideanKernel::new()).unwrap()
    }

    #[test]
    fn test_add_line_in_empty_topology_creates_one_edge() {
        let mut topo = fresh();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        let edges = add_line(&mut topo, line, Some(0.01)).unwrap();
        assert_eq!(edges.len(), 1);
        let edge = fetch_edge(&topo, edges[0]).unwrap();
        assert_eq!(edge.geom.first(), Point2d::new(0.0, 0.0));
        assert_eq!(edge.geom.last(), Point2d::new(10.0, 0.0));
    }

    #[test]
    fn test_add_line_twice_reuses_existing_edge() {
        let mut topo = fresh();
        let line = Line2d::new(vec![Point2d::new(0.0, 0.0), Point2d::new(10.0, 0.0)]);
        let first = add_line(&mut topo, line.clone(), Some(0.01)).unwrap();
        let second = add_line(&mut topo, line, Some(0.01)).unwrap();
        assert_eq!(first, second);
    }
}
