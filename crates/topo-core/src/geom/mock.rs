//! [`EuclideanKernel`]: a dependency-free reference [`GeometryKernel`].
//!
//! Exact (non-robust) double-precision arithmetic throughout. Good enough
//! for the straight-line, modestly-sized geometries exercised by this
//! crate's own tests and by small embeddings; a production deployment
//! swaps in a real robust-geometry engine (GEOS bindings and similar)
//! behind the same trait.

use super::{CrossingRelation, GeometryKernel};
use crate::error::TopoError;
use crate::geometry::line::Line2d;
use crate::geometry::point::Point2d;
use crate::geometry::polygon::Polygon;
use crate::geometry::vector::Vec2;

#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanKernel;

impl EuclideanKernel {
    pub fn new() -> Self {
        Self
    }
}

/// Closest point on segment `a`-`b` to `p`, with the parametric `t` along
/// the segment (clamped to `[0, 1]`).
fn closest_on_segment(p: Point2d, a: Point2d, b: Point2d) -> (Point2d, f64, f64) {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < 1e-300 {
        return (a, 0.0, p.distance_to(&a));
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (closest, t, p.distance_to(&closest))
}

fn orient(a: Point2d, b: Point2d, c: Point2d) -> f64 {
    Vec2::new(b.x - a.x, b.y - a.y).cross(&Vec2::new(c.x - a.x, c.y - a.y))
}

fn on_segment(a: Point2d, b: Point2d, p: Point2d, tol: f64) -> bool {
    let (_, t, d) = closest_on_segment(p, a, b);
    d <= tol && t > -1e-9 && t < 1.0 + 1e-9
}

/// Classify how two closed segments relate: do they cross at interior
/// points, overlap collinearly, share only an endpoint, or not meet at all?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegRelation {
    None,
    TouchEndpoint,
    Cross,
    Overlap,
}

fn segment_relation(p1: Point2d, p2: Point2d, q1: Point2d, q2: Point2d, tol: f64) -> SegRelation {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    let collinear = d1.abs() <= tol && d2.abs() <= tol && d3.abs() <= tol && d4.abs() <= tol;
    if collinear {
        // Overlap test via 1D projection onto the shared line.
        let dir = p2 - p1;
        let len2 = dir.length_squared();
        if len2 < 1e-300 {
            return if p1.within(&q1, tol) || p1.within(&q2, tol) {
                SegRelation::TouchEndpoint
            } else {
                SegRelation::None
            };
        }
        let param = |pt: Point2d| (pt - p1).dot(&dir) / len2;
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        let (a, b) = (param(q1), param(q2));
        let (qlo, qhi) = (a.min(b), a.max(b));
        if qhi < lo - 1e-9 || qlo > hi + 1e-9 {
            return SegRelation::None;
        }
        lo = lo.max(qlo);
        hi = hi.min(qhi);
        if hi - lo > 1e-9 {
            return SegRelation::Overlap;
        }
        return SegRelation::TouchEndpoint;
    }

    let straddle_pq = (d1 > tol && d2 < -tol) || (d1 < -tol && d2 > tol);
    let straddle_qp = (d3 > tol && d4 < -tol) || (d3 < -tol && d4 > tol);
    if straddle_pq && straddle_qp {
        return SegRelation::Cross;
    }

    // Touching at a shared endpoint (one segment's endpoint lies on the
    // other within tolerance) is not a crossing.
    if on_segment(q1, q2, p1, tol)
        || on_segment(q1, q2, p2, tol)
        || on_segment(p1, p2, q1, tol)
        || on_segment(p1, p2, q2, tol)
    {
        return SegRelation::TouchEndpoint;
    }
    SegRelation::None
}

fn segments(line: &Line2d) -> impl Iterator<Item = (Point2d, Point2d)> + '_ {
    line.points().windows(2).map(|w| (w[0], w[1]))
}

impl GeometryKernel for EuclideanKernel {
    fn is_simple(&self, line: &Line2d) -> bool {
        let pts = line.points();
        let n = pts.len();
        if n < 2 {
            return false;
        }
        for i in 0..n - 1 {
            for j in (i + 1)..n - 1 {
                if j == i + 1 {
                    continue; // adjacent segments legitimately share a vertex
                }
                // The closing segment of a closed ring shares both
                // endpoints with the first segment; that's expected.
                if line.is_closed() && i == 0 && j == n - 2 {
                    continue;
                }
                let rel = segment_relation(pts[i], pts[i + 1], pts[j], pts[j + 1], 1e-9);
                if matches!(rel, SegRelation::Cross | SegRelation::Overlap) {
                    return false;
                }
            }
        }
        true
    }

    fn distance_point_to_line(&self, point: Point2d, line: &Line2d) -> f64 {
        segments(line)
            .map(|(a, b)| closest_on_segment(point, a, b).2)
            .fold(f64::INFINITY, f64::min)
    }

    fn closest_point_on_line(&self, point: Point2d, line: &Line2d) -> Point2d {
        segments(line)
            .map(|(a, b)| closest_on_segment(point, a, b))
            .min_by(|x, y| x.2.partial_cmp(&y.2).unwrap())
            .map(|(p, _, _)| p)
            .unwrap_or_else(|| line.first())
    }

    fn line_interior_near_point(&self, line: &Line2d, point: Point2d, tol: f64) -> bool {
        let closest = self.closest_point_on_line(point, line);
        if self.distance_point_to_line(point, line) > tol {
            return false;
        }
        !closest.within(&line.first(), tol) && !closest.within(&line.last(), tol)
    }

    fn classify_crossing(&self, a: &Line2d, b: &Line2d, tol: f64) -> CrossingRelation {
        let same_forward = a.points().len() == b.points().len()
            && a.points().iter().zip(b.points()).all(|(x, y)| x.within(y, tol));
        let same_reversed = a.points().len() == b.points().len()
            && a.points().iter().zip(b.reversed().points()).all(|(x, y)| x.within(y, tol));
        if same_forward || same_reversed {
            return CrossingRelation::Coincident;
        }

        let mut saw_overlap = false;
        let mut saw_cross = false;
        for (p1, p2) in segments(a) {
            for (q1, q2) in segments(b) {
                match segment_relation(p1, p2, q1, q2, tol) {
                    SegRelation::Overlap => saw_overlap = true,
                    SegRelation::Cross => saw_cross = true,
                    _ => {}
                }
            }
        }
        if saw_overlap {
            CrossingRelation::Overlap
        } else if saw_cross {
            CrossingRelation::Cross
        } else {
            CrossingRelation::Disjoint
        }
    }

    fn split(&self, line: &Line2d, point: Point2d, tol: f64) -> Option<(Line2d, Line2d)> {
        let pts = line.points();
        let mut best: Option<(usize, Point2d, f64, f64)> = None;
        for (i, (a, b)) in segments(line).enumerate() {
            let (closest, t, d) = closest_on_segment(point, a, b);
            if d <= tol && best.as_ref().map(|(_, _, _, bd)| d < *bd).unwrap_or(true) {
                best = Some((i, closest, t, d));
            }
        }
        let (seg_idx, split_point, t, _) = best?;

        let mut head: Vec<Point2d> = pts[..=seg_idx].to_vec();
        let mut tail: Vec<Point2d> = pts[seg_idx + 1..].to_vec();
        if t > 1e-9 {
            head.push(split_point);
        } else {
            // split point coincides with the segment's start vertex
        }
        tail.insert(0, split_point);

        if head.len() < 2 || tail.len() < 2 {
            return None;
        }
        if head.last().unwrap().exactly_eq(&head[head.len() - 2])
            || tail[0].exactly_eq(&tail[1])
        {
            return None;
        }
        Some((Line2d::new(head), Line2d::new(tail)))
    }

    fn self_node(&self, line: &Line2d) -> Result<Line2d, TopoError> {
        if self.is_simple(line) {
            return Ok(line.clone());
        }
        // Insert a vertex at the first self-intersection found and retry;
        // sufficient for the single-crossing figure-eight inputs this mock
        // is expected to handle.
        let pts = line.points();
        let n = pts.len();
        for i in 0..n - 1 {
            for j in (i + 2)..n - 1 {
                if i == 0 && j == n - 2 {
                    continue;
                }
                if let SegRelation::Cross =
                    segment_relation(pts[i], pts[i + 1], pts[j], pts[j + 1], 1e-9)
                {
                    let (cross_point, _, _) = closest_on_segment(pts[i], pts[j], pts[j + 1]);
                    let mut out = Vec::with_capacity(n + 2);
                    out.extend_from_slice(&pts[..=i]);
                    out.push(cross_point);
                    out.extend_from_slice(&pts[i + 1..=j]);
                    out.push(cross_point);
                    out.extend_from_slice(&pts[j + 1..]);
                    return Ok(Line2d::new(out));
                }
            }
        }
        Err(TopoError::geometry_engine("self_node: could not resolve self-intersection"))
    }

    fn snap(&self, line: &Line2d, target: &Line2d, tol: f64) -> Line2d {
        let snapped: Vec<Point2d> = line
            .points()
            .iter()
            .map(|&p| {
                let closest = self.closest_point_on_line(p, target);
                if p.distance_to(&closest) <= tol {
                    closest
                } else {
                    p
                }
            })
            .collect();
        Line2d::new(snapped)
    }

    fn difference(&self, a: &Line2d, b: &[Line2d]) -> Vec<Line2d> {
        split_by_coincidence(a, b, true)
    }

    fn intersection(&self, a: &Line2d, b: &[Line2d]) -> Vec<Line2d> {
        split_by_coincidence(a, b, false)
    }

    fn line_merge(&self, lines: &[Line2d]) -> Vec<Line2d> {
        let mut remaining: Vec<Line2d> = lines.to_vec();
        let mut merged: Vec<Line2d> = Vec::new();
        'outer: while let Some(mut current) = remaining.pop() {
            loop {
                if let Some(idx) = remaining
                    .iter()
                    .position(|l| l.first().exactly_eq(&current.last()))
                {
                    let next = remaining.remove(idx);
                    current = current.join(&next);
                    continue;
                }
                if let Some(idx) = remaining
                    .iter()
                    .position(|l| l.last().exactly_eq(&current.first()))
                {
                    let prev = remaining.remove(idx);
                    current = prev.join(&current);
                    continue;
                }
                merged.push(current);
                continue 'outer;
            }
        }
        merged
    }

    fn union_lines(&self, lines: Vec<Line2d>) -> Vec<Line2d> {
        self.line_merge(&lines)
    }

    fn make_valid_ring(&self, ring: &Line2d) -> Line2d {
        if ring.is_closed() {
            ring.clone()
        } else {
            let mut pts = ring.points().to_vec();
            pts.push(ring.first());
            Line2d::new(pts)
        }
    }

    fn build_area(&self, edges: &[Line2d]) -> Option<Polygon> {
        let rings = assemble_rings(edges)?;
        if rings.is_empty() {
            return None;
        }
        let mut by_area: Vec<(f64, Line2d)> =
            rings.into_iter().map(|r| (r.signed_area().abs(), r)).collect();
        by_area.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap());
        let (_, mut outer) = by_area.remove(0);
        if !outer.is_counter_clockwise() {
            outer = outer.reversed();
        }
        let holes = by_area
            .into_iter()
            .map(|(_, r)| if r.is_counter_clockwise() { r.reversed() } else { r })
            .collect();
        Some(Polygon::new(outer, holes))
    }

    fn point_on_surface(&self, polygon: &Polygon) -> Point2d {
        polygon.point_on_surface()
    }

    fn covers(&self, polygon: &Polygon, point: Point2d) -> bool {
        polygon.contains_point(point)
            || polygon.outer.points().iter().any(|p| p.within(&point, 1e-9))
    }
}

/// Greedily chain a bag of edges (sharing exact endpoints) into closed
/// rings. Returns `None` if some edge cannot be chained into a closed ring.
fn assemble_rings(edges: &[Line2d]) -> Option<Vec<Line2d>> {
    let mut remaining: Vec<Line2d> = edges.to_vec();
    let mut rings = Vec::new();
    while !remaining.is_empty() {
        let mut current = remaining.remove(0);
        let mut guard = 0;
        while !current.first().exactly_eq(&current.last()) {
            guard += 1;
            if guard > edges.len() + 1 {
                return None;
            }
            let idx = remaining.iter().position(|e| {
                e.first().exactly_eq(&current.last()) || e.last().exactly_eq(&current.last())
            })?;
            let next = remaining.remove(idx);
            let next = if next.first().exactly_eq(&current.last()) {
                next
            } else {
                next.reversed()
            };
            current = current.join(&next);
        }
        rings.push(current);
    }
    Some(rings)
}

/// Split `a` at every point where it meets any line in `b`, and keep either
/// the pieces that are coincident with `b` (`intersection`) or the pieces
/// that are not (`difference`).
fn split_by_coincidence(a: &Line2d, b: &[Line2d], keep_non_coincident: bool) -> Vec<Line2d> {
    if b.is_empty() {
        return if keep_non_coincident { vec![a.clone()] } else { vec![] };
    }
    let kernel = EuclideanKernel::new();
    let mut pieces = vec![a.clone()];
    for other in b {
        let mut next_pieces = Vec::new();
        for piece in pieces {
            for (p1, p2) in segments(other) {
                if let Some((h, t)) = kernel.split(&piece, p1, 1e-9) {
                    next_pieces.push(h);
                    next_pieces.push(t);
                } else if let Some((h, t)) = kernel.split(&piece, p2, 1e-9) {
                    next_pieces.push(h);
                    next_pieces.push(t);
                } else {
                    next_pieces.push(piece.clone());
                }
            }
        }
        pieces = next_pieces;
    }
    pieces
        .into_iter()
        .filter(|piece| {
            let mid = piece.points()[piece.len() / 2];
            let coincident = b.iter().any(|other| kernel.distance_point_to_line(mid, other) <= 1e-7);
            coincident != keep_non_coincident
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    #[test]
    fn test_is_simple_straight_line() {
        let k = EuclideanKernel::new();
        let l = Line2d::new(vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
        assert!(k.is_simple(&l));
    }

    #[test]
    fn test_is_simple_detects_figure_eight() {
        let k = EuclideanKernel::new();
        let l = Line2d::new(vec![pt(0.0, 0.0), pt(10.0, 10.0), pt(10.0, 0.0), pt(0.0, 10.0)]);
        assert!(!k.is_simple(&l));
    }

    #[test]
    fn test_classify_crossing_cross() {
        let k = EuclideanKernel::new();
        let a = Line2d::new(vec![pt(0.0, 0.0), pt(10.0, 10.0)]);
        let b = Line2d::new(vec![pt(0.0, 10.0), pt(10.0, 0.0)]);
        assert_eq!(k.classify_crossing(&a, &b, 1e-9), CrossingRelation::Cross);
    }

    #[test]
    fn test_classify_crossing_disjoint() {
        let k = EuclideanKernel::new();
        let a = Line2d::new(vec![pt(0.0, 0.0), pt(1.0, 0.0)]);
        let b = Line2d::new(vec![pt(0.0, 5.0), pt(1.0, 5.0)]);
        assert_eq!(k.classify_crossing(&a, &b, 1e-9), CrossingRelation::Disjoint);
    }

    #[test]
    fn test_classify_crossing_shared_endpoint_is_not_a_cross() {
        let k = EuclideanKernel::new();
        let a = Line2d::new(vec![pt(0.0, 0.0), pt(5.0, 0.0)]);
        let b = Line2d::new(vec![pt(5.0, 0.0), pt(5.0, 5.0)]);
        assert_eq!(k.classify_crossing(&a, &b, 1e-9), CrossingRelation::Disjoint);
    }

    #[test]
    fn test_split_at_midpoint() {
        let k = EuclideanKernel::new();
        let l = Line2d::new(vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
        let (h, t) = k.split(&l, pt(5.0, 0.0), 1e-6).unwrap();
        assert_eq!(h.last(), pt(5.0, 0.0));
        assert_eq!(t.first(), pt(5.0, 0.0));
    }

    #[test]
    fn test_build_area_square() {
        let k = EuclideanKernel::new();
        let edges = vec![
            Line2d::new(vec![pt(0.0, 0.0), pt(10.0, 0.0)]),
            Line2d::new(vec![pt(10.0, 0.0), pt(10.0, 10.0)]),
            Line2d::new(vec![pt(10.0, 10.0), pt(0.0, 10.0)]),
            Line2d::new(vec![pt(0.0, 10.0), pt(0.0, 0.0)]),
        ];
        let poly = k.build_area(&edges).unwrap();
        assert!(poly.contains_point(pt(5.0, 5.0)));
    }

    #[test]
    fn test_line_merge_joins_touching_segments() {
        let k = EuclideanKernel::new();
        let lines = vec![
            Line2d::new(vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
            Line2d::new(vec![pt(1.0, 0.0), pt(2.0, 0.0)]),
        ];
        let merged = k.line_merge(&lines);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 3);
    }
}
