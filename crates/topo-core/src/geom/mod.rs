//! The geometry kernel boundary.
//!
//! Low-level 2D vector algebra (distance, intersection, stroking, WKT/WKB
//! I/O, coordinate reprojection) is deliberately kept out of the topology
//! algebra itself: [`GeometryKernel`] is exactly the operation list the
//! editors and inserters need from a geometry engine, so a production
//! robust-geometry implementation can be swapped in behind the trait.
//! [`mock::EuclideanKernel`] is a dependency-free reference implementation
//! used by tests and usable in-process callers, not a production-grade
//! robust-geometry engine.

pub mod mock;

use crate::error::TopoError;
use crate::geometry::line::Line2d;
use crate::geometry::point::Point2d;
use crate::geometry::polygon::Polygon;

/// Classification of how two edge geometries relate, as a Rust-native enum
/// rather than a DE-9IM pattern string (`1FFF*FFF2`, `T********`, ...) —
/// the editors only ever need the four outcomes it distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingRelation {
    /// No shared interior points.
    Disjoint,
    /// Interiors cross transversally (DE-9IM `T********`).
    Cross,
    /// Interiors overlap along a sub-line (DE-9IM `1********`, not equal).
    Overlap,
    /// The two lines are coincident (DE-9IM `1FFF*FFF2`).
    Coincident,
}

/// The 2D predicates the topology core needs from a geometry engine:
/// distance, intersection, containment, union, difference, snap, split,
/// line-merging, point-on-surface, make-valid, build-area, simplicity,
/// azimuth, the CCW orientation test.
pub trait GeometryKernel {
    /// Is `line` simple (non-self-intersecting)?
    fn is_simple(&self, line: &Line2d) -> bool;

    /// Shortest distance from `point` to `line`.
    fn distance_point_to_line(&self, point: Point2d, line: &Line2d) -> f64;

    /// The closest point on `line` to `point` (the projection used by
    /// `AddPoint`).
    fn closest_point_on_line(&self, point: Point2d, line: &Line2d) -> Point2d;

    /// Does `line`'s *interior* (excluding its two endpoints) pass within
    /// `tol` of `point`?
    fn line_interior_near_point(&self, line: &Line2d, point: Point2d, tol: f64) -> bool;

    /// Classify the spatial relation of two edge geometries, used by the
    /// shared edge-crossing check before inserting a new edge.
    fn classify_crossing(&self, a: &Line2d, b: &Line2d, tol: f64) -> CrossingRelation;

    /// Split `line` at `point`, returning the two sub-lines in order, or
    /// `None` if `point` does not lie on `line` within tolerance.
    fn split(&self, line: &Line2d, point: Point2d, tol: f64) -> Option<(Line2d, Line2d)>;

    /// Insert vertices wherever `line` crosses itself so the result has no
    /// interior self-intersection ("self-node", spec GLOSSARY).
    fn self_node(&self, line: &Line2d) -> Result<Line2d, TopoError>;

    /// Pull `line`'s vertices onto `target` wherever they fall within
    /// `tol`.
    fn snap(&self, line: &Line2d, target: &Line2d, tol: f64) -> Line2d;

    /// Pull `line`'s vertices onto any of `targets` wherever they fall
    /// within `tol` (snap-to-many used by `AddLine` against the whole
    /// neighborhood at once).
    fn snap_many(&self, line: &Line2d, targets: &[Line2d], tol: f64) -> Line2d {
        targets.iter().fold(line.clone(), |acc, t| self.snap(&acc, t, tol))
    }

    /// Set difference `a - b` as a (possibly empty, possibly
    /// multi-component) collection of lines.
    fn difference(&self, a: &Line2d, b: &[Line2d]) -> Vec<Line2d>;

    /// Set intersection of `a` and `b` as a collection of lines/points
    /// collapsed to their line components.
    fn intersection(&self, a: &Line2d, b: &[Line2d]) -> Vec<Line2d>;

    /// Merge a collection of lines into maximal simple lines wherever
    /// endpoints touch.
    fn line_merge(&self, lines: &[Line2d]) -> Vec<Line2d>;

    /// Union of a collection of lines (node them together, no merging of
    /// colinear runs beyond what `line_merge` does).
    fn union_lines(&self, lines: Vec<Line2d>) -> Vec<Line2d>;

    /// Repair an invalid ring (e.g. a line closed by repeating its first
    /// vertex) into something that can be treated as a polygon boundary.
    fn make_valid_ring(&self, ring: &Line2d) -> Line2d;

    /// Assemble a polygon from a bag of boundary edges (`buildArea`).
    /// Returns `None` if the edges do not close into a valid area.
    fn build_area(&self, edges: &[Line2d]) -> Option<Polygon>;

    /// A point guaranteed interior to `polygon` (`PointOnSurface`).
    fn point_on_surface(&self, polygon: &Polygon) -> Point2d;

    /// Does `polygon` cover `point` (boundary counts as covering)?
    fn covers(&self, polygon: &Polygon, point: Point2d) -> bool;

    /// The azimuth (spec GLOSSARY) from `from` to `to`, in `[0, 2*PI)`.
    fn azimuth(&self, from: Point2d, to: Point2d) -> f64 {
        (to - from).azimuth()
    }

    /// `true` if `ring` is wound counter-clockwise.
    fn is_counter_clockwise(&self, ring: &Line2d) -> bool {
        ring.is_counter_clockwise()
    }
}
