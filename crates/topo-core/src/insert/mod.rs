//! Geometry-driven inserters.
//!
//! `AddPoint`/`AddLine`/`AddPolygon` snap input geometry to whatever
//! already exists in the topology within a tolerance, then delegate the
//! actual bookkeeping to the low-level editors ([`crate::editors`]).

mod add_line;
mod add_point;
mod add_polygon;
mod lookup;

pub use add_line::add_line;
pub use add_point::add_point;
pub use add_polygon::add_polygon;
pub use lookup::{get_edge_by_point, get_node_by_point};
