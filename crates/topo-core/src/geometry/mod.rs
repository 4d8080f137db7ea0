pub mod point;
pub mod vector;
pub mod line;
pub mod polygon;

pub use line::BoundingBox;
pub use point::Point2d;
pub use polygon::Polygon;
pub use vector::Vec2;
