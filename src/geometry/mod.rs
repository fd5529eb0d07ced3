//! Geometric primitives shared by the slicer and the fracture planner

mod bounds;
mod plane;
mod transform;

pub use bounds::Bounds;
pub use plane::Plane;
pub use transform::Transform;
