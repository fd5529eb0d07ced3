//! Seed generation for fracture planning
//!
//! Produces approximate Voronoi cell centers around an impact. The cells are
//! never built explicitly: each seed only defines one bisecting cut plane.

mod blocky;

pub use blocky::{blocky_seeds, generate_blocky_seeds, DEFAULT_JITTER, MIN_AXIS_SIZE};
