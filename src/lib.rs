//! Real-time Voronoi-style mesh fracture
//!
//! A standalone library that breaks a closed triangle mesh into fragments
//! around an impact point, suitable for use with any game engine (Bevy,
//! Godot, etc.). Fracture runs synchronously in a single call.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voronoi_fracture::*;
//!
//! // Configure the fracture service
//! let config = FractureConfigBuilder::new()
//!     .shard_count(12).unwrap()
//!     .fracture_radius(0.75).unwrap()
//!     .seed(42)
//!     .build().unwrap();
//! let shatter = VoronoiShatter::new(config);
//!
//! // Describe the object being hit
//! let source = FractureSource::new(1, "Crate", mesh::primitives::unit_cube(), "wood")
//!     .with_tag("Destructible");
//!
//! // Break it and hand the pieces to the engine
//! let fragments = shatter.shatter(&source, Vec3::new(0.5, 0.1, 0.0)).unwrap();
//! for fragment in &fragments {
//!     let data = fragment.mesh.to_mesh_data();
//!     println!("{}: {} triangles, mass {:.2}", fragment.label, data.triangle_count(), fragment.body.mass);
//! }
//! ```
//!
//! # Layers
//!
//! - [`generation`]: jittered grid seeds around the impact
//! - [`slicing`]: plane cuts with capping
//! - [`mesh`]: triangle meshes and the degenerate-free builder
//! - [`fracture`]: the fracture loop, colliders and rigid-body hints
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and geometry

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod mesh;
pub mod slicing;
pub mod generation;
pub mod fracture;

// Re-export core types for convenience
pub use error::{FractureError, Result};
pub use config::{FractureConfig, FractureConfigBuilder, FragmentThresholds};
pub use geometry::{Bounds, Plane, Transform};
pub use mesh::{MeshBuilder, MeshData, TriangleMesh};
pub use slicing::{slice_mesh, slice_mesh_with, SliceOptions, SlicedMesh};
pub use generation::{blocky_seeds, generate_blocky_seeds};
pub use fracture::{
    ColliderDecision, ColliderShape, Fragment, FragmentKind, FragmentSink, FractureReport, FracturePolicy,
    FractureSource, RigidBodySetup, VoronoiShatter,
};

// Re-export glam types used throughout the API
pub use glam::{Affine3A, Quat, Vec2, Vec3};
