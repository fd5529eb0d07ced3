//! Fracture planning and fragment instantiation
//!
//! [`VoronoiShatter`] cuts a [`FractureSource`] into shards around an impact
//! and hands every surviving piece, wrapped as a [`Fragment`] with collider
//! and rigid-body hints, to a [`FragmentSink`].

mod collider;
mod fragment;
mod policy;
mod shatter;

pub use collider::{
    build_box, build_convex_hull, is_hull_eligible, select_collider, BoxShape, ColliderDecision, ColliderShape,
    ConvexHullShape,
};
pub use fragment::{
    check_fragment_mesh, create_fragment, estimate_mass, try_create_fragment, CollisionDetection, EntityId, Fragment,
    FragmentKind, FragmentRejection, FractureSource, RigidBodySetup,
};
pub use policy::{FracturePolicy, DEFAULT_PROTECTED_TAGS};
pub use shatter::{FractureReport, FragmentSink, VoronoiShatter};
