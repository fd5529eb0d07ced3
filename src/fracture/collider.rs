//! Collision shape synthesis for fragments
//!
//! Fragment geometry is unpredictable, so the collider is picked by a tiered
//! decision: a convex hull when the point set is clearly volumetric, an
//! axis-aligned box otherwise, and rejection when not even the box is valid.
//!
//! Hulls are computed with parry3d's quickhull and checked by building a
//! `ConvexPolyhedron` from the result, the same conversion a parry-based
//! physics engine performs when the collider is inserted.

use std::collections::HashSet;

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real};
use parry3d::shape::{ConvexPolyhedron, SharedShape};
use parry3d::transformation;

use crate::config::FragmentThresholds;
use crate::mesh::TriangleMesh;

/// Convex hull of a fragment's vertices, in the fragment's local frame
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHullShape {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

/// Axis-aligned box collider, in the fragment's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Collider attached to a spawned fragment
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    ConvexHull(ConvexHullShape),
    Box(BoxShape),
}

/// Outcome of [`select_collider`]
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDecision {
    ConvexHull(ConvexHullShape),
    Box(BoxShape),
    /// Neither shape could be built; the fragment must not be spawned
    Rejected,
}

impl ColliderDecision {
    /// The chosen shape, `None` when rejected
    pub fn into_shape(self) -> Option<ColliderShape> {
        match self {
            ColliderDecision::ConvexHull(hull) => Some(ColliderShape::ConvexHull(hull)),
            ColliderDecision::Box(cuboid) => Some(ColliderShape::Box(cuboid)),
            ColliderDecision::Rejected => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ColliderDecision::Rejected)
    }
}

impl ColliderShape {
    /// Convert to a parry3d shape plus its offset in the fragment's frame
    ///
    /// Returns `None` if parry refuses the hull.
    pub fn to_shared_shape(&self) -> Option<(Isometry<Real>, SharedShape)> {
        match self {
            ColliderShape::ConvexHull(hull) => {
                let points = hull.vertices.iter().map(|&v| to_point(v)).collect();
                SharedShape::convex_mesh(points, &hull.triangles).map(|shape| (Isometry::identity(), shape))
            }
            ColliderShape::Box(cuboid) => {
                let BoxShape { center, half_extents } = *cuboid;
                Some((
                    Isometry::translation(center.x, center.y, center.z),
                    SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
                ))
            }
        }
    }
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

/// Whether the mesh is safe to wrap in a convex hull
///
/// Requires enough vertices, enough thickness on every axis, and a spread of
/// vertex distances to the bounds center (all-equal distances hint at a
/// near-coplanar point set).
pub fn is_hull_eligible(mesh: &TriangleMesh, thresholds: &FragmentThresholds) -> bool {
    if mesh.vertex_count() < thresholds.min_vertex_count.max(4) {
        return false;
    }

    let bounds = mesh.bounds();
    let thinnest = bounds.size().min_element();
    if thinnest.is_nan() || thinnest < thresholds.hull_min_axis_extent {
        return false;
    }

    let center = bounds.center();
    let (min_distance, max_distance) = mesh
        .positions()
        .iter()
        .map(|p| p.distance(center))
        .fold((f32::MAX, 0.0f32), |(lo, hi), d| (lo.min(d), hi.max(d)));

    max_distance - min_distance >= thresholds.hull_min_spread
}

/// Compute a convex hull collider, `None` on any construction failure
pub fn build_convex_hull(mesh: &TriangleMesh) -> Option<ConvexHullShape> {
    // Builder output repeats every vertex per triangle; hull input only needs each once
    let mut seen = HashSet::new();
    let points: Vec<Point<Real>> = mesh
        .positions()
        .iter()
        .filter(|p| seen.insert(p.to_array().map(f32::to_bits)))
        .map(|&p| to_point(p))
        .collect();
    if points.len() < 4 {
        return None;
    }

    let (vertices, triangles) = match transformation::try_convex_hull(&points) {
        Ok(hull) => hull,
        Err(err) => {
            log::debug!("convex hull failed: {:?}", err);
            return None;
        }
    };
    if vertices.len() < 4 || triangles.is_empty() {
        return None;
    }

    ConvexPolyhedron::from_convex_mesh(vertices.clone(), &triangles)?;

    Some(ConvexHullShape {
        vertices: vertices.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect(),
        triangles,
    })
}

/// Box collider sized to the mesh bounds, `None` if the bounds are unusable
pub fn build_box(mesh: &TriangleMesh) -> Option<BoxShape> {
    let bounds = mesh.bounds();
    let half_extents = bounds.extents();
    let center = bounds.center();

    let usable = half_extents.is_finite() && center.is_finite() && half_extents.min_element() > 0.0;
    usable.then_some(BoxShape { center, half_extents })
}

/// Pick the collider for a fragment mesh
///
/// Tries, in order: convex hull (only when [`is_hull_eligible`]), box,
/// rejection.
pub fn select_collider(mesh: &TriangleMesh, thresholds: &FragmentThresholds) -> ColliderDecision {
    if is_hull_eligible(mesh, thresholds) {
        if let Some(hull) = build_convex_hull(mesh) {
            return ColliderDecision::ConvexHull(hull);
        }
        log::debug!("falling back to a box collider");
    }

    match build_box(mesh) {
        Some(cuboid) => ColliderDecision::Box(cuboid),
        None => {
            log::warn!("no collider could be built for bounds {:?}", mesh.bounds());
            ColliderDecision::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::{cuboid, square_pyramid, unit_cube};

    #[test]
    fn test_pyramid_gets_hull() {
        let pyramid = square_pyramid(0.5, 1.0);
        let decision = select_collider(&pyramid, &FragmentThresholds::default());
        let ColliderDecision::ConvexHull(hull) = decision else {
            panic!("expected a convex hull, got {:?}", decision);
        };
        assert_eq!(hull.vertices.len(), 5);
        assert!(hull.triangles.len() >= 6);
    }

    #[test]
    fn test_equidistant_vertices_fall_back_to_box() {
        // Every corner of a cube sits at the same distance from its center
        let cube = unit_cube();
        assert!(!is_hull_eligible(&cube, &FragmentThresholds::default()));

        let ColliderDecision::Box(cuboid) = select_collider(&cube, &FragmentThresholds::default()) else {
            panic!("expected a box collider");
        };
        assert_eq!(cuboid.half_extents, Vec3::splat(0.5));
    }

    #[test]
    fn test_thin_slab_falls_back_to_box() {
        let slab = cuboid(Vec3::new(0.5, 0.5, 0.0075));
        let thresholds = FragmentThresholds::default();
        assert!(!is_hull_eligible(&slab, &thresholds));

        let ColliderDecision::Box(cuboid) = select_collider(&slab, &thresholds) else {
            panic!("expected a box collider");
        };
        assert!(cuboid.half_extents.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0075), 1e-6));
        assert_eq!(cuboid.center, Vec3::ZERO);
    }

    #[test]
    fn test_too_few_vertices_not_eligible() {
        let triangle = TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![], vec![0, 1, 2]).unwrap();
        assert!(!is_hull_eligible(&triangle, &FragmentThresholds::default()));
        assert!(build_convex_hull(&triangle).is_none());
    }

    #[test]
    fn test_unusable_bounds_rejected() {
        let broken = cuboid(Vec3::splat(f32::INFINITY));
        let decision = select_collider(&broken, &FragmentThresholds::default());
        assert!(decision.is_rejected());
        assert!(decision.into_shape().is_none());
    }

    #[test]
    fn test_shapes_convert_to_parry() {
        let hull = select_collider(&square_pyramid(0.5, 1.0), &FragmentThresholds::default())
            .into_shape()
            .unwrap();
        assert!(matches!(hull, ColliderShape::ConvexHull(_)));
        assert!(hull.to_shared_shape().is_some());

        let boxed = ColliderShape::Box(BoxShape {
            center: Vec3::new(1.0, 2.0, 3.0),
            half_extents: Vec3::splat(0.5),
        });
        let (offset, shape) = boxed.to_shared_shape().unwrap();
        assert_eq!(offset.translation.vector.x, 1.0);
        assert!(shape.as_cuboid().is_some());
    }
}
