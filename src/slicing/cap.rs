//! Capping polygon that seals the cross-section left by a cut

use glam::{Vec2, Vec3};

use super::boundary::BoundaryVertexSet;
use crate::geometry::Plane;
use crate::mesh::MeshBuilder;

/// Ring edges shorter than this (squared) are skipped
pub const MIN_CAP_EDGE_SQUARED: f32 = 1e-6;

/// Fall back to the right axis when the up-based tangent is this short (squared)
const TANGENT_DEGENERACY: f32 = 1e-4;

/// Orthonormal (tangent, bitangent) pair spanning the plane
pub(crate) fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let mut tangent = normal.cross(Vec3::Y);
    if tangent.length_squared() < TANGENT_DEGENERACY {
        tangent = normal.cross(Vec3::X);
    }
    let tangent = tangent.normalize();
    let bitangent = normal.cross(tangent).normalize();
    (tangent, bitangent)
}

/// Order points by their angle around `center` within the plane
pub(crate) fn sort_ring(points: &[Vec3], center: Vec3, normal: Vec3) -> Vec<Vec3> {
    let (tangent, bitangent) = plane_basis(normal);

    let mut keyed: Vec<(f32, Vec3)> = points
        .iter()
        .map(|&p| {
            let offset = p - center;
            (offset.dot(bitangent).atan2(offset.dot(tangent)), p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Fan-triangulate the boundary ring into both halves
///
/// The positive half receives triangles facing `-normal` and the negative
/// half triangles facing `+normal`, so each cap faces out of its own piece.
/// All cap corners share `cap_uv`. Returns the sorted ring, or an empty
/// vector when fewer than three boundary points exist.
pub fn cap_mesh(
    boundary: &BoundaryVertexSet,
    plane: &Plane,
    cap_uv: Vec2,
    positive: &mut MeshBuilder,
    negative: &mut MeshBuilder,
) -> Vec<Vec3> {
    if boundary.len() < 3 {
        return Vec::new();
    }
    let Some(center) = boundary.centroid() else {
        return Vec::new();
    };

    let normal = plane.normal();
    let ring = sort_ring(boundary.points(), center, normal);

    for (i, &p1) in ring.iter().enumerate() {
        let p2 = ring[(i + 1) % ring.len()];
        if p1.distance_squared(p2) < MIN_CAP_EDGE_SQUARED {
            continue;
        }

        let (toward_normal, away_from_normal) = if (p1 - center).cross(p2 - center).dot(normal) >= 0.0 {
            ((p1, p2), (p2, p1))
        } else {
            ((p2, p1), (p1, p2))
        };

        positive.add_triangle(center, away_from_normal.0, away_from_normal.1, cap_uv, cap_uv, cap_uv);
        negative.add_triangle(center, toward_normal.0, toward_normal.1, cap_uv, cap_uv, cap_uv);
    }

    ring
}
