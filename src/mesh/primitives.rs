//! Closed primitive meshes
//!
//! Handy as fracture input for demos and tests.

use glam::{Vec2, Vec3};

use super::TriangleMesh;

/// Corner signs of a box, indexed like the triangle table below
const CUBOID_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Counter-clockwise (outward-facing) triangles, two per face
const CUBOID_TRIANGLES: [u32; 36] = [
    0, 2, 1, 0, 3, 2, // -Z
    4, 5, 6, 4, 6, 7, // +Z
    0, 1, 5, 0, 5, 4, // -Y
    3, 7, 6, 3, 6, 2, // +Y
    0, 4, 7, 0, 7, 3, // -X
    1, 2, 6, 1, 6, 5, // +X
];

/// Closed box centered at the origin with 8 shared vertices and 12 triangles
///
/// UVs are the XY corner signs remapped to `[0, 1]`.
pub fn cuboid(half_extents: Vec3) -> TriangleMesh {
    let positions: Vec<Vec3> = CUBOID_CORNERS
        .iter()
        .map(|&c| Vec3::from_array(c) * half_extents)
        .collect();
    let uvs: Vec<Vec2> = CUBOID_CORNERS
        .iter()
        .map(|&[x, y, _]| Vec2::new(x * 0.5 + 0.5, y * 0.5 + 0.5))
        .collect();

    TriangleMesh::from_parts(positions, uvs, CUBOID_TRIANGLES.to_vec())
}

/// Axis-aligned unit cube (edge length 1) centered at the origin
pub fn unit_cube() -> TriangleMesh {
    cuboid(Vec3::splat(0.5))
}

/// Square-based pyramid with its base centered on the origin and apex on +Y
///
/// Five shared vertices, six outward-facing triangles. UVs are the XZ
/// position remapped to `[0, 1]` over the base.
pub fn square_pyramid(half_base: f32, height: f32) -> TriangleMesh {
    let positions = vec![
        Vec3::new(-half_base, 0.0, -half_base),
        Vec3::new(half_base, 0.0, -half_base),
        Vec3::new(half_base, 0.0, half_base),
        Vec3::new(-half_base, 0.0, half_base),
        Vec3::new(0.0, height, 0.0),
    ];
    let uvs = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.5, 0.5),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3, 0, 4, 1, 1, 4, 2, 2, 4, 3, 3, 4, 0];

    TriangleMesh::from_parts(positions, uvs, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_shape() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.bounds().size(), Vec3::ONE);
        assert_eq!(cube.bounds().center(), Vec3::ZERO);
    }

    fn assert_outward(mesh: &TriangleMesh, interior: Vec3) {
        let p = mesh.positions();
        for [a, b, c] in mesh.triangles() {
            let normal = (p[b] - p[a]).cross(p[c] - p[a]);
            let centroid = (p[a] + p[b] + p[c]) / 3.0;
            assert!(normal.dot(centroid - interior) > 0.0, "face {a},{b},{c} points inward");
        }
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        assert_outward(&cuboid(Vec3::new(1.0, 2.0, 3.0)), Vec3::ZERO);
    }

    #[test]
    fn test_pyramid_faces_point_outward() {
        let pyramid = square_pyramid(0.5, 1.0);
        assert_eq!(pyramid.vertex_count(), 5);
        assert_eq!(pyramid.triangle_count(), 6);
        assert_outward(&pyramid, Vec3::new(0.0, 0.25, 0.0));
    }
}
