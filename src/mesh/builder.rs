//! Growable triangle accumulator used by the slicer

use glam::{Vec2, Vec3};

use super::TriangleMesh;

/// Triangles whose squared edge cross product falls below this are dropped
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-7;

/// Accumulates unindexed triangles into vertex/UV/index buffers
///
/// Every triangle gets its own three vertices, so finalized meshes are
/// flat-shaded. Near-zero-area triangles are dropped on insertion and never
/// reach the output.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `triangles` triangles
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 3),
            uvs: Vec::with_capacity(triangles * 3),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Append a triangle, returning `false` if it was dropped as degenerate
    pub fn add_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, uv1: Vec2, uv2: Vec2, uv3: Vec2) -> bool {
        let area = (v2 - v1).cross(v3 - v1).length_squared();
        if !area.is_finite() || area < DEGENERATE_AREA_EPSILON {
            return false;
        }

        let base = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3]);
        self.uvs.extend([uv1, uv2, uv3]);
        self.indices.extend([base, base + 1, base + 2]);
        true
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Turn the accumulated triangles into a mesh
    ///
    /// Returns `None` if no triangle survived.
    pub fn finalize(self) -> Option<TriangleMesh> {
        if self.positions.len() < 3 {
            return None;
        }
        Some(TriangleMesh::from_parts(self.positions, self.uvs, self.indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_triangles_dropped() {
        let mut builder = MeshBuilder::new();

        // Collinear
        assert!(!builder.add_triangle(
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 2.0,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::ZERO
        ));
        // Repeated vertex
        assert!(!builder.add_triangle(Vec3::ONE, Vec3::ONE, Vec3::Y, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO));
        // Non-finite
        assert!(!builder.add_triangle(
            Vec3::splat(f32::NAN),
            Vec3::X,
            Vec3::Y,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::ZERO
        ));

        assert!(builder.is_empty());
        assert!(builder.finalize().is_none());
    }

    #[test]
    fn test_finalize_builds_mesh() {
        let mut builder = MeshBuilder::with_capacity(2);
        assert!(builder.add_triangle(Vec3::ZERO, Vec3::X, Vec3::Y, Vec2::ZERO, Vec2::X, Vec2::Y));
        assert!(builder.add_triangle(Vec3::X, Vec3::ONE, Vec3::Y, Vec2::X, Vec2::ONE, Vec2::Y));
        assert_eq!(builder.vertex_count(), 6);
        assert_eq!(builder.triangle_count(), 2);

        let mesh = builder.finalize().unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.uvs()[4], Vec2::ONE);
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 1.0, 1.0));
        assert!(mesh.normals()[0].abs_diff_eq(Vec3::Z, 1e-6));
    }
}
