//! Triangle meshes consumed and produced by the fracture engine
//!
//! [`TriangleMesh`] is the working representation (glam vectors, cached
//! normals and bounds). [`MeshData`] is the engine-agnostic export:
//! - Bevy: Convert to `Mesh` with attributes
//! - Godot: Convert to `ArrayMesh`
//! - wgpu: Use directly as vertex buffers

mod builder;
pub mod primitives;

pub use builder::{MeshBuilder, DEGENERATE_AREA_EPSILON};

use glam::{Vec2, Vec3};

use crate::error::{FractureError, Result};
use crate::geometry::Bounds;

/// A mesh corner: position plus texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corner {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Corner {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }

    /// Interpolate position and UV with the same parameter `t`
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Indexed triangle mesh with per-vertex UVs
///
/// Invariants:
/// - `uvs.len() == positions.len()` (missing UVs are zero-filled)
/// - every index is `< positions.len()`
/// - `normals` and `bounds` reflect the current positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Bounds,
}

impl TriangleMesh {
    /// Build a mesh, recomputing normals and bounds
    ///
    /// UVs shorter than the position buffer are padded with zeros, longer
    /// ones are truncated. A trailing partial triangle in `indices` is kept
    /// but never visited by [`TriangleMesh::triangles`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` if any index is out of range
    pub fn new(positions: Vec<Vec3>, mut uvs: Vec<Vec2>, indices: Vec<u32>) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(FractureError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad,
                positions.len()
            )));
        }
        uvs.resize(positions.len(), Vec2::ZERO);
        Ok(Self::from_parts(positions, uvs, indices))
    }

    /// Build from buffers already known to be consistent
    pub(crate) fn from_parts(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(positions.len(), uvs.len());
        let mut mesh = Self {
            positions,
            uvs,
            normals: Vec::new(),
            indices,
            bounds: Bounds::default(),
        };
        mesh.recalculate_normals();
        mesh.recalculate_bounds();
        mesh
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Get the number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of complete triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position and UV of vertex `index`
    #[inline]
    pub fn corner(&self, index: usize) -> Corner {
        Corner::new(self.positions[index], self.uvs[index])
    }

    /// Iterate complete triangles as vertex index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
    }

    /// Recompute area-weighted vertex normals from triangle winding
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }
        self.normals = normals;
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Bounds::from_points(self.positions.iter().copied()).unwrap_or_default();
    }

    /// Export as flat engine-agnostic arrays
    pub fn to_mesh_data(&self) -> MeshData {
        MeshData {
            positions: self.positions.iter().map(|p| p.to_array()).collect(),
            normals: self.normals.iter().map(|n| n.to_array()).collect(),
            uvs: self.uvs.iter().map(|uv| uv.to_array()).collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions in the fragment's local frame
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (normalized, recomputed after slicing)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
