//! Half-space plane cuts
//!
//! Splits a triangle mesh by one plane into a positive and a negative piece,
//! each closed off with a capping polygon over the cut.
//!
//! # Algorithm
//!
//! 1. Classify the three corners of every triangle with the plane's side test
//! 2. Triangles entirely on one side are copied to that side's builder
//! 3. Straddling triangles have exactly one corner alone on its side; the two
//!    edges leaving it are cut, position and UV interpolated with the same `t`
//! 4. Cut points are welded into a [`BoundaryVertexSet`]
//! 5. With three or more boundary points, a fan cap is added to both pieces

mod boundary;
mod cap;

pub use boundary::{BoundaryVertexSet, DEFAULT_WELD_DISTANCE};
pub use cap::{cap_mesh, MIN_CAP_EDGE_SQUARED};

use glam::{Vec2, Vec3};

use crate::geometry::Plane;
use crate::mesh::{Corner, MeshBuilder, TriangleMesh};

/// Tunables for a single cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceOptions {
    /// UV given to every cap corner (pick a texel holding the interior material)
    pub cap_uv: Vec2,
    /// Cut points closer than this are merged before capping
    pub weld_distance: f32,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            cap_uv: Vec2::ZERO,
            weld_distance: DEFAULT_WELD_DISTANCE,
        }
    }
}

/// Result of cutting one mesh by one plane
#[derive(Debug, Clone, Default)]
pub struct SlicedMesh {
    /// Piece on the side the plane normal points to, `None` if empty
    pub positive: Option<TriangleMesh>,
    /// Piece behind the plane, `None` if empty
    pub negative: Option<TriangleMesh>,
    /// Angle-sorted cap polygon, empty when no cap was built
    pub cap_ring: Vec<Vec3>,
}

/// Slice with default options
pub fn slice_mesh(mesh: &TriangleMesh, plane: &Plane) -> SlicedMesh {
    slice_mesh_with(mesh, plane, &SliceOptions::default())
}

/// Slice `mesh` by `plane`
///
/// Degenerate triangles produced along the way are dropped silently.
pub fn slice_mesh_with(mesh: &TriangleMesh, plane: &Plane, options: &SliceOptions) -> SlicedMesh {
    let mut positive = MeshBuilder::with_capacity(mesh.triangle_count());
    let mut negative = MeshBuilder::with_capacity(mesh.triangle_count());
    let mut boundary = BoundaryVertexSet::with_weld_distance(options.weld_distance);

    for [i1, i2, i3] in mesh.triangles() {
        let corners = [mesh.corner(i1), mesh.corner(i2), mesh.corner(i3)];
        let sides = corners.map(|c| plane.side(c.position));

        if sides[0] == sides[1] && sides[1] == sides[2] {
            let builder = if sides[0] { &mut positive } else { &mut negative };
            emit(builder, corners[0], corners[1], corners[2]);
        } else {
            cut_triangle(plane, corners, sides, &mut positive, &mut negative, &mut boundary);
        }
    }

    let cap_ring = cap_mesh(&boundary, plane, options.cap_uv, &mut positive, &mut negative);

    SlicedMesh {
        positive: positive.finalize(),
        negative: negative.finalize(),
        cap_ring,
    }
}

#[inline]
fn emit(builder: &mut MeshBuilder, a: Corner, b: Corner, c: Corner) -> bool {
    builder.add_triangle(a.position, b.position, c.position, a.uv, b.uv, c.uv)
}

/// Point where edge `from -> to` crosses the plane
///
/// The edge is always walked from its positive end, so the two triangles
/// sharing it produce bit-identical points. The parameter is reused for the
/// UV, keeping texture coordinates consistent with positions.
pub(crate) fn split_edge(plane: &Plane, from: Corner, to: Corner) -> Corner {
    let (from, to) = if plane.side(from.position) { (from, to) } else { (to, from) };
    let t = plane.intersect_segment(from.position, to.position).unwrap_or(0.0);
    from.lerp(to, t)
}

/// Split a triangle that straddles the plane
///
/// The corner alone on its side keeps one triangle; the quad left on the
/// other side becomes two triangles sharing the first cut point. Winding is
/// preserved in all three.
fn cut_triangle(
    plane: &Plane,
    corners: [Corner; 3],
    sides: [bool; 3],
    positive: &mut MeshBuilder,
    negative: &mut MeshBuilder,
    boundary: &mut BoundaryVertexSet,
) {
    let [c1, c2, c3] = corners;
    let [s1, s2, s3] = sides;

    // Rotate so that `solo -> pair1 -> pair2` keeps the original winding
    let (solo, pair1, pair2, solo_side) = if s1 != s2 && s1 != s3 {
        (c1, c2, c3, s1)
    } else if s2 != s1 && s2 != s3 {
        (c2, c3, c1, s2)
    } else {
        (c3, c1, c2, s3)
    };

    let cut1 = split_edge(plane, solo, pair1);
    let cut2 = split_edge(plane, solo, pair2);

    boundary.insert(cut1.position);
    boundary.insert(cut2.position);

    let (solo_builder, pair_builder) = if solo_side {
        (positive, negative)
    } else {
        (negative, positive)
    };

    emit(solo_builder, solo, cut1, cut2);
    emit(pair_builder, cut1, pair1, pair2);
    emit(pair_builder, cut1, pair2, cut2);
}
