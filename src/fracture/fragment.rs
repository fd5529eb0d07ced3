//! Fracture sources and the fragments spawned from them
//!
//! Everything a fragment inherits (material, tag, parent, transform) is
//! copied onto [`FractureSource`] by the host up front, so fragment creation
//! never has to walk a scene hierarchy.

use std::fmt;

use glam::{Affine3A, Vec3};

use super::collider::{select_collider, ColliderShape};
use crate::config::{FractureConfig, FragmentThresholds};
use crate::geometry::Transform;
use crate::mesh::TriangleMesh;

/// Host-side identifier of a scene entity
pub type EntityId = u64;

/// A breakable object, as seen by the fracture engine
///
/// Generic over the host's material handle `M`.
#[derive(Debug, Clone)]
pub struct FractureSource<M> {
    /// Host entity being fractured
    pub id: EntityId,
    pub name: String,
    /// Mesh in the object's local frame
    pub mesh: TriangleMesh,
    pub material: M,
    /// Classification tag, copied onto every fragment
    pub tag: String,
    pub parent: Option<EntityId>,
    /// Tag of the parent entity, if any (consulted by the fracture policy)
    pub parent_tag: Option<String>,
    /// Transform relative to the parent
    pub local_transform: Transform,
    /// World matrix of the parent, identity without one
    pub parent_world: Affine3A,
    /// Object-to-world matrix (`parent_world * local_transform`)
    pub world_matrix: Affine3A,
    /// `false` for fragments, which must not be fractured again
    pub fracturable: bool,
}

impl<M> FractureSource<M> {
    /// A parentless source at the origin
    pub fn new(id: EntityId, name: impl Into<String>, mesh: TriangleMesh, material: M) -> Self {
        Self {
            id,
            name: name.into(),
            mesh,
            material,
            tag: String::new(),
            parent: None,
            parent_tag: None,
            local_transform: Transform::IDENTITY,
            parent_world: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            fracturable: true,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Attach to a parent whose world matrix is `parent_world`
    ///
    /// The world matrix is recomputed from the current local transform.
    pub fn with_parent(mut self, parent: EntityId, parent_tag: Option<String>, parent_world: Affine3A) -> Self {
        self.parent = Some(parent);
        self.parent_tag = parent_tag;
        self.parent_world = parent_world;
        self.world_matrix = parent_world * self.local_transform.to_affine();
        self
    }

    /// Set the local transform; without a parent this is also the world transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local_transform = transform;
        self.world_matrix = self.parent_world * transform.to_affine();
        self
    }
}

/// Role of a fragment in its fracture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Piece cut away by the n-th plane
    Shard(usize),
    /// Whatever remains after the last cut
    Core,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Shard(index) => write!(f, "Shard_{}", index),
            FragmentKind::Core => write!(f, "Core"),
        }
    }
}

/// Collision detection mode requested for a fragment's rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionDetection {
    Discrete,
    /// Sweep-tested; fragments are small and fast
    #[default]
    Continuous,
}

/// Physics setup handed to the host for a fragment's rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodySetup {
    pub mass: f32,
    pub collision_detection: CollisionDetection,
    /// World-space impulse to apply once on spawn
    pub impulse: Vec3,
    /// World-space point the impulse radiates from (the impact)
    pub impulse_origin: Vec3,
}

/// A fragment ready to be spawned by the host
#[derive(Debug, Clone)]
pub struct Fragment<M> {
    /// `Shard_{n}` or `Core`
    pub label: String,
    pub kind: FragmentKind,
    /// Mesh in the same local frame as the source mesh
    pub mesh: TriangleMesh,
    pub material: M,
    pub tag: String,
    pub parent: Option<EntityId>,
    /// Copied from the source so the fragment appears in place
    pub local_transform: Transform,
    pub collider: ColliderShape,
    pub body: RigidBodySetup,
    /// Seconds until the host should despawn the fragment
    pub lifetime: f32,
    /// Always `false`: fragments are not fractured again
    pub fracturable: bool,
}

/// Why a mesh did not become a fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentRejection {
    TooFewVertices(usize),
    /// Bounds diagonal below the minimum
    TooSmall(f32),
    /// Some bounds axis below the minimum extent
    TooThin(f32),
    /// Neither a hull nor a box collider could be built
    NoCollider,
}

impl fmt::Display for FragmentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentRejection::TooFewVertices(n) => write!(f, "only {} vertices", n),
            FragmentRejection::TooSmall(d) => write!(f, "bounds diagonal {} too small", d),
            FragmentRejection::TooThin(e) => write!(f, "axis extent {} too thin", e),
            FragmentRejection::NoCollider => write!(f, "no collider could be built"),
        }
    }
}

/// Check a candidate mesh against the size thresholds
pub fn check_fragment_mesh(mesh: &TriangleMesh, thresholds: &FragmentThresholds) -> Result<(), FragmentRejection> {
    if mesh.vertex_count() < thresholds.min_vertex_count {
        return Err(FragmentRejection::TooFewVertices(mesh.vertex_count()));
    }

    let size = mesh.bounds().size();
    let diagonal = size.length();
    if diagonal.is_nan() || diagonal < thresholds.min_diagonal {
        return Err(FragmentRejection::TooSmall(diagonal));
    }

    let thinnest = size.min_element();
    if thinnest.is_nan() || thinnest < thresholds.min_axis_extent {
        return Err(FragmentRejection::TooThin(thinnest));
    }

    Ok(())
}

/// Estimated mass from the bounds diagonal and the inherited scale
pub fn estimate_mass(mesh: &TriangleMesh, transform: &Transform, thresholds: &FragmentThresholds) -> f32 {
    let mass = mesh.bounds().diagonal() * transform.average_scale() * thresholds.mass_scale;
    mass.max(thresholds.min_mass)
}

/// Validate `mesh` and wrap it into a fragment of `source`
///
/// Returns the rejection reason instead of a fragment when the mesh fails
/// the size filter or no collider can be built for it.
pub fn try_create_fragment<M: Clone>(
    source: &FractureSource<M>,
    mesh: TriangleMesh,
    kind: FragmentKind,
    impact_world: Vec3,
    config: &FractureConfig,
) -> Result<Fragment<M>, FragmentRejection> {
    let thresholds = &config.thresholds;
    check_fragment_mesh(&mesh, thresholds)?;

    let collider = select_collider(&mesh, thresholds)
        .into_shape()
        .ok_or(FragmentRejection::NoCollider)?;

    let world_center = source.world_matrix.transform_point3(mesh.bounds().center());
    let direction = (world_center - impact_world).try_normalize().unwrap_or(Vec3::Y);

    let body = RigidBodySetup {
        mass: estimate_mass(&mesh, &source.local_transform, thresholds),
        collision_detection: CollisionDetection::Continuous,
        impulse: direction * config.explosion_force,
        impulse_origin: impact_world,
    };

    Ok(Fragment {
        label: kind.to_string(),
        kind,
        mesh,
        material: source.material.clone(),
        tag: source.tag.clone(),
        parent: source.parent,
        local_transform: source.local_transform,
        collider,
        body,
        lifetime: config.fragment_lifetime,
        fracturable: false,
    })
}

/// Like [`try_create_fragment`], logging and discarding the rejection reason
pub fn create_fragment<M: Clone>(
    source: &FractureSource<M>,
    mesh: TriangleMesh,
    kind: FragmentKind,
    impact_world: Vec3,
    config: &FractureConfig,
) -> Option<Fragment<M>> {
    match try_create_fragment(source, mesh, kind, impact_world, config) {
        Ok(fragment) => Some(fragment),
        Err(reason) => {
            log::debug!("{} of `{}` discarded: {}", kind, source.name, reason);
            None
        }
    }
}

impl<M: Clone> Fragment<M> {
    /// Describe this fragment as a fracture source
    ///
    /// The result keeps `fracturable == false`, so the default policy still
    /// refuses to break it again.
    pub fn as_source(&self, id: EntityId, parent_world: Affine3A) -> FractureSource<M> {
        FractureSource {
            id,
            name: self.label.clone(),
            mesh: self.mesh.clone(),
            material: self.material.clone(),
            tag: self.tag.clone(),
            parent: self.parent,
            parent_tag: None,
            local_transform: self.local_transform,
            parent_world,
            world_matrix: parent_world * self.local_transform.to_affine(),
            fracturable: self.fracturable,
        }
    }
}
