//! Iterative half-space fracture
//!
//! Approximates a Voronoi decomposition around an impact without solving
//! for the cells: every seed contributes the perpendicular bisector between
//! itself and the impact, and the remaining mesh is cut by these planes one
//! after another.
//!
//! # Algorithm
//!
//! 1. Spread blocky seeds over a cube of edge `2 * fracture_radius` centered
//!    on the impact and drop the ones too close to it
//! 2. Start with the whole source mesh as the remaining volume
//! 3. For every seed, in generation order:
//!    - Stop if the remaining volume is already negligible
//!    - Cut it by the bisector of impact and seed, expressed in mesh space
//!    - The piece on the seed's side leaves as a shard; the other piece is
//!      the new remaining volume
//! 4. Whatever remains becomes the core fragment
//!
//! Later cuts only see what earlier cuts left, so the cells are path
//! dependent. That is fine for visual fracture.

use glam::{Affine3A, Vec3};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::fragment::{try_create_fragment, Fragment, FractureSource, FragmentKind};
use super::policy::FracturePolicy;
use crate::config::FractureConfig;
use crate::error::{FractureError, Result};
use crate::generation::blocky_seeds;
use crate::geometry::{Bounds, Plane};
use crate::mesh::TriangleMesh;
use crate::slicing::{slice_mesh_with, SliceOptions};

/// Receives the results of a fracture
///
/// Implemented by the host to turn fragments into scene entities.
pub trait FragmentSink<M> {
    /// Spawn a finished fragment
    fn spawn(&mut self, fragment: Fragment<M>);

    /// Remove the fractured source from the scene
    ///
    /// Called once, after every fragment has been spawned.
    fn destroy_source(&mut self, _source: &FractureSource<M>) {}
}

impl<M> FragmentSink<M> for Vec<Fragment<M>> {
    fn spawn(&mut self, fragment: Fragment<M>) {
        self.push(fragment);
    }
}

/// What happened during one fracture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FractureReport {
    /// Seeds left after exclusion and subsetting
    pub seeds_planned: usize,
    /// Planes actually applied to the remaining mesh
    pub cuts_performed: usize,
    pub shards_spawned: usize,
    /// Candidate meshes that failed validation or got no collider
    pub fragments_rejected: usize,
    pub core_spawned: bool,
    /// Cutting stopped because the remaining volume became negligible
    pub stopped_early: bool,
}

impl FractureReport {
    /// Fragments handed to the sink
    pub fn fragments_spawned(&self) -> usize {
        self.shards_spawned + usize::from(self.core_spawned)
    }
}

/// Fracture service
///
/// Holds the read-only configuration and policy; every call is independent.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_fracture::*;
///
/// let config = FractureConfigBuilder::new()
///     .shard_count(6).unwrap()
///     .seed(42)
///     .build().unwrap();
/// let shatter = VoronoiShatter::new(config);
///
/// let source = FractureSource::new(1, "Crate", mesh::primitives::unit_cube(), "wood");
/// let fragments = shatter.shatter(&source, Vec3::new(0.5, 0.0, 0.0)).unwrap();
/// assert!(fragments.len() <= 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoronoiShatter {
    config: FractureConfig,
    policy: FracturePolicy,
}

impl VoronoiShatter {
    /// Service with the default [`FracturePolicy`]
    pub fn new(config: FractureConfig) -> Self {
        Self {
            config,
            policy: FracturePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FracturePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &FractureConfig {
        &self.config
    }

    pub fn policy(&self) -> &FracturePolicy {
        &self.policy
    }

    /// Seeds for a fracture at `impact`, in the order they will be cut
    ///
    /// Seeds within `seed_exclusion_radius` of the impact are dropped. If the
    /// grid still holds more than `shard_count` seeds, a random subset of
    /// exactly `shard_count` is kept, in generation order.
    pub fn plan_seeds<R: Rng + ?Sized>(&self, impact: Vec3, rng: &mut R) -> Vec<Vec3> {
        let config = &self.config;
        let volume = Bounds::from_center_size(impact, Vec3::splat(2.0 * config.fracture_radius));

        let mut seeds = blocky_seeds(&volume, config.shard_count, config.jitter, rng);
        seeds.retain(|seed| seed.distance(impact) >= config.seed_exclusion_radius);

        if seeds.len() > config.shard_count {
            let mut keep = index::sample(rng, seeds.len(), config.shard_count).into_vec();
            keep.sort_unstable();
            seeds = keep.into_iter().map(|i| seeds[i]).collect();
        }
        seeds
    }

    /// Fracture `source` at the world-space point `impact`
    ///
    /// Fragments are handed to `sink` as they are created, then the source is
    /// destroyed through the sink. Uses `config.seed` when set, fresh entropy
    /// otherwise.
    ///
    /// # Errors
    ///
    /// - [`FractureError::NotFracturable`] if the policy refuses the source;
    ///   the sink is not touched
    /// - [`FractureError::NonInvertibleTransform`] if the source's world
    ///   matrix cannot be inverted
    ///
    /// Geometry that degenerates while cutting never fails the call; it only
    /// shows up as fewer fragments in the report.
    pub fn trigger_fracture<M, S>(&self, source: &FractureSource<M>, impact: Vec3, sink: &mut S) -> Result<FractureReport>
    where
        M: Clone,
        S: FragmentSink<M> + ?Sized,
    {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.trigger_fracture_with_rng(source, impact, sink, &mut rng)
    }

    /// [`trigger_fracture`](Self::trigger_fracture) with a caller-provided random source
    pub fn trigger_fracture_with_rng<M, S, R>(
        &self,
        source: &FractureSource<M>,
        impact: Vec3,
        sink: &mut S,
        rng: &mut R,
    ) -> Result<FractureReport>
    where
        M: Clone,
        S: FragmentSink<M> + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.policy.can_fracture(source) {
            return Err(FractureError::NotFracturable(source.name.clone()));
        }

        let world_to_local = invert(&source.world_matrix)
            .ok_or_else(|| FractureError::NonInvertibleTransform(source.name.clone()))?;
        // Normals map with the transpose of the local-to-world linear part
        let normal_to_local = source.world_matrix.matrix3.transpose();

        let config = &self.config;
        let options = SliceOptions {
            cap_uv: config.cap_uv,
            ..SliceOptions::default()
        };

        let seeds = self.plan_seeds(impact, rng);
        let mut report = FractureReport {
            seeds_planned: seeds.len(),
            ..FractureReport::default()
        };
        log::debug!("fracturing `{}` at {} with {} seeds", source.name, impact, seeds.len());

        let mut current: Option<TriangleMesh> = Some(source.mesh.clone());

        for (i, seed) in seeds.iter().enumerate() {
            let Some(mesh) = current.take() else {
                break;
            };
            if mesh.bounds().diagonal() < config.min_remaining_size {
                report.stopped_early = true;
                current = Some(mesh);
                break;
            }

            let midpoint = world_to_local.transform_point3((impact + *seed) * 0.5);
            let normal = normal_to_local.mul_vec3(*seed - impact);
            let plane = match Plane::from_point_normal(midpoint, normal) {
                Ok(plane) => plane,
                Err(err) => {
                    log::trace!("seed {} skipped: {}", i, err);
                    current = Some(mesh);
                    continue;
                }
            };

            let sliced = slice_mesh_with(&mesh, &plane, &options);
            report.cuts_performed += 1;
            log::trace!(
                "cut {}: shard {}, remaining {}, cap ring {}",
                i,
                sliced.positive.as_ref().map_or(0, TriangleMesh::triangle_count),
                sliced.negative.as_ref().map_or(0, TriangleMesh::triangle_count),
                sliced.cap_ring.len()
            );

            if let Some(shard) = sliced.positive {
                if self.emit(source, shard, FragmentKind::Shard(i), impact, sink) {
                    report.shards_spawned += 1;
                } else {
                    report.fragments_rejected += 1;
                }
            }
            current = sliced.negative;
        }

        if let Some(core) = current {
            if self.emit(source, core, FragmentKind::Core, impact, sink) {
                report.core_spawned = true;
            } else {
                report.fragments_rejected += 1;
            }
        }

        sink.destroy_source(source);
        log::debug!("fractured `{}`: {:?}", source.name, report);
        Ok(report)
    }

    /// Fracture into a list of fragments
    ///
    /// # Errors
    ///
    /// Same as [`trigger_fracture`](Self::trigger_fracture).
    pub fn shatter<M: Clone>(&self, source: &FractureSource<M>, impact: Vec3) -> Result<Vec<Fragment<M>>> {
        let mut fragments = Vec::new();
        self.trigger_fracture(source, impact, &mut fragments)?;
        Ok(fragments)
    }

    fn emit<M, S>(&self, source: &FractureSource<M>, mesh: TriangleMesh, kind: FragmentKind, impact: Vec3, sink: &mut S) -> bool
    where
        M: Clone,
        S: FragmentSink<M> + ?Sized,
    {
        match try_create_fragment(source, mesh, kind, impact, &self.config) {
            Ok(fragment) => {
                sink.spawn(fragment);
                true
            }
            Err(reason) => {
                log::debug!("{} of `{}` discarded: {}", kind, source.name, reason);
                false
            }
        }
    }
}

/// Inverse of `matrix`, `None` if it is singular or not finite
fn invert(matrix: &Affine3A) -> Option<Affine3A> {
    let determinant = matrix.matrix3.determinant();
    if !determinant.is_finite() || determinant.abs() <= f32::EPSILON * f32::EPSILON {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FractureConfigBuilder;
    use crate::fracture::fragment::check_fragment_mesh;
    use crate::geometry::Transform;
    use crate::mesh::primitives::{cuboid, unit_cube};
    use glam::Quat;

    #[derive(Default)]
    struct RecordingSink {
        spawned: Vec<String>,
        destroyed: Vec<u64>,
    }

    impl FragmentSink<()> for RecordingSink {
        fn spawn(&mut self, fragment: Fragment<()>) {
            self.spawned.push(fragment.label);
        }

        fn destroy_source(&mut self, source: &FractureSource<()>) {
            self.destroyed.push(source.id);
        }
    }

    fn config(shard_count: usize, seed: u64) -> FractureConfig {
        FractureConfigBuilder::new()
            .shard_count(shard_count)
            .unwrap()
            .seed(seed)
            .build()
            .unwrap()
    }

    fn block() -> FractureSource<()> {
        FractureSource::new(1, "Block", cuboid(Vec3::splat(1.0)), ())
    }

    #[test]
    fn test_five_shards_at_most_six_fragments() {
        let shatter = VoronoiShatter::new(config(5, 42));
        let mut fragments = Vec::new();
        let report = shatter
            .trigger_fracture(&block(), Vec3::new(1.0, 0.2, 0.1), &mut fragments)
            .unwrap();

        assert!(report.cuts_performed <= 5);
        assert!(fragments.len() <= 6);
        assert_eq!(fragments.len(), report.fragments_spawned());
        for fragment in &fragments {
            assert!(check_fragment_mesh(&fragment.mesh, &shatter.config().thresholds).is_ok());
            assert!(!fragment.fracturable);
        }
    }

    #[test]
    fn test_terminates_for_many_seeds() {
        for seed in 0..40 {
            let shatter = VoronoiShatter::new(config(8, seed));
            let mut fragments = Vec::new();
            let report = shatter
                .trigger_fracture(&block(), Vec3::new(0.3, 1.0, -0.4), &mut fragments)
                .unwrap();

            assert!(report.seeds_planned <= 8);
            assert!(report.cuts_performed <= report.seeds_planned);
            assert!(fragments.len() <= report.seeds_planned + 1);
        }
    }

    #[test]
    fn test_fragments_stay_inside_source() {
        let shatter = VoronoiShatter::new(config(10, 3));
        let source = block();
        let fragments = shatter.shatter(&source, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let limit = source.mesh.bounds().expanded(Vec3::splat(1e-4));

        assert!(!fragments.is_empty());
        for fragment in &fragments {
            for p in fragment.mesh.positions() {
                assert!(limit.contains(*p), "{p} outside the source");
            }
        }
    }

    #[test]
    fn test_labels_and_core() {
        let shatter = VoronoiShatter::new(config(8, 11));
        let mut sink = RecordingSink::default();
        let report = shatter.trigger_fracture(&block(), Vec3::ZERO, &mut sink).unwrap();

        assert_eq!(sink.destroyed, vec![1]);
        assert_eq!(sink.spawned.len(), report.fragments_spawned());
        let cores = sink.spawned.iter().filter(|l| *l == "Core").count();
        assert_eq!(cores, usize::from(report.core_spawned));
        assert!(sink.spawned.iter().all(|l| l == "Core" || l.starts_with("Shard_")));
    }

    #[test]
    fn test_plan_seeds_respects_count_and_exclusion() {
        let shatter = VoronoiShatter::new(config(10, 0));
        let impact = Vec3::new(2.0, -1.0, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let seeds = shatter.plan_seeds(impact, &mut rng);

        // 10 seeds round up to a 3 x 3 x 3 grid before subsetting
        assert_eq!(seeds.len(), 10);
        for seed in &seeds {
            assert!(seed.distance(impact) >= 0.1);
            assert!(Bounds::from_center_size(impact, Vec3::splat(2.0)).contains(*seed));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let shatter = VoronoiShatter::new(config(6, 99));
        let a = shatter.shatter(&block(), Vec3::new(0.5, 0.5, 0.5)).unwrap();
        let b = shatter.shatter(&block(), Vec3::new(0.5, 0.5, 0.5)).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.label, y.label);
            assert_eq!(x.mesh.positions(), y.mesh.positions());
        }
    }

    #[test]
    fn test_protected_source_refused() {
        let shatter = VoronoiShatter::new(config(5, 1));
        let mut sink = RecordingSink::default();
        let land = block().with_tag("Land");

        let result = shatter.trigger_fracture(&land, Vec3::ZERO, &mut sink);
        assert_eq!(result, Err(FractureError::NotFracturable("Block".to_string())));
        assert!(sink.spawned.is_empty());
        assert!(sink.destroyed.is_empty());
    }

    #[test]
    fn test_fragment_not_fractured_again() {
        let shatter = VoronoiShatter::new(config(5, 1));
        let fragments = shatter.shatter(&block(), Vec3::ZERO).unwrap();
        let again = fragments[0].as_source(2, Affine3A::IDENTITY);

        let result = shatter.shatter(&again, Vec3::ZERO);
        assert!(matches!(result, Err(FractureError::NotFracturable(_))));
    }

    #[test]
    fn test_singular_transform_refused() {
        let shatter = VoronoiShatter::new(config(5, 1));
        let flat = block().with_transform(Transform::IDENTITY.with_scale(Vec3::new(1.0, 0.0, 1.0)));

        let result = shatter.shatter(&flat, Vec3::ZERO);
        assert!(matches!(result, Err(FractureError::NonInvertibleTransform(_))));
    }

    #[test]
    fn test_early_stop_keeps_whole_mesh_as_core() {
        let config = FractureConfig {
            min_remaining_size: 100.0,
            ..config(5, 1)
        };
        let shatter = VoronoiShatter::new(config);
        let source = FractureSource::new(1, "Pebble", unit_cube(), ());
        let mut fragments = Vec::new();
        let report = shatter.trigger_fracture(&source, Vec3::ZERO, &mut fragments).unwrap();

        assert!(report.stopped_early);
        assert_eq!(report.cuts_performed, 0);
        assert!(report.core_spawned);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].mesh.positions(), source.mesh.positions());
    }

    #[test]
    fn test_transformed_source_cut_in_world_space() {
        // Rotated and translated block; the first bisector must still split
        // the mesh around the world-space impact
        let transform = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_y(0.7))
            .with_scale(Vec3::new(1.0, 2.0, 1.0));
        let source = block().with_transform(transform);
        let impact = source.world_matrix.transform_point3(Vec3::ZERO);

        let shatter = VoronoiShatter::new(config(6, 21));
        let mut fragments = Vec::new();
        let report = shatter.trigger_fracture(&source, impact, &mut fragments).unwrap();

        assert!(report.cuts_performed > 0);
        assert!(fragments.len() > 1);
        for fragment in &fragments {
            assert_eq!(fragment.local_transform, transform);
            assert!(fragment.body.impulse.length() > 0.0);
        }
    }
}
