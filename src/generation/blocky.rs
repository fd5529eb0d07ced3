//! Blocky Seed Point Distribution
//!
//! Generates approximate Voronoi cell centers inside a bounding box by laying
//! a near-cubic grid over it and jittering each cell center.
//!
//! # Algorithm
//!
//! The grid resolution starts from `count^(1/3)` cells per axis and is scaled
//! by each axis' share of the longest side, so flat boxes get flat grids.
//! Each cell contributes its center plus a random offset of up to
//! `jitter * cell_size` per axis:
//! - 0.0 = perfect lattice
//! - 0.5 = maximum randomness without seeds leaving their cell

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::Bounds;

/// Default jitter as a fraction of the cell size per axis
pub const DEFAULT_JITTER: f32 = 0.4;

/// Axes thinner than this are treated as this thick
pub const MIN_AXIS_SIZE: f32 = 0.01;

/// Keeps float noise in `cbrt` from bumping a perfect cube to the next size
const GRID_ROUNDING_EPSILON: f32 = 1e-4;

/// Cells per axis for `count` seeds in a box of `size`
fn grid_resolution(size: Vec3, count: usize) -> [usize; 3] {
    let cubic_root = (count as f32).cbrt();
    let max_size = size.max_element();
    size.to_array().map(|axis| {
        let cells = (cubic_root * (axis / max_size) - GRID_ROUNDING_EPSILON).ceil();
        (cells as usize).max(1)
    })
}

/// Generate jittered grid seeds inside `bounds`
///
/// Returns no seeds for `count == 0`, otherwise at least one. The number of
/// seeds equals the grid cell count, which matches `count` for perfect cubes
/// in cube-shaped bounds and is only an approximation otherwise.
///
/// # Arguments
///
/// * `bounds` - Volume to fill; degenerate axes are clamped to [`MIN_AXIS_SIZE`]
/// * `count` - Target number of seeds
/// * `jitter` - Maximum offset as a fraction of the cell size
/// * `rng` - Random source for the jitter
pub fn blocky_seeds<R: Rng + ?Sized>(bounds: &Bounds, count: usize, jitter: f32, rng: &mut R) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let size = bounds.size().max(Vec3::splat(MIN_AXIS_SIZE));
    let origin = bounds.center() - size * 0.5;
    let [grid_x, grid_y, grid_z] = grid_resolution(size, count);
    let cell_size = size / Vec3::new(grid_x as f32, grid_y as f32, grid_z as f32);
    let jitter = jitter.abs();

    let mut seeds = Vec::with_capacity(grid_x * grid_y * grid_z);
    for x in 0..grid_x {
        for y in 0..grid_y {
            for z in 0..grid_z {
                let cell_center = origin
                    + Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5) * cell_size;

                let offset = Vec3::new(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                ) * cell_size;

                seeds.push(cell_center + offset);
            }
        }
    }
    seeds
}

/// Generate seeds with deterministic jitter from a fixed random seed
///
/// # Example
///
/// ```rust
/// use rust_voronoi_fracture::generation::generate_blocky_seeds;
/// use rust_voronoi_fracture::{Bounds, Vec3};
///
/// let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::ONE);
/// let seeds = generate_blocky_seeds(&bounds, 8, 42);
/// assert_eq!(seeds.len(), 8);
/// ```
pub fn generate_blocky_seeds(bounds: &Bounds, count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    blocky_seeds(bounds, count, DEFAULT_JITTER, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> Bounds {
        Bounds::from_center_size(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_perfect_cube_counts() {
        for (count, expected) in [(1, 1), (8, 8), (27, 27), (64, 64)] {
            let seeds = generate_blocky_seeds(&unit_bounds(), count, 42);
            assert_eq!(seeds.len(), expected, "count {count}");
        }
    }

    #[test]
    fn test_seeds_within_jittered_bounds() {
        let bounds = unit_bounds();
        let seeds = generate_blocky_seeds(&bounds, 8, 7);
        let cell = bounds.size() / 2.0;
        let grown = bounds.expanded(cell * DEFAULT_JITTER);

        assert_eq!(seeds.len(), 8);
        for seed in &seeds {
            assert!(grown.contains(*seed), "{seed} escaped the bounds");
            // 0.5 - 0.4 cell margin keeps seeds inside the original box too
            assert!(bounds.contains(*seed));
        }
    }

    #[test]
    fn test_empty_for_zero_count() {
        assert!(generate_blocky_seeds(&unit_bounds(), 0, 42).is_empty());
    }

    #[test]
    fn test_degenerate_bounds_clamped() {
        let bounds = Bounds::from_center_size(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
        let seeds = generate_blocky_seeds(&bounds, 4, 42);

        assert!(!seeds.is_empty());
        for seed in &seeds {
            assert!(seed.is_finite());
            assert!(seed.distance(Vec3::new(3.0, 0.0, 0.0)) < MIN_AXIS_SIZE);
        }
    }

    #[test]
    fn test_flat_bounds_get_flat_grid() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 0.0));
        let seeds = generate_blocky_seeds(&bounds, 27, 42);

        // 3 x 3 x 1
        assert_eq!(seeds.len(), 9);
        assert_eq!(grid_resolution(Vec3::new(2.0, 2.0, MIN_AXIS_SIZE), 27), [3, 3, 1]);
    }

    #[test]
    fn test_zero_jitter_is_lattice() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let seeds = blocky_seeds(&unit_bounds(), 8, 0.0, &mut rng);
        for seed in &seeds {
            assert!(seed.abs().abs_diff_eq(Vec3::splat(0.25), 1e-6));
        }
    }

    #[test]
    fn test_determinism() {
        let a = generate_blocky_seeds(&unit_bounds(), 27, 42);
        let b = generate_blocky_seeds(&unit_bounds(), 27, 42);
        let c = generate_blocky_seeds(&unit_bounds(), 27, 43);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
