//! Fracture Configuration and Builder
//!
//! All tunables of the fracture engine live here. A configuration is plain
//! read-only data: one [`FractureConfig`] can be shared by any number of
//! fracture calls.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FractureError, Result};
use crate::generation::DEFAULT_JITTER;

/// Upper limit on cuts per fracture
pub const MAX_SHARD_COUNT: usize = 256;

/// Size and shape limits applied to fragment candidates
///
/// The defaults are empirical: they filter slivers and paper-thin pieces
/// that would destabilize a physics solver or render as noise.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentThresholds {
    /// Fewer vertices than this and the mesh is rejected (default: 4)
    pub min_vertex_count: usize,
    /// Minimum bounds diagonal (default: 0.05)
    pub min_diagonal: f32,
    /// Minimum bounds size along every axis (default: 0.01)
    pub min_axis_extent: f32,
    /// Minimum bounds size along every axis for a convex hull collider (default: 0.02)
    pub hull_min_axis_extent: f32,
    /// Minimum spread of vertex distances to the bounds center for a convex
    /// hull collider; smaller spreads indicate near-coplanar points (default: 0.01)
    pub hull_min_spread: f32,
    /// Lower clamp on the estimated mass (default: 0.1)
    pub min_mass: f32,
    /// Mass per unit of bounds diagonal and scale (default: 2.0)
    pub mass_scale: f32,
}

impl Default for FragmentThresholds {
    fn default() -> Self {
        Self {
            min_vertex_count: 4,
            min_diagonal: 0.05,
            min_axis_extent: 0.01,
            hull_min_axis_extent: 0.02,
            hull_min_spread: 0.01,
            min_mass: 0.1,
            mass_scale: 2.0,
        }
    }
}

impl FragmentThresholds {
    fn validate(&self) -> Result<()> {
        let limits = [
            ("min_diagonal", self.min_diagonal),
            ("min_axis_extent", self.min_axis_extent),
            ("hull_min_axis_extent", self.hull_min_axis_extent),
            ("hull_min_spread", self.hull_min_spread),
            ("min_mass", self.min_mass),
            ("mass_scale", self.mass_scale),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(FractureError::InvalidConfig(format!(
                    "{} must be finite and >= 0 (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for a fracture service
///
/// # Example
///
/// ```rust
/// use rust_voronoi_fracture::*;
///
/// let config = FractureConfigBuilder::new()
///     .shard_count(6)
///     .unwrap()
///     .fracture_radius(0.75)
///     .unwrap()
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.shard_count, 6);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractureConfig {
    /// Maximum number of cuts, and so of shards, per fracture (default: 10)
    pub shard_count: usize,

    /// Half-size of the seed volume around the impact (default: 1.0)
    ///
    /// Seeds are spread over a cube of edge `2 * fracture_radius` centered
    /// on the impact point.
    pub fracture_radius: f32,

    /// Impulse magnitude pushing fragments away from the impact (default: 500)
    pub explosion_force: f32,

    /// Advisory irregularity factor (default: 0.5)
    ///
    /// Stored for hosts that tune their own effects with it; seed placement
    /// is driven by `jitter`.
    pub irregularity: f32,

    /// Seed jitter as a fraction of the grid cell size (default: 0.4)
    ///
    /// - 0.0: Perfect lattice, very regular fragments
    /// - 0.5: Maximum randomness without seeds leaving their cell
    pub jitter: f32,

    /// Random seed for the jitter
    ///
    /// `Some` makes every fracture reproducible; `None` draws fresh entropy
    /// for each call.
    pub seed: Option<u64>,

    /// Seeds closer than this to the impact are discarded (default: 0.1)
    pub seed_exclusion_radius: f32,

    /// Stop cutting once the remaining mesh's bounds diagonal drops below
    /// this (default: 0.1)
    pub min_remaining_size: f32,

    /// Seconds a fragment lives before the host should despawn it (default: 1.5)
    pub fragment_lifetime: f32,

    /// UV given to every cap vertex (default: (0, 0))
    pub cap_uv: Vec2,

    /// Fragment validation and collider limits
    pub thresholds: FragmentThresholds,
}

impl Default for FractureConfig {
    fn default() -> Self {
        Self {
            shard_count: 10,
            fracture_radius: 1.0,
            explosion_force: 500.0,
            irregularity: 0.5,
            jitter: DEFAULT_JITTER,
            seed: None,
            seed_exclusion_radius: 0.1,
            min_remaining_size: 0.1,
            fragment_lifetime: 1.5,
            cap_uv: Vec2::ZERO,
            thresholds: FragmentThresholds::default(),
        }
    }
}

/// Builder for creating FractureConfig with validation
///
/// Setters that can receive out-of-range values return `Result<Self>`.
#[derive(Debug, Clone)]
pub struct FractureConfigBuilder {
    config: FractureConfig,
}

impl FractureConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - shard_count: 10
    /// - fracture_radius: 1.0
    /// - explosion_force: 500
    /// - jitter: 0.4
    /// - seed: None (fresh entropy per fracture)
    /// - fragment_lifetime: 1.5 seconds
    pub fn new() -> Self {
        Self {
            config: FractureConfig::default(),
        }
    }

    /// Set the maximum number of shards per fracture
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0 or above [`MAX_SHARD_COUNT`]
    pub fn shard_count(mut self, count: usize) -> Result<Self> {
        if count == 0 || count > MAX_SHARD_COUNT {
            return Err(FractureError::InvalidConfig(format!(
                "shard count must be in 1..={} (got {})",
                MAX_SHARD_COUNT, count
            )));
        }
        self.config.shard_count = count;
        Ok(self)
    }

    /// Set the radius of the seed volume around the impact
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius <= 0.0 or is not finite
    pub fn fracture_radius(mut self, radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "fracture radius must be positive (got {})",
                radius
            )));
        }
        self.config.fracture_radius = radius;
        Ok(self)
    }

    /// Set the explosion impulse magnitude
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if force is negative or not finite
    pub fn explosion_force(mut self, force: f32) -> Result<Self> {
        if !force.is_finite() || force < 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "explosion force must be >= 0 (got {})",
                force
            )));
        }
        self.config.explosion_force = force;
        Ok(self)
    }

    /// Set the advisory irregularity factor
    pub fn irregularity(mut self, irregularity: f32) -> Self {
        self.config.irregularity = irregularity;
        self
    }

    /// Set the seed jitter fraction
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if jitter is outside `0.0..=0.5`
    pub fn jitter(mut self, jitter: f32) -> Result<Self> {
        if !(0.0..=0.5).contains(&jitter) {
            return Err(FractureError::InvalidConfig(format!(
                "jitter must be in 0.0..=0.5 (got {})",
                jitter
            )));
        }
        self.config.jitter = jitter;
        Ok(self)
    }

    /// Make every fracture reproducible with a fixed random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the distance under which seeds next to the impact are discarded
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is negative or not finite
    pub fn seed_exclusion_radius(mut self, radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "seed exclusion radius must be >= 0 (got {})",
                radius
            )));
        }
        self.config.seed_exclusion_radius = radius;
        Ok(self)
    }

    /// Set the remaining-size threshold that ends cutting early
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is negative or not finite
    pub fn min_remaining_size(mut self, size: f32) -> Result<Self> {
        if !size.is_finite() || size < 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "minimum remaining size must be >= 0 (got {})",
                size
            )));
        }
        self.config.min_remaining_size = size;
        Ok(self)
    }

    /// Set how long fragments live
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if seconds <= 0.0 or is not finite
    pub fn fragment_lifetime(mut self, seconds: f32) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "fragment lifetime must be positive (got {})",
                seconds
            )));
        }
        self.config.fragment_lifetime = seconds;
        Ok(self)
    }

    /// Set the UV used for cap faces
    pub fn cap_uv(mut self, uv: Vec2) -> Self {
        self.config.cap_uv = uv;
        self
    }

    /// Replace the fragment thresholds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any limit is negative or not finite
    pub fn thresholds(mut self, thresholds: FragmentThresholds) -> Result<Self> {
        thresholds.validate()?;
        self.config.thresholds = thresholds;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<FractureConfig> {
        Ok(self.config)
    }
}

impl Default for FractureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
