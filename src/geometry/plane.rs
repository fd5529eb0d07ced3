//! Cutting plane
//!
//! A plane is stored as a unit normal plus a signed distance so that
//! `normal.dot(p) + distance` is the signed distance of `p` to the plane.

use glam::Vec3;

use crate::error::{FractureError, Result};

/// An oriented plane splitting space into a positive and a negative half
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and a distance
    ///
    /// The distance is rescaled together with the normal so the plane stays
    /// the same set of points.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the normal has zero or non-finite length
    pub fn new(normal: Vec3, distance: f32) -> Result<Self> {
        let length = normal.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return Err(FractureError::DegenerateGeometry(format!(
                "plane normal {normal} has no direction"
            )));
        }
        Ok(Self {
            normal: normal / length,
            distance: distance / length,
        })
    }

    /// Create a plane passing through `point` facing `normal`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the normal has zero or non-finite length
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Result<Self> {
        let normal = normal.try_normalize().ok_or_else(|| {
            FractureError::DegenerateGeometry(format!("plane normal {normal} has no direction"))
        })?;
        Ok(Self {
            normal,
            distance: -normal.dot(point),
        })
    }

    /// Unit normal pointing into the positive half-space
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance of the origin to the plane
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// `true` if the point lies strictly in the positive half-space
    ///
    /// Points exactly on the plane count as negative.
    #[inline]
    pub fn side(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// The same plane with its halves swapped
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// Parametric position `t` in `[0, 1]` where segment `a -> b` meets the plane
    ///
    /// Returns `None` if the segment is parallel to the plane or does not
    /// reach it.
    pub fn intersect_segment(&self, a: Vec3, b: Vec3) -> Option<f32> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        let denom = da - db;
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let t = da / denom;
        (0.0..=1.0).contains(&t).then_some(t)
    }
}
