//! Axis-aligned bounding box

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds described by their min and max corners
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounds centered on `center` with full edge lengths `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest bounds enclosing all points, `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full edge lengths along each axis
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half edge lengths along each axis
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Length of the box diagonal (`size().length()`)
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Grow (or shrink, for negative amounts) each side by `amount`
    pub fn expanded(&self, amount: Vec3) -> Self {
        Self::new(self.min - amount, self.max + amount)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(bounds.size(), Vec3::new(2.0, 5.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.5, 1.0));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_center_size_round_trip() {
        let bounds = Bounds::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0));
        assert_eq!(bounds.min, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(bounds.extents(), Vec3::ONE);
        assert!((bounds.diagonal() - 12.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_contains_and_expanded() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::ONE);
        assert!(bounds.contains(Vec3::splat(0.5)));
        assert!(!bounds.contains(Vec3::new(0.6, 0.0, 0.0)));
        assert!(bounds.expanded(Vec3::splat(0.1)).contains(Vec3::new(0.6, 0.0, 0.0)));
    }
}
