//! Welded set of cut points collected while slicing

use std::collections::HashMap;

use glam::{IVec3, Vec3};

/// Default weld radius: points closer than this collapse into one
///
/// Kept at the same length as the shortest cap edge, so welding only merges
/// points the cap would skip anyway.
pub const DEFAULT_WELD_DISTANCE: f32 = 1e-3;

/// Boundary vertices of one cut, deduplicated by distance
///
/// Lookups go through a hash grid with cells as wide as the weld distance, so
/// a candidate only has to be compared against points in the 27 surrounding
/// cells.
#[derive(Debug, Clone)]
pub struct BoundaryVertexSet {
    points: Vec<Vec3>,
    grid: HashMap<IVec3, Vec<usize>>,
    weld_distance: f32,
}

impl BoundaryVertexSet {
    pub fn new() -> Self {
        Self::with_weld_distance(DEFAULT_WELD_DISTANCE)
    }

    /// Non-positive or non-finite distances fall back to the default
    pub fn with_weld_distance(weld_distance: f32) -> Self {
        let weld_distance = if weld_distance.is_finite() && weld_distance > 0.0 {
            weld_distance
        } else {
            DEFAULT_WELD_DISTANCE
        };
        Self {
            points: Vec::new(),
            grid: HashMap::new(),
            weld_distance,
        }
    }

    #[inline]
    fn cell_of(&self, point: Vec3) -> IVec3 {
        (point / self.weld_distance).floor().as_ivec3()
    }

    /// Insert a point unless one already lies within the weld distance
    ///
    /// Returns `true` if the point was added.
    pub fn insert(&mut self, point: Vec3) -> bool {
        let cell = self.cell_of(point);
        let limit = self.weld_distance * self.weld_distance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cell + IVec3::new(dx, dy, dz))) else {
                        continue;
                    };
                    if bucket
                        .iter()
                        .any(|&i| self.points[i].distance_squared(point) < limit)
                    {
                        return false;
                    }
                }
            }
        }

        self.grid.entry(cell).or_default().push(self.points.len());
        self.points.push(point);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in insertion order
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn weld_distance(&self) -> f32 {
        self.weld_distance
    }

    /// Mean of all points, `None` when empty
    pub fn centroid(&self) -> Option<Vec3> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vec3 = self.points.iter().copied().sum();
        Some(sum / self.points.len() as f32)
    }
}

impl Default for BoundaryVertexSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_points_welded() {
        let mut set = BoundaryVertexSet::new();
        assert!(set.insert(Vec3::ZERO));
        assert!(!set.insert(Vec3::new(0.0005, 0.0, 0.0)));
        assert!(!set.insert(Vec3::new(0.0, -0.0008, 0.0)));
        assert!(set.insert(Vec3::new(0.005, 0.0, 0.0)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_close_but_distinct_points_kept() {
        // Neighbouring cut points on a small fragment are a few hundredths apart
        let mut set = BoundaryVertexSet::new();
        for i in 0..5 {
            assert!(set.insert(Vec3::new(i as f32 * 0.02, 0.0, 0.0)));
        }
        assert!(set.insert(Vec3::new(0.0, 0.01, 0.0)));
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        let mut set = BoundaryVertexSet::with_weld_distance(0.1);
        // Straddles the grid line at x = 0.1
        assert!(set.insert(Vec3::new(0.099, 0.0, 0.0)));
        assert!(!set.insert(Vec3::new(0.101, 0.0, 0.0)));
        assert!(set.insert(Vec3::new(0.25, 0.0, 0.0)));
    }

    #[test]
    fn test_centroid() {
        let mut set = BoundaryVertexSet::new();
        assert!(set.centroid().is_none());
        set.insert(Vec3::new(1.0, 0.0, 0.0));
        set.insert(Vec3::new(-1.0, 0.0, 0.0));
        set.insert(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(set.centroid().unwrap(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_invalid_weld_distance_falls_back() {
        assert_eq!(BoundaryVertexSet::with_weld_distance(0.0).weld_distance(), DEFAULT_WELD_DISTANCE);
        assert_eq!(BoundaryVertexSet::with_weld_distance(f32::NAN).weld_distance(), DEFAULT_WELD_DISTANCE);
    }
}
