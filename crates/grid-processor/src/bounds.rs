//! Bounding box to index range resolution.
//!
//! A geographic box is turned into half-open index ranges on the reference
//! grid's latitude and longitude axes by binary search. The minimum bound uses
//! the leftmost insertion point and the maximum bound the rightmost one, so a
//! coordinate equal to either bound is included.
//!
//! Axes must be ascending; this is not checked.

use ocean_common::{CoordinateAxis, GeoBoundingBox, IndexRange};
use serde::Serialize;

/// First position `i` with `axis[i] >= value`.
pub fn lower_index(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&v| v < value)
}

/// First position `i` with `axis[i] > value`.
pub fn upper_index(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&v| v <= value)
}

/// Resolve `[lo, hi]` on one axis.
///
/// Never fails: bounds outside the axis give an empty or full range, and
/// reversed bounds (`lo > hi`) collapse to an empty range at `start`.
pub fn resolve_axis(axis: &CoordinateAxis, lo: f64, hi: f64) -> IndexRange {
    let start = lower_index(axis.values(), lo);
    let end = upper_index(axis.values(), hi).max(start);
    IndexRange { start, end }
}

/// Index ranges on the reference grid for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedBounds {
    pub latitude: IndexRange,
    pub longitude: IndexRange,
    /// The box as requested, `None` for full native extent.
    pub requested: Option<GeoBoundingBox>,
    /// Bounds actually searched: the requested box or the axis endpoints.
    pub effective: GeoBoundingBox,
}

impl ResolvedBounds {
    /// True if either range selects no points.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty() || self.longitude.is_empty()
    }

    /// First and last included coordinate values on each axis.
    ///
    /// Returns `(lat_first, lat_last, lon_first, lon_last)`, or `None` if the
    /// selection is empty.
    pub fn covered(
        &self,
        latitude: &CoordinateAxis,
        longitude: &CoordinateAxis,
    ) -> Option<(f64, f64, f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            latitude.get(self.latitude.start)?,
            latitude.get(self.latitude.end - 1)?,
            longitude.get(self.longitude.start)?,
            longitude.get(self.longitude.end - 1)?,
        ))
    }
}

/// Converts an optional bounding box into index ranges on the reference axes.
pub struct BoundsResolver<'a> {
    latitude: &'a CoordinateAxis,
    longitude: &'a CoordinateAxis,
}

impl<'a> BoundsResolver<'a> {
    pub fn new(latitude: &'a CoordinateAxis, longitude: &'a CoordinateAxis) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Resolve `bbox`; `None` selects the full extent of both axes.
    pub fn resolve(&self, bbox: Option<&GeoBoundingBox>) -> ResolvedBounds {
        match bbox {
            Some(b) => ResolvedBounds {
                latitude: resolve_axis(self.latitude, b.min_lat, b.max_lat),
                longitude: resolve_axis(self.longitude, b.min_lon, b.max_lon),
                requested: Some(*b),
                effective: *b,
            },
            None => ResolvedBounds {
                latitude: IndexRange::full(self.latitude.len()),
                longitude: IndexRange::full(self.longitude.len()),
                requested: None,
                effective: GeoBoundingBox::new(
                    self.longitude.first().unwrap_or(f64::NAN),
                    self.longitude.last().unwrap_or(f64::NAN),
                    self.latitude.first().unwrap_or(f64::NAN),
                    self.latitude.last().unwrap_or(f64::NAN),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lat() -> CoordinateAxis {
        CoordinateAxis::new(vec![10.0, 10.5, 11.0, 11.5, 12.0])
    }

    #[test]
    fn test_lower_and_upper_on_exact_values() {
        let axis = [10.0, 10.5, 11.0, 11.5, 12.0];
        assert_eq!(lower_index(&axis, 10.5), 1);
        assert_eq!(upper_index(&axis, 10.5), 2);
        assert_eq!(lower_index(&axis, 9.0), 0);
        assert_eq!(upper_index(&axis, 13.0), 5);
    }

    #[test]
    fn test_lower_and_upper_with_duplicates() {
        let axis = [1.0, 2.0, 2.0, 2.0, 3.0];
        assert_eq!(lower_index(&axis, 2.0), 1);
        assert_eq!(upper_index(&axis, 2.0), 4);
    }

    #[test]
    fn test_box_between_grid_points() {
        let range = resolve_axis(&lat(), 10.3, 11.6);
        assert_eq!(range, IndexRange { start: 1, end: 4 });
    }

    #[test]
    fn test_box_on_grid_points_is_inclusive() {
        let range = resolve_axis(&lat(), 10.5, 11.5);
        assert_eq!(range, IndexRange { start: 1, end: 4 });
    }

    #[test]
    fn test_box_outside_axis_is_empty() {
        assert!(resolve_axis(&lat(), 20.0, 30.0).is_empty());
        assert!(resolve_axis(&lat(), -5.0, 0.0).is_empty());
    }

    #[test]
    fn test_reversed_bounds_collapse() {
        let range = resolve_axis(&lat(), 11.6, 10.3);
        assert!(range.is_empty());
        assert!(range.start <= range.end);
    }

    #[test]
    fn test_full_extent() {
        let lat = lat();
        let lon = CoordinateAxis::new(vec![-5.0, -4.0, -3.0]);
        let bounds = BoundsResolver::new(&lat, &lon).resolve(None);
        assert_eq!(bounds.latitude, IndexRange::full(5));
        assert_eq!(bounds.longitude, IndexRange::full(3));
        assert_eq!(bounds.effective, GeoBoundingBox::new(-5.0, -3.0, 10.0, 12.0));
        assert_eq!(bounds.covered(&lat, &lon), Some((10.0, 12.0, -5.0, -3.0)));
    }
}
