//! Geographic bounding box for regional subsets.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Longitudes and latitudes are compared against the reference grid's native
/// axes as-is; no wrapping or normalisation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Build a box only when all four bounds are given.
    ///
    /// Any missing bound means "full native extent", so the whole box is dropped.
    pub fn from_parts(
        min_lon: Option<f64>,
        max_lon: Option<f64>,
        min_lat: Option<f64>,
        max_lat: Option<f64>,
    ) -> Option<Self> {
        Some(Self::new(min_lon?, max_lon?, min_lat?, max_lat?))
    }

    /// True when either pair of bounds is reversed.
    pub fn is_inverted(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }
}

impl std::fmt::Display for GeoBoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lon [{}, {}] lat [{}, {}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}
