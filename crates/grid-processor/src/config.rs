//! Configuration for grid alignment.

use serde::{Deserialize, Serialize};

/// Default tolerance (degrees) between a source's native coordinates and the
/// reference coordinates that replace them.
pub const DEFAULT_COORDINATE_TOLERANCE: f64 = 1e-4;

/// Configuration for the alignment stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Maximum allowed |native - reference| per coordinate before relabeling.
    pub coordinate_tolerance: f64,

    /// Compare native coordinates with the reference before overwriting them.
    pub verify_coordinates: bool,

    /// Allow a bounding box that selects no points to produce an empty result.
    pub allow_empty: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            coordinate_tolerance: DEFAULT_COORDINATE_TOLERANCE,
            verify_coordinates: true,
            allow_empty: false,
        }
    }
}

impl AlignConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GLORYS_COORD_TOLERANCE") {
            if let Ok(tolerance) = val.parse() {
                config.coordinate_tolerance = tolerance;
            }
        }

        if let Ok(val) = std::env::var("GLORYS_VERIFY_COORDS") {
            config.verify_coordinates = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("GLORYS_ALLOW_EMPTY") {
            config.allow_empty = parse_flag(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.coordinate_tolerance.is_finite() || self.coordinate_tolerance < 0.0 {
            return Err("coordinate_tolerance must be a finite value >= 0".to_string());
        }
        Ok(())
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.coordinate_tolerance = tolerance;
        self
    }

    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}
