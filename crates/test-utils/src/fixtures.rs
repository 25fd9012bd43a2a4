//! Common test fixtures for grid alignment tests.

/// Bounding boxes as `(min_lon, max_lon, min_lat, max_lat)`.
pub mod bbox {
    /// Falls between grid points of [`super::axes::SCENARIO_LAT`].
    pub const SCENARIO: (f64, f64, f64, f64) = (-69.8, -68.4, 10.3, 11.6);

    /// Entirely east of the synthetic grids.
    pub const OUTSIDE: (f64, f64, f64, f64) = (100.0, 110.0, 10.0, 12.0);

    /// Covers the synthetic grids and more.
    pub const COVERING: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);

    /// Single grid point (degenerate box).
    pub const POINT: (f64, f64, f64, f64) = (-69.5, -69.5, 11.0, 11.0);
}

/// Coordinate axes used across tests.
pub mod axes {
    /// Reference latitude axis from the half-open range scenario.
    pub const SCENARIO_LAT: [f64; 5] = [10.0, 10.5, 11.0, 11.5, 12.0];

    /// Matching longitude axis.
    pub const SCENARIO_LON: [f64; 6] = [-70.0, -69.5, -69.0, -68.5, -68.0, -67.5];

    /// First GLORYS-like depth levels (m).
    pub const DEPTHS: [f64; 3] = [0.494, 1.541, 2.646];
}

/// Time constants.
pub mod time {
    /// Units used by the 3D sources.
    pub const REFERENCE_UNITS: &str = "hours since 1950-01-01";

    /// 2024-01-15T06:00:00Z in [`REFERENCE_UNITS`].
    pub const REFERENCE_VALUE: f64 = 649_014.0;

    /// Units used by the daily sea-level source.
    pub const SEA_LEVEL_UNITS: &str = "seconds since 2024-01-15 00:00:00";
}
