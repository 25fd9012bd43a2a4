//! Generators for synthetic ocean grids.
//!
//! Values encode their position so tests can check slicing exactly:
//! a cell at `(t, d, j, i)` holds `base + t * 1000 + d * 100 + j * 10 + i`.

use ocean_common::{
    names, CoordinateAxis, DataVariable, Dimension, Grid, TimeCoordinate,
};

use crate::fixtures::{axes, time};

/// Evenly spaced ascending axis.
pub fn ascending_axis(start: f64, step: f64, len: usize) -> CoordinateAxis {
    CoordinateAxis::new((0..len).map(|k| start + k as f64 * step).collect())
}

/// Copy of `axis` with alternating `±epsilon` noise, like a file that stored
/// the same positions with different rounding.
pub fn jitter_axis(axis: &CoordinateAxis, epsilon: f64) -> CoordinateAxis {
    CoordinateAxis::new(
        axis.values()
            .iter()
            .enumerate()
            .map(|(k, v)| if k % 2 == 0 { v + epsilon } else { v - epsilon })
            .collect(),
    )
}

/// Position-encoded values for a `time, depth, latitude, longitude` block.
pub fn create_test_cube(nt: usize, nd: usize, nlat: usize, nlon: usize, base: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(nt * nd * nlat * nlon);
    for t in 0..nt {
        for d in 0..nd {
            for j in 0..nlat {
                for i in 0..nlon {
                    data.push(base + (t * 1000 + d * 100 + j * 10 + i) as f32);
                }
            }
        }
    }
    data
}

fn cube_variable(name: &str, nt: usize, nd: usize, nlat: usize, nlon: usize, base: f32) -> DataVariable {
    DataVariable::new(
        name,
        vec![Dimension::Time, Dimension::Depth, Dimension::Latitude, Dimension::Longitude],
        vec![nt, nd, nlat, nlon],
        create_test_cube(nt, nd, nlat, nlon, base),
    )
    .expect("cube shape matches data")
}

/// Builder for the four sources of one merge run, all on the same native grid.
#[derive(Debug, Clone)]
pub struct SourceGridBuilder {
    pub latitude: CoordinateAxis,
    pub longitude: CoordinateAxis,
    pub depth: CoordinateAxis,
    /// Rounding noise applied to the non-reference sources' lat/lon.
    pub jitter: f64,
}

impl Default for SourceGridBuilder {
    fn default() -> Self {
        Self {
            latitude: CoordinateAxis::new(axes::SCENARIO_LAT.to_vec()),
            longitude: CoordinateAxis::new(axes::SCENARIO_LON.to_vec()),
            depth: CoordinateAxis::new(axes::DEPTHS.to_vec()),
            jitter: 1e-6,
        }
    }
}

impl SourceGridBuilder {
    pub fn new(latitude: CoordinateAxis, longitude: CoordinateAxis) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    fn reference_time() -> TimeCoordinate {
        TimeCoordinate::single(time::REFERENCE_VALUE, time::REFERENCE_UNITS)
    }

    fn grid_3d(&self, variables: Vec<DataVariable>, jitter: f64) -> Grid {
        Grid::new(
            Self::reference_time(),
            Some(self.depth.clone()),
            jitter_axis(&self.latitude, jitter),
            jitter_axis(&self.longitude, jitter),
            variables,
        )
        .expect("synthetic grid is consistent")
    }

    fn dims(&self) -> (usize, usize, usize) {
        (self.depth.len(), self.latitude.len(), self.longitude.len())
    }

    /// `thetao` on the exact reference coordinates.
    pub fn temperature(&self) -> Grid {
        let (nd, nlat, nlon) = self.dims();
        let thetao = cube_variable(names::THETAO, 1, nd, nlat, nlon, 0.0)
            .with_attribute("units", "degrees_C")
            .with_attribute("standard_name", "sea_water_potential_temperature");
        self.grid_3d(vec![thetao], 0.0)
    }

    /// `so` with jittered coordinates.
    pub fn salinity(&self) -> Grid {
        let (nd, nlat, nlon) = self.dims();
        let so = cube_variable(names::SO, 1, nd, nlat, nlon, 10_000.0)
            .with_attribute("units", "1e-3");
        self.grid_3d(vec![so], self.jitter)
    }

    /// `uo` and `vo` with jittered coordinates.
    pub fn currents(&self) -> Grid {
        let (nd, nlat, nlon) = self.dims();
        let uo = cube_variable(names::UO, 1, nd, nlat, nlon, 20_000.0).with_attribute("units", "m s-1");
        let vo = cube_variable(names::VO, 1, nd, nlat, nlon, 30_000.0).with_attribute("units", "m s-1");
        self.grid_3d(vec![uo, vo], -self.jitter)
    }

    /// 24 hourly `sea_surface_height` steps with a length-1 depth axis.
    ///
    /// Hour `h` at `(j, i)` holds `40000 + h * 1000 + j * 10 + i`.
    pub fn sea_level(&self) -> Grid {
        let (_, nlat, nlon) = self.dims();
        let ssh = cube_variable(names::SEA_SURFACE_HEIGHT, 24, 1, nlat, nlon, 40_000.0)
            .with_attribute("units", "m");
        Grid::new(
            TimeCoordinate::new(
                (0..24).map(|h| h as f64 * 3600.0).collect(),
                Some(time::SEA_LEVEL_UNITS.to_string()),
            ),
            Some(CoordinateAxis::new(vec![0.0])),
            jitter_axis(&self.latitude, self.jitter),
            jitter_axis(&self.longitude, self.jitter),
            vec![ssh],
        )
        .expect("synthetic sea-level grid is consistent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_encoding() {
        let data = create_test_cube(2, 2, 3, 4, 0.0);
        assert_eq!(data.len(), 48);
        assert_eq!(data[0], 0.0);
        assert_eq!(data[1], 1.0);
        assert_eq!(data[4], 10.0);
        assert_eq!(data[12], 100.0);
        assert_eq!(data[24], 1000.0);
    }

    #[test]
    fn test_jitter_keeps_length() {
        let axis = ascending_axis(0.0, 0.5, 4);
        let noisy = jitter_axis(&axis, 1e-6);
        assert_eq!(noisy.len(), 4);
        assert!(axis.first_difference(&noisy).is_some());
        assert!(axis.first_deviation(&noisy, 1e-5).is_none());
    }

    #[test]
    fn test_builder_sources_share_shape() {
        let builder = SourceGridBuilder::default();
        assert_eq!(builder.temperature().variable("thetao").unwrap().shape, vec![1, 3, 5, 6]);
        assert_eq!(builder.currents().variables.len(), 2);
        assert_eq!(builder.sea_level().time.len(), 24);
    }
}
