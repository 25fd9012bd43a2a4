//! Union of aligned grids into one multi-variable dataset.
//!
//! Inputs must already share bit-identical coordinates; this stage only
//! verifies that and never picks a side. Any disagreement is reported as
//! `CoordinateConflict`, which points at an alignment bug upstream.

use std::collections::BTreeMap;

use ocean_common::{
    CoordinateAxis, DataVariable, Dimension, Grid, GridError, GridResult, TimeCoordinate,
};
use serde::Serialize;
use tracing::debug;

use crate::reference::ReferenceGrid;

/// The merged output: one coordinate set and every data variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGrid {
    pub time: TimeCoordinate,
    pub depth: Option<CoordinateAxis>,
    pub latitude: CoordinateAxis,
    pub longitude: CoordinateAxis,
    pub variables: Vec<DataVariable>,
}

impl MergedGrid {
    pub fn variable(&self, name: &str) -> Option<&DataVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty() || self.longitude.is_empty()
    }

    /// Length of the shared coordinate for `dim`.
    pub fn dimension_len(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Time => self.time.len(),
            Dimension::Depth => self.depth.as_ref().map_or(0, CoordinateAxis::len),
            Dimension::Latitude => self.latitude.len(),
            Dimension::Longitude => self.longitude.len(),
        }
    }

    pub fn summary(&self) -> MergedSummary {
        MergedSummary {
            time: self.time.values.first().copied(),
            time_units: self.time.units.clone(),
            depth_levels: self.dimension_len(Dimension::Depth),
            latitudes: self.latitude.len(),
            longitudes: self.longitude.len(),
            variables: self
                .variables
                .iter()
                .map(|v| (v.name.clone(), v.shape.clone()))
                .collect(),
        }
    }
}

/// Serializable description of a merged grid, for logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSummary {
    pub time: Option<f64>,
    pub time_units: Option<String>,
    pub depth_levels: usize,
    pub latitudes: usize,
    pub longitudes: usize,
    pub variables: BTreeMap<String, Vec<usize>>,
}

/// Merges aligned grids onto the reference coordinate set.
pub struct Merger {
    merged: MergedGrid,
}

impl Merger {
    /// Start from the reference grid and its variables.
    pub fn new(reference: ReferenceGrid) -> Self {
        let grid = reference.into_grid();
        Self {
            merged: MergedGrid {
                time: grid.time,
                depth: grid.depth,
                latitude: grid.latitude,
                longitude: grid.longitude,
                variables: grid.variables,
            },
        }
    }

    /// Add every variable of `grid`, checking its coordinates first.
    pub fn add(mut self, grid: Grid) -> GridResult<Self> {
        let label = grid.label();
        self.check_coordinates(&label, &grid)?;

        for var in grid.variables {
            if self.merged.variable(&var.name).is_some() {
                return Err(GridError::DuplicateVariable(var.name));
            }
            self.merged.variables.push(var);
        }

        debug!(variables = %label, "Merged grid variables");
        Ok(self)
    }

    pub fn finish(self) -> MergedGrid {
        self.merged
    }

    fn check_coordinates(&self, label: &str, grid: &Grid) -> GridResult<()> {
        let merged = &self.merged;
        check_shared(label, "latitude", &merged.latitude, &grid.latitude)?;
        check_shared(label, "longitude", &merged.longitude, &grid.longitude)?;

        let merged_time = CoordinateAxis::new(merged.time.values.clone());
        let time = CoordinateAxis::new(grid.time.values.clone());
        check_shared(label, "time", &merged_time, &time)?;

        let needs_depth = grid.variables.iter().any(|v| v.has_dim(Dimension::Depth));
        match (&merged.depth, &grid.depth) {
            (Some(expected), Some(actual)) => check_shared(label, "depth", expected, actual)?,
            (None, Some(_)) if needs_depth => {
                return Err(GridError::missing_dimension("merged grid", "depth"))
            }
            _ => {}
        }

        Ok(())
    }
}

fn check_shared(
    variable: &str,
    coordinate: &str,
    expected: &CoordinateAxis,
    actual: &CoordinateAxis,
) -> GridResult<()> {
    match expected.first_difference(actual) {
        None => Ok(()),
        Some((index, expected, actual)) => Err(GridError::CoordinateConflict {
            variable: variable.to_string(),
            coordinate: coordinate.to_string(),
            index,
            expected,
            actual,
        }),
    }
}

/// Merge aligned grids into the reference in order.
pub fn merge(reference: ReferenceGrid, grids: Vec<Grid>) -> GridResult<MergedGrid> {
    grids
        .into_iter()
        .try_fold(Merger::new(reference), Merger::add)
        .map(Merger::finish)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsResolver;

    fn grid(names: &[&str], lat: Vec<f64>, time: f64) -> Grid {
        let nlat = lat.len();
        let variables = names
            .iter()
            .map(|n| {
                DataVariable::new(
                    *n,
                    vec![Dimension::Time, Dimension::Depth, Dimension::Latitude, Dimension::Longitude],
                    vec![1, 2, nlat, 2],
                    vec![1.0; 2 * nlat * 2],
                )
                .unwrap()
            })
            .collect();
        Grid::new(
            TimeCoordinate::single(time, "hours since 1950-01-01"),
            Some(vec![0.5, 1.5].into()),
            lat.into(),
            vec![0.0, 0.25].into(),
            variables,
        )
        .unwrap()
    }

    fn reference() -> ReferenceGrid {
        let thetao = grid(&["thetao"], vec![1.0, 2.0, 3.0], 10.0);
        let bounds = BoundsResolver::new(&thetao.latitude, &thetao.longitude).resolve(None);
        ReferenceGrid::from_source(&thetao, &bounds).unwrap()
    }

    #[test]
    fn test_merge_unions_variables_in_order() {
        let merged = merge(
            reference(),
            vec![
                grid(&["so"], vec![1.0, 2.0, 3.0], 10.0),
                grid(&["uo", "vo"], vec![1.0, 2.0, 3.0], 10.0),
            ],
        )
        .unwrap();

        assert_eq!(merged.variable_names(), vec!["thetao", "so", "uo", "vo"]);
        let summary = merged.summary();
        assert_eq!(summary.latitudes, 3);
        assert_eq!(summary.depth_levels, 2);
        assert_eq!(summary.variables["uo"], vec![1, 2, 3, 2]);
    }

    #[test]
    fn test_merge_rejects_conflicting_latitude() {
        let err = merge(reference(), vec![grid(&["so"], vec![1.0, 2.0000001, 3.0], 10.0)])
            .unwrap_err();
        match err {
            GridError::CoordinateConflict {
                variable,
                coordinate,
                index,
                ..
            } => {
                assert_eq!(variable, "so");
                assert_eq!(coordinate, "latitude");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_rejects_conflicting_time() {
        let err = merge(reference(), vec![grid(&["so"], vec![1.0, 2.0, 3.0], 16.0)]).unwrap_err();
        assert!(matches!(err, GridError::CoordinateConflict { ref coordinate, .. } if coordinate == "time"));
    }

    #[test]
    fn test_merge_rejects_duplicate_variable() {
        let err = merge(reference(), vec![grid(&["thetao"], vec![1.0, 2.0, 3.0], 10.0)]).unwrap_err();
        assert!(matches!(err, GridError::DuplicateVariable(ref name) if name == "thetao"));
    }

    #[test]
    fn test_merge_rejects_depth_one_ulp_off() {
        let mut so = grid(&["so"], vec![1.0, 2.0, 3.0], 10.0);
        so.depth = Some(vec![0.5, f64::from_bits(1.5f64.to_bits() + 1)].into());

        let err = merge(reference(), vec![so]).unwrap_err();
        match err {
            GridError::CoordinateConflict {
                coordinate, index, ..
            } => {
                assert_eq!(coordinate, "depth");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_depth_variable_into_surface_reference() {
        let thetao = Grid::new(
            TimeCoordinate::single(10.0, "hours since 1950-01-01"),
            None,
            vec![1.0, 2.0, 3.0].into(),
            vec![0.0, 0.25].into(),
            vec![DataVariable::new(
                "thetao",
                vec![Dimension::Time, Dimension::Latitude, Dimension::Longitude],
                vec![1, 3, 2],
                vec![1.0; 6],
            )
            .unwrap()],
        )
        .unwrap();
        let bounds = BoundsResolver::new(&thetao.latitude, &thetao.longitude).resolve(None);
        let reference = ReferenceGrid::from_source(&thetao, &bounds).unwrap();
        assert!(reference.depth().is_none());

        let err = merge(reference, vec![grid(&["so"], vec![1.0, 2.0, 3.0], 10.0)]).unwrap_err();
        assert!(matches!(
            err,
            GridError::MissingDimension { ref dimension, .. } if dimension == "depth"
        ));
    }
}
