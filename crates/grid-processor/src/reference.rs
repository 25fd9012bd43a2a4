//! The reference grid every other source is aligned to.

use ocean_common::{CoordinateAxis, Grid, GridError, GridResult, TimeCoordinate};

use crate::bounds::ResolvedBounds;

/// The temperature grid after bounding-box slicing.
///
/// Its latitude/longitude values and its single timestamp are the source of
/// truth for the merged output. Built once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceGrid {
    grid: Grid,
}

impl ReferenceGrid {
    /// Slice `source` to `bounds` and check it has exactly one time step.
    pub fn from_source(source: &Grid, bounds: &ResolvedBounds) -> GridResult<Self> {
        let grid = source.slice_spatial(bounds.latitude, bounds.longitude)?;
        if grid.time.len() != 1 {
            return Err(GridError::shape_mismatch(grid.label(), "time", 1, grid.time.len()));
        }
        Ok(Self { grid })
    }

    pub fn latitude(&self) -> &CoordinateAxis {
        &self.grid.latitude
    }

    pub fn longitude(&self) -> &CoordinateAxis {
        &self.grid.longitude
    }

    pub fn time(&self) -> &TimeCoordinate {
        &self.grid.time
    }

    pub fn depth(&self) -> Option<&CoordinateAxis> {
        self.grid.depth.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
