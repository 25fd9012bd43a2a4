//! Slicing and coordinate relabeling of 3D sources.
//!
//! Sources downloaded separately share a native grid but their coordinate
//! arrays may differ by rounding noise. After slicing with the reference's
//! index ranges, latitude/longitude are overwritten position-for-position with
//! the reference values. This is a relabel, not a resample.

use ocean_common::{CoordinateAxis, Grid, GridError, GridResult};
use tracing::debug;

use crate::bounds::ResolvedBounds;
use crate::config::AlignConfig;
use crate::reference::ReferenceGrid;

/// Aligns sources onto a [`ReferenceGrid`].
pub struct GridAligner<'a> {
    reference: &'a ReferenceGrid,
    bounds: &'a ResolvedBounds,
    config: &'a AlignConfig,
}

impl<'a> GridAligner<'a> {
    pub fn new(
        reference: &'a ReferenceGrid,
        bounds: &'a ResolvedBounds,
        config: &'a AlignConfig,
    ) -> Self {
        Self {
            reference,
            bounds,
            config,
        }
    }

    /// Produce a new grid sliced to the resolved ranges and carrying the
    /// reference latitude/longitude. Time and depth pass through unchanged.
    pub fn align(&self, source: &Grid) -> GridResult<Grid> {
        let sliced = source.slice_spatial(self.bounds.latitude, self.bounds.longitude)?;
        let aligned = relabel_spatial(sliced, self.reference, self.config)?;

        debug!(
            variables = %aligned.label(),
            lat = %self.bounds.latitude,
            lon = %self.bounds.longitude,
            "Aligned source to reference grid"
        );

        Ok(aligned)
    }
}

/// Replace latitude/longitude with the reference axes.
///
/// Fails with `ShapeMismatch` if the lengths differ and, when verification is
/// enabled, with `CoordinateDrift` if any native value is further than the
/// configured tolerance from the reference value it replaces.
pub(crate) fn relabel_spatial(
    grid: Grid,
    reference: &ReferenceGrid,
    config: &AlignConfig,
) -> GridResult<Grid> {
    let label = grid.label();
    check_axis(&label, "latitude", &grid.latitude, reference.latitude(), config)?;
    check_axis(&label, "longitude", &grid.longitude, reference.longitude(), config)?;

    Ok(Grid {
        latitude: reference.latitude().clone(),
        longitude: reference.longitude().clone(),
        ..grid
    })
}

fn check_axis(
    variable: &str,
    coordinate: &str,
    native: &CoordinateAxis,
    reference: &CoordinateAxis,
    config: &AlignConfig,
) -> GridResult<()> {
    if native.len() != reference.len() {
        return Err(GridError::shape_mismatch(
            variable,
            coordinate,
            reference.len(),
            native.len(),
        ));
    }

    if config.verify_coordinates {
        if let Some((index, actual, expected)) =
            native.first_deviation(reference, config.coordinate_tolerance)
        {
            return Err(GridError::CoordinateDrift {
                variable: variable.to_string(),
                coordinate: coordinate.to_string(),
                index,
                expected,
                actual,
                tolerance: config.coordinate_tolerance,
            });
        }
    }

    Ok(())
}
