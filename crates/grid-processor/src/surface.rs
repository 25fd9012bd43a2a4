//! Extraction of one hourly sea-level slice from a full-day series.
//!
//! The sea-level source holds 24 hourly steps with a trivial depth axis. One
//! hour is picked, depth is dropped (not averaged), the field is renamed to
//! `zos`, sliced like the 3D sources, and re-stamped with the reference
//! grid's own timestamp so the merged time axis is single-valued.

use ocean_common::{names, CoordinateAxis, Dimension, Grid, GridError, GridResult, IndexRange};
use tracing::debug;

use crate::align::relabel_spatial;
use crate::bounds::ResolvedBounds;
use crate::config::AlignConfig;
use crate::reference::ReferenceGrid;

/// Number of hourly steps in a full-day sea-level file.
pub const HOURS_PER_DAY: usize = 24;

/// Pulls the sea-surface-height field for one hour out of a daily source.
pub struct SurfaceSliceExtractor<'a> {
    reference: &'a ReferenceGrid,
    bounds: &'a ResolvedBounds,
    config: &'a AlignConfig,
    source_variable: String,
}

impl<'a> SurfaceSliceExtractor<'a> {
    pub fn new(
        reference: &'a ReferenceGrid,
        bounds: &'a ResolvedBounds,
        config: &'a AlignConfig,
    ) -> Self {
        Self {
            reference,
            bounds,
            config,
            source_variable: names::SEA_SURFACE_HEIGHT.to_string(),
        }
    }

    /// Read the field from a differently named source variable.
    pub fn with_source_variable(mut self, name: impl Into<String>) -> Self {
        self.source_variable = name.into();
        self
    }

    /// Extract `hour` as a `zos` grid on the reference coordinates.
    ///
    /// The result has dimensions `time, latitude, longitude` and no depth axis.
    pub fn extract(&self, source: &Grid, hour: usize) -> GridResult<Grid> {
        let var = source.variable(&self.source_variable).ok_or_else(|| {
            GridError::invalid_data(&self.source_variable, "variable not present in sea-level source")
        })?;

        let steps = var
            .len_of(Dimension::Time)
            .ok_or_else(|| GridError::missing_dimension(&var.name, "time"))?;
        if hour >= HOURS_PER_DAY || hour >= steps {
            return Err(GridError::index_out_of_range(&var.name, "time", hour, steps));
        }

        let mut field = var.select(Dimension::Time, hour)?;
        if field.has_dim(Dimension::Depth) {
            field = field.select(Dimension::Depth, 0)?;
        }
        let field = field
            .renamed(names::ZOS)
            .slice(Dimension::Latitude, self.bounds.latitude)?
            .slice(Dimension::Longitude, self.bounds.longitude)?
            .insert_axis(0, Dimension::Time);

        let source_time = source.time.values.get(hour).copied();
        let native = Grid::new(
            self.reference.time().clone(),
            None,
            self.slice_axis(&source.latitude, self.bounds.latitude, "latitude")?,
            self.slice_axis(&source.longitude, self.bounds.longitude, "longitude")?,
            vec![field],
        )?;
        let grid = relabel_spatial(native, self.reference, self.config)?;

        debug!(
            hour = hour,
            source_time = ?source_time,
            reference_time = ?self.reference.time().values.first(),
            "Extracted sea-level slice"
        );

        Ok(grid)
    }

    fn slice_axis(
        &self,
        axis: &CoordinateAxis,
        range: IndexRange,
        dimension: &str,
    ) -> GridResult<CoordinateAxis> {
        axis.slice(range).ok_or_else(|| {
            GridError::index_out_of_range(&self.source_variable, dimension, range.end, axis.len())
        })
    }
}
