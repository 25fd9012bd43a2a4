//! End-to-end alignment and merge for one (date, hour, bbox) request.
//!
//! ```text
//! thetao ──► BoundsResolver ──► ReferenceGrid ─────────────────┐
//!                 │                                             │
//!                 ├──► GridAligner(so)          ────────────────┤
//!                 ├──► GridAligner(uo+vo)       ────────────────┼──► Merger ──► MergedGrid
//!                 └──► SurfaceSliceExtractor(ssh, hour) ────────┘
//! ```
//!
//! Every stage is a pure function over already-loaded grids; reading the
//! source files and writing the result belong to the caller.

use ocean_common::{names, GeoBoundingBox, Grid, GridError, GridResult};
use tracing::{info, warn};

use crate::align::GridAligner;
use crate::bounds::{BoundsResolver, ResolvedBounds};
use crate::config::AlignConfig;
use crate::merge::{merge, MergedGrid};
use crate::reference::ReferenceGrid;
use crate::surface::SurfaceSliceExtractor;

/// The four materialised sources of one run.
#[derive(Debug, Clone)]
pub struct MergeInputs {
    /// 3D potential temperature (`thetao`); defines the reference grid.
    pub temperature: Grid,
    /// 3D salinity (`so`).
    pub salinity: Grid,
    /// 3D currents (`uo`, `vo`).
    pub currents: Grid,
    /// Full-day hourly sea level.
    pub sea_level: Grid,
}

/// What to cut out of the sources.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRequest {
    /// Hour (0-23) to pick from the sea-level series.
    pub hour: usize,
    /// Region of interest; `None` keeps the full native extent.
    pub bbox: Option<GeoBoundingBox>,
    /// Name of the sea-level variable in its source file.
    pub sea_level_variable: String,
}

impl MergeRequest {
    pub fn new(hour: usize, bbox: Option<GeoBoundingBox>) -> Self {
        Self {
            hour,
            bbox,
            sea_level_variable: names::SEA_SURFACE_HEIGHT.to_string(),
        }
    }

    pub fn with_sea_level_variable(mut self, name: impl Into<String>) -> Self {
        self.sea_level_variable = name.into();
        self
    }
}

/// Resolve, align, extract and merge all four sources.
pub fn merge_sources(
    inputs: MergeInputs,
    request: &MergeRequest,
    config: &AlignConfig,
) -> GridResult<MergedGrid> {
    let MergeInputs {
        temperature,
        salinity,
        currents,
        sea_level,
    } = inputs;

    if !temperature.latitude.is_ascending() || !temperature.longitude.is_ascending() {
        warn!("Reference axes are not ascending; index ranges may be wrong");
    }

    if let Some(bbox) = request.bbox.as_ref().filter(|b| b.is_inverted()) {
        warn!(bbox = %bbox, "Bounding box has min > max; selection will be empty");
    }

    let bounds = BoundsResolver::new(&temperature.latitude, &temperature.longitude)
        .resolve(request.bbox.as_ref());
    log_bounds(&bounds, &temperature);
    check_selection(&bounds, config)?;

    let reference = ReferenceGrid::from_source(&temperature, &bounds)?;
    drop(temperature);

    let aligner = GridAligner::new(&reference, &bounds, config);
    let salinity = aligner.align(&salinity)?;
    let currents = aligner.align(&currents)?;

    let sea_level = SurfaceSliceExtractor::new(&reference, &bounds, config)
        .with_source_variable(&request.sea_level_variable)
        .extract(&sea_level, request.hour)?;

    let merged = merge(reference, vec![salinity, currents, sea_level])?;

    info!(
        variables = ?merged.variable_names(),
        latitudes = merged.latitude.len(),
        longitudes = merged.longitude.len(),
        valid_time = ?merged.time.datetime(0),
        "Merged sources onto reference grid"
    );

    Ok(merged)
}

fn check_selection(bounds: &ResolvedBounds, config: &AlignConfig) -> GridResult<()> {
    if config.allow_empty {
        return Ok(());
    }
    for (dimension, range) in [("latitude", bounds.latitude), ("longitude", bounds.longitude)] {
        if range.is_empty() {
            return Err(GridError::EmptySelection {
                dimension: dimension.to_string(),
                start: range.start,
                end: range.end,
            });
        }
    }
    Ok(())
}

fn log_bounds(bounds: &ResolvedBounds, reference: &Grid) {
    match bounds.covered(&reference.latitude, &reference.longitude) {
        Some((lat0, lat1, lon0, lon1)) => info!(
            lat_range = %bounds.latitude,
            lon_range = %bounds.longitude,
            lat_first = lat0,
            lat_last = lat1,
            lon_first = lon0,
            lon_last = lon1,
            full_extent = bounds.requested.is_none(),
            "Resolved bounding box on reference grid"
        ),
        None => warn!(
            lat_range = %bounds.latitude,
            lon_range = %bounds.longitude,
            bbox = %bounds.effective,
            "Bounding box selects no grid points"
        ),
    }
}
