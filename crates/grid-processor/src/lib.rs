//! Grid alignment and merge for ocean reanalysis sources.
//!
//! Independently downloaded temperature, salinity, current and sea-level grids
//! are cut to one bounding box, forced onto the temperature grid's coordinate
//! values, and merged into a single dataset.
//!
//! # Architecture
//!
//! ```text
//! Option<GeoBoundingBox>
//!      │
//!      ▼
//! BoundsResolver::resolve          (binary search on reference lat/lon)
//!      │
//!      ├─► ReferenceGrid::from_source(thetao)
//!      │
//!      ├─► GridAligner::align(so), GridAligner::align(uo+vo)
//!      │
//!      ├─► SurfaceSliceExtractor::extract(ssh, hour)
//!      │
//!      └─► Merger ──► MergedGrid ──► serializer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{merge_sources, AlignConfig, MergeInputs, MergeRequest};
//!
//! let inputs = MergeInputs { temperature, salinity, currents, sea_level };
//! let request = MergeRequest::new(6, Some(bbox));
//! let merged = merge_sources(inputs, &request, &AlignConfig::default())?;
//! ```

pub mod align;
pub mod bounds;
pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod reference;
pub mod surface;

// Re-export commonly used types at crate root
pub use align::GridAligner;
pub use bounds::{lower_index, resolve_axis, upper_index, BoundsResolver, ResolvedBounds};
pub use config::{AlignConfig, DEFAULT_COORDINATE_TOLERANCE};
pub use error::{GridError, Result};
pub use merge::{merge, MergedGrid, MergedSummary, Merger};
pub use ocean_common::{
    CoordinateAxis, DataVariable, Dimension, GeoBoundingBox, Grid, IndexRange, TimeCoordinate,
};
pub use pipeline::{merge_sources, MergeInputs, MergeRequest};
pub use reference::ReferenceGrid;
pub use surface::{SurfaceSliceExtractor, HOURS_PER_DAY};
