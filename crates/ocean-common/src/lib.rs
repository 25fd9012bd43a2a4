//! Common types shared across the GLORYS merge workspace.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod names;
pub mod time;

pub use bbox::GeoBoundingBox;
pub use error::{GridError, GridResult};
pub use grid::{AttributeValue, CoordinateAxis, DataVariable, Dimension, Grid, IndexRange};
pub use time::TimeCoordinate;
