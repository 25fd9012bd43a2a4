//! NetCDF I/O for GLORYS reanalysis grids.
//!
//! Source files are read into [`ocean_common::Grid`] values with CF
//! mask-and-scale applied, and merged grids are written back out as CF-1.8
//! NetCDF-4 files.
//!
//! # Implementation Notes
//!
//! Reading and writing go through the `netcdf` crate, which links against
//! libnetcdf and HDF5. Call [`silence_hdf5_errors`] once at startup to keep
//! HDF5 from printing diagnostics for handled errors.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use reader::{read_grid, silence_hdf5_errors};
pub use writer::write_merged;
