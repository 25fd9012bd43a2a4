//! Canonical variable names used in the merged output.

/// Sea water potential temperature (reference field).
pub const THETAO: &str = "thetao";
/// Sea water salinity.
pub const SO: &str = "so";
/// Eastward sea water velocity.
pub const UO: &str = "uo";
/// Northward sea water velocity.
pub const VO: &str = "vo";
/// Sea surface height above geoid.
pub const ZOS: &str = "zos";

/// Variable name of the hourly sea-level source before renaming to [`ZOS`].
pub const SEA_SURFACE_HEIGHT: &str = "sea_surface_height";

/// Order of the data variables in a merged grid.
pub const MERGED_ORDER: [&str; 5] = [THETAO, SO, UO, VO, ZOS];
