//! Writing merged grids as CF-1.8 NetCDF-4 files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use grid_processor::MergedGrid;
use ocean_common::{AttributeValue, CoordinateAxis, DataVariable};
use tracing::info;

use crate::error::NetCdfResult;

const TIME: &str = "time";
const DEPTH: &str = "depth";
const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";

/// Write `merged` to `path`, creating parent directories as needed.
///
/// Coordinates are written as `f64`, data variables as `f32` with a NaN
/// `_FillValue`. Source attributes are carried over. A zero-length
/// dimension becomes unlimited and its variables are left unwritten.
///
/// The file is built at a `.partial` sibling and renamed into place only once
/// complete; on error nothing is left at `path`.
pub fn write_merged(path: impl AsRef<Path>, merged: &MergedGrid) -> NetCdfResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    if let Err(e) = write_contents(&partial, merged) {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&partial, path) {
        let _ = std::fs::remove_file(&partial);
        return Err(e.into());
    }

    info!(
        path = %path.display(),
        variables = ?merged.variable_names(),
        "Wrote merged NetCDF file"
    );

    Ok(())
}

/// `merged.nc` -> `merged.nc.partial`, in the same directory.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_contents(path: &Path, merged: &MergedGrid) -> NetCdfResult<()> {
    let mut file = netcdf::create(path)?;

    file.add_dimension(TIME, merged.time.len())?;
    if let Some(depth) = &merged.depth {
        file.add_dimension(DEPTH, depth.len())?;
    }
    file.add_dimension(LATITUDE, merged.latitude.len())?;
    file.add_dimension(LONGITUDE, merged.longitude.len())?;

    // Time
    {
        let mut time_var = file.add_variable::<f64>(TIME, &[TIME])?;
        time_var.put_attribute("standard_name", "time")?;
        time_var.put_attribute("axis", "T")?;
        if let Some(units) = &merged.time.units {
            time_var.put_attribute("units", units.as_str())?;
        }
        if let Some(calendar) = &merged.time.calendar {
            time_var.put_attribute("calendar", calendar.as_str())?;
        }
        if !merged.time.is_empty() {
            time_var.put_values(&merged.time.values, ..)?;
        }
    }

    // Depth
    if let Some(depth) = &merged.depth {
        let mut depth_var = file.add_variable::<f64>(DEPTH, &[DEPTH])?;
        depth_var.put_attribute("standard_name", "depth")?;
        depth_var.put_attribute("long_name", "Depth")?;
        depth_var.put_attribute("units", "m")?;
        depth_var.put_attribute("positive", "down")?;
        depth_var.put_attribute("axis", "Z")?;
        put_axis(&mut depth_var, depth)?;
    }

    // Latitude
    {
        let mut lat_var = file.add_variable::<f64>(LATITUDE, &[LATITUDE])?;
        lat_var.put_attribute("standard_name", "latitude")?;
        lat_var.put_attribute("long_name", "Latitude")?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_attribute("axis", "Y")?;
        put_axis(&mut lat_var, &merged.latitude)?;
    }

    // Longitude
    {
        let mut lon_var = file.add_variable::<f64>(LONGITUDE, &[LONGITUDE])?;
        lon_var.put_attribute("standard_name", "longitude")?;
        lon_var.put_attribute("long_name", "Longitude")?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_attribute("axis", "X")?;
        put_axis(&mut lon_var, &merged.longitude)?;
    }

    for variable in &merged.variables {
        write_data_variable(&mut file, variable)?;
    }

    file.add_attribute("Conventions", "CF-1.8")?;
    file.add_attribute("title", "Merged GLORYS ocean state")?;
    file.add_attribute(
        "history",
        format!(
            "{}: merged {} onto the {} grid",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            merged.variable_names().join(", "),
            ocean_common::names::THETAO
        )
        .as_str(),
    )?;
    if let Some(valid_time) = merged.time.datetime(0) {
        file.add_attribute("valid_time", valid_time.to_rfc3339().as_str())?;
    }

    Ok(())
}

fn put_axis(var: &mut netcdf::VariableMut, axis: &CoordinateAxis) -> NetCdfResult<()> {
    if !axis.is_empty() {
        var.put_values(axis.values(), ..)?;
    }
    Ok(())
}

fn write_data_variable(file: &mut netcdf::FileMut, variable: &DataVariable) -> NetCdfResult<()> {
    let dims: Vec<&str> = variable.dims.iter().map(|d| d.name()).collect();
    let mut var = file.add_variable::<f32>(&variable.name, &dims)?;

    // _FillValue has to be set before any data is written.
    var.put_attribute("_FillValue", f32::NAN)?;
    for (name, value) in &variable.attributes {
        match value {
            AttributeValue::Text(s) => var.put_attribute(name, s.as_str())?,
            AttributeValue::Integer(v) => var.put_attribute(name, *v)?,
            AttributeValue::Number(v) => var.put_attribute(name, *v)?,
            AttributeValue::Numbers(v) => var.put_attribute(name, v.clone())?,
        };
    }

    if !variable.data.is_empty() {
        var.put_values(&variable.data, ..)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path_is_sibling() {
        assert_eq!(
            partial_path(Path::new("out/merged.nc")),
            PathBuf::from("out/merged.nc.partial")
        );
        assert_eq!(partial_path(Path::new("m.nc")), PathBuf::from("m.nc.partial"));
    }
}
