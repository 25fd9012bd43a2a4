//! Reading GLORYS source files into grids.
//!
//! Only the coordinate variables and the requested data variables are loaded.
//! Packed variables (`scale_factor` / `add_offset`) are unpacked to `f32` and
//! fill or missing values become NaN, so downstream code only sees physical
//! values.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use ocean_common::{AttributeValue, CoordinateAxis, DataVariable, Dimension, Grid, TimeCoordinate};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Attributes consumed by unpacking and not carried onto the grid.
const PACKING_ATTRIBUTES: [&str; 4] = ["scale_factor", "add_offset", "_FillValue", "missing_value"];

/// Valid-range attributes are in packed units and dropped for packed variables.
const PACKED_RANGE_ATTRIBUTES: [&str; 3] = ["valid_min", "valid_max", "valid_range"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call more than once. Call it early in `main()`, before any file is
/// opened, or some HDF5 operations may still print.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read the coordinates and the named data variables of one source file.
///
/// Latitude and longitude are looked up as `latitude`/`lat` and
/// `longitude`/`lon`; `time` is required and `depth` is optional.
pub fn read_grid(path: impl AsRef<Path>, variables: &[&str]) -> NetCdfResult<Grid> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let file = netcdf::open(path)?;

    let time = read_time(&file)?;
    let depth = find_variable(&file, &["depth"])
        .map(|var| read_axis(&var))
        .transpose()?;
    let latitude = find_variable(&file, &["latitude", "lat"])
        .ok_or_else(|| NetCdfError::MissingData("latitude variable".to_string()))
        .and_then(|var| read_axis(&var))?;
    let longitude = find_variable(&file, &["longitude", "lon"])
        .ok_or_else(|| NetCdfError::MissingData("longitude variable".to_string()))
        .and_then(|var| read_axis(&var))?;

    let data_variables = variables
        .iter()
        .map(|name| {
            let var = file
                .variable(name)
                .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
            read_data_variable(&var)
        })
        .collect::<NetCdfResult<Vec<_>>>()?;

    debug!(
        path = %path.display(),
        variables = ?variables,
        time_steps = time.len(),
        depth_levels = depth.as_ref().map_or(0, CoordinateAxis::len),
        latitudes = latitude.len(),
        longitudes = longitude.len(),
        "Read NetCDF grid"
    );

    Ok(Grid::new(time, depth, latitude, longitude, data_variables)?)
}

// =============================================================================
// Internal helpers
// =============================================================================

fn find_variable<'f>(file: &'f netcdf::File, names: &[&str]) -> Option<netcdf::Variable<'f>> {
    names.iter().find_map(|name| file.variable(name))
}

fn read_axis(var: &netcdf::Variable) -> NetCdfResult<CoordinateAxis> {
    let values: Vec<f64> = var.get_values(..)?;
    Ok(CoordinateAxis::new(values))
}

fn read_time(file: &netcdf::File) -> NetCdfResult<TimeCoordinate> {
    let var = file
        .variable("time")
        .ok_or_else(|| NetCdfError::MissingData("time variable".to_string()))?;
    let values: Vec<f64> = var.get_values(..)?;
    Ok(TimeCoordinate {
        values,
        units: get_string_attr(&var, "units"),
        calendar: get_string_attr(&var, "calendar"),
    })
}

fn read_data_variable(var: &netcdf::Variable) -> NetCdfResult<DataVariable> {
    let name = var.name();

    let mut dims = Vec::new();
    let mut shape = Vec::new();
    for dim in var.dimensions() {
        let dim_name = dim.name();
        let dimension = Dimension::from_name(&dim_name).ok_or_else(|| {
            NetCdfError::InvalidFormat(format!("{}: unsupported dimension '{}'", name, dim_name))
        })?;
        dims.push(dimension);
        shape.push(dim.len());
    }

    let raw: Vec<f32> = var.get_values(..)?;

    let scale_factor = get_f64_attr(var, "scale_factor");
    let add_offset = get_f64_attr(var, "add_offset");
    let fill_value = get_f64_attr(var, "_FillValue");
    let missing_value = get_f64_attr(var, "missing_value");
    let packed = scale_factor.is_some() || add_offset.is_some();

    let data = mask_and_scale(
        raw,
        scale_factor.unwrap_or(1.0),
        add_offset.unwrap_or(0.0),
        [fill_value, missing_value],
    );

    let mut attributes = BTreeMap::new();
    for attr in var.attributes() {
        let attr_name = attr.name().to_string();
        if PACKING_ATTRIBUTES.contains(&attr_name.as_str())
            || (packed && PACKED_RANGE_ATTRIBUTES.contains(&attr_name.as_str()))
        {
            continue;
        }
        if let Some(value) = attr.value().ok().and_then(convert_attribute) {
            attributes.insert(attr_name, value);
        }
    }

    let mut variable = DataVariable::new(name, dims, shape, data)?;
    variable.attributes = attributes;
    Ok(variable)
}

/// Apply CF unpacking: `raw * scale + offset`, with fill values set to NaN.
fn mask_and_scale(raw: Vec<f32>, scale: f64, offset: f64, fills: [Option<f64>; 2]) -> Vec<f32> {
    let is_fill = |v: f32| fills.iter().flatten().any(|fill| f64::from(v) == *fill);

    if scale == 1.0 && offset == 0.0 {
        return raw
            .into_iter()
            .map(|v| if is_fill(v) { f32::NAN } else { v })
            .collect();
    }

    raw.into_iter()
        .map(|v| {
            if is_fill(v) {
                f32::NAN
            } else {
                (f64::from(v) * scale + offset) as f32
            }
        })
        .collect()
}

fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttributeValue> {
    match value {
        netcdf::AttributeValue::Str(s) => Some(AttributeValue::Text(s)),
        netcdf::AttributeValue::Strs(s) => Some(AttributeValue::Text(s.join(","))),
        netcdf::AttributeValue::Short(v) => Some(AttributeValue::Integer(v.into())),
        netcdf::AttributeValue::Int(v) => Some(AttributeValue::Integer(v.into())),
        netcdf::AttributeValue::Longlong(v) => Some(AttributeValue::Integer(v)),
        netcdf::AttributeValue::Floats(v) => {
            Some(AttributeValue::Numbers(v.into_iter().map(f64::from).collect()))
        }
        netcdf::AttributeValue::Doubles(v) => Some(AttributeValue::Numbers(v)),
        other => f64::try_from(other).ok().map(AttributeValue::Number),
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_and_scale_packed() {
        let raw = vec![0.0, 100.0, -32767.0];
        let data = mask_and_scale(raw, 0.001, 20.0, [Some(-32767.0), None]);
        assert_eq!(data[0], 20.0);
        assert!((data[1] - 20.1).abs() < 1e-5);
        assert!(data[2].is_nan());
    }

    #[test]
    fn test_mask_and_scale_unpacked_missing_value() {
        let raw = vec![1.5, 1e20, 2.5];
        let data = mask_and_scale(raw, 1.0, 0.0, [None, Some(f64::from(1e20_f32))]);
        assert_eq!(data[0], 1.5);
        assert!(data[1].is_nan());
        assert_eq!(data[2], 2.5);
    }

    #[test]
    fn test_convert_attribute_variants() {
        assert_eq!(
            convert_attribute(netcdf::AttributeValue::Str("m".into())),
            Some(AttributeValue::Text("m".into()))
        );
        assert_eq!(
            convert_attribute(netcdf::AttributeValue::Int(3)),
            Some(AttributeValue::Integer(3))
        );
        assert_eq!(
            convert_attribute(netcdf::AttributeValue::Double(0.5)),
            Some(AttributeValue::Number(0.5))
        );
    }
}
