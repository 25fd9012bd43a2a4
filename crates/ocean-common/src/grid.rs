//! In-memory grid model shared by the alignment stages.
//!
//! A [`Grid`] is a small dataset: one time coordinate, an optional depth axis,
//! latitude/longitude axes, and one or more [`DataVariable`]s laid out
//! row-major over their dimensions (e.g. `time, depth, latitude, longitude`).

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::time::TimeCoordinate;

/// Dimensions a variable may vary over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Time,
    Depth,
    Latitude,
    Longitude,
}

impl Dimension {
    /// Canonical dimension name as written to disk.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Time => "time",
            Dimension::Depth => "depth",
            Dimension::Latitude => "latitude",
            Dimension::Longitude => "longitude",
        }
    }

    /// Parse a dimension name, accepting the common short forms.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "time" => Some(Dimension::Time),
            "depth" => Some(Dimension::Depth),
            "latitude" | "lat" => Some(Dimension::Latitude),
            "longitude" | "lon" => Some(Dimension::Longitude),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open `[start, end)` index bounds on a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    /// Create a range, returning `None` if `start > end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The whole axis of length `len`.
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the range lies within an axis of length `len`.
    pub fn fits(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for IndexRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// An ascending sequence of coordinate values (latitude, longitude or depth).
///
/// Ascending order is a precondition for index search and is not enforced;
/// use [`CoordinateAxis::is_ascending`] to check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateAxis {
    values: Vec<f64>,
}

impl CoordinateAxis {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Non-strictly ascending check.
    pub fn is_ascending(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Copy out the values in `range`, or `None` if it does not fit.
    pub fn slice(&self, range: IndexRange) -> Option<Self> {
        if !range.fits(self.len()) {
            return None;
        }
        Some(Self::new(self.values[range.as_range()].to_vec()))
    }

    /// First position where the two axes are not bit-identical.
    ///
    /// Returns `(index, self_value, other_value)`; on a length difference the
    /// index is the shorter length and the missing side reads as NaN.
    pub fn first_difference(&self, other: &CoordinateAxis) -> Option<(usize, f64, f64)> {
        let shared = self.len().min(other.len());
        for i in 0..shared {
            if self.values[i].to_bits() != other.values[i].to_bits() {
                return Some((i, self.values[i], other.values[i]));
            }
        }
        if self.len() != other.len() {
            return Some((
                shared,
                self.get(shared).unwrap_or(f64::NAN),
                other.get(shared).unwrap_or(f64::NAN),
            ));
        }
        None
    }

    /// First position where the values differ by more than `tolerance`.
    ///
    /// Both axes are expected to have the same length; extra trailing values
    /// are ignored.
    pub fn first_deviation(&self, other: &CoordinateAxis, tolerance: f64) -> Option<(usize, f64, f64)> {
        self.values
            .iter()
            .zip(other.values.iter())
            .enumerate()
            .find(|(_, (a, b))| {
                let diff = (*a - *b).abs();
                diff.is_nan() || diff > tolerance
            })
            .map(|(i, (a, b))| (i, *a, *b))
    }
}

impl From<Vec<f64>> for CoordinateAxis {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// A variable attribute preserved from the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Numbers(Vec<f64>),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

/// A named numeric field with its dimension order and shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataVariable {
    pub name: String,
    pub dims: Vec<Dimension>,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl DataVariable {
    /// Create a variable, checking that `data` matches `shape`.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<Dimension>,
        shape: Vec<usize>,
        data: Vec<f32>,
    ) -> GridResult<Self> {
        let name = name.into();
        if dims.len() != shape.len() {
            return Err(GridError::invalid_data(
                &name,
                format!("{} dimensions but {} extents", dims.len(), shape.len()),
            ));
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(GridError::invalid_data(
                &name,
                format!("shape {:?} needs {} values, got {}", shape, expected, data.len()),
            ));
        }
        Ok(Self {
            name,
            dims,
            shape,
            data,
            attributes: BTreeMap::new(),
        })
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Position of `dim` in this variable's dimension list.
    pub fn axis_of(&self, dim: Dimension) -> Option<usize> {
        self.dims.iter().position(|d| *d == dim)
    }

    pub fn len_of(&self, dim: Dimension) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.shape[axis])
    }

    pub fn has_dim(&self, dim: Dimension) -> bool {
        self.axis_of(dim).is_some()
    }

    /// Restrict `dim` to `range`; the dimension is kept.
    pub fn slice(&self, dim: Dimension, range: IndexRange) -> GridResult<Self> {
        let axis = self
            .axis_of(dim)
            .ok_or_else(|| GridError::missing_dimension(&self.name, dim.name()))?;
        let len = self.shape[axis];
        if !range.fits(len) {
            return Err(GridError::index_out_of_range(&self.name, dim.name(), range.end, len));
        }

        let data = take_along(&self.data, &self.shape, axis, range.as_range());
        let mut shape = self.shape.clone();
        shape[axis] = range.len();

        Ok(Self {
            name: self.name.clone(),
            dims: self.dims.clone(),
            shape,
            data,
            attributes: self.attributes.clone(),
        })
    }

    /// Pick a single `index` along `dim` and drop that dimension.
    pub fn select(&self, dim: Dimension, index: usize) -> GridResult<Self> {
        let axis = self
            .axis_of(dim)
            .ok_or_else(|| GridError::missing_dimension(&self.name, dim.name()))?;
        let len = self.shape[axis];
        if index >= len {
            return Err(GridError::index_out_of_range(&self.name, dim.name(), index, len));
        }

        let data = take_along(&self.data, &self.shape, axis, index..index + 1);
        let mut dims = self.dims.clone();
        let mut shape = self.shape.clone();
        dims.remove(axis);
        shape.remove(axis);

        Ok(Self {
            name: self.name.clone(),
            dims,
            shape,
            data,
            attributes: self.attributes.clone(),
        })
    }

    /// Add a length-1 dimension at `position`; the data is unchanged.
    pub fn insert_axis(mut self, position: usize, dim: Dimension) -> Self {
        let position = position.min(self.dims.len());
        self.dims.insert(position, dim);
        self.shape.insert(position, 1);
        self
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Copy the sub-block `range` along `axis` out of a row-major buffer.
fn take_along(data: &[f32], shape: &[usize], axis: usize, range: Range<usize>) -> Vec<f32> {
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();
    let n = shape[axis];

    let mut out = Vec::with_capacity(outer * range.len() * inner);
    for o in 0..outer {
        let base = o * n * inner;
        out.extend_from_slice(&data[base + range.start * inner..base + range.end * inner]);
    }
    out
}

/// A set of variables sharing one coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub time: TimeCoordinate,
    pub depth: Option<CoordinateAxis>,
    pub latitude: CoordinateAxis,
    pub longitude: CoordinateAxis,
    pub variables: Vec<DataVariable>,
}

impl Grid {
    /// Create a grid, checking every variable against the coordinate lengths.
    pub fn new(
        time: TimeCoordinate,
        depth: Option<CoordinateAxis>,
        latitude: CoordinateAxis,
        longitude: CoordinateAxis,
        variables: Vec<DataVariable>,
    ) -> GridResult<Self> {
        let grid = Self {
            time,
            depth,
            latitude,
            longitude,
            variables,
        };
        grid.check_shapes()?;
        Ok(grid)
    }

    /// Length of the coordinate for `dim`, if the grid has one.
    pub fn coordinate_len(&self, dim: Dimension) -> Option<usize> {
        match dim {
            Dimension::Time => Some(self.time.len()),
            Dimension::Depth => self.depth.as_ref().map(CoordinateAxis::len),
            Dimension::Latitude => Some(self.latitude.len()),
            Dimension::Longitude => Some(self.longitude.len()),
        }
    }

    fn check_shapes(&self) -> GridResult<()> {
        for var in &self.variables {
            for (dim, &len) in var.dims.iter().zip(var.shape.iter()) {
                let expected = self
                    .coordinate_len(*dim)
                    .ok_or_else(|| GridError::missing_dimension(&var.name, dim.name()))?;
                if expected != len {
                    return Err(GridError::shape_mismatch(&var.name, dim.name(), expected, len));
                }
            }
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&DataVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    /// Label used in error messages: the variable names joined with `+`.
    pub fn label(&self) -> String {
        self.variable_names().join("+")
    }

    /// Restrict latitude and longitude to the given ranges.
    ///
    /// Time and depth pass through unchanged. Empty ranges produce an empty grid.
    pub fn slice_spatial(&self, latitude: IndexRange, longitude: IndexRange) -> GridResult<Self> {
        let label = self.label();
        let lat = self.latitude.slice(latitude).ok_or_else(|| {
            GridError::index_out_of_range(&label, "latitude", latitude.end, self.latitude.len())
        })?;
        let lon = self.longitude.slice(longitude).ok_or_else(|| {
            GridError::index_out_of_range(&label, "longitude", longitude.end, self.longitude.len())
        })?;

        let variables = self
            .variables
            .iter()
            .map(|var| {
                var.slice(Dimension::Latitude, latitude)?
                    .slice(Dimension::Longitude, longitude)
            })
            .collect::<GridResult<Vec<_>>>()?;

        Ok(Self {
            time: self.time.clone(),
            depth: self.depth.clone(),
            latitude: lat,
            longitude: lon,
            variables,
        })
    }

    /// Total number of values across all variables.
    pub fn value_count(&self) -> usize {
        self.variables.iter().map(|v| v.data.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> DataVariable {
        // time=1, depth=2, lat=3, lon=4 ; value = d*100 + j*10 + i
        let mut data = Vec::new();
        for d in 0..2 {
            for j in 0..3 {
                for i in 0..4 {
                    data.push((d * 100 + j * 10 + i) as f32);
                }
            }
        }
        DataVariable::new(
            "thetao",
            vec![Dimension::Time, Dimension::Depth, Dimension::Latitude, Dimension::Longitude],
            vec![1, 2, 3, 4],
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_index_range_rejects_reversed() {
        assert!(IndexRange::new(3, 2).is_none());
        assert_eq!(IndexRange::new(2, 2).unwrap().len(), 0);
        assert!(IndexRange::full(5).fits(5));
        assert!(!IndexRange::new(0, 6).unwrap().fits(5));
    }

    #[test]
    fn test_variable_shape_validation() {
        let err = DataVariable::new("x", vec![Dimension::Latitude], vec![3], vec![0.0; 2]).unwrap_err();
        assert!(matches!(err, GridError::InvalidData { .. }));
    }

    #[test]
    fn test_slice_innermost_and_middle_axes() {
        let var = cube();
        let sliced = var
            .slice(Dimension::Latitude, IndexRange::new(1, 3).unwrap())
            .unwrap()
            .slice(Dimension::Longitude, IndexRange::new(2, 4).unwrap())
            .unwrap();
        assert_eq!(sliced.shape, vec![1, 2, 2, 2]);
        assert_eq!(
            sliced.data,
            vec![12.0, 13.0, 22.0, 23.0, 112.0, 113.0, 122.0, 123.0]
        );
    }

    #[test]
    fn test_select_drops_dimension() {
        let var = cube();
        let top = var.select(Dimension::Depth, 1).unwrap();
        assert_eq!(top.dims, vec![Dimension::Time, Dimension::Latitude, Dimension::Longitude]);
        assert_eq!(top.shape, vec![1, 3, 4]);
        assert_eq!(top.data[0], 100.0);
        assert_eq!(top.data[11], 123.0);
    }

    #[test]
    fn test_select_out_of_range() {
        let err = cube().select(Dimension::Depth, 2).unwrap_err();
        assert!(matches!(err, GridError::IndexOutOfRange { index: 2, len: 2, .. }));
    }

    #[test]
    fn test_first_difference_is_bitwise() {
        let a = CoordinateAxis::new(vec![1.0, 2.0, 3.0]);
        let b = CoordinateAxis::new(vec![1.0, 2.0 + 1e-12, 3.0]);
        assert_eq!(a.first_difference(&a.clone()), None);
        assert_eq!(a.first_difference(&b).map(|d| d.0), Some(1));
        assert!(a.first_deviation(&b, 1e-9).is_none());
    }

    #[test]
    fn test_grid_new_checks_coordinate_lengths() {
        let err = Grid::new(
            TimeCoordinate::single(0.0, "hours since 1950-01-01"),
            Some(CoordinateAxis::new(vec![0.5, 1.5])),
            CoordinateAxis::new(vec![10.0, 10.5]),
            CoordinateAxis::new(vec![0.0, 1.0, 2.0, 3.0]),
            vec![cube()],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { expected: 2, actual: 3, .. }));
    }
}
