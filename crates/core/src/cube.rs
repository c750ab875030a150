//! Labeled N-D data cube

use crate::error::{Error, Result};
use ndarray::{ArrayD, IxDyn};

/// Name of the dimension the preprocessing engines operate along.
pub const TIME_DIM: &str = "time";

/// A labeled N-D array of `f64` samples.
///
/// `Cube` pairs an [`ArrayD`] with one name per axis, in axis order.
/// One axis is conventionally named [`TIME_DIM`]; the remaining axes
/// (pixel rows/columns, bands, ...) are broadcast dimensions that the
/// engines never touch. Missing samples are `f64::NAN`.
///
/// # Example
///
/// ```ignore
/// use verdis_core::Cube;
///
/// // A 24-epoch stack of 64x64 pixels
/// let cube = Cube::filled(&[24, 64, 64], &["time", "row", "col"], 0.0)?;
/// assert_eq!(cube.axis_of("time")?, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Cube {
    /// Cube values, axis order matching `dims`
    data: ArrayD<f64>,
    /// One name per axis
    dims: Vec<String>,
}

impl Cube {
    /// Create a cube from an existing array and one name per axis.
    ///
    /// Names must be unique and match the array rank.
    pub fn new<S: AsRef<str>>(data: ArrayD<f64>, dims: &[S]) -> Result<Self> {
        if dims.len() != data.ndim() {
            return Err(Error::DimensionMismatch {
                expected: dims.len(),
                actual: data.ndim(),
            });
        }
        for (i, name) in dims.iter().enumerate() {
            if dims[..i].iter().any(|d| d.as_ref() == name.as_ref()) {
                return Err(Error::DuplicateDimension {
                    name: name.as_ref().to_string(),
                });
            }
        }
        Ok(Self {
            data,
            dims: dims.iter().map(|d| d.as_ref().to_string()).collect(),
        })
    }

    /// Create a cube of the given shape filled with a value
    pub fn filled<S: AsRef<str>>(shape: &[usize], dims: &[S], value: f64) -> Result<Self> {
        Self::new(ArrayD::from_elem(IxDyn(shape), value), dims)
    }

    /// Create a cube from a flat row-major vector
    pub fn from_shape_vec<S: AsRef<str>>(
        shape: &[usize],
        dims: &[S],
        data: Vec<f64>,
    ) -> Result<Self> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Self::new(array, dims)
    }

    // Dimensions

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Shape as a slice, axis order matching `dims()`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the cube holds no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Axis names, in axis order
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Position of the named axis
    pub fn axis_of(&self, name: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|d| d == name)
            .ok_or_else(|| Error::UnknownDimension {
                name: name.to_string(),
            })
    }

    /// Position of the time axis
    pub fn time_axis(&self) -> Result<usize> {
        self.axis_of(TIME_DIM)
    }

    /// Length of the named axis
    pub fn len_of(&self, name: &str) -> Result<usize> {
        Ok(self.data.len_of(ndarray::Axis(self.axis_of(name)?)))
    }

    // Data access

    /// Get value at an index, e.g. `&[t, row, col]`
    pub fn get(&self, index: &[usize]) -> Result<f64> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| Error::Other(format!("index {index:?} out of bounds")))
    }

    /// Set value at an index
    pub fn set(&mut self, index: &[usize], value: f64) -> Result<()> {
        match self.data.get_mut(index) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::Other(format!("index {index:?} out of bounds"))),
        }
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    /// Consume the cube and return the underlying array
    pub fn into_array(self) -> ArrayD<f64> {
        self.data
    }

    // Statistics

    /// Basic statistics over all cells, skipping missing samples
    pub fn statistics(&self) -> CubeStatistics {
        let mut min = None;
        let mut max = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter() {
            if value.is_nan() {
                continue;
            }
            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }
            sum += value;
            count += 1;
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        CubeStatistics {
            min,
            max,
            mean,
            valid_count: count,
            missing_count: self.len() - count,
        }
    }
}

/// Basic statistics for a cube
#[derive(Debug, Clone)]
pub struct CubeStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub missing_count: usize,
}
