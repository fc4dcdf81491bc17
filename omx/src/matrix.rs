//! Matrix and mapping handles
//!
//! Handles are detached snapshots: reading a matrix copies its payload,
//! title, filters and attributes out of the engine. A handle from one
//! container can be assigned into another, which performs a full copy.

use omx_core::{Attributes, DataType, MatrixElement, ReverseLookup, Scalar, Shape};

use crate::array::{ArrayData, MatrixData};
use crate::config::Filters;

/// A named matrix read from a container
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub(crate) name: String,
    pub(crate) data: MatrixData,
    pub(crate) title: String,
    pub(crate) filters: Option<Filters>,
    pub(crate) attributes: Attributes,
}

impl Matrix {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        self.data.shape()
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filters(&self) -> Option<&Filters> {
        self.filters.as_ref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// A single attribute value
    pub fn attribute(&self, key: &str) -> Option<&Scalar> {
        self.attributes.get(key)
    }

    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// Row-major typed view, `None` if `T` is not the stored element type
    pub fn values<T: MatrixElement>(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Element at (row, col), widened to f64
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row, col)
    }

    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        self.data.row(row)
    }

    pub fn col(&self, col: usize) -> Option<Vec<f64>> {
        self.data.col(col)
    }

    pub fn into_data(self) -> MatrixData {
        self.data
    }
}

/// A named mapping read from a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub(crate) name: String,
    pub(crate) entries: Vec<u32>,
}

impl Mapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored entries, in order
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value to zero-based offset; on duplicate values the last offset wins
    pub fn reverse_lookup(&self) -> ReverseLookup {
        omx_core::reverse_lookup(&self.entries)
    }
}

/// Anything that can be assigned into a container under a name
#[derive(Debug, Clone)]
pub enum MatrixSource {
    /// A dense array; element type and shape are inferred from it
    Array(MatrixData),
    /// An existing matrix, copied with its title, filters and attributes
    Matrix(Matrix),
}

impl From<MatrixData> for MatrixSource {
    fn from(data: MatrixData) -> Self {
        MatrixSource::Array(data)
    }
}

impl From<Matrix> for MatrixSource {
    fn from(matrix: Matrix) -> Self {
        MatrixSource::Matrix(matrix)
    }
}

impl From<&Matrix> for MatrixSource {
    fn from(matrix: &Matrix) -> Self {
        MatrixSource::Matrix(matrix.clone())
    }
}

/// Per-matrix creation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixOptions {
    pub title: String,
    /// Overrides the container's default filters when set
    pub filters: Option<Filters>,
    pub attributes: Attributes,
}

impl MatrixOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Add one attribute; a repeated key replaces the earlier value
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl Matrix {
    pub(crate) fn from_parts(
        name: &str,
        shape: Shape,
        values: ArrayData,
        title: String,
        filters: Option<Filters>,
        attributes: Attributes,
    ) -> crate::OmxResult<Self> {
        Ok(Self {
            name: name.to_string(),
            data: MatrixData::from_array(shape, values)?,
            title,
            filters,
            attributes,
        })
    }
}
