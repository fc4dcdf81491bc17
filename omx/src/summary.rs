//! Human-readable container summaries

use std::fmt;

use omx_core::{Attributes, DataType, Shape};

/// One matrix in a [`ContainerSummary`]
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSummary {
    pub name: String,
    pub data_type: DataType,
    pub shape: Shape,
    pub attributes: Attributes,
}

/// One mapping in a [`ContainerSummary`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSummary {
    pub name: String,
    pub len: usize,
}

/// Everything about a container except its payloads
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSummary {
    pub version: Option<String>,
    pub created_with: Option<String>,
    pub shape: Option<Shape>,
    pub matrices: Vec<MatrixSummary>,
    pub mappings: Vec<MappingSummary>,
}

impl fmt::Display for ContainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OMX version: {}",
            self.version.as_deref().unwrap_or("unknown")
        )?;
        if let Some(producer) = &self.created_with {
            writeln!(f, "Created with: {producer}")?;
        }
        match self.shape {
            Some(shape) => writeln!(f, "Shape: {shape}")?,
            None => writeln!(f, "Shape: not set")?,
        }

        writeln!(f, "Matrices ({}):", self.matrices.len())?;
        for matrix in &self.matrices {
            write!(f, "  {} [{}, {}]", matrix.name, matrix.data_type, matrix.shape)?;
            if !matrix.attributes.is_empty() {
                let attrs: Vec<String> = matrix
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                write!(f, " {{{}}}", attrs.join(", "))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Mappings ({}):", self.mappings.len())?;
        for mapping in &self.mappings {
            writeln!(f, "  {} ({} entries)", mapping.name, mapping.len)?;
        }
        Ok(())
    }
}
