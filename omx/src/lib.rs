//! OMX - Open Matrix containers
//!
//! An OMX container stores a collection of named, equally-shaped 2-D matrices
//! alongside integer mappings (zone numbers and the like) and free-form
//! attributes used to find matrices again.
//!
//! ## Architecture
//!
//! OMX follows a specification/implementation split:
//!
//! - **omx-core**: shapes, attribute values, predicates, reverse lookups and
//!   the single-file layout (no I/O)
//! - **omx**: storage engines, the container façade, configuration and errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use omx::{MatrixCollection, MatrixData, MatrixOptions, OmxFile, OpenMode, Predicate};
//!
//! fn example() -> omx::OmxResult<()> {
//!     let mut file = OmxFile::open("skims.omx", OpenMode::WriteCreate, None)?;
//!
//!     let time = MatrixData::from_rows(vec![vec![0.0, 12.5], vec![11.0, 0.0]])?;
//!     let options = MatrixOptions::new().with_attribute("timeperiod", "am");
//!     file.create_matrix("time", time, options)?;
//!     file.create_mapping("taz", vec![101, 102], false)?;
//!
//!     for matrix in file.query(&Predicate::new().with("timeperiod", "am"))? {
//!         println!("{} {:?}", matrix.name(), matrix.value(0, 1));
//!     }
//!     let offset = file.mapping("taz")?[&102];
//!     assert_eq!(offset, 1);
//!     file.close()
//! }
//! ```
//!
//! ## Features
//!
//! - **Shape consistency**: the first matrix (or a shape hint) fixes the
//!   container shape for good
//! - **Attribute queries**: conjunctive exact-match predicates
//! - **Mappings**: `u32` indexes with reverse lookups built on read
//! - **Pluggable storage**: any [`StorageEngine`]; in-memory and single-file
//!   engines are bundled, the latter memory-mapped behind the `mmap` feature

pub use omx_core::{
    // Values and queries
    AttrValue, Attributes, Predicate, ReverseLookup, Scalar, Shape,
    // Format definitions
    DataType, FileHeader, MatrixElement,
    // Error handling
    FormatError,
    // Parsing and validation
    first_duplicate, parse_predicate_term, parse_scalar, parse_shape, validate_name,
};

pub mod array;
pub mod config;
pub mod container;
pub mod error;
pub mod mapping_store;
pub mod matrix;
pub mod matrix_store;
pub mod query;
pub mod shape_registry;
pub mod storage;
pub mod summary;

pub use array::{ArrayData, MatrixData};
pub use config::{Filters, OmxConfig, OpenOptions};
pub use container::{MatrixCollection, Matrices, OmxFile};
pub use error::{NodeKind, OmxError, OmxResult};
pub use matrix::{Mapping, Matrix, MatrixOptions, MatrixSource};
pub use query::AttributeQueryEngine;
pub use storage::{FileEngine, MemoryEngine, OpenMode, StorageEngine, StorageError};
pub use summary::{ContainerSummary, MappingSummary, MatrixSummary};
