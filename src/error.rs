//! Defines the crate-wide error type.
//!
//! Parse-time variants abort model construction; query, traversal and highlight
//! variants are returned per call and leave the model untouched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FramError {
    /// The document is not well-formed XML or has no root element.
    #[error("Malformed .xfmv document: {0}")]
    MalformedFile(String),

    /// A required field is absent, or a numeric field does not parse.
    #[error("Missing or invalid field '{field}' in {element}")]
    MissingField { element: String, field: String },

    /// An id or name that the model does not know.
    #[error("Unknown function reference: {0}")]
    UnknownFunctionReference(String),

    #[error("Invalid aspect code '{0}'")]
    InvalidAspectCode(String),

    /// The two curve endpoints coincide, so no bend direction exists.
    #[error("Degenerate curve geometry: endpoints coincide at ({x}, {y})")]
    DegenerateGeometry { x: f64, y: f64 },

    #[error("Observation table has no rows")]
    EmptyDataset,

    #[error("Observation table has no column named '{0}'")]
    MissingObservationColumn(String),

    #[error("Malformed observation table: {0}")]
    MalformedObservations(String),

    #[error("Invalid model option: {0}")]
    InvalidOption(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

impl FramError {
    pub(crate) fn missing(element: impl Into<String>, field: impl Into<String>) -> Self {
        FramError::MissingField { element: element.into(), field: field.into() }
    }
}

pub type Result<T> = std::result::Result<T, FramError>;
