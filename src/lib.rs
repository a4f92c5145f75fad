//! Core of framalytics: reads FRAM `.xfmv` models, indexes them, and answers
//! structural and data-driven questions about them.
//!
//! The Python extension module `_core` is compiled in with the `python` feature.

pub mod analysis;
pub mod display;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod store;

#[cfg(feature = "python")]
pub mod bindings;

pub use analysis::{compute_frequencies, Appearance, ColumnType, HighlightOverlay, ObservationTable, QueryEngine};
pub use display::Scene;
pub use error::{FramError, Result};
pub use model::{Connection, FramModel, Function, ModelOptions};
pub use store::{Aspect, ConnectionId, FunctionId, FunctionRef, Point};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `framalytics._core` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyFram>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
