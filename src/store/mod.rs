//! Core identifiers and the indexed storage behind a FRAM model.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{Aspect, Border, ConnectionId, FunctionId, FunctionRef, Point};
