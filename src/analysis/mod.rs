//! Read-only analyses over a built model.
pub mod highlight;
pub mod query;
pub mod topology;

pub use highlight::{
    compute_frequencies, Appearance, ColumnType, Frequencies, FrequencyBand, Highlight, HighlightOverlay, ObservationTable,
};
pub use query::{Neighbours, QueryEngine};
pub use topology::{downstream_closure, downstream_functions, output_paths, upstream_closure};
