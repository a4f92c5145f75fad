//! Port layout, curve representation and curve synthesis.
pub mod curve;
pub mod ports;
pub mod synthesis;

pub use curve::Curve;
pub use ports::{all_ports, port_offset, port_position};
pub use synthesis::{pair_references, synthesize_curve, ImpliedLink, Quadrant, DEFAULT_CURVINESS};
