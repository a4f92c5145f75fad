//! Fixed port offsets of the six aspects around a function's center.
//!
//! The y axis grows downward, as in the .xfmv coordinate space, so the
//! Time/Control ports sit above the center and Precondition/Resource below.

use crate::store::{Aspect, Point};

pub const TOP_DX: f64 = 23.0;
pub const TOP_DY: f64 = 35.0;
pub const SIDE_DX: f64 = 44.0;

/// Offset of `aspect`'s port from the function center.
pub fn port_offset(aspect: Aspect) -> (f64, f64) {
    match aspect {
        Aspect::Time => (-TOP_DX, -TOP_DY),
        Aspect::Control => (TOP_DX, -TOP_DY),
        Aspect::Input => (-SIDE_DX, 0.0),
        Aspect::Output => (SIDE_DX, 0.0),
        Aspect::Precondition => (-TOP_DX, TOP_DY),
        Aspect::Resource => (TOP_DX, TOP_DY),
    }
}

/// Absolute position of `aspect`'s port for a function centered at `center`.
pub fn port_position(center: Point, aspect: Aspect) -> Point {
    let (dx, dy) = port_offset(aspect);
    center.offset(dx, dy)
}

/// All six ports in T, C, I, O, P, R order.
pub fn all_ports(center: Point) -> [(Aspect, Point); 6] {
    Aspect::ALL.map(|aspect| (aspect, port_position(center, aspect)))
}
