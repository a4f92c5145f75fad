//! The quartic Bezier curve carried by every connection.

use crate::error::{FramError, Result};
use crate::store::Point;
use serde::{Deserialize, Serialize};

/// File curves are stored shifted by this amount relative to function centers.
pub const FILE_FRAME_OFFSET: (f64, f64) = (48.0, 50.0);

const FIELD_COUNT: usize = 10;

/// Five control points in drawing order: start, three interior points, end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: [Point; 5],
}

impl Curve {
    pub fn new(points: [Point; 5]) -> Self { Self { points } }

    pub fn start(&self) -> Point { self.points[0] }
    pub fn end(&self) -> Point { self.points[4] }

    /// Decodes the pipe-delimited `Curve` text of an `<Aspect>` element.
    ///
    /// Field layout is `end, start, c1, c3, c2` (x,y pairs). The result is moved
    /// from the file frame into the function frame.
    pub fn from_file_str(raw: &str) -> Result<Self> {
        let fields = raw
            .split('|')
            .map(|f| f.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| FramError::missing("Aspect", "Curve"))?;
        if fields.len() != FIELD_COUNT || fields.iter().any(|v| !v.is_finite()) {
            return Err(FramError::missing("Aspect", "Curve"));
        }

        let (ox, oy) = FILE_FRAME_OFFSET;
        let at = |i: usize| Point::new(fields[i] - ox, fields[i + 1] - oy);
        Ok(Self::new([at(2), at(4), at(8), at(6), at(0)]))
    }

    /// Encodes back into the file layout and frame.
    pub fn to_file_string(&self) -> String {
        let (ox, oy) = FILE_FRAME_OFFSET;
        let [start, c1, c2, c3, end] = self.points;
        [end, start, c1, c3, c2]
            .iter()
            .flat_map(|p| [p.x + ox, p.y + oy])
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Evaluates the curve at `t` (clamped to [0, 1]) by de Casteljau reduction.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let mut work = self.points;
        for level in (1..work.len()).rev() {
            for i in 0..level {
                work[i] = work[i].lerp(&work[i + 1], t);
            }
        }
        work[0]
    }

    /// Samples `segments + 1` evenly spaced points, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments).map(|i| self.point_at(i as f64 / segments as f64)).collect()
    }
}
