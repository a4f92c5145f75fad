use crate::error::{FramError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `IDNr` of a function, as written in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Position of a connection in the model's connection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// One of the six connection points of a FRAM function.
///
/// Serialized as its single-letter code, which is how the file format and the
/// connection table spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Aspect {
    #[serde(rename = "I")]
    Input,
    #[serde(rename = "O")]
    Output,
    #[serde(rename = "T")]
    Time,
    #[serde(rename = "C")]
    Control,
    #[serde(rename = "P")]
    Precondition,
    #[serde(rename = "R")]
    Resource,
}

impl Aspect {
    pub const ALL: [Aspect; 6] = [
        Aspect::Time,
        Aspect::Control,
        Aspect::Input,
        Aspect::Output,
        Aspect::Precondition,
        Aspect::Resource,
    ];

    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "I" => Ok(Aspect::Input),
            "O" => Ok(Aspect::Output),
            "T" => Ok(Aspect::Time),
            "C" => Ok(Aspect::Control),
            "P" => Ok(Aspect::Precondition),
            "R" => Ok(Aspect::Resource),
            other => Err(FramError::InvalidAspectCode(other.to_string())),
        }
    }

    /// Parses a code that must name the receiving end of a connection.
    pub fn destination_from_code(code: &str) -> Result<Self> {
        match Self::from_code(code)? {
            Aspect::Output => Err(FramError::InvalidAspectCode(code.trim().to_string())),
            aspect => Ok(aspect),
        }
    }

    /// The element name used by the legacy schema (`<Input>`, `<Output>`, ...).
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "Input" => Some(Aspect::Input),
            "Output" => Some(Aspect::Output),
            "Time" => Some(Aspect::Time),
            "Control" => Some(Aspect::Control),
            "Precondition" => Some(Aspect::Precondition),
            "Resource" => Some(Aspect::Resource),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Aspect::Input => "I",
            Aspect::Output => "O",
            Aspect::Time => "T",
            Aspect::Control => "C",
            Aspect::Precondition => "P",
            Aspect::Resource => "R",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

/// A function addressed either by id or by display name.
///
/// Resolved once, at the API boundary, into a `FunctionId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionRef {
    ById(u32),
    ByName(String),
}

impl From<u32> for FunctionRef {
    fn from(id: u32) -> Self { FunctionRef::ById(id) }
}

impl From<FunctionId> for FunctionRef {
    fn from(id: FunctionId) -> Self { FunctionRef::ById(id.0) }
}

impl From<&str> for FunctionRef {
    fn from(name: &str) -> Self { FunctionRef::ByName(name.to_string()) }
}

impl From<String> for FunctionRef {
    fn from(name: String) -> Self { FunctionRef::ByName(name) }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionRef::ById(id) => write!(f, "id {}", id),
            FunctionRef::ByName(name) => write!(f, "name '{}'", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn offset(&self, dx: f64, dy: f64) -> Self { Self::new(self.x + dx, self.y + dy) }

    pub fn lerp(&self, other: &Point, t: f64) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Border appearance recorded at parse time.
///
/// The values are what the rendering side draws; the core only stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: String,
    pub width: f64,
}

impl Border {
    pub const DEFAULT_COLOR: &'static str = "black";
    pub const DEFAULT_WIDTH: f64 = 0.5;
    pub const COLORED_WIDTH: f64 = 3.0;

    /// Converts the file's 32-bit integer color into a `#rrggbb` border.
    pub fn from_color(color: Option<u32>) -> Self {
        match color {
            Some(c) => Self { color: format!("#{:06x}", c & 0x00ff_ffff), width: Self::COLORED_WIDTH },
            None => Self::default(),
        }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self { color: Self::DEFAULT_COLOR.to_string(), width: Self::DEFAULT_WIDTH }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("I", Aspect::Input)]
    #[case("O", Aspect::Output)]
    #[case("T", Aspect::Time)]
    #[case("C", Aspect::Control)]
    #[case("P", Aspect::Precondition)]
    #[case(" R ", Aspect::Resource)]
    fn test_aspect_codes(#[case] code: &str, #[case] expected: Aspect) {
        let aspect = Aspect::from_code(code).unwrap();
        assert_eq!(aspect, expected);
        assert_eq!(aspect.code(), code.trim());
    }

    #[test]
    fn test_invalid_aspect_codes() {
        assert_eq!(Aspect::from_code("X"), Err(FramError::InvalidAspectCode("X".into())));
        assert_eq!(Aspect::from_code(""), Err(FramError::InvalidAspectCode("".into())));
        // Output is a valid aspect, but never the receiving end of a connection.
        assert_eq!(Aspect::destination_from_code("O"), Err(FramError::InvalidAspectCode("O".into())));
        assert_eq!(Aspect::destination_from_code("C"), Ok(Aspect::Control));
    }

    #[test]
    fn test_border_from_color() {
        assert_eq!(Border::from_color(Some(1555713)).color, "#17bd01");
        assert_eq!(Border::from_color(Some(255)).color, "#0000ff");
        assert_eq!(Border::from_color(Some(255)).width, Border::COLORED_WIDTH);

        let default = Border::from_color(None);
        assert_eq!(default.color, "black");
        assert_eq!(default.width, 0.5);
    }
}
