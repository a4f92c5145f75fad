//! Row types of the function and connection tables.

use crate::geometry::Curve;
use crate::parser::AspectAttributes;
use crate::store::{Aspect, Border, ConnectionId, FunctionId, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    /// `FunctionType` code. Meaningful only to the rendering side.
    pub function_type: u32,
    pub position: Point,
    pub style: Option<String>,
    /// Raw 32-bit `color` attribute, if any.
    pub color: Option<u32>,
    pub fn_style: Option<String>,
    pub description: Option<String>,
    pub border: Border,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_fn: FunctionId,
    pub to_fn: FunctionId,
    pub to_aspect: Aspect,
    /// The human-readable link label (the `Name` column of the table).
    pub label: String,
    /// `fromId|label|toId|aspectCode`, unique per connection in practice.
    pub raw_name: String,
    pub curve: Curve,
    /// True when the curve was derived rather than read from the file.
    pub synthesized: bool,
    /// `x`, `y`, `directionX`, `directionY`, `notGroup` of the `<Aspect>` element.
    /// Empty for connections paired from legacy references.
    #[serde(default)]
    pub attributes: AspectAttributes,
}

impl Connection {
    pub fn compose_raw_name(from: FunctionId, label: &str, to: FunctionId, aspect: Aspect) -> String {
        format!("{}|{}|{}|{}", from, label, to, aspect.code())
    }
}

/// One row of the `{fromFn, toFn, toAspect, Name}` view of the connection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRow {
    #[serde(rename = "fromFn")]
    pub from_fn: u32,
    #[serde(rename = "toFn")]
    pub to_fn: u32,
    #[serde(rename = "toAspect")]
    pub to_aspect: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl From<&Connection> for ConnectionRow {
    fn from(c: &Connection) -> Self {
        Self {
            from_fn: c.from_fn.0,
            to_fn: c.to_fn.0,
            to_aspect: c.to_aspect.code().to_string(),
            name: c.label.clone(),
        }
    }
}
