//! Decoder for the .xfmv XML dialect.
//!
//! Elements are matched anywhere in the tree, in document order. Two connection
//! schemas exist: `<Aspect>` elements carrying a composite name and a curve, and
//! the legacy per-aspect references (`<Input>`, `<Output>`, ...) that only name a
//! link and its owning function.

use crate::error::{FramError, Result};
use crate::geometry::Curve;
use crate::model::Function;
use crate::store::{Aspect, Border, FunctionId, Point};
use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::path::Path;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Raw attributes of an `<Aspect>` element, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectAttributes {
    pub x: Option<String>,
    pub y: Option<String>,
    #[serde(rename = "directionX")]
    pub direction_x: Option<String>,
    #[serde(rename = "directionY")]
    pub direction_y: Option<String>,
    #[serde(rename = "notGroup")]
    pub not_group: Option<String>,
}

/// A connection as declared by an `<Aspect>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRecord {
    pub from_fn: FunctionId,
    pub to_fn: FunctionId,
    pub to_aspect: Aspect,
    pub label: String,
    pub raw_name: String,
    /// `None` when the element has no `<Curve>` child.
    pub curve: Option<Curve>,
    pub attributes: AspectAttributes,
}

/// A legacy per-aspect reference: function `owner` takes part in link `link_name`
/// through `aspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectReference {
    pub aspect: Aspect,
    pub link_name: String,
    pub owner: FunctionId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub functions: Vec<Function>,
    pub connections: Vec<ConnectionRecord>,
    /// Only populated for documents without `<Aspect>` elements.
    pub references: Vec<AspectReference>,
}

impl ParsedDocument {
    pub fn uses_legacy_schema(&self) -> bool {
        self.connections.is_empty() && !self.references.is_empty()
    }
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| FramError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read .xfmv file");
    parse_bytes(&bytes)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| FramError::MalformedFile(e.to_string()))?;
    parse_str(text)
}

pub fn parse_str(text: &str) -> Result<ParsedDocument> {
    let doc = Document::parse(text).map_err(|e| FramError::MalformedFile(e.to_string()))?;
    let root = doc.root_element();

    let functions = root
        .descendants()
        .filter(|n| n.has_tag_name("Function"))
        .map(parse_function)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(functions.len());
    for f in &functions {
        if !seen.insert(f.id) {
            return Err(FramError::MalformedFile(format!("duplicate function id {}", f.id)));
        }
    }

    let connections = root
        .descendants()
        .filter(|n| n.has_tag_name("Aspect"))
        .map(parse_aspect)
        .collect::<Result<Vec<_>>>()?;

    let references = if connections.is_empty() {
        root.descendants()
            .filter(|n| n.is_element())
            .filter_map(|n| Aspect::from_element_name(n.tag_name().name()).map(|a| (n, a)))
            .map(|(n, aspect)| parse_reference(n, aspect))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    debug!(
        functions = functions.len(),
        connections = connections.len(),
        references = references.len(),
        "parsed .xfmv document"
    );

    Ok(ParsedDocument { functions, connections, references })
}

fn parse_function(node: Node<'_, '_>) -> Result<Function> {
    const EL: &str = "Function";

    let id = required_number::<u32>(EL, "IDNr", child_text(node, "IDNr"))?;
    let name = child_text(node, "IDName").filter(|n| !n.is_empty()).ok_or_else(|| FramError::missing(EL, "IDName"))?;
    let function_type = optional_number::<u32>(EL, "FunctionType", child_text(node, "FunctionType"))?.unwrap_or(0);
    let x = optional_number::<f64>(EL, "x", node.attribute("x"))?.unwrap_or(0.0);
    let y = optional_number::<f64>(EL, "y", node.attribute("y"))?.unwrap_or(0.0);
    let color = optional_number::<u32>(EL, "color", node.attribute("color"))?;

    Ok(Function {
        id: FunctionId(id),
        name: name.to_string(),
        function_type,
        position: Point::new(x, y),
        style: node.attribute("style").map(str::to_string),
        color,
        fn_style: node.attribute("fnStyle").map(str::to_string),
        description: child_text(node, "Description").map(str::to_string),
        border: Border::from_color(color),
    })
}

fn parse_aspect(node: Node<'_, '_>) -> Result<ConnectionRecord> {
    const EL: &str = "Aspect";

    let raw_name = child_text(node, "Name").ok_or_else(|| FramError::missing(EL, "Name"))?;
    let (name_from, label, name_to, code) = split_composite_name(raw_name)?;

    // Structured attributes win over the composite name when both exist.
    let from_fn = match optional_number::<u32>(EL, "outputFn", node.attribute("outputFn"))? {
        Some(id) => id,
        None => required_number::<u32>(EL, "Name", Some(name_from))?,
    };
    let to_fn = match optional_number::<u32>(EL, "toFn", node.attribute("toFn"))? {
        Some(id) => id,
        None => required_number::<u32>(EL, "Name", Some(name_to))?,
    };

    let curve = child_text(node, "Curve").map(Curve::from_file_str).transpose()?;

    Ok(ConnectionRecord {
        from_fn: FunctionId(from_fn),
        to_fn: FunctionId(to_fn),
        to_aspect: Aspect::destination_from_code(code)?,
        label: label.to_string(),
        raw_name: raw_name.to_string(),
        curve,
        attributes: AspectAttributes {
            x: node.attribute("x").map(str::to_string),
            y: node.attribute("y").map(str::to_string),
            direction_x: node.attribute("directionX").map(str::to_string),
            direction_y: node.attribute("directionY").map(str::to_string),
            not_group: node.attribute("notGroup").map(str::to_string),
        },
    })
}

fn parse_reference(node: Node<'_, '_>, aspect: Aspect) -> Result<AspectReference> {
    let element = node.tag_name().name();
    let link_name = child_text(node, "IDName").ok_or_else(|| FramError::missing(element, "IDName"))?;

    // References nested inside a <Function> may omit their owner id.
    let owner = match child_text(node, "FunctionIDNr") {
        Some(raw) => required_number::<u32>(element, "FunctionIDNr", Some(raw))?,
        None => {
            let enclosing = node
                .ancestors()
                .skip(1)
                .find(|a| a.has_tag_name("Function"))
                .and_then(|f| child_text(f, "IDNr"));
            required_number::<u32>(element, "FunctionIDNr", enclosing)?
        }
    };

    Ok(AspectReference { aspect, link_name: link_name.to_string(), owner: FunctionId(owner) })
}

/// Splits `fromId|label|toId|aspectCode`. The label may itself contain `|`.
pub fn split_composite_name(raw: &str) -> Result<(&str, &str, &str, &str)> {
    let malformed = || FramError::missing("Aspect", "Name");
    let (from, rest) = raw.split_once('|').ok_or_else(malformed)?;
    let (rest, code) = rest.rsplit_once('|').ok_or_else(malformed)?;
    let (label, to) = rest.rsplit_once('|').ok_or_else(malformed)?;
    Ok((from.trim(), label, to.trim(), code.trim()))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children().find(|c| c.has_tag_name(tag)).map(|c| c.text().unwrap_or("").trim())
}

fn optional_number<T: FromStr>(element: &str, field: &str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<T>().map(Some).map_err(|_| FramError::missing(element, field)),
    }
}

fn required_number<T: FromStr>(element: &str, field: &str, raw: Option<&str>) -> Result<T> {
    optional_number(element, field, raw)?.ok_or_else(|| FramError::missing(element, field))
}
