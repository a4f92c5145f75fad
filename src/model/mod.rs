//! The immutable, indexed FRAM model.
//!
//! A `FramModel` is built once from a parsed document. Every analysis borrows it
//! read-only; derived overlays (highlight weights, traversal results) are separate
//! values owned by the caller.
pub mod options;
pub mod records;

pub use options::ModelOptions;
pub use records::{Connection, ConnectionRow, Function};

use crate::error::{FramError, Result};
use crate::geometry::{pair_references, synthesize_curve, Curve};
use crate::parser::{self, AspectAttributes, ParsedDocument};
use crate::store::{Aspect, ConnectionId, FunctionId, FunctionRef, Registry};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FramModel {
    registry: Registry,
}

impl FramModel {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_options(path, &ModelOptions::default())
    }

    pub fn from_file_with_options(path: impl AsRef<Path>, options: &ModelOptions) -> Result<Self> {
        Self::from_document(parser::parse_file(path)?, options)
    }

    pub fn from_xml(text: &str) -> Result<Self> {
        Self::from_document(parser::parse_str(text)?, &ModelOptions::default())
    }

    /// Assembles the tables. Any error aborts the whole build.
    pub fn from_document(doc: ParsedDocument, options: &ModelOptions) -> Result<Self> {
        options.validate()?;
        let legacy = doc.uses_legacy_schema();
        let mut registry = Registry::new();

        for function in doc.functions {
            if let Some(previous) = registry.ids_by_name.get(&function.name) {
                warn!(name = %function.name, previous = %previous, id = %function.id, "duplicate function name; name lookups resolve to the later id");
            }
            registry.add_function(function)?;
        }

        let mut synthesized = 0usize;
        for record in doc.connections {
            let (curve, derived) = match record.curve {
                Some(curve) => (curve, false),
                None if options.synthesize_missing_curves => {
                    let curve = derive_curve(&registry, record.from_fn, record.to_fn, record.to_aspect, options.curviness)?;
                    (curve, true)
                }
                None => return Err(FramError::missing("Aspect", "Curve")),
            };
            synthesized += derived as usize;
            registry.add_connection(Connection {
                id: ConnectionId::default(),
                from_fn: record.from_fn,
                to_fn: record.to_fn,
                to_aspect: record.to_aspect,
                label: record.label,
                raw_name: record.raw_name,
                curve,
                synthesized: derived,
                attributes: record.attributes,
            })?;
        }

        if legacy {
            if !options.synthesize_missing_curves {
                return Err(FramError::missing("Aspect", "Curve"));
            }
            for link in pair_references(&doc.references) {
                let curve = derive_curve(&registry, link.from_fn, link.to_fn, link.to_aspect, options.curviness)?;
                registry.add_connection(Connection {
                    id: ConnectionId::default(),
                    from_fn: link.from_fn,
                    to_fn: link.to_fn,
                    to_aspect: link.to_aspect,
                    raw_name: Connection::compose_raw_name(link.from_fn, &link.link_name, link.to_fn, link.to_aspect),
                    label: link.link_name,
                    curve,
                    synthesized: true,
                    attributes: AspectAttributes::default(),
                })?;
                synthesized += 1;
            }
        }

        debug!(
            functions = registry.function_count(),
            connections = registry.connection_count(),
            synthesized,
            legacy,
            "built FRAM model"
        );
        Ok(Self { registry })
    }

    // --- Resolution ---

    /// Turns an id-or-name reference into a known function id.
    pub fn resolve(&self, function: &FunctionRef) -> Result<FunctionId> {
        let resolved = match function {
            FunctionRef::ById(id) => Some(FunctionId(*id)).filter(|id| self.registry.contains(*id)),
            FunctionRef::ByName(name) => self.registry.ids_by_name.get(name).copied(),
        };
        resolved.ok_or_else(|| FramError::UnknownFunctionReference(function.to_string()))
    }

    // --- Counts and lookups ---

    pub fn number_of_functions(&self) -> usize { self.registry.function_count() }
    pub fn number_of_edges(&self) -> usize { self.registry.connection_count() }

    pub fn get_function_name(&self, id: u32) -> Option<&str> {
        self.registry.names_by_id.get(&FunctionId(id)).map(String::as_str)
    }

    pub fn get_function_id(&self, name: &str) -> Option<FunctionId> {
        self.registry.ids_by_name.get(name).copied()
    }

    /// `{id -> name}` for every function, ordered by id.
    pub fn functions(&self) -> &BTreeMap<FunctionId, String> { &self.registry.names_by_id }

    pub fn function(&self, id: FunctionId) -> Option<&Function> { self.registry.function(id) }

    pub fn function_metadata(&self) -> &[Function] { &self.registry.functions }

    /// Function names in document order.
    pub fn function_list(&self) -> Vec<&str> {
        self.registry.functions.iter().map(|f| f.name.as_str()).collect()
    }

    // --- Connections ---

    pub fn connections(&self) -> &[Connection] { &self.registry.connections }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> { self.registry.connection(id) }

    /// Raw `<Aspect>` attributes of a connection.
    pub fn aspect_attributes(&self, id: ConnectionId) -> Option<&AspectAttributes> {
        self.registry.connection(id).map(|c| &c.attributes)
    }

    /// The `{fromFn, toFn, toAspect, Name}` table.
    pub fn connection_table(&self) -> Vec<ConnectionRow> {
        self.registry.connections.iter().map(ConnectionRow::from).collect()
    }

    /// Composite `fromId|label|toId|aspect` identifiers in table order.
    pub fn connection_names(&self) -> Vec<&str> {
        self.registry.connections.iter().map(|c| c.raw_name.as_str()).collect()
    }

    /// `(source name, destination name)` per connection.
    pub fn list_of_connections(&self) -> Vec<(&str, &str)> {
        self.registry
            .connections
            .iter()
            .filter_map(|c| Some((self.get_function_name(c.from_fn.0)?, self.get_function_name(c.to_fn.0)?)))
            .collect()
    }

    pub fn outgoing(&self, id: FunctionId) -> Vec<ConnectionId> { self.registry.outgoing(id) }
    pub fn incoming(&self, id: FunctionId) -> Vec<ConnectionId> { self.registry.incoming(id) }

    pub fn has_inputs_and_outputs(&self, id: FunctionId) -> bool {
        !self.registry.incoming(id).is_empty() && !self.registry.outgoing(id).is_empty()
    }
}

fn derive_curve(registry: &Registry, from: FunctionId, to: FunctionId, aspect: Aspect, curviness: f64) -> Result<Curve> {
    let position = |id: FunctionId| {
        registry
            .function(id)
            .map(|f| f.position)
            .ok_or_else(|| FramError::UnknownFunctionReference(format!("function id {} is not defined", id)))
    };
    synthesize_curve(position(from)?, Aspect::Output, position(to)?, aspect, curviness)
}
