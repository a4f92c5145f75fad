//! Columnar function/connection tables plus a petgraph adjacency index.

use crate::error::{FramError, Result};
use crate::model::{Connection, Function};
use crate::store::types::{ConnectionId, FunctionId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    // Tables, in document order
    pub functions: Vec<Function>,
    pub connections: Vec<Connection>,

    // Lookups
    pub names_by_id: BTreeMap<FunctionId, String>,
    pub ids_by_name: HashMap<String, FunctionId>,

    // Topology: one node per function, one edge per connection (weight = table row)
    graph: DiGraph<FunctionId, ConnectionId>,
    nodes: HashMap<FunctionId, NodeIndex>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn function_count(&self) -> usize { self.functions.len() }
    pub fn connection_count(&self) -> usize { self.connections.len() }

    /// Registers a function. A repeated name re-points the name lookup to the
    /// newest function (last writer wins).
    pub fn add_function(&mut self, function: Function) -> Result<FunctionId> {
        let id = function.id;
        if self.nodes.contains_key(&id) {
            return Err(FramError::MalformedFile(format!("duplicate function id {}", id)));
        }

        let node = self.graph.add_node(id);
        self.nodes.insert(id, node);
        self.names_by_id.insert(id, function.name.clone());
        self.ids_by_name.insert(function.name.clone(), id);
        self.functions.push(function);
        Ok(id)
    }

    /// Appends a connection. `connection.id` is overwritten with its table row.
    pub fn add_connection(&mut self, mut connection: Connection) -> Result<ConnectionId> {
        let from = self.node(connection.from_fn)?;
        let to = self.node(connection.to_fn)?;

        let id = ConnectionId::new(self.connections.len());
        connection.id = id;
        self.graph.add_edge(from, to, id);
        self.connections.push(connection);
        Ok(id)
    }

    pub fn contains(&self, id: FunctionId) -> bool { self.nodes.contains_key(&id) }

    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        let node = self.nodes.get(&id)?;
        self.functions.get(node.index())
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> { self.connections.get(id.index()) }

    /// Connections leaving `id`, in table order.
    pub fn outgoing(&self, id: FunctionId) -> Vec<ConnectionId> { self.edges(id, Direction::Outgoing) }

    /// Connections arriving at `id`, in table order.
    pub fn incoming(&self, id: FunctionId) -> Vec<ConnectionId> { self.edges(id, Direction::Incoming) }

    fn edges(&self, id: FunctionId, dir: Direction) -> Vec<ConnectionId> {
        let Some(&node) = self.nodes.get(&id) else { return Vec::new() };
        // petgraph walks its edge lists newest-first.
        let mut out: Vec<ConnectionId> = self.graph.edges_directed(node, dir).map(|e| *e.weight()).collect();
        out.sort_unstable();
        out
    }

    fn node(&self, id: FunctionId) -> Result<NodeIndex> {
        self.nodes
            .get(&id)
            .copied()
            .ok_or_else(|| FramError::UnknownFunctionReference(format!("function id {} is not defined", id)))
    }
}
