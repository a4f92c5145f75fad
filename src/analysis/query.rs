//! Per-aspect neighbour queries.
//!
//! Every query resolves its `FunctionRef` once, then scans the connection table.

use crate::error::Result;
use crate::model::FramModel;
use crate::store::{Aspect, FunctionId, FunctionRef};
use std::collections::BTreeMap;

/// `{function id -> function name}`, ordered by id.
pub type Neighbours = BTreeMap<FunctionId, String>;

#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    model: &'a FramModel,
}

impl<'a> QueryEngine<'a> {
    pub fn new(model: &'a FramModel) -> Self { Self { model } }

    /// Sources of the connections that arrive at `function` on `aspect`.
    pub fn connections_to(&self, function: &FunctionRef, aspect: Aspect) -> Result<Neighbours> {
        let target = self.model.resolve(function)?;
        let sources = self
            .model
            .incoming(target)
            .into_iter()
            .filter_map(|id| self.model.connection(id))
            .filter(|c| c.to_aspect == aspect)
            .map(|c| c.from_fn);
        Ok(self.named(sources))
    }

    pub fn inputs(&self, function: &FunctionRef) -> Result<Neighbours> { self.connections_to(function, Aspect::Input) }
    pub fn preconditions(&self, function: &FunctionRef) -> Result<Neighbours> {
        self.connections_to(function, Aspect::Precondition)
    }
    pub fn resources(&self, function: &FunctionRef) -> Result<Neighbours> { self.connections_to(function, Aspect::Resource) }
    pub fn controls(&self, function: &FunctionRef) -> Result<Neighbours> { self.connections_to(function, Aspect::Control) }
    pub fn times(&self, function: &FunctionRef) -> Result<Neighbours> { self.connections_to(function, Aspect::Time) }

    /// Targets of every connection leaving `function`, whatever their aspect.
    pub fn outputs(&self, function: &FunctionRef) -> Result<Neighbours> {
        let source = self.model.resolve(function)?;
        let targets = self
            .model
            .outgoing(source)
            .into_iter()
            .filter_map(|id| self.model.connection(id))
            .map(|c| c.to_fn);
        Ok(self.named(targets))
    }

    fn named(&self, ids: impl Iterator<Item = FunctionId>) -> Neighbours {
        ids.filter_map(|id| Some((id, self.model.get_function_name(id.0)?.to_string()))).collect()
    }
}
