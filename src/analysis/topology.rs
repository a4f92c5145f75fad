use crate::error::Result;
use crate::model::FramModel;
use crate::store::{ConnectionId, FunctionId, FunctionRef};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Every connection reachable from `start` by following `fromFn -> toFn` edges.
///
/// Breadth-first over functions: each function's out-edges are expanded once,
/// so cycles terminate and every connection is reported once.
pub fn downstream_closure(model: &FramModel, start: &FunctionRef) -> Result<BTreeSet<ConnectionId>> {
    let start = model.resolve(start)?;
    Ok(walk(model, start, Direction::Downstream).0)
}

/// Function ids reached from `start`. `start` itself only appears when a cycle leads back to it.
pub fn downstream_functions(model: &FramModel, start: &FunctionRef) -> Result<BTreeSet<FunctionId>> {
    let start = model.resolve(start)?;
    Ok(walk(model, start, Direction::Downstream).1)
}

/// Every connection from which `end` can be reached.
pub fn upstream_closure(model: &FramModel, end: &FunctionRef) -> Result<BTreeSet<ConnectionId>> {
    let end = model.resolve(end)?;
    Ok(walk(model, end, Direction::Upstream).0)
}

/// Direct out-edges of `start`, optionally restricted to those arriving at `target`.
pub fn output_paths(model: &FramModel, start: &FunctionRef, target: Option<&FunctionRef>) -> Result<Vec<ConnectionId>> {
    let start = model.resolve(start)?;
    let target = target.map(|t| model.resolve(t)).transpose()?;

    Ok(model
        .outgoing(start)
        .into_iter()
        .filter(|&id| match (target, model.connection(id)) {
            (Some(t), Some(c)) => c.to_fn == t,
            (None, _) => true,
            (Some(_), None) => false,
        })
        .collect())
}

#[derive(Clone, Copy)]
enum Direction {
    Downstream,
    Upstream,
}

fn walk(model: &FramModel, origin: FunctionId, dir: Direction) -> (BTreeSet<ConnectionId>, BTreeSet<FunctionId>) {
    let mut edges = BTreeSet::new();
    let mut reached = BTreeSet::new();
    let mut expanded = HashSet::new();
    let mut queue = VecDeque::from([origin]);

    while let Some(function) = queue.pop_front() {
        if !expanded.insert(function) {
            continue;
        }
        let frontier = match dir {
            Direction::Downstream => model.outgoing(function),
            Direction::Upstream => model.incoming(function),
        };
        for id in frontier {
            let Some(conn) = model.connection(id) else { continue };
            let next = match dir {
                Direction::Downstream => conn.to_fn,
                Direction::Upstream => conn.from_fn,
            };
            edges.insert(id);
            reached.insert(next);
            queue.push_back(next);
        }
    }
    (edges, reached)
}
