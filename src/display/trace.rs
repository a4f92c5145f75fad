use crate::error::Result;
use crate::model::{Connection, FramModel};
use crate::store::{FunctionId, FunctionRef};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders everything downstream of `start` as an indented tree.
///
/// A function already printed is shown once more as a `(Ref to L{n})` leaf, so
/// cyclic models produce finite output.
pub fn format_downstream(model: &FramModel, start: &FunctionRef) -> Result<String> {
    let start = model.resolve(start)?;
    let mut tracer = Tracer { model, visited_at_level: HashMap::new(), output: String::new() };

    let name = model.get_function_name(start.0).unwrap_or_default();
    let _ = writeln!(tracer.output, "DOWNSTREAM TRACE for function '{}':", name);
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_function(start, None, 1, "");
    Ok(tracer.output)
}

/// One `id: name` line per function, in document order.
pub fn format_functions(model: &FramModel) -> String {
    let mut out = String::new();
    for f in model.function_metadata() {
        let _ = writeln!(out, "{:>4}: {}", f.id.0, f.name);
    }
    out
}

/// One `source --[label]--> target (aspect)` line per connection.
pub fn format_connections(model: &FramModel) -> String {
    let mut out = String::new();
    for c in model.connections() {
        let from = model.get_function_name(c.from_fn.0).unwrap_or("?");
        let to = model.get_function_name(c.to_fn.0).unwrap_or("?");
        let _ = writeln!(out, "{} --[{}]--> {} ({})", from, c.label, to, c.to_aspect);
    }
    out
}

struct Tracer<'a> {
    model: &'a FramModel,
    visited_at_level: HashMap<FunctionId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_function(&mut self, id: FunctionId, via: Option<&Connection>, level: usize, prefix: &str) {
        let name = self.model.get_function_name(id.0).unwrap_or("?");
        let header = match via {
            Some(c) => format!("{} (via '{}' on {})", name, c.label, c.to_aspect),
            None => name.to_string(),
        };

        if let Some(&first_seen) = self.visited_at_level.get(&id) {
            let _ = writeln!(self.output, "{}{} -> (Ref to L{})", prefix, header, first_seen);
            return;
        }
        self.visited_at_level.insert(id, level);
        let _ = writeln!(self.output, "{}[L{}] {}", prefix, level, header);

        let model = self.model;
        let children: Vec<&Connection> = model.outgoing(id).into_iter().filter_map(|c| model.connection(c)).collect();
        let stem = child_stem(prefix);
        for (i, &conn) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_function(conn.to_fn, Some(conn), level + 1, &full_prefix);
        }
    }
}

fn child_stem(prefix: &str) -> String {
    prefix.replace("`--", "   ").replace("|--", "|  ")
}
