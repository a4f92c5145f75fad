//! Observation-driven highlighting.
//!
//! An observation table records, per instance, which functions (or which
//! connections) were active. `compute_frequencies` turns it into the share of
//! instances that traversed each connection; `Frequencies::overlay` turns that
//! into colored stroke weights for a renderer.

use crate::error::{FramError, Result};
use crate::model::FramModel;
use crate::store::ConnectionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Rows are instances, columns are function names or connection identifiers.
/// A cell equal to 1 marks the column as present in that instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

impl ObservationTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<u8>>) -> Result<Self> {
        let table = Self { columns, rows };
        table.check_shape()?;
        Ok(table)
    }

    /// Reads `{"columns": [...], "rows": [[...], ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json).map_err(|e| FramError::MalformedObservations(e.to_string()))?;
        table.check_shape()?;
        Ok(table)
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    fn check_shape(&self) -> Result<()> {
        let width = self.columns.len();
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(FramError::MalformedObservations(format!(
                "row {} has {} cells, header has {}",
                i,
                row.len(),
                width
            )));
        }
        Ok(())
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FramError::MissingObservationColumn(name.to_string()))
    }
}

/// What the observation columns name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Functions,
    Connections,
}

impl FromStr for ColumnType {
    type Err = FramError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "functions" => Ok(ColumnType::Functions),
            "connections" => Ok(ColumnType::Connections),
            _ => Err(FramError::InvalidOption(format!("unknown column type '{}'", s))),
        }
    }
}

/// How highlighted curves are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Solid highlight color.
    #[default]
    Pure,
    /// Highlight color traced by a black outline.
    Traced,
    /// Black line inside a highlight-colored outline whose width follows the weight.
    Expand,
}

impl FromStr for Appearance {
    type Err = FramError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pure" => Ok(Appearance::Pure),
            "traced" => Ok(Appearance::Traced),
            "expand" => Ok(Appearance::Expand),
            _ => Err(FramError::InvalidOption(format!("unknown appearance '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrequencyBand {
    Unused,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl FrequencyBand {
    pub fn classify(frequency: f64) -> Self {
        match frequency {
            f if f <= 0.0 => FrequencyBand::Unused,
            f if f <= 0.25 => FrequencyBand::Low,
            f if f <= 0.5 => FrequencyBand::Medium,
            f if f <= 0.75 => FrequencyBand::High,
            _ => FrequencyBand::VeryHigh,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            FrequencyBand::Unused => "grey",
            FrequencyBand::Low => "green",
            FrequencyBand::Medium => "yellow",
            FrequencyBand::High => "orange",
            FrequencyBand::VeryHigh => "red",
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.color()) }
}

/// Stroke width of a fully traversed connection.
pub const MAX_STROKE_WEIGHT: f64 = 4.0;
/// Color of connections highlighted by a traversal rather than by data.
pub const PATH_COLOR: &str = "green";

/// Traversal counts per connection, normalized by the number of instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequencies {
    instances: usize,
    counts: BTreeMap<ConnectionId, usize>,
}

impl Frequencies {
    pub fn instances(&self) -> usize { self.instances }

    pub fn count(&self, id: ConnectionId) -> Option<usize> { self.counts.get(&id).copied() }

    /// Share of instances in [0, 1] that traversed `id`.
    pub fn frequency(&self, id: ConnectionId) -> Option<f64> {
        self.count(id).map(|n| n as f64 / self.instances as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, f64)> + '_ {
        self.counts.iter().map(move |(&id, &n)| (id, n as f64 / self.instances as f64))
    }

    /// Frequencies keyed by the composite connection identifier.
    pub fn by_name(&self, model: &FramModel) -> BTreeMap<String, f64> {
        self.iter()
            .filter_map(|(id, f)| Some((model.connection(id)?.raw_name.clone(), f)))
            .collect()
    }

    pub fn overlay(&self, appearance: Appearance) -> HighlightOverlay {
        let entries = self
            .iter()
            .map(|(connection, frequency)| {
                let band = FrequencyBand::classify(frequency);
                Highlight {
                    connection,
                    frequency,
                    band,
                    color: band.color().to_string(),
                    stroke_weight: frequency * MAX_STROKE_WEIGHT,
                }
            })
            .collect();
        HighlightOverlay { appearance, entries }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub connection: ConnectionId,
    pub frequency: f64,
    pub band: FrequencyBand,
    pub color: String,
    pub stroke_weight: f64,
}

/// One highlight per connection; never stored inside the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HighlightOverlay {
    pub appearance: Appearance,
    pub entries: Vec<Highlight>,
}

impl HighlightOverlay {
    /// Marks every connection in `path` at full weight.
    pub fn from_path(path: impl IntoIterator<Item = ConnectionId>, appearance: Appearance) -> Self {
        let entries = path
            .into_iter()
            .map(|connection| Highlight {
                connection,
                frequency: 1.0,
                band: FrequencyBand::VeryHigh,
                color: PATH_COLOR.to_string(),
                stroke_weight: 1.0,
            })
            .collect();
        Self { appearance, entries }
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Highlight> { self.entries.iter().find(|h| h.connection == id) }
}

/// Counts, for every connection, the instances that traversed it.
///
/// With `ColumnType::Functions` a connection is traversed when both its source
/// and destination function columns are 1. With `ColumnType::Connections` its own
/// column (keyed by the composite identifier) must be 1.
pub fn compute_frequencies(model: &FramModel, table: &ObservationTable, column_type: ColumnType) -> Result<Frequencies> {
    if table.rows.is_empty() {
        return Err(FramError::EmptyDataset);
    }
    table.check_shape()?;

    let mut counts = BTreeMap::new();
    for conn in model.connections() {
        let count = match column_type {
            ColumnType::Functions => {
                let name_of = |id: u32| {
                    model
                        .get_function_name(id)
                        .ok_or_else(|| FramError::UnknownFunctionReference(format!("function id {} is not defined", id)))
                };
                let from = table.column(name_of(conn.from_fn.0)?)?;
                let to = table.column(name_of(conn.to_fn.0)?)?;
                table.rows.iter().filter(|r| r[from] == 1 && r[to] == 1).count()
            }
            ColumnType::Connections => {
                let own = table.column(&conn.raw_name)?;
                table.rows.iter().filter(|r| r[own] == 1).count()
            }
        };
        counts.insert(conn.id, count);
    }

    debug!(instances = table.row_count(), connections = counts.len(), ?column_type, "computed highlight frequencies");
    Ok(Frequencies { instances: table.row_count(), counts })
}
