use crate::analysis::{self, Appearance, ColumnType, HighlightOverlay, ObservationTable, QueryEngine};
use crate::display::{trace, Scene};
use crate::error::FramError;
use crate::model::{FramModel, ModelOptions};
use crate::store::{Aspect, ConnectionId, FunctionRef};
use pyo3::exceptions::{PyKeyError, PyOSError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use std::collections::BTreeMap;

fn to_py_err(e: FramError) -> PyErr {
    match e {
        FramError::Io { .. } => PyOSError::new_err(e.to_string()),
        FramError::UnknownFunctionReference(_) | FramError::MissingObservationColumn(_) => {
            PyKeyError::new_err(e.to_string())
        }
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Accepts either an integer id or a function name.
fn function_ref(obj: &Bound<'_, PyAny>) -> PyResult<FunctionRef> {
    if let Ok(id) = obj.extract::<u32>() {
        return Ok(FunctionRef::ById(id));
    }
    obj.extract::<String>()
        .map(FunctionRef::ByName)
        .map_err(|_| PyTypeError::new_err("function must be an int id or a str name"))
}

type PyNeighbours = BTreeMap<u32, String>;

#[pyclass(name = "FRAM")]
#[derive(Debug, Clone)]
pub struct PyFram {
    model: FramModel,
    highlight: Option<HighlightOverlay>,
}

impl PyFram {
    fn aspect_query(&self, function: &Bound<'_, PyAny>, aspect: Aspect) -> PyResult<PyNeighbours> {
        let found = QueryEngine::new(&self.model)
            .connections_to(&function_ref(function)?, aspect)
            .map_err(to_py_err)?;
        Ok(found.into_iter().map(|(id, name)| (id.0, name)).collect())
    }

    fn names_of(&self, ids: impl IntoIterator<Item = ConnectionId>) -> Vec<String> {
        ids.into_iter().filter_map(|id| self.model.connection(id)).map(|c| c.raw_name.clone()).collect()
    }
}

#[pymethods]
impl PyFram {
    #[new]
    #[pyo3(signature = (path, options_json=None))]
    pub fn new(path: &str, options_json: Option<&str>) -> PyResult<Self> {
        let options = match options_json {
            Some(json) => ModelOptions::from_json_str(json).map_err(to_py_err)?,
            None => ModelOptions::default(),
        };
        let model = FramModel::from_file_with_options(path, &options).map_err(to_py_err)?;
        Ok(Self { model, highlight: None })
    }

    #[staticmethod]
    pub fn from_xml(text: &str) -> PyResult<Self> {
        let model = FramModel::from_xml(text).map_err(to_py_err)?;
        Ok(Self { model, highlight: None })
    }

    pub fn number_of_functions(&self) -> usize { self.model.number_of_functions() }
    pub fn number_of_edges(&self) -> usize { self.model.number_of_edges() }

    pub fn get_function_name(&self, id: u32) -> Option<String> { self.model.get_function_name(id).map(str::to_string) }
    pub fn get_function_id(&self, name: &str) -> Option<u32> { self.model.get_function_id(name).map(|id| id.0) }

    pub fn get_functions(&self) -> PyNeighbours {
        self.model.functions().iter().map(|(id, name)| (id.0, name.clone())).collect()
    }

    pub fn function_list(&self) -> Vec<String> { self.model.function_list().into_iter().map(str::to_string).collect() }

    pub fn get_connections(&self) -> Vec<String> {
        self.model.connection_names().into_iter().map(str::to_string).collect()
    }

    /// `(fromFn, toFn, toAspect, Name)` rows.
    pub fn connection_table(&self) -> Vec<(u32, u32, String, String)> {
        self.model.connection_table().into_iter().map(|r| (r.from_fn, r.to_fn, r.to_aspect, r.name)).collect()
    }

    /// `(Name, x, y, directionX, directionY, notGroup)` per connection.
    #[allow(clippy::type_complexity)]
    pub fn get_aspect_data(
        &self,
    ) -> Vec<(String, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>)> {
        self.model
            .connections()
            .iter()
            .map(|c| {
                let a = c.attributes.clone();
                (c.raw_name.clone(), a.x, a.y, a.direction_x, a.direction_y, a.not_group)
            })
            .collect()
    }

    pub fn list_of_connections(&self) -> Vec<(String, String)> {
        self.model.list_of_connections().into_iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }

    pub fn get_function_inputs(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        self.aspect_query(function, Aspect::Input)
    }
    pub fn get_function_preconditions(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        self.aspect_query(function, Aspect::Precondition)
    }
    pub fn get_function_resources(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        self.aspect_query(function, Aspect::Resource)
    }
    pub fn get_function_controls(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        self.aspect_query(function, Aspect::Control)
    }
    pub fn get_function_times(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        self.aspect_query(function, Aspect::Time)
    }

    pub fn get_function_outputs(&self, function: &Bound<'_, PyAny>) -> PyResult<PyNeighbours> {
        let found = QueryEngine::new(&self.model).outputs(&function_ref(function)?).map_err(to_py_err)?;
        Ok(found.into_iter().map(|(id, name)| (id.0, name)).collect())
    }

    /// Highlights the direct outputs of a function; returns their identifiers.
    #[pyo3(signature = (function, target=None, appearance="pure"))]
    pub fn highlight_function_outputs(
        &mut self,
        function: &Bound<'_, PyAny>,
        target: Option<&Bound<'_, PyAny>>,
        appearance: &str,
    ) -> PyResult<Vec<String>> {
        let appearance: Appearance = appearance.parse().map_err(to_py_err)?;
        let target = target.map(function_ref).transpose()?;
        let path = analysis::output_paths(&self.model, &function_ref(function)?, target.as_ref()).map_err(to_py_err)?;
        self.highlight = Some(HighlightOverlay::from_path(path.iter().copied(), appearance));
        Ok(self.names_of(path))
    }

    /// Highlights every connection downstream of a function; returns their identifiers.
    #[pyo3(signature = (function, appearance="pure"))]
    pub fn highlight_full_path_from_function(&mut self, function: &Bound<'_, PyAny>, appearance: &str) -> PyResult<Vec<String>> {
        let appearance: Appearance = appearance.parse().map_err(to_py_err)?;
        let closure = analysis::downstream_closure(&self.model, &function_ref(function)?).map_err(to_py_err)?;
        self.highlight = Some(HighlightOverlay::from_path(closure.iter().copied(), appearance));
        Ok(self.names_of(closure))
    }

    /// Colors connections by how often the observed instances traverse them.
    /// Returns `{connection identifier: frequency}`.
    #[pyo3(signature = (columns, rows, column_type="functions", appearance="pure"))]
    pub fn highlight_data(
        &mut self,
        columns: Vec<String>,
        rows: Vec<Vec<u8>>,
        column_type: &str,
        appearance: &str,
    ) -> PyResult<BTreeMap<String, f64>> {
        let column_type: ColumnType = column_type.parse().map_err(to_py_err)?;
        let appearance: Appearance = appearance.parse().map_err(to_py_err)?;
        let table = ObservationTable::new(columns, rows).map_err(to_py_err)?;

        let frequencies = analysis::compute_frequencies(&self.model, &table, column_type).map_err(to_py_err)?;
        self.highlight = Some(frequencies.overlay(appearance));
        Ok(frequencies.by_name(&self.model))
    }

    pub fn clear_highlight(&mut self) { self.highlight = None; }

    pub fn trace_downstream(&self, function: &Bound<'_, PyAny>) -> PyResult<String> {
        trace::format_downstream(&self.model, &function_ref(function)?).map_err(to_py_err)
    }

    pub fn scene_json(&self) -> PyResult<String> {
        let mut scene = Scene::new(&self.model);
        if let Some(overlay) = &self.highlight {
            scene = scene.with_highlight(overlay.clone());
        }
        scene.to_json().map_err(to_py_err)
    }

    pub fn __repr__(&self) -> String {
        format!("FRAM(functions={}, connections={})", self.model.number_of_functions(), self.model.number_of_edges())
    }
}
