//! The hand-off to renderers: everything needed to draw a model, as plain data.

use crate::analysis::HighlightOverlay;
use crate::error::{FramError, Result};
use crate::geometry::Curve;
use crate::model::FramModel;
use crate::parser::AspectAttributes;
use crate::store::{Aspect, Border, ConnectionId, FunctionId, Point};
use serde::Serialize;

pub const ACTIVE_FACE: &str = "white";
pub const IDLE_FACE: &str = "#F3F3F3";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFunction {
    pub id: FunctionId,
    pub name: String,
    pub function_type: u32,
    pub position: Point,
    pub border: Border,
    /// White when the function both receives and emits connections.
    pub face_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneConnection {
    pub id: ConnectionId,
    pub name: String,
    pub from_fn: FunctionId,
    pub to_fn: FunctionId,
    pub to_aspect: Aspect,
    pub curve: Curve,
    pub attributes: AspectAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub functions: Vec<SceneFunction>,
    pub connections: Vec<SceneConnection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightOverlay>,
}

impl Scene {
    pub fn new(model: &FramModel) -> Self {
        let functions = model
            .function_metadata()
            .iter()
            .map(|f| SceneFunction {
                id: f.id,
                name: f.name.clone(),
                function_type: f.function_type,
                position: f.position,
                border: f.border.clone(),
                face_color: if model.has_inputs_and_outputs(f.id) { ACTIVE_FACE } else { IDLE_FACE },
            })
            .collect();

        let connections = model
            .connections()
            .iter()
            .map(|c| SceneConnection {
                id: c.id,
                name: c.raw_name.clone(),
                from_fn: c.from_fn,
                to_fn: c.to_fn,
                to_aspect: c.to_aspect,
                curve: c.curve,
                attributes: c.attributes.clone(),
            })
            .collect();

        Self { functions, connections, highlight: None }
    }

    pub fn with_highlight(mut self, overlay: HighlightOverlay) -> Self {
        self.highlight = Some(overlay);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| FramError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Appearance, HighlightOverlay};
    use serde_json::Value;

    const CHAIN: &str = r#"<FM>
        <Function x="0" y="0" color="65280"><IDNr>0</IDNr><IDName>Start</IDName></Function>
        <Function x="300" y="0"><IDNr>1</IDNr><IDName>Middle</IDName></Function>
        <Function x="600" y="0"><IDNr>2</IDNr><IDName>End</IDName></Function>
        <Aspect directionX="from" directionY="to" notGroup="true"><Name>0|a|1|I</Name></Aspect>
        <Aspect><Name>1|b|2|R</Name></Aspect>
    </FM>"#;

    #[test]
    fn test_face_colors() {
        let model = FramModel::from_xml(CHAIN).unwrap();
        let scene = Scene::new(&model);
        let faces: Vec<_> = scene.functions.iter().map(|f| f.face_color).collect();
        assert_eq!(faces, vec![IDLE_FACE, ACTIVE_FACE, IDLE_FACE]);
        assert_eq!(scene.functions[0].border.color, "#00ff00");
        assert_eq!(scene.functions[1].border.color, "black");
    }

    #[test]
    fn test_json_export() {
        let model = FramModel::from_xml(CHAIN).unwrap();
        let scene = Scene::new(&model);
        let plain: Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert!(plain.get("highlight").is_none());
        assert_eq!(plain["connections"][1]["name"], "1|b|2|R");
        assert_eq!(plain["connections"][1]["to_aspect"], "R");
        assert_eq!(plain["connections"][0]["curve"]["points"].as_array().unwrap().len(), 5);
        assert_eq!(plain["connections"][0]["attributes"]["directionX"], "from");
        assert_eq!(plain["connections"][0]["attributes"]["notGroup"], "true");
        assert!(plain["connections"][1]["attributes"]["directionX"].is_null());

        let overlay = HighlightOverlay::from_path([ConnectionId(0)], Appearance::Traced);
        let lit: Value = serde_json::from_str(&scene.with_highlight(overlay).to_json().unwrap()).unwrap();
        assert_eq!(lit["highlight"]["appearance"], "traced");
        assert_eq!(lit["highlight"]["entries"][0]["stroke_weight"], 1.0);
    }
}
