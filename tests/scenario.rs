use framalytics_core::analysis::{downstream_closure, output_paths, upstream_closure};
use framalytics_core::display::{format_downstream, Scene};
use framalytics_core::{
    compute_frequencies, Aspect, ColumnType, ConnectionId, FramError, FramModel, FunctionId, FunctionRef,
    ModelOptions, ObservationTable, QueryEngine,
};
use std::io::Write;

const SIX_FUNCTIONS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FM>
  <Functions>
    <Function x="100" y="100" style="green" color="1555713" fnStyle="0"><IDNr>0</IDNr><FunctionType>0</FunctionType><IDName>Function A</IDName><Description>entry point</Description></Function>
    <Function x="400" y="100"><IDNr>1</IDNr><FunctionType>0</FunctionType><IDName>Function B</IDName></Function>
    <Function x="700" y="100"><IDNr>2</IDNr><FunctionType>1</FunctionType><IDName>Function C</IDName></Function>
    <Function x="100" y="400"><IDNr>3</IDNr><FunctionType>0</FunctionType><IDName>Function D</IDName></Function>
    <Function x="400" y="400"><IDNr>4</IDNr><FunctionType>0</FunctionType><IDName>Function E</IDName></Function>
    <Function x="700" y="400"><IDNr>5</IDNr><FunctionType>2</FunctionType><IDName>Function F</IDName></Function>
  </Functions>
  <Aspects>
    <Aspect x="0" y="0" directionX="from" directionY="to" notGroup="true" outputFn="0" toFn="1"><Name>0|Connection AB|1|I</Name><Curve>425|150|192|150|250|150|360|150|305|150</Curve></Aspect>
    <Aspect><Name>1|Connection BC|2|I</Name></Aspect>
    <Aspect><Name>2|Connection CB|1|C</Name></Aspect>
    <Aspect><Name>0|Connection AD|3|P</Name></Aspect>
    <Aspect><Name>3|Connection DE|4|I</Name></Aspect>
    <Aspect><Name>4|Connection EF|5|I</Name></Aspect>
    <Aspect><Name>1|Connection BE|4|R</Name></Aspect>
    <Aspect><Name>5|Connection FC|2|T</Name></Aspect>
  </Aspects>
</FM>"#;

fn model() -> FramModel { FramModel::from_xml(SIX_FUNCTIONS).unwrap() }

#[test]
fn test_counts_and_lookups() {
    let model = model();
    assert_eq!(model.number_of_functions(), 6);
    assert_eq!(model.number_of_edges(), 8);
    assert_eq!(model.get_function_name(0), Some("Function A"));
    assert_eq!(model.get_function_id("Function F"), Some(FunctionId(5)));

    for (id, name) in model.functions() {
        assert_eq!(model.get_function_id(name), Some(*id));
        assert_eq!(model.get_function_name(id.0), Some(name.as_str()));
    }
    assert_eq!(model.function_list()[2], "Function C");
    assert_eq!(model.list_of_connections()[2], ("Function C", "Function B"));
}

#[test]
fn test_connection_table_row() {
    let model = model();
    let position = model.connections().iter().position(|c| c.raw_name == "2|Connection CB|1|C").unwrap();
    let row = &model.connection_table()[position];
    assert_eq!((row.from_fn, row.to_fn, row.to_aspect.as_str()), (2, 1, "C"));
    assert_eq!(row.name, "Connection CB");

    let q = QueryEngine::new(&model);
    assert!(q.controls(&FunctionRef::ById(1)).unwrap().contains_key(&FunctionId(2)));
    assert_eq!(q.outputs(&"Function B".into()).unwrap().len(), 2);
}

#[test]
fn test_file_curves_kept_and_missing_ones_derived() {
    let model = model();
    let first = model.connection(ConnectionId(0)).unwrap();
    assert!(!first.synthesized);
    assert_eq!(first.attributes.direction_x.as_deref(), Some("from"));
    assert_eq!(first.attributes.not_group.as_deref(), Some("true"));
    assert_eq!(first.curve.start().x, 144.0);
    assert_eq!(first.curve.end().y, 100.0);

    assert!(model.connections()[1..].iter().all(|c| c.synthesized));
    assert_eq!(model.connection(ConnectionId(7)).unwrap().to_aspect, Aspect::Time);
}

#[test]
fn test_traversal() {
    let model = model();
    let closure = downstream_closure(&model, &"Function D".into()).unwrap();
    assert_eq!(closure.into_iter().map(|c| c.0).collect::<Vec<_>>(), vec![1, 2, 4, 5, 6, 7]);

    assert!(upstream_closure(&model, &"Function A".into()).unwrap().is_empty());
    let into_b = output_paths(&model, &FunctionRef::ById(0), Some(&FunctionRef::ById(1))).unwrap();
    assert_eq!(into_b, vec![ConnectionId(0)]);

    let trace = format_downstream(&model, &FunctionRef::ById(0)).unwrap();
    assert!(trace.contains("[L1] Function A"));
    assert!(trace.contains("(Ref to L"));
}

#[test]
fn test_data_highlight() {
    let model = model();
    let names = ["Function A", "Function B", "Function C", "Function D", "Function E", "Function F"];
    let table = ObservationTable::new(
        names.iter().map(|s| s.to_string()).collect(),
        vec![vec![1, 1, 1, 0, 0, 0], vec![1, 0, 0, 1, 1, 1], vec![0, 0, 0, 0, 0, 0], vec![1, 1, 0, 0, 1, 0]],
    )
    .unwrap();

    let freq = compute_frequencies(&model, &table, ColumnType::Functions).unwrap();
    let by_name = freq.by_name(&model);
    assert_eq!(by_name["0|Connection AB|1|I"], 0.5);
    assert_eq!(by_name["1|Connection BC|2|I"], 0.25);
    assert_eq!(by_name["1|Connection BE|4|R"], 0.25);
    assert_eq!(by_name["5|Connection FC|2|T"], 0.0);
    assert!(by_name.values().all(|f| (0.0..=1.0).contains(f)));

    let empty = ObservationTable::new(table.columns.clone(), vec![]).unwrap();
    assert_eq!(compute_frequencies(&model, &empty, ColumnType::Functions), Err(FramError::EmptyDataset));
}

#[test]
fn test_scene_faces() {
    let scene = Scene::new(&model());
    let faces: Vec<_> = scene.functions.iter().map(|f| f.face_color).collect();
    assert_eq!(faces, vec!["#F3F3F3", "white", "white", "white", "white", "white"]);
    assert_eq!(scene.functions[0].border.color, "#17bd01");
}

#[test]
fn test_legacy_document_from_disk() {
    let legacy = r#"<FM>
        <Function x="100" y="100"><IDNr>0</IDNr><IDName>Dispatch</IDName>
            <Output><IDName>ambulance</IDName></Output>
        </Function>
        <Function x="450" y="0"><IDNr>1</IDNr><IDName>Treat</IDName>
            <Input><IDName>ambulance</IDName></Input>
        </Function>
        <Function x="450" y="300"><IDNr>2</IDNr><IDName>Record</IDName>
            <Input><IDName>ambulance</IDName></Input>
        </Function>
    </FM>"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(legacy.as_bytes()).unwrap();

    let model = FramModel::from_file_with_options(file.path(), &ModelOptions::default()).unwrap();
    assert_eq!(model.number_of_edges(), 2);
    for conn in model.connections() {
        assert!(conn.synthesized);
        assert_ne!(conn.curve.start(), conn.curve.end());
    }
    let q = QueryEngine::new(&model);
    assert_eq!(q.outputs(&"Dispatch".into()).unwrap().len(), 2);
}

#[test]
fn test_missing_file() {
    let err = FramModel::from_file("/nonexistent/model.xfmv").unwrap_err();
    assert!(matches!(err, FramError::Io { .. }));
}
