use std::fs;
use std::path::Path;
use swagger_watch::{parse_json, parse_snapshot, Node, ParseError};

#[test]
fn test_parse_fixture_snapshot() {
    let node = parse_snapshot(Path::new("tests/fixtures/petstore_v1.json")).unwrap();
    match node {
        Node::Object(map) => {
            assert_eq!(map.get("swagger").unwrap(), &Node::String("2.0".to_string()));
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            assert_eq!(
                keys,
                vec!["swagger", "info", "host", "basePath", "tags", "paths", "definitions"]
            );
        }
        _ => panic!("Expected object"),
    }
}

#[test]
fn test_parse_json_nested() {
    let node = parse_json(r#"{"paths": {"/pet": {"get": {"tags": ["pet"]}}}}"#).unwrap();
    let Node::Object(root) = &node else {
        panic!("Expected object");
    };
    let Some(Node::Object(paths)) = root.get("paths") else {
        panic!("Expected paths object");
    };
    let Some(Node::Object(pet)) = paths.get("/pet") else {
        panic!("Expected /pet object");
    };
    assert!(matches!(pet.get("get"), Some(Node::Object(_))));
}

#[test]
fn test_parse_json_numbers_are_floats() {
    assert_eq!(parse_json("3").unwrap(), Node::Number(3.0));
    assert_eq!(parse_json("-0.25").unwrap(), Node::Number(-0.25));
}

#[test]
fn test_parse_snapshot_errors_name_the_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("2.json");
    fs::write(&path, "{\"swagger\": ").unwrap();

    let err = parse_snapshot(&path).unwrap_err();
    assert!(matches!(err, ParseError::JsonError { .. }));
    assert!(err.to_string().contains("2.json"));
}

#[test]
fn test_parse_snapshot_missing_file() {
    let err = parse_snapshot(Path::new("tests/fixtures/missing.json")).unwrap_err();
    assert!(matches!(err, ParseError::FileNotFound { .. }));
}
