use std::path::Path;
use swagger_watch::output::format_summary;
use swagger_watch::{build_report, compare, format_report, parse_snapshot, OutputFormat, Report};

fn petstore_report() -> Report {
    let old = parse_snapshot(Path::new("tests/fixtures/petstore_v1.json")).unwrap();
    let new = parse_snapshot(Path::new("tests/fixtures/petstore_v2.json")).unwrap();
    build_report(&compare(&old, &new), &new, "petstore.swagger.io")
}

#[test]
fn test_plain_output() {
    let report = petstore_report();
    let output = format_report(&report, OutputFormat::Plain).unwrap();
    assert!(output.starts_with("JSON objects are not equal. Differences: petstore.swagger.io\n"));
    assert!(output.contains("Addition maxLength Changed Value: 64"));
    assert!(output.ends_with("*#/pet/put*"));
}

#[test]
fn test_terminal_output() {
    colored::control::set_override(false);
    let output = format_report(&petstore_report(), OutputFormat::Terminal).unwrap();
    assert!(output.contains("• Modification"));
    assert!(output.contains("+ Addition maxLength"));
    assert!(output.contains("    #/pet/post"));
    assert!(output.contains("Summary: 1 added, 1 modified"));
}

#[test]
fn test_json_output() {
    let output = format_report(&petstore_report(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["host"], "petstore.swagger.io");
    assert_eq!(value["equal"], false);
    assert_eq!(value["changes"].as_array().unwrap().len(), 2);
    assert_eq!(value["changes"][1]["kind"], "addition");
    assert_eq!(value["changes"][1]["path"], "maxLength");
    assert_eq!(value["changes"][1]["parents"], "[definitions Pet properties name]");
    assert_eq!(
        value["changes"][1]["endpoints"],
        serde_json::json!(["#/pet/post", "#/pet/put"])
    );
    assert_eq!(value["stats"]["modifications"], 1);
}

#[test]
fn test_summary_of_equal_report() {
    let doc = parse_snapshot(Path::new("tests/fixtures/petstore_v1.json")).unwrap();
    let report = build_report(&compare(&doc, &doc), &doc, "h");
    assert_eq!(format_summary(&report.stats), "Summary: No changes");
}
