//! Tests for the blueprint parser

use std::fs;

use rstest::{fixture, rstest};

use archview::domain::{parse, parse_value, Blueprint, ParseError};
use archview::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn platform_text() -> String {
    fs::read_to_string("tests/resources/blueprints/platform.toml").expect("read fixture")
}

fn names(bp: &Blueprint) -> Vec<String> {
    bp.layers.iter().map(|l| l.name.clone()).collect()
}

// ============================================================
// Structure and order
// ============================================================

#[rstest]
fn given_platform_blueprint_when_parsing_then_keeps_document_order(platform_text: String) {
    let bp = parse(&platform_text).unwrap();

    assert_eq!(names(&bp), vec!["serving_layer", "domain_layer", "storage_layer"]);
    let domain: Vec<_> = bp.layers[1].sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(domain, vec!["billing", "identity", "audit"]);
    let request: Vec<_> = bp.layers[0].sections[0]
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(request, vec!["router", "dispatcher", "rate_limiter"]);
}

#[rstest]
fn given_platform_blueprint_when_counting_then_matches_document(platform_text: String) {
    let bp = parse(&platform_text).unwrap();

    assert_eq!(bp.layers.len(), 3);
    assert_eq!(bp.section_count(), 6);
    assert_eq!(bp.component_count(), 8);
}

#[rstest]
fn given_same_text_when_parsing_twice_then_trees_are_equal(platform_text: String) {
    let first = parse(&platform_text).unwrap();
    let second = parse(&platform_text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_empty_section_list_when_parsing_then_section_has_no_components() {
    let bp = parse("[a.s]\ncomponents = []\n").unwrap();
    assert!(bp.layers[0].sections[0].components.is_empty());
}

#[test]
fn given_empty_layer_table_when_parsing_then_layer_has_no_sections() {
    let bp = parse("[a]\n").unwrap();
    assert_eq!(bp.layers[0].name, "a");
    assert!(bp.layers[0].sections.is_empty());
}

#[test]
fn given_inline_tables_when_parsing_then_equivalent_to_headers() {
    let inline = parse(r#"a = { s = { components = ["x", "y"] } }"#).unwrap();
    let headers = parse("[a.s]\ncomponents = [\"x\", \"y\"]\n").unwrap();
    assert_eq!(inline, headers);
}

// ============================================================
// Failures
// ============================================================

#[rstest]
#[case::layer_not_table(
    "serving = 1\n",
    ParseError::MalformedLayer { layer: "serving".into() }
)]
#[case::section_not_table(
    "[serving]\nrequest = \"x\"\n",
    ParseError::MalformedSection { layer: "serving".into(), section: "request".into() }
)]
#[case::missing_components(
    "[serving.request]\nitems = []\n",
    ParseError::MissingComponentList { layer: "serving".into(), section: "request".into() }
)]
#[case::components_not_array(
    "[serving.request]\ncomponents = \"router\"\n",
    ParseError::MissingComponentList { layer: "serving".into(), section: "request".into() }
)]
#[case::component_not_string(
    "[serving.request]\ncomponents = [\"router\", 7]\n",
    ParseError::InvalidComponentEntry { layer: "serving".into(), section: "request".into(), index: 1 }
)]
fn given_malformed_document_when_parsing_then_reports_offending_node(
    #[case] text: &str,
    #[case] expected: ParseError,
) {
    assert_eq!(parse(text).unwrap_err(), expected);
}

#[test]
fn given_first_layer_not_table_when_parsing_file_then_names_that_layer() {
    let text = fs::read_to_string("tests/resources/blueprints/malformed_layer.toml").unwrap();

    let err = parse(&text).unwrap_err();

    assert_eq!(
        err,
        ParseError::MalformedLayer {
            layer: "serving_layer".into()
        }
    );
}

#[test]
fn given_several_defects_when_parsing_then_reports_only_first() {
    let text = r#"
[a.s1]
components = [1]

[b.s2]
items = []
"#;
    let err = parse(text).unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidComponentEntry { ref layer, index: 0, .. } if layer == "a"
    ));
}

#[test]
fn given_array_root_value_when_parsing_value_then_malformed_root() {
    let value = toml::Value::Array(vec![]);
    assert_eq!(parse_value(&value).unwrap_err(), ParseError::MalformedRoot);
}

#[test]
fn given_empty_file_when_parsing_then_returns_zero_layers() {
    let text = fs::read_to_string("tests/resources/blueprints/empty.toml").unwrap();
    assert!(parse(&text).unwrap().is_empty());
}
