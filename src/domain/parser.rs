//! Blueprint parser: TOML text → typed tree
//!
//! Expected shape:
//!
//! ```toml
//! [serving_layer.request_section]
//! components = ["router", "dispatcher"]
//! ```
//!
//! First-level keys are layers, second-level keys are sections, and every
//! section carries a `components` array of strings. Document order is kept:
//! the `toml` crate is built with `preserve_order`, so table iteration follows
//! the source and is copied into the `Vec`s of the tree.

use toml::{Table, Value};
use tracing::debug;

use crate::domain::entities::{Blueprint, Component, Layer, Section};
use crate::domain::error::{ParseError, ParseResult};

/// Key holding the component list inside a section table.
pub const COMPONENTS_KEY: &str = "components";

/// Parse blueprint text.
///
/// Fails fast on the first structural violation; no partial blueprint is returned.
/// An empty document yields a blueprint with zero layers.
pub fn parse(text: &str) -> ParseResult<Blueprint> {
    let root: Table = toml::from_str(text).map_err(|e| ParseError::Syntax {
        message: e.message().to_string(),
    })?;
    let blueprint = parse_table(&root)?;
    debug!(
        "parse: {} layers, {} sections, {} components",
        blueprint.layers.len(),
        blueprint.section_count(),
        blueprint.component_count()
    );
    Ok(blueprint)
}

/// Parse an already decoded TOML value.
pub fn parse_value(root: &Value) -> ParseResult<Blueprint> {
    let table = root.as_table().ok_or(ParseError::MalformedRoot)?;
    parse_table(table)
}

fn parse_table(root: &Table) -> ParseResult<Blueprint> {
    let layers = root
        .iter()
        .map(|(name, value)| parse_layer(name, value))
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(Blueprint { layers })
}

fn parse_layer(layer: &str, value: &Value) -> ParseResult<Layer> {
    let table = value.as_table().ok_or_else(|| ParseError::MalformedLayer {
        layer: layer.to_string(),
    })?;

    let sections = table
        .iter()
        .map(|(name, value)| parse_section(layer, name, value))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Layer {
        name: layer.to_string(),
        sections,
    })
}

fn parse_section(layer: &str, section: &str, value: &Value) -> ParseResult<Section> {
    let table = value.as_table().ok_or_else(|| ParseError::MalformedSection {
        layer: layer.to_string(),
        section: section.to_string(),
    })?;

    let entries = table
        .get(COMPONENTS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::MissingComponentList {
            layer: layer.to_string(),
            section: section.to_string(),
        })?;

    let components = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .as_str()
                .map(Component::new)
                .ok_or_else(|| ParseError::InvalidComponentEntry {
                    layer: layer.to_string(),
                    section: section.to_string(),
                    index,
                })
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Section {
        name: section.to_string(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_minimal_document_when_parsing_then_builds_single_path() {
        let text = r#"
[serving_layer.request_section]
components = ["router", "dispatcher"]
"#;
        let bp = parse(text).unwrap();

        assert_eq!(bp.layers.len(), 1);
        let layer = &bp.layers[0];
        assert_eq!(layer.name, "serving_layer");
        assert_eq!(layer.sections[0].name, "request_section");
        let names: Vec<_> = layer.sections[0]
            .components
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["router", "dispatcher"]);
    }

    #[test]
    fn given_empty_document_when_parsing_then_returns_empty_blueprint() {
        let bp = parse("").unwrap();
        assert!(bp.is_empty());
    }

    #[test]
    fn given_non_table_root_value_when_parsing_then_fails_with_malformed_root() {
        let err = parse_value(&Value::Integer(1)).unwrap_err();
        assert_eq!(err, ParseError::MalformedRoot);
    }

    #[test]
    fn given_invalid_toml_when_parsing_then_fails_with_syntax() {
        let err = parse("[layer\ncomponents = ").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn given_extra_section_keys_when_parsing_then_ignores_them() {
        let text = r#"
[core.engine]
description = "not a component"
components = ["scheduler"]
"#;
        let bp = parse(text).unwrap();
        assert_eq!(bp.component_count(), 1);
    }
}
