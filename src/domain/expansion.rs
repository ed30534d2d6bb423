//! Expansion state: which blueprint nodes are open
//!
//! Three independent flag maps, absent key = collapsed:
//! - layers keyed by layer name
//! - sections keyed by `layer-section`
//! - components keyed by bare component name
//!
//! Component keys are not scoped by section, so two components with the same
//! name in different sections share one flag.
//!
//! Two families of mutators:
//! - `toggle_*` / `set_component_expanded` flip or set exactly one flag
//! - `set_layer_expanded` / `set_section_expanded` cascade on collapse: closing
//!   a node forces every descendant key closed. Opening never opens descendants.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::entities::{section_key, Blueprint, Section};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    layer_open: BTreeMap<String, bool>,
    section_open: BTreeMap<String, bool>,
    component_open: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_layer_open(&self, layer: &str) -> bool {
        self.layer_open.get(layer).copied().unwrap_or(false)
    }

    pub fn is_section_open(&self, layer: &str, section: &str) -> bool {
        self.section_open
            .get(&section_key(layer, section))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_component_open(&self, component: &str) -> bool {
        self.component_open.get(component).copied().unwrap_or(false)
    }

    pub fn toggle_layer(&mut self, layer: &str) {
        let open = !self.is_layer_open(layer);
        self.layer_open.insert(layer.to_string(), open);
    }

    pub fn toggle_section(&mut self, layer: &str, section: &str) {
        let open = !self.is_section_open(layer, section);
        self.section_open.insert(section_key(layer, section), open);
    }

    pub fn toggle_component(&mut self, component: &str) {
        let open = !self.is_component_open(component);
        self.component_open.insert(component.to_string(), open);
    }

    /// Set a single component flag. Components have no descendants, so there is no cascade.
    pub fn set_component_expanded(&mut self, component: &str, expanded: bool) {
        self.component_open.insert(component.to_string(), expanded);
    }

    /// Open or close a layer.
    ///
    /// Closing also closes every section of the layer and every component of
    /// those sections. Unknown layers only get their own flag written.
    pub fn set_layer_expanded(&mut self, blueprint: &Blueprint, layer: &str, expanded: bool) {
        self.layer_open.insert(layer.to_string(), expanded);
        if expanded {
            return;
        }
        if let Some(found) = blueprint.layer(layer) {
            for section in &found.sections {
                self.section_open
                    .insert(section_key(layer, &section.name), false);
                self.close_components(section);
            }
            trace!(
                "collapse layer {layer}: closed {} sections",
                found.sections.len()
            );
        }
    }

    /// Open or close a section.
    ///
    /// Closing also closes every component of the section.
    pub fn set_section_expanded(
        &mut self,
        blueprint: &Blueprint,
        layer: &str,
        section: &str,
        expanded: bool,
    ) {
        self.section_open
            .insert(section_key(layer, section), expanded);
        if expanded {
            return;
        }
        if let Some(found) = blueprint.section(layer, section) {
            self.close_components(found);
        }
    }

    /// Open every node of the blueprint.
    pub fn expand_all(&mut self, blueprint: &Blueprint) {
        for layer in &blueprint.layers {
            self.layer_open.insert(layer.name.clone(), true);
            for section in &layer.sections {
                self.section_open
                    .insert(section_key(&layer.name, &section.name), true);
                for component in &section.components {
                    self.component_open.insert(component.name.clone(), true);
                }
            }
        }
    }

    /// Clear all flags: everything collapsed.
    pub fn reset(&mut self) {
        self.layer_open.clear();
        self.section_open.clear();
        self.component_open.clear();
    }

    /// True when no flag has been written since creation or the last reset.
    pub fn is_empty(&self) -> bool {
        self.layer_open.is_empty() && self.section_open.is_empty() && self.component_open.is_empty()
    }

    fn close_components(&mut self, section: &Section) {
        for component in &section.components {
            self.component_open.insert(component.name.clone(), false);
        }
    }
}
