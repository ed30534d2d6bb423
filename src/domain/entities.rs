//! Domain entities: the parsed blueprint tree

use serde::Serialize;

/// Separator joining a layer name and a section name into a section key.
pub const KEY_SEPARATOR: &str = "-";

/// Parsed architecture blueprint.
///
/// Immutable once built by the parser. Layers are kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Blueprint {
    pub layers: Vec<Layer>,
}

/// Top-level grouping of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Raw name from the document (unique within the blueprint)
    pub name: String,
    /// Sections in document order
    pub sections: Vec<Section>,
}

/// Second-level grouping inside a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Raw name from the document (unique within its layer)
    pub name: String,
    /// Components in array order
    pub components: Vec<Component>,
}

/// Leaf of the blueprint tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: String,
}

impl Blueprint {
    /// Blueprint with zero layers. Used as the fallback when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn section(&self, layer: &str, section: &str) -> Option<&Section> {
        self.layer(layer).and_then(|l| l.section(section))
    }

    pub fn section_count(&self) -> usize {
        self.layers.iter().map(|l| l.sections.len()).sum()
    }

    pub fn component_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.sections)
            .map(|s| s.components.len())
            .sum()
    }

    /// Total number of nodes (layers + sections + components).
    pub fn node_count(&self) -> usize {
        self.layers.len() + self.section_count() + self.component_count()
    }
}

impl Layer {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Expansion-state key of a section: `layer-section`.
pub fn section_key(layer: &str, section: &str) -> String {
    format!("{layer}{KEY_SEPARATOR}{section}")
}

/// Node id of a layer box.
pub fn layer_node_id(layer: &str) -> String {
    format!("layer-{layer}")
}

/// Node id of a section box.
pub fn section_node_id(layer: &str, section: &str) -> String {
    format!("section-{}", section_key(layer, section))
}

/// Node id of a component box. Keyed by the bare component name.
pub fn component_node_id(component: &str) -> String {
    format!("component-{component}")
}
