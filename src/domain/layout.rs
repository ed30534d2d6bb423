//! Layout engine: (blueprint, expansion state) → positioned boxes
//!
//! Only open nodes are emitted. Layers stack vertically, sections sit in one
//! row inside their layer, components in one row inside their section. Every
//! position is relative to the parent's frame; layers are relative to the
//! canvas origin. The result is recomputed from scratch on every call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{
    component_node_id, layer_node_id, section_node_id, Blueprint, Layer, Section,
};
use crate::domain::expansion::ExpansionState;

/// Fixed dimensions used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Width of every layer box
    pub layer_width: f64,
    /// Height of every layer box
    pub layer_height: f64,
    /// Vertical gap between stacked layers
    pub gap: f64,
    /// Inner padding of a box (left, right, bottom)
    pub padding: f64,
    /// Horizontal spacing between siblings in a row
    pub spacing: f64,
    /// Height of the label band at the top of a box; children start below it
    pub label_band: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            layer_width: 1200.0,
            layer_height: 400.0,
            gap: 50.0,
            padding: 20.0,
            spacing: 20.0,
            label_band: 40.0,
        }
    }
}

impl LayoutMetrics {
    /// Height of a child box placed inside a parent of height `parent_height`.
    pub fn child_height(&self, parent_height: f64) -> f64 {
        parent_height - self.label_band - self.padding
    }

    /// Width of each of `count` equal children in one row inside `parent_width`.
    pub fn row_width(&self, parent_width: f64, count: usize) -> f64 {
        let inner = parent_width - 2.0 * self.padding;
        let n = count as f64;
        (inner - (n - 1.0) * self.spacing) / n
    }

    /// X offset of the child at `index` in a row of children of width `width`.
    pub fn row_x(&self, width: f64, index: usize) -> f64 {
        self.padding + index as f64 * (width + self.spacing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Layer,
    Section,
    Component,
}

impl NodeKind {
    pub fn depth(self) -> u8 {
        match self {
            NodeKind::Layer => 0,
            NodeKind::Section => 1,
            NodeKind::Component => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// One visible box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub depth: u8,
    /// Raw name; display formatting is the renderer's job
    pub label: String,
    /// Relative to the parent's frame (canvas origin for layers)
    pub position: Position,
    pub size: Size,
    pub parent_id: Option<String>,
}

/// Connection between two boxes. Containment already shows the hierarchy, so
/// the engine never produces any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Direct children of `parent_id`, in layout order.
    pub fn children<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a LayoutNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(parent_id))
    }
}

/// Stateless layout engine holding its metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
}

impl LayoutEngine {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Lay out every open node.
    ///
    /// Nodes come in pre-order: a layer, then each of its open sections
    /// followed by that section's open components. Keys in `state` that name
    /// nothing in `blueprint` are ignored.
    pub fn compute(&self, blueprint: &Blueprint, state: &ExpansionState) -> Layout {
        let mut nodes = Vec::new();
        let mut y = 0.0;

        for layer in blueprint.layers.iter().filter(|l| state.is_layer_open(&l.name)) {
            self.place_layer(layer, y, state, &mut nodes);
            y += self.metrics.layer_height + self.metrics.gap;
        }

        debug!("layout: {} visible nodes", nodes.len());
        Layout {
            nodes,
            edges: Vec::new(),
        }
    }

    fn place_layer(
        &self,
        layer: &Layer,
        y: f64,
        state: &ExpansionState,
        nodes: &mut Vec<LayoutNode>,
    ) {
        let id = layer_node_id(&layer.name);
        let size = Size {
            width: self.metrics.layer_width,
            height: self.metrics.layer_height,
        };
        nodes.push(LayoutNode {
            id: id.clone(),
            kind: NodeKind::Layer,
            depth: NodeKind::Layer.depth(),
            label: layer.name.clone(),
            position: Position { x: 0.0, y },
            size,
            parent_id: None,
        });

        let active: Vec<&Section> = layer
            .sections
            .iter()
            .filter(|s| state.is_section_open(&layer.name, &s.name))
            .collect();
        if active.is_empty() {
            return;
        }

        let width = self.metrics.row_width(size.width, active.len());
        let height = self.metrics.child_height(size.height);
        for (i, section) in active.into_iter().enumerate() {
            let section_id = section_node_id(&layer.name, &section.name);
            let section_size = Size { width, height };
            nodes.push(LayoutNode {
                id: section_id.clone(),
                kind: NodeKind::Section,
                depth: NodeKind::Section.depth(),
                label: section.name.clone(),
                position: Position {
                    x: self.metrics.row_x(width, i),
                    y: self.metrics.label_band,
                },
                size: section_size,
                parent_id: Some(id.clone()),
            });
            self.place_components(section, &section_id, section_size, state, nodes);
        }
    }

    fn place_components(
        &self,
        section: &Section,
        section_id: &str,
        section_size: Size,
        state: &ExpansionState,
        nodes: &mut Vec<LayoutNode>,
    ) {
        let active: Vec<_> = section
            .components
            .iter()
            .filter(|c| state.is_component_open(&c.name))
            .collect();
        if active.is_empty() {
            return;
        }

        let width = self.metrics.row_width(section_size.width, active.len());
        let height = self.metrics.child_height(section_size.height);
        for (i, component) in active.into_iter().enumerate() {
            nodes.push(LayoutNode {
                id: component_node_id(&component.name),
                kind: NodeKind::Component,
                depth: NodeKind::Component.depth(),
                label: component.name.clone(),
                position: Position {
                    x: self.metrics.row_x(width, i),
                    y: self.metrics.label_band,
                },
                size: Size { width, height },
                parent_id: Some(section_id.to_string()),
            });
        }
    }
}

/// Lay out `blueprint` with default metrics and return the node list.
pub fn layout(blueprint: &Blueprint, state: &ExpansionState) -> Vec<LayoutNode> {
    LayoutEngine::default().compute(blueprint, state).nodes
}
