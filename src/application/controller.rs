//! Tree controller: user gestures → expansion state calls
//!
//! The controller is the only place that mutates `ExpansionState`. Each gesture
//! maps to exactly one state call; layout is recomputed by the caller afterwards.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Blueprint, ExpansionState};

/// A node of the blueprint addressed by raw names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Layer(String),
    Section {
        layer: String,
        section: String,
    },
    /// State is keyed by the bare component name; layer and section only locate it.
    Component {
        layer: String,
        section: String,
        component: String,
    },
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Layer(layer) => layer,
            Target::Section { section, .. } => section,
            Target::Component { component, .. } => component,
        }
    }

    pub fn is_open(&self, state: &ExpansionState) -> bool {
        match self {
            Target::Layer(layer) => state.is_layer_open(layer),
            Target::Section { layer, section } => state.is_section_open(layer, section),
            Target::Component { component, .. } => state.is_component_open(component),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Layer(layer) => write!(f, "{layer}"),
            Target::Section { layer, section } => write!(f, "{layer}/{section}"),
            Target::Component {
                layer,
                section,
                component,
            } => write!(f, "{layer}/{section}/{component}"),
        }
    }
}

/// Parses `layer`, `layer/section` or `layer/section/component`.
impl FromStr for Target {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ApplicationError::InvalidGesture {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = s.splitn(3, '/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty path segment"));
        }
        match parts.as_slice() {
            [layer] => Ok(Target::Layer(layer.to_string())),
            [layer, section] => Ok(Target::Section {
                layer: layer.to_string(),
                section: section.to_string(),
            }),
            [layer, section, component] => Ok(Target::Component {
                layer: layer.to_string(),
                section: section.to_string(),
                component: component.to_string(),
            }),
            _ => Err(invalid("expected layer[/section[/component]]")),
        }
    }
}

/// User action on the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Outline click: opens a closed node, collapses an open one with the cascade.
    Click(Target),
    /// Flip a single flag; descendants are left alone.
    Toggle(Target),
    /// Open every node.
    ExpandAll,
    /// Collapse everything.
    Reset,
}

/// Parses `click:PATH`, `toggle:PATH`, `expand-all` or `reset`.
impl FromStr for Gesture {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => return Ok(Gesture::Reset),
            "expand-all" => return Ok(Gesture::ExpandAll),
            _ => {}
        }
        match s.split_once(':') {
            Some(("click", path)) => Ok(Gesture::Click(path.parse()?)),
            Some(("toggle", path)) => Ok(Gesture::Toggle(path.parse()?)),
            _ => Err(ApplicationError::InvalidGesture {
                input: s.to_string(),
                reason: "expected click:PATH, toggle:PATH, expand-all or reset".to_string(),
            }),
        }
    }
}

/// One line of the collapsible outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub depth: u8,
    pub target: Target,
    pub open: bool,
    /// Number of direct children in the blueprint, listed or not
    pub children: usize,
}

pub struct TreeController<'a> {
    blueprint: &'a Blueprint,
}

impl<'a> TreeController<'a> {
    pub fn new(blueprint: &'a Blueprint) -> Self {
        Self { blueprint }
    }

    /// Apply one gesture to `state`.
    pub fn apply(&self, state: &mut ExpansionState, gesture: &Gesture) {
        debug!("apply: {:?}", gesture);
        match gesture {
            Gesture::Click(target) => {
                let expanded = !target.is_open(state);
                self.set_expanded(state, target, expanded);
            }
            Gesture::Toggle(target) => match target {
                Target::Layer(layer) => state.toggle_layer(layer),
                Target::Section { layer, section } => state.toggle_section(layer, section),
                Target::Component { component, .. } => state.toggle_component(component),
            },
            Gesture::ExpandAll => state.expand_all(self.blueprint),
            Gesture::Reset => state.reset(),
        }
    }

    fn set_expanded(&self, state: &mut ExpansionState, target: &Target, expanded: bool) {
        match target {
            Target::Layer(layer) => state.set_layer_expanded(self.blueprint, layer, expanded),
            Target::Section { layer, section } => {
                state.set_section_expanded(self.blueprint, layer, section, expanded)
            }
            Target::Component { component, .. } => {
                state.set_component_expanded(component, expanded)
            }
        }
    }

    /// The blueprint as a collapsible outline.
    ///
    /// Children of a closed node are not listed.
    pub fn outline(&self, state: &ExpansionState) -> Vec<OutlineRow> {
        let mut rows = Vec::new();
        for layer in &self.blueprint.layers {
            let target = Target::Layer(layer.name.clone());
            let open = target.is_open(state);
            rows.push(OutlineRow {
                depth: 0,
                target,
                open,
                children: layer.sections.len(),
            });
            if !open {
                continue;
            }
            for section in &layer.sections {
                let target = Target::Section {
                    layer: layer.name.clone(),
                    section: section.name.clone(),
                };
                let open = target.is_open(state);
                rows.push(OutlineRow {
                    depth: 1,
                    target,
                    open,
                    children: section.components.len(),
                });
                if !open {
                    continue;
                }
                for component in &section.components {
                    let target = Target::Component {
                        layer: layer.name.clone(),
                        section: section.name.clone(),
                        component: component.name.clone(),
                    };
                    let open = target.is_open(state);
                    rows.push(OutlineRow {
                        depth: 2,
                        target,
                        open,
                        children: 0,
                    });
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_path_strings_when_parsing_targets_then_selects_level() {
        assert_eq!("a".parse::<Target>().unwrap(), Target::Layer("a".into()));
        assert_eq!(
            "a/s".parse::<Target>().unwrap(),
            Target::Section {
                layer: "a".into(),
                section: "s".into()
            }
        );
        assert_eq!("a/s/c".parse::<Target>().unwrap().name(), "c");
    }

    #[test]
    fn given_empty_segment_when_parsing_target_then_fails() {
        assert!("a//c".parse::<Target>().is_err());
        assert!("".parse::<Target>().is_err());
    }

    #[test]
    fn given_gesture_strings_when_parsing_then_maps_to_variants() {
        assert_eq!("reset".parse::<Gesture>().unwrap(), Gesture::Reset);
        assert_eq!("expand-all".parse::<Gesture>().unwrap(), Gesture::ExpandAll);
        assert_eq!(
            "toggle:a".parse::<Gesture>().unwrap(),
            Gesture::Toggle(Target::Layer("a".into()))
        );
        assert!(matches!(
            "open:a".parse::<Gesture>(),
            Err(ApplicationError::InvalidGesture { .. })
        ));
    }

    #[test]
    fn given_target_when_displaying_then_round_trips_path() {
        let t: Target = "a/s/c".parse().unwrap();
        assert_eq!(t.to_string(), "a/s/c");
    }
}
