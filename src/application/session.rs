//! View session: owns the blueprint, its expansion state and the current layout
//!
//! Every state change reruns the layout engine over the whole tree.

use tracing::debug;

use crate::application::controller::{Gesture, OutlineRow, TreeController};
use crate::domain::{Blueprint, ExpansionState, Layout, LayoutEngine};

#[derive(Debug, Clone)]
pub struct ViewSession {
    blueprint: Blueprint,
    state: ExpansionState,
    engine: LayoutEngine,
    layout: Layout,
}

impl ViewSession {
    /// Start a session with everything collapsed.
    pub fn new(blueprint: Blueprint, engine: LayoutEngine) -> Self {
        let state = ExpansionState::new();
        let layout = engine.compute(&blueprint, &state);
        Self {
            blueprint,
            state,
            engine,
            layout,
        }
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Apply a gesture through the tree controller and relayout.
    pub fn handle(&mut self, gesture: &Gesture) -> &Layout {
        TreeController::new(&self.blueprint).apply(&mut self.state, gesture);
        self.recompute()
    }

    /// Replace the blueprint after a configuration reload.
    ///
    /// Expansion flags are kept; flags naming nodes that no longer exist are ignored.
    pub fn reload(&mut self, blueprint: Blueprint) -> &Layout {
        self.blueprint = blueprint;
        self.recompute()
    }

    /// Collapse everything.
    pub fn reset(&mut self) -> &Layout {
        self.handle(&Gesture::Reset)
    }

    pub fn outline(&self) -> Vec<OutlineRow> {
        TreeController::new(&self.blueprint).outline(&self.state)
    }

    fn recompute(&mut self) -> &Layout {
        self.layout = self.engine.compute(&self.blueprint, &self.state);
        debug!("recompute: {} nodes", self.layout.nodes.len());
        &self.layout
    }
}
