//! Tests for the tree controller and view session

use std::fs;

use rstest::{fixture, rstest};

use archview::application::{Gesture, Target, TreeController, ViewSession};
use archview::domain::{parse, Blueprint, ExpansionState, LayoutEngine};
use archview::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn blueprint() -> Blueprint {
    let text = fs::read_to_string("tests/resources/blueprints/platform.toml").expect("read fixture");
    parse(&text).expect("parse fixture")
}

fn gesture(s: &str) -> Gesture {
    s.parse().expect("valid gesture")
}

#[rstest]
fn given_closed_layer_when_clicked_then_only_layer_opens(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();

    controller.apply(&mut state, &gesture("click:serving_layer"));

    assert!(state.is_layer_open("serving_layer"));
    assert!(!state.is_section_open("serving_layer", "request_section"));
}

#[rstest]
fn given_open_layer_when_clicked_then_collapses_with_cascade(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();
    controller.apply(&mut state, &Gesture::ExpandAll);

    controller.apply(&mut state, &gesture("click:serving_layer"));

    assert!(!state.is_layer_open("serving_layer"));
    assert!(!state.is_section_open("serving_layer", "request_section"));
    assert!(!state.is_component_open("router"));
    assert!(state.is_component_open("invoicer"));
}

#[rstest]
fn given_open_layer_when_toggled_then_descendants_keep_flags(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();
    controller.apply(&mut state, &Gesture::ExpandAll);

    controller.apply(&mut state, &gesture("toggle:serving_layer"));

    assert!(!state.is_layer_open("serving_layer"));
    assert!(state.is_section_open("serving_layer", "request_section"));
    assert!(state.is_component_open("router"));
}

#[rstest]
fn given_open_section_when_clicked_then_closes_its_components(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();
    controller.apply(&mut state, &Gesture::ExpandAll);

    controller.apply(&mut state, &gesture("click:domain_layer/billing"));

    assert!(!state.is_section_open("domain_layer", "billing"));
    assert!(!state.is_component_open("invoicer"));
    assert!(!state.is_component_open("ledger"));
    assert!(state.is_section_open("domain_layer", "identity"));
    assert!(state.is_layer_open("domain_layer"));
}

#[rstest]
fn given_component_path_when_clicked_then_uses_bare_name(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();

    controller.apply(&mut state, &gesture("click:storage_layer/primary/postgres"));

    assert!(state.is_component_open("postgres"));
    assert!(!state.is_section_open("storage_layer", "primary"));
}

#[rstest]
fn given_reset_when_applied_then_state_empty(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();
    controller.apply(&mut state, &Gesture::ExpandAll);

    controller.apply(&mut state, &Gesture::Reset);

    assert!(state.is_empty());
}

// ============================================================
// Outline
// ============================================================

#[rstest]
fn given_collapsed_state_when_listing_outline_then_only_layers(blueprint: Blueprint) {
    let rows = TreeController::new(&blueprint).outline(&ExpansionState::new());

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.depth == 0 && !r.open));
    assert_eq!(rows[1].target, Target::Layer("domain_layer".into()));
    assert_eq!(rows[1].children, 3);
}

#[rstest]
fn given_open_layer_and_section_when_listing_outline_then_nests_rows(blueprint: Blueprint) {
    let controller = TreeController::new(&blueprint);
    let mut state = ExpansionState::new();
    controller.apply(&mut state, &gesture("click:serving_layer"));
    controller.apply(&mut state, &gesture("click:serving_layer/response_section"));

    let rows = controller.outline(&state);

    let listed: Vec<_> = rows.iter().map(|r| (r.depth, r.target.to_string())).collect();
    assert_eq!(
        listed,
        vec![
            (0, "serving_layer".to_string()),
            (1, "serving_layer/request_section".to_string()),
            (1, "serving_layer/response_section".to_string()),
            (2, "serving_layer/response_section/serializer".to_string()),
            (0, "domain_layer".to_string()),
            (0, "storage_layer".to_string()),
        ]
    );
}

// ============================================================
// Session
// ============================================================

#[rstest]
fn given_gesture_sequence_when_handled_then_layout_matches_fresh_compute(blueprint: Blueprint) {
    let engine = LayoutEngine::default();
    let mut session = ViewSession::new(blueprint.clone(), engine);

    for g in [
        "click:serving_layer",
        "click:serving_layer/request_section",
        "toggle:serving_layer/request_section/router",
        "click:domain_layer",
        "click:domain_layer/identity",
        "click:serving_layer",
        "click:serving_layer",
    ] {
        let layout = session.handle(&gesture(g)).clone();
        assert_eq!(layout, engine.compute(&blueprint, session.state()));
    }

    // serving_layer was collapsed with cascade and reopened: only the layer box is back.
    let ids: Vec<_> = session.layout().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "layer-serving_layer",
            "layer-domain_layer",
            "section-domain_layer-identity",
        ]
    );
}

#[rstest]
fn given_expanded_session_when_reset_then_layout_empty(blueprint: Blueprint) {
    let mut session = ViewSession::new(blueprint, LayoutEngine::default());
    session.handle(&Gesture::ExpandAll);
    assert!(!session.layout().is_empty());

    session.reset();

    assert!(session.layout().is_empty());
    assert!(session.outline().iter().all(|r| !r.open));
}
