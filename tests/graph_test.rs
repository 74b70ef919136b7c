//! Graph construction contract tests (spec.md §3 invariants, §6 loader
//! contract).

use std::collections::HashMap;

use physio_causal::domain::{ActivationDirection, Domain, Priority, Relation, StateType, TimeConstant, Timescale};
use physio_causal::graph::{CausalGraph, Edge, EdgePhase, Node};
use physio_causal::LoadError;

fn node(id: &str, aliases: &[&str]) -> Node {
    Node {
        id: id.into(),
        label: id.into(),
        domain: Domain::Renal,
        subdomain: None,
        kind: "variable".into(),
        state_type: StateType::Qualitative,
        unit: None,
        normal_range: None,
        aliases: aliases.iter().map(|s| s.to_string()).collect(),
        time_constant: TimeConstant::Acute,
        baseline_level: 0.0,
        min_level: -1.0,
        max_level: 1.0,
    }
}

fn edge(source: &str, target: &str) -> Edge {
    Edge {
        source: source.into(),
        target: target.into(),
        rel: Relation::Increases,
        weight: 1.0,
        delay: Timescale::Immediate,
        priority: Priority::Medium,
        activation_direction: ActivationDirection::Any,
        activation_threshold: None,
        context: HashMap::new(),
        temporal_profile: None,
    }
}

#[test]
fn alias_lookup_resolves_case_insensitively() {
    let graph = CausalGraph::build(vec![node("na_plus", &["sodium", "Na+"])], vec![], vec![]).unwrap();
    assert_eq!(graph.alias_to_id("sodium"), Some("na_plus"));
    assert_eq!(graph.alias_to_id("SODIUM"), Some("na_plus"));
    assert_eq!(graph.alias_to_id("na_plus"), Some("na_plus"));
    assert_eq!(graph.alias_to_id("missing"), None);
}

#[test]
fn dangling_edge_endpoint_is_rejected() {
    let result = CausalGraph::build(vec![node("a", &[])], vec![edge("a", "ghost")], vec![]);
    assert!(matches!(result, Err(LoadError::DanglingEdgeEndpoint { .. })));
}

#[test]
fn phase_with_activation_direction_requires_threshold() {
    let mut e = edge("a", "b");
    e.temporal_profile = Some(vec![EdgePhase {
        at: Timescale::Immediate,
        rel: None,
        weight: None,
        priority: None,
        activation_direction: Some(ActivationDirection::Down),
        activation_threshold: None,
        description: None,
    }]);
    let result = CausalGraph::build(vec![node("a", &[]), node("b", &[])], vec![e], vec![]);
    assert!(matches!(result, Err(LoadError::MissingActivationThreshold { .. })));
}

#[test]
fn adjacency_preserves_declaration_order() {
    let graph = CausalGraph::build(
        vec![node("a", &[]), node("b", &[]), node("c", &[])],
        vec![edge("a", "c"), edge("a", "b")],
        vec![],
    )
    .unwrap();
    let outgoing = graph.outgoing("a");
    assert_eq!(outgoing[0].target, "c");
    assert_eq!(outgoing[1].target, "b");
}

#[test]
fn logical_edges_are_retained_alongside_compiled_edges() {
    let mut ab = edge("a", "b");
    ab.temporal_profile = Some(vec![EdgePhase {
        at: Timescale::Hours,
        rel: Some(Relation::Decreases),
        weight: None,
        priority: None,
        activation_direction: None,
        activation_threshold: None,
        description: None,
    }]);
    let graph = CausalGraph::build(vec![node("a", &[]), node("b", &[])], vec![ab], vec![]).unwrap();

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].rel, Relation::Increases);
    assert_eq!(graph.compiled_edges()[0].rel, Relation::Decreases);
}
