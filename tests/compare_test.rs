//! The comparison endpoint (spec.md §6).

use std::collections::HashMap;

use physio_causal::compare;
use physio_causal::domain::{ActivationDirection, ChangeType, Domain, PerturbationOp, Priority, Relation, StateType, TimeConstant, Timescale};
use physio_causal::graph::{CausalGraph, Edge, Node};
use physio_causal::request::{CompareRequest, Perturbation, SimulationOptions, SimulationRequest};

fn node(id: &str) -> Node {
    Node {
        id: id.into(),
        label: id.into(),
        domain: Domain::Cardio,
        subdomain: None,
        kind: "variable".into(),
        state_type: StateType::Qualitative,
        unit: None,
        normal_range: None,
        aliases: vec![],
        time_constant: TimeConstant::Acute,
        baseline_level: 0.0,
        min_level: -1.0,
        max_level: 1.0,
    }
}

fn edge(source: &str, target: &str, weight: f64) -> Edge {
    Edge {
        source: source.into(),
        target: target.into(),
        rel: Relation::Increases,
        weight,
        delay: Timescale::Immediate,
        priority: Priority::Medium,
        activation_direction: ActivationDirection::Any,
        activation_threshold: None,
        context: HashMap::new(),
        temporal_profile: None,
    }
}

fn perturb(node_id: &str) -> Perturbation {
    Perturbation {
        node_id: node_id.into(),
        op: PerturbationOp::Increase,
        value: None,
    }
}

#[test]
fn new_node_appears_only_under_intervention() {
    let graph = CausalGraph::build(vec![node("a"), node("b")], vec![edge("a", "b", 1.0)], vec![]).unwrap();

    let baseline = SimulationRequest {
        perturbations: vec![],
        context: HashMap::new(),
        options: SimulationOptions::default(),
    };
    let intervention = SimulationRequest {
        perturbations: vec![perturb("a")],
        context: HashMap::new(),
        options: SimulationOptions::default(),
    };
    let response = compare(&graph, &CompareRequest { baseline, intervention }).unwrap();

    let changed: HashMap<_, _> = response
        .changed_nodes
        .iter()
        .map(|c| (c.node_id.as_str(), c))
        .collect();
    assert_eq!(changed["a"].change_type, ChangeType::New);
    assert_eq!(changed["b"].change_type, ChangeType::New);
}

#[test]
fn second_perturbation_on_intervention_strengthens_target() {
    // b has two upstream sources; baseline only perturbs one, intervention
    // perturbs both, so b's intervention effect_size (combined) exceeds its
    // baseline effect_size by more than the 0.05 strengthening threshold.
    let graph = CausalGraph::build(
        vec![node("a"), node("a2"), node("b")],
        vec![edge("a", "b", 0.4), edge("a2", "b", 0.9)],
        vec![],
    )
    .unwrap();

    let baseline = SimulationRequest {
        perturbations: vec![perturb("a")],
        context: HashMap::new(),
        options: SimulationOptions::default(),
    };
    let intervention = SimulationRequest {
        perturbations: vec![perturb("a"), perturb("a2")],
        context: HashMap::new(),
        options: SimulationOptions::default(),
    };

    let cmp = compare(&graph, &CompareRequest { baseline, intervention }).unwrap();
    let b = cmp.changed_nodes.iter().find(|c| c.node_id == "b").unwrap();
    assert_eq!(b.change_type, ChangeType::Strengthened);
}
