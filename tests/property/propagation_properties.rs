//! Property tests for the invariants in spec.md §8 (P1, P2, P4, P5, P6).

use std::collections::HashMap;

use proptest::prelude::*;

use physio_causal::domain::{
    ActivationDirection, Direction, Domain, Magnitude, PerturbationOp, Priority, Relation,
    StateType, TimeConstant, Timescale,
};
use physio_causal::graph::compiled::compile_edges;
use physio_causal::graph::{CausalGraph, Edge, EdgePhase, Node};
use physio_causal::request::{Perturbation, SimulationOptions, SimulationRequest};
use physio_causal::simulate;

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

fn edge(rel: Relation, weight: f64) -> Edge {
    Edge {
        source: "a".into(),
        target: "b".into(),
        rel,
        weight,
        delay: Timescale::Immediate,
        priority: Priority::Medium,
        activation_direction: ActivationDirection::Any,
        activation_threshold: None,
        context: HashMap::new(),
        temporal_profile: None,
    }
}

fn rel_strategy() -> impl Strategy<Value = Relation> {
    prop_oneof![Just(Relation::Increases), Just(Relation::Decreases)]
}

fn op_strategy() -> impl Strategy<Value = PerturbationOp> {
    prop_oneof![Just(PerturbationOp::Increase), Just(PerturbationOp::Decrease)]
}

proptest! {
    /// P1: a positive-relation edge with an `up` source produces `up` at
    /// the target; `decreases` flips it.
    #[test]
    fn p1_polarity_is_respected(rel in rel_strategy(), op in op_strategy(), weight in 0.05f64..1.0) {
        let graph = CausalGraph::build(vec![node("a"), node("b")], vec![edge(rel, weight)], vec![]).unwrap();
        let request = SimulationRequest {
            perturbations: vec![Perturbation { node_id: "a".into(), op, value: None }],
            context: HashMap::new(),
            options: SimulationOptions::default(),
        };
        let response = simulate(&graph, &request).unwrap();

        let source_dir = op.seed_direction();
        if let Some(b) = response.affected_nodes.iter().find(|n| n.node_id == "b") {
            let expected = if rel.is_positive() {
                source_dir
            } else {
                match source_dir {
                    Direction::Up => Direction::Down,
                    Direction::Down => Direction::Up,
                    other => other,
                }
            };
            prop_assert_eq!(b.direction, expected);
        }
    }

    /// P2: confidence and effect_size stay in `[0, 1]` at every emission.
    #[test]
    fn p2_confidence_and_effect_size_stay_bounded(
        rel in rel_strategy(),
        op in op_strategy(),
        weight in 0.0f64..1.0,
    ) {
        let graph = CausalGraph::build(vec![node("a"), node("b")], vec![edge(rel, weight)], vec![]).unwrap();
        let request = SimulationRequest {
            perturbations: vec![Perturbation { node_id: "a".into(), op, value: None }],
            context: HashMap::new(),
            options: SimulationOptions::default(),
        };
        let response = simulate(&graph, &request).unwrap();
        for affected in &response.affected_nodes {
            prop_assert!((0.0..=1.0).contains(&affected.confidence));
            prop_assert!((0.0..=1.0).contains(&affected.effect_size));
        }
        for timeline in response.timelines.values() {
            for affected in timeline {
                prop_assert!((0.0..=1.0).contains(&affected.confidence));
                prop_assert!((0.0..=1.0).contains(&affected.effect_size));
            }
        }
    }

    /// P4: same input produces identical output, including trace ordering.
    #[test]
    fn p4_deterministic_given_same_input(
        rel in rel_strategy(),
        op in op_strategy(),
        weight in 0.05f64..1.0,
    ) {
        let graph = CausalGraph::build(vec![node("a"), node("b")], vec![edge(rel, weight)], vec![]).unwrap();
        let request = SimulationRequest {
            perturbations: vec![Perturbation { node_id: "a".into(), op, value: None }],
            context: HashMap::new(),
            options: SimulationOptions::default(),
        };
        let first = serde_json::to_string(&simulate(&graph, &request).unwrap()).unwrap();
        let second = serde_json::to_string(&simulate(&graph, &request).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// P5: every `AffectedNode.magnitude` matches its `effect_size` bin.
    #[test]
    fn p5_magnitude_matches_effect_size_bin(
        rel in rel_strategy(),
        op in op_strategy(),
        weight in 0.0f64..1.0,
    ) {
        let graph = CausalGraph::build(vec![node("a"), node("b")], vec![edge(rel, weight)], vec![]).unwrap();
        let request = SimulationRequest {
            perturbations: vec![Perturbation { node_id: "a".into(), op, value: None }],
            context: HashMap::new(),
            options: SimulationOptions::default(),
        };
        let response = simulate(&graph, &request).unwrap();
        for affected in &response.affected_nodes {
            prop_assert_eq!(affected.magnitude, Magnitude::from_effect_size(affected.effect_size));
        }
    }

    /// P6: `compiled_edges.size == sum(max(1, |temporal_profile|))` over
    /// logical edges.
    #[test]
    fn p6_compiled_edge_count_matches_phase_counts(phase_count in 0usize..4) {
        let mut e = edge(Relation::Increases, 0.5);
        if phase_count > 0 {
            e.temporal_profile = Some(
                [Timescale::Immediate, Timescale::Minutes, Timescale::Hours][..phase_count.min(3)]
                    .iter()
                    .map(|&at| EdgePhase {
                        at,
                        rel: None,
                        weight: None,
                        priority: None,
                        activation_direction: None,
                        activation_threshold: None,
                        description: None,
                    })
                    .collect(),
            );
        }
        let compiled = compile_edges(&[e]).unwrap();
        let expected = phase_count.max(1);
        prop_assert_eq!(compiled.len(), expected);
    }
}
