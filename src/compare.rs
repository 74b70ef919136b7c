//! The comparison endpoint: runs a baseline and an intervention simulation
//! and classifies per-node differences. Classification follows spec.md §6's
//! `effect_size`-delta table (not the Python source's confidence-delta
//! comparison — see DESIGN.md).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::ChangeType;
use crate::error::EngineError;
use crate::graph::CausalGraph;
use crate::propagation::simulate;
use crate::request::CompareRequest;
use crate::response::{AffectedNode, ComparedNode, CompareResponse};

const STRENGTH_DELTA: f64 = 0.05;

pub fn compare(graph: &CausalGraph, request: &CompareRequest) -> Result<CompareResponse, EngineError> {
    let baseline = simulate(graph, &request.baseline)?;
    let intervention = simulate(graph, &request.intervention)?;

    let mut baseline_by_node: BTreeMap<&str, &AffectedNode> = BTreeMap::new();
    for node in &baseline.affected_nodes {
        baseline_by_node.insert(node.node_id.as_str(), node);
    }
    let mut intervention_by_node: BTreeMap<&str, &AffectedNode> = BTreeMap::new();
    for node in &intervention.affected_nodes {
        intervention_by_node.insert(node.node_id.as_str(), node);
    }

    let mut all_ids: Vec<&str> = baseline_by_node.keys().copied().collect();
    for id in intervention_by_node.keys() {
        if !all_ids.contains(id) {
            all_ids.push(id);
        }
    }
    all_ids.sort();

    let mut changed_nodes: Vec<ComparedNode> = Vec::new();
    for node_id in all_ids {
        let base = baseline_by_node.get(node_id).copied();
        let intervention_node = intervention_by_node.get(node_id).copied();
        let change_type = classify_change(base, intervention_node);
        if change_type == ChangeType::Unchanged {
            continue;
        }
        let baseline_effect = base.map(|n| n.effect_size).unwrap_or(0.0);
        let intervention_effect = intervention_node.map(|n| n.effect_size).unwrap_or(0.0);
        changed_nodes.push(ComparedNode {
            node_id: node_id.to_string(),
            change_type,
            baseline: base.cloned(),
            intervention: intervention_node.cloned(),
            effect_size_delta: intervention_effect - baseline_effect,
        });
    }

    changed_nodes.sort_by(|a, b| {
        b.effect_size_delta
            .abs()
            .partial_cmp(&a.effect_size_delta.abs())
            .unwrap_or(Ordering::Equal)
    });

    Ok(CompareResponse {
        baseline,
        intervention,
        changed_nodes,
    })
}

fn classify_change(baseline: Option<&AffectedNode>, intervention: Option<&AffectedNode>) -> ChangeType {
    match (baseline, intervention) {
        (None, Some(_)) => ChangeType::New,
        (Some(_), None) => ChangeType::Resolved,
        (None, None) => ChangeType::Unchanged,
        (Some(b), Some(i)) => {
            if b.direction != i.direction {
                ChangeType::DirectionFlip
            } else if i.effect_size > b.effect_size + STRENGTH_DELTA {
                ChangeType::Strengthened
            } else if b.effect_size > i.effect_size + STRENGTH_DELTA {
                ChangeType::Weakened
            } else {
                ChangeType::Unchanged
            }
        }
    }
}
