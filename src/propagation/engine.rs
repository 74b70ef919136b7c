//! The tick-scheduled propagation loop. Ported from
//! `original_source/backend/app/engine.py::simulate`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::context::expand_perturbations;
use crate::domain::{clamp01, Direction, PriorityTier, Timescale};
use crate::error::EngineError;
use crate::graph::CausalGraph;
use crate::propagation::gates::{
    activation_threshold_gain, propagate_direction, saturation_gain, source_level,
    time_constant_gain,
};
use crate::propagation::influence::Influence;
use crate::propagation::resolver::{resolve_influence, SecondaryBranch};
use crate::propagation::steps::generate_step_description;
use crate::request::SimulationRequest;
use crate::response::{AffectedNode, SimulationResponse};
use crate::trace::TraceStore;

type Bucket = (String, u8);

/// Runs one simulation. Pure function of `(graph, request)` — no mutable
/// state survives the call.
pub fn simulate(graph: &CausalGraph, request: &SimulationRequest) -> Result<SimulationResponse, EngineError> {
    let merged = expand_perturbations(&request.perturbations, &request.context);
    let max_tick = request.options.time_window.max_tick();

    let mut influence_buffer: HashMap<Bucket, Vec<Influence>> = HashMap::new();
    let mut node_states: HashMap<Bucket, AffectedNode> = HashMap::new();
    let mut node_activity: HashMap<Bucket, f64> = HashMap::new();
    let mut propagated_directions: HashMap<Bucket, HashSet<Direction>> = HashMap::new();
    let mut trace_store = TraceStore::new();

    for perturbation in &merged {
        if !graph.contains_node(&perturbation.node_id) {
            tracing::warn!(node_id = %perturbation.node_id, "skipping perturbation for unknown node");
            continue;
        }
        influence_buffer
            .entry((perturbation.node_id.clone(), 0))
            .or_default()
            .push(Influence {
                direction: perturbation.seed_direction(),
                confidence: 1.0,
                effect_size: 1.0,
                priority: PriorityTier::Ultra,
                path: vec![perturbation.node_id.clone()],
                steps: vec![],
            });
    }

    for tick in 0..=max_tick {
        let mut ready: BTreeSet<String> = influence_buffer
            .keys()
            .filter(|(_, t)| *t == tick)
            .map(|(n, _)| n.clone())
            .collect();

        tracing::debug!(tick, ready_size = ready.len(), "tick start");

        while let Some(node_id) = pop_min(&mut ready) {
            let bucket_key = (node_id.clone(), tick);
            let resolved = match influence_buffer.get(&bucket_key) {
                Some(bucket) if !bucket.is_empty() => resolve_influence(bucket),
                _ => None,
            };
            let resolved = match resolved {
                Some(r) => r,
                None => continue,
            };
            if resolved.effect_size < request.options.min_effect_size {
                continue;
            }
            if let Some(prev) = node_states.get(&bucket_key) {
                if prev.direction == resolved.direction
                    && (prev.confidence - resolved.confidence).abs() < 0.01
                    && (prev.effect_size - resolved.effect_size).abs() < 0.01
                {
                    continue;
                }
            }

            let affected = AffectedNode {
                node_id: node_id.clone(),
                direction: resolved.direction,
                magnitude: resolved.magnitude,
                confidence: resolved.confidence,
                effect_size: resolved.effect_size,
                timescale: Timescale::from_tick(tick),
                tick,
            };
            let signed_activity = match resolved.direction {
                Direction::Up => resolved.effect_size,
                Direction::Down => -resolved.effect_size,
                _ => 0.0,
            };
            node_states.insert(bucket_key.clone(), affected);
            node_activity.insert(bucket_key.clone(), signed_activity);

            emit_secondary_branches(
                graph,
                &node_id,
                request,
                &resolved.secondary_branches,
                &mut trace_store,
            );

            let already_propagated = propagated_directions
                .get(&bucket_key)
                .map(|set| set.contains(&resolved.direction))
                .unwrap_or(false);
            if resolved.dominant_hops as u32 >= request.options.max_hops || already_propagated {
                continue;
            }
            propagated_directions
                .entry(bucket_key.clone())
                .or_default()
                .insert(resolved.direction);

            let node = match graph.node(&node_id) {
                Some(n) => n,
                None => continue,
            };
            let level = source_level(node, node_activity.get(&bucket_key).copied().unwrap_or(0.0));

            for edge in graph.outgoing(&node_id) {
                if !edge.context_matches(&request.context) {
                    continue;
                }
                let target_dir = propagate_direction(edge.rel.is_positive(), resolved.direction);
                if !matches!(target_dir, Direction::Up | Direction::Down) {
                    continue;
                }

                let threshold_gain = activation_threshold_gain(edge, resolved.direction, level);
                let saturation = saturation_gain(node, level, resolved.direction);
                let time_gain = time_constant_gain(edge, node);

                let target_effect_size =
                    clamp01(resolved.effect_size * edge.weight * threshold_gain * saturation * time_gain);
                let target_confidence = (resolved.confidence * threshold_gain * saturation)
                    .max(0.0)
                    .min(1.0);

                if target_effect_size < request.options.min_effect_size
                    || target_confidence < request.options.min_confidence
                {
                    continue;
                }

                let next_tick = tick + edge.at_tick;
                if next_tick > max_tick {
                    continue;
                }

                let source_label = node.label.as_str();
                let target_label = graph.node(&edge.target).map(|n| n.label.as_str()).unwrap_or(&edge.target);
                let description = generate_step_description(
                    source_label,
                    target_label,
                    edge.rel.is_positive(),
                    resolved.direction,
                    edge.at,
                );

                let mut path = resolved.dominant_path.clone();
                path.push(edge.target.clone());
                let mut steps = resolved.dominant_steps.clone();
                steps.push(description);

                trace_store.upsert(
                    &edge.target,
                    path.clone(),
                    steps.clone(),
                    target_confidence,
                    graph.syndromes(),
                );

                influence_buffer
                    .entry((edge.target.clone(), next_tick))
                    .or_default()
                    .push(Influence {
                        direction: target_dir,
                        confidence: target_confidence,
                        effect_size: target_effect_size,
                        priority: edge.priority.into(),
                        path,
                        steps,
                    });

                if edge.at_tick == 0 {
                    ready.insert(edge.target.clone());
                }
            }
        }
    }

    Ok(assemble(node_states, trace_store, max_tick))
}

fn pop_min(set: &mut BTreeSet<String>) -> Option<String> {
    let first = set.iter().next().cloned()?;
    set.remove(&first);
    Some(first)
}

fn emit_secondary_branches(
    graph: &CausalGraph,
    node_id: &str,
    request: &SimulationRequest,
    branches: &[SecondaryBranch],
    trace_store: &mut TraceStore,
) {
    if branches.is_empty() {
        return;
    }
    for edge in graph.outgoing(node_id) {
        if !edge.context_matches(&request.context) {
            continue;
        }
        for branch in branches {
            let target_dir = propagate_direction(edge.rel.is_positive(), branch.direction);
            if !matches!(target_dir, Direction::Up | Direction::Down) {
                continue;
            }
            let confidence = branch.confidence * crate::propagation::resolver::SECONDARY_ATTENUATION;
            if confidence < request.options.min_confidence {
                continue;
            }

            let node = match graph.node(node_id) {
                Some(n) => n,
                None => continue,
            };
            let source_label = node.label.as_str();
            let target_label = graph.node(&edge.target).map(|n| n.label.as_str()).unwrap_or(&edge.target);
            let description = generate_step_description(
                source_label,
                target_label,
                edge.rel.is_positive(),
                branch.direction,
                edge.at,
            );

            let mut path = branch.path.clone();
            path.push(edge.target.clone());
            let mut steps = branch.steps.clone();
            steps.push(description);

            trace_store.upsert(&edge.target, path, steps, confidence, graph.syndromes());
        }
    }
}

fn assemble(
    node_states: HashMap<Bucket, AffectedNode>,
    trace_store: TraceStore,
    max_tick: u8,
) -> SimulationResponse {
    let mut by_node: BTreeMap<String, Vec<AffectedNode>> = BTreeMap::new();
    for ((node_id, _tick), affected) in node_states {
        by_node.entry(node_id).or_default().push(affected);
    }

    let mut affected_nodes = Vec::with_capacity(by_node.len());
    let mut timelines = BTreeMap::new();
    for (node_id, mut states) in by_node {
        states.sort_by_key(|s| s.tick);
        affected_nodes.push(states[0].clone());
        timelines.insert(node_id, states);
    }
    affected_nodes.sort_by(|a, b| a.node_id.cmp(&b.node_id));

    SimulationResponse {
        affected_nodes,
        traces: trace_store.into_map(),
        timelines,
        max_ticks: max_tick,
    }
}
