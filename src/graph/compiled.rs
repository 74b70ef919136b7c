use std::collections::HashMap;

use crate::domain::{ActivationDirection, Priority, Relation, Timescale};
use crate::error::LoadError;
use crate::graph::edge::Edge;

/// One `(edge, phase)` pair, fully resolved: every field that could fall
/// back to the logical edge's default already has. Ported from
/// `original_source/backend/app/engine.py::_compile_edges`.
#[derive(Debug, Clone)]
pub struct CompiledEdge {
    pub source: String,
    pub target: String,
    pub at: Timescale,
    pub at_tick: u8,
    pub rel: Relation,
    pub weight: f64,
    pub priority: Priority,
    pub activation_direction: ActivationDirection,
    pub activation_threshold: Option<f64>,
    pub context: HashMap<String, bool>,
    /// Set when the owning logical edge carried no `temporal_profile`; the
    /// time-constant gain (§4.3.3.e) applies only to these.
    pub is_legacy_timing: bool,
    pub description: Option<String>,
}

impl CompiledEdge {
    pub fn context_matches(&self, request_context: &HashMap<String, bool>) -> bool {
        self.context
            .iter()
            .all(|(key, required)| request_context.get(key).copied().unwrap_or(false) == *required)
    }
}

/// Expands logical edges into `CompiledEdge`s, one per temporal phase (or a
/// single legacy phase at `edge.delay` when `temporal_profile` is absent).
pub fn compile_edges(edges: &[Edge]) -> Result<Vec<CompiledEdge>, LoadError> {
    let mut compiled = Vec::new();
    for edge in edges {
        match &edge.temporal_profile {
            None => {
                compiled.push(CompiledEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    at: edge.delay,
                    at_tick: edge.delay.tick(),
                    rel: edge.rel,
                    weight: edge.weight,
                    priority: edge.priority,
                    activation_direction: edge.activation_direction,
                    activation_threshold: edge.activation_threshold,
                    context: edge.context.clone(),
                    is_legacy_timing: true,
                    description: None,
                });
            }
            Some(phases) => {
                let mut seen_at: Vec<Timescale> = Vec::with_capacity(phases.len());
                for phase in phases {
                    if seen_at.contains(&phase.at) {
                        return Err(LoadError::DuplicateTemporalPhase {
                            edge_source: edge.source.clone(),
                            target: edge.target.clone(),
                            at: phase.at,
                        });
                    }
                    seen_at.push(phase.at);

                    let activation_direction =
                        phase.activation_direction.unwrap_or(edge.activation_direction);
                    let activation_threshold =
                        phase.activation_threshold.or(edge.activation_threshold);
                    if activation_direction != ActivationDirection::Any
                        && activation_threshold.is_none()
                    {
                        return Err(LoadError::MissingActivationThreshold {
                            edge_source: edge.source.clone(),
                            target: edge.target.clone(),
                            at: phase.at,
                            direction: activation_direction,
                        });
                    }

                    compiled.push(CompiledEdge {
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        at: phase.at,
                        at_tick: phase.at.tick(),
                        rel: phase.rel.unwrap_or(edge.rel),
                        weight: phase.weight.unwrap_or(edge.weight),
                        priority: phase.priority.unwrap_or(edge.priority),
                        activation_direction,
                        activation_threshold,
                        context: edge.context.clone(),
                        is_legacy_timing: false,
                        description: phase.description.clone(),
                    });
                }
            }
        }
    }
    Ok(compiled)
}

/// Forward and reverse adjacency, each preserving `compile_edges`' output
/// order (insertion-order `Vec`s, not a `petgraph` graph — see SPEC_FULL.md
/// "Graph algorithms").
pub fn build_adjacency(
    compiled: &[CompiledEdge],
) -> (
    HashMap<String, Vec<CompiledEdge>>,
    HashMap<String, Vec<CompiledEdge>>,
) {
    let mut forward: HashMap<String, Vec<CompiledEdge>> = HashMap::new();
    let mut reverse: HashMap<String, Vec<CompiledEdge>> = HashMap::new();
    for edge in compiled {
        forward
            .entry(edge.source.clone())
            .or_default()
            .push(edge.clone());
        reverse
            .entry(edge.target.clone())
            .or_default()
            .push(edge.clone());
    }
    (forward, reverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority as Pri, Relation as Rel};
    use std::collections::HashMap as Map;

    fn base_edge() -> Edge {
        Edge {
            source: "a".into(),
            target: "b".into(),
            rel: Rel::Increases,
            weight: 1.0,
            delay: Timescale::Immediate,
            priority: Pri::Medium,
            activation_direction: ActivationDirection::Any,
            activation_threshold: None,
            context: Map::new(),
            temporal_profile: None,
        }
    }

    #[test]
    fn legacy_edge_compiles_to_one_phase() {
        let edges = vec![base_edge()];
        let compiled = compile_edges(&edges).unwrap();
        assert_eq!(compiled.len(), 1);
        assert!(compiled[0].is_legacy_timing);
        assert_eq!(compiled[0].at_tick, 0);
    }

    #[test]
    fn phased_edge_rejects_duplicate_at() {
        let mut edge = base_edge();
        edge.temporal_profile = Some(vec![
            crate::graph::edge::EdgePhase {
                at: Timescale::Hours,
                rel: None,
                weight: None,
                priority: None,
                activation_direction: None,
                activation_threshold: None,
                description: None,
            },
            crate::graph::edge::EdgePhase {
                at: Timescale::Hours,
                rel: None,
                weight: None,
                priority: None,
                activation_direction: None,
                activation_threshold: None,
                description: None,
            },
        ]);
        let edges = vec![edge];
        assert!(matches!(
            compile_edges(&edges),
            Err(LoadError::DuplicateTemporalPhase { .. })
        ));
    }

    #[test]
    fn phase_requiring_threshold_without_one_fails() {
        let mut edge = base_edge();
        edge.temporal_profile = Some(vec![crate::graph::edge::EdgePhase {
            at: Timescale::Immediate,
            rel: None,
            weight: None,
            priority: None,
            activation_direction: Some(ActivationDirection::Up),
            activation_threshold: None,
            description: None,
        }]);
        let edges = vec![edge];
        assert!(matches!(
            compile_edges(&edges),
            Err(LoadError::MissingActivationThreshold { .. })
        ));
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let mut e1 = base_edge();
        e1.target = "c".into();
        let edges = vec![base_edge(), e1];
        let compiled = compile_edges(&edges).unwrap();
        let (forward, _reverse) = build_adjacency(&compiled);
        let from_a = &forward["a"];
        assert_eq!(from_a[0].target, "b");
        assert_eq!(from_a[1].target, "c");
    }
}
