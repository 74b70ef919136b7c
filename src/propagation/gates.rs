//! Fan-out gates: context matching, direction propagation, activation
//! threshold, saturation, and time-constant gain. Ported from
//! `original_source/backend/app/engine.py::_context_matches`,
//! `_activation_threshold_gain`, `_saturation_gain`, `_time_constant_gain`.

use crate::domain::{clamp, ActivationDirection, Direction, TimeConstant};
use crate::graph::{CompiledEdge, Node};

/// §4.3.3(b). Positive relations preserve direction; `decreases` flips it.
/// `unknown`/`unchanged` propagate as themselves, but callers must drop such
/// cases from fan-out (they carry no signed strength to act on).
pub fn propagate_direction(rel_is_positive: bool, source_dir: Direction) -> Direction {
    match source_dir {
        Direction::Up if rel_is_positive => Direction::Up,
        Direction::Up => Direction::Down,
        Direction::Down if rel_is_positive => Direction::Down,
        Direction::Down => Direction::Up,
        other => other,
    }
}

/// §4.3.3(c). The node's resolved signed position, clamped to its range.
pub fn source_level(node: &Node, activity: f64) -> f64 {
    clamp(node.baseline_level + activity, node.min_level, node.max_level)
}

/// Returns the activation gate gain in `{0.0, 1.0}`. `source_dir` is the
/// node's resolved propagation direction (the dominant influence's
/// direction, or the resolved direction when there is no dominant
/// influence) — never re-derived from `source_level`'s sign, which can
/// disagree with it (e.g. a node perturbed `Decrease` whose accumulated
/// level still sits above zero because of its baseline).
pub fn activation_threshold_gain(edge: &CompiledEdge, source_dir: Direction, source_level: f64) -> f64 {
    let threshold = match edge.activation_threshold {
        Some(t) => t,
        None => return 1.0,
    };
    if edge.activation_direction != ActivationDirection::Any
        && !source_dir.matches_activation(edge.activation_direction)
    {
        return 0.0;
    }
    let source_strength = source_level.abs();
    if source_strength >= threshold {
        1.0
    } else {
        0.0
    }
}

/// §4.3.3(d). Headroom-based saturation gate on the *source* node.
/// `source_dir` is the node's resolved propagation direction, constant
/// across every outgoing edge in the fan-out loop — never a per-edge
/// post-relation direction, which would apply the wrong headroom check
/// whenever an edge flips the sign.
pub fn saturation_gain(node: &Node, source_level: f64, source_dir: Direction) -> f64 {
    if node.uses_default_range() {
        return 1.0;
    }
    const MARGIN: f64 = 0.05;
    match source_dir {
        Direction::Up => {
            if source_level >= node.max_level - MARGIN {
                MARGIN
            } else {
                1.0
            }
        }
        Direction::Down => {
            if source_level <= node.min_level + MARGIN {
                MARGIN
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

/// §4.3.3(e). Applies only to legacy-timed (non-phased) edges.
pub fn time_constant_gain(edge: &CompiledEdge, node: &Node) -> f64 {
    if !edge.is_legacy_timing {
        return 1.0;
    }
    match node.time_constant {
        TimeConstant::Acute => 1.0,
        TimeConstant::Subacute => 0.75,
        TimeConstant::Chronic => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, Priority, Relation, StateType, Timescale};
    use std::collections::HashMap;

    fn node() -> Node {
        Node {
            id: "n".into(),
            label: "N".into(),
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

    fn edge() -> CompiledEdge {
        CompiledEdge {
            source: "n".into(),
            target: "m".into(),
            at: Timescale::Immediate,
            at_tick: 0,
            rel: Relation::Increases,
            weight: 1.0,
            priority: Priority::Medium,
            activation_direction: ActivationDirection::Any,
            activation_threshold: None,
            context: HashMap::new(),
            is_legacy_timing: true,
            description: None,
        }
    }

    #[test]
    fn decreases_flips_direction() {
        assert_eq!(propagate_direction(false, Direction::Up), Direction::Down);
        assert_eq!(propagate_direction(false, Direction::Down), Direction::Up);
    }

    #[test]
    fn positive_relation_preserves_direction() {
        assert_eq!(propagate_direction(true, Direction::Up), Direction::Up);
    }

    #[test]
    fn no_threshold_always_gains() {
        let e = edge();
        assert_eq!(activation_threshold_gain(&e, Direction::Up, 0.9), 1.0);
    }

    #[test]
    fn threshold_blocks_below_strength() {
        let mut e = edge();
        e.activation_threshold = Some(0.5);
        assert_eq!(activation_threshold_gain(&e, Direction::Up, 0.2), 0.0);
        assert_eq!(activation_threshold_gain(&e, Direction::Up, 0.6), 1.0);
    }

    #[test]
    fn threshold_respects_required_direction() {
        let mut e = edge();
        e.activation_threshold = Some(0.2);
        e.activation_direction = ActivationDirection::Down;
        assert_eq!(activation_threshold_gain(&e, Direction::Up, 0.9), 0.0);
        assert_eq!(activation_threshold_gain(&e, Direction::Down, -0.9), 1.0);
    }

    #[test]
    fn threshold_direction_follows_resolved_direction_not_level_sign() {
        // Node resolved Decrease sitting at a positive level (baseline above
        // zero): the gate must key off the resolved direction, not the
        // level's sign, so a Down-only activation edge still fires.
        let mut e = edge();
        e.activation_threshold = Some(0.2);
        e.activation_direction = ActivationDirection::Down;
        assert_eq!(activation_threshold_gain(&e, Direction::Down, 0.9), 1.0);
    }

    #[test]
    fn default_range_never_saturates() {
        let n = node();
        assert_eq!(saturation_gain(&n, 0.99, Direction::Up), 1.0);
    }

    #[test]
    fn constrained_range_saturates_near_max() {
        let mut n = node();
        n.max_level = 0.5;
        assert_eq!(saturation_gain(&n, 0.48, Direction::Up), 0.05);
        assert_eq!(saturation_gain(&n, 0.0, Direction::Up), 1.0);
    }

    #[test]
    fn time_constant_gain_skips_phased_edges() {
        let mut e = edge();
        e.is_legacy_timing = false;
        let mut n = node();
        n.time_constant = TimeConstant::Chronic;
        assert_eq!(time_constant_gain(&e, &n), 1.0);
    }

    #[test]
    fn time_constant_gain_applies_to_legacy_edges() {
        let e = edge();
        let mut n = node();
        n.time_constant = TimeConstant::Chronic;
        assert_eq!(time_constant_gain(&e, &n), 0.5);
    }
}
