//! Static graph analytics: direct neighborhoods, timescale-weighted
//! reachability, strongly-connected components, feedback-cluster
//! classification, and review candidates. A pure function over a compiled
//! graph, consumed by an external audit harness. Ported from
//! `original_source/backend/app/engine.py::build_dependency_index` and its
//! helpers; SCC detection follows the teacher's
//! `cortex-causal::graph::dag_enforcement::find_cycles` use of
//! `petgraph::algo::tarjan_scc`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::domain::{Relation, Timescale};
use crate::graph::CausalGraph;

#[derive(Debug, Clone, Default)]
pub struct FeedbackCluster {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    pub mixed_sign: bool,
    pub reciprocal: bool,
    pub has_delayed_phase: bool,
    pub reciprocal_pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewCandidates {
    pub reciprocal_pairs: Vec<(String, String)>,
    pub fast_feedback_clusters: Vec<Vec<String>>,
    pub immediate_high_weight_edges: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsReport {
    pub downstream: BTreeMap<String, BTreeMap<Timescale, Vec<String>>>,
    pub upstream: BTreeMap<String, BTreeMap<Timescale, Vec<String>>>,
    pub reachability: BTreeMap<String, BTreeMap<u8, Vec<String>>>,
    pub sccs: Vec<Vec<String>>,
    pub feedback_clusters: Vec<FeedbackCluster>,
    pub review_candidates: ReviewCandidates,
}

const HIGH_WEIGHT_THRESHOLD: f64 = 0.7;

pub fn analyze(graph: &CausalGraph) -> AnalyticsReport {
    let downstream = direct_neighbors(graph, Direction::Downstream);
    let upstream = direct_neighbors(graph, Direction::Upstream);
    let reachability = multi_hop_reachability(graph);

    let pair_relations = logical_pair_relations(graph);
    let self_loop_nodes: BTreeSet<&str> = pair_relations
        .keys()
        .filter(|(s, t)| s == t)
        .map(|(s, _)| s.as_str())
        .collect();

    let sccs = strongly_connected_components(graph, &pair_relations, &self_loop_nodes);
    let feedback_clusters = classify_feedback_clusters(graph, &sccs, &pair_relations);
    let review_candidates = review_candidates(graph, &feedback_clusters);

    AnalyticsReport {
        downstream,
        upstream,
        reachability,
        sccs,
        feedback_clusters,
        review_candidates,
    }
}

enum Direction {
    Downstream,
    Upstream,
}

fn direct_neighbors(
    graph: &CausalGraph,
    direction: Direction,
) -> BTreeMap<String, BTreeMap<Timescale, Vec<String>>> {
    let mut result: BTreeMap<String, BTreeMap<Timescale, Vec<String>>> = BTreeMap::new();
    for node in graph.nodes() {
        let edges = match direction {
            Direction::Downstream => graph.outgoing(&node.id),
            Direction::Upstream => graph.incoming(&node.id),
        };
        let mut by_timescale: BTreeMap<Timescale, BTreeSet<String>> = BTreeMap::new();
        for edge in edges {
            let neighbor = match direction {
                Direction::Downstream => edge.target.clone(),
                Direction::Upstream => edge.source.clone(),
            };
            by_timescale.entry(edge.at).or_default().insert(neighbor);
        }
        let sorted: BTreeMap<Timescale, Vec<String>> = by_timescale
            .into_iter()
            .map(|(ts, set)| (ts, set.into_iter().collect()))
            .collect();
        result.insert(node.id.clone(), sorted);
    }
    result
}

fn multi_hop_reachability(graph: &CausalGraph) -> BTreeMap<String, BTreeMap<u8, Vec<String>>> {
    let mut result = BTreeMap::new();
    for node in graph.nodes() {
        let distances = dijkstra_ticks(graph, &node.id);
        let mut bucketed: BTreeMap<u8, BTreeSet<String>> = BTreeMap::new();
        for (target, tick) in distances {
            if target == node.id {
                continue;
            }
            bucketed.entry(tick).or_default().insert(target);
        }
        let sorted: BTreeMap<u8, Vec<String>> = bucketed
            .into_iter()
            .map(|(tick, set)| (tick, set.into_iter().collect()))
            .collect();
        result.insert(node.id.clone(), sorted);
    }
    result
}

fn dijkstra_ticks(graph: &CausalGraph, start: &str) -> HashMap<String, u8> {
    let mut dist: HashMap<String, u8> = HashMap::new();
    dist.insert(start.to_string(), 0);
    let mut heap: BinaryHeap<Reverse<(u8, String)>> = BinaryHeap::new();
    heap.push(Reverse((0, start.to_string())));

    while let Some(Reverse((d, node_id))) = heap.pop() {
        if dist.get(&node_id).copied().unwrap_or(u8::MAX) < d {
            continue;
        }
        for edge in graph.outgoing(&node_id) {
            let candidate = d.saturating_add(edge.at_tick);
            if candidate > 3 {
                continue;
            }
            let better = match dist.get(&edge.target) {
                Some(&existing) => candidate < existing,
                None => true,
            };
            if better {
                dist.insert(edge.target.clone(), candidate);
                heap.push(Reverse((candidate, edge.target.clone())));
            }
        }
    }
    dist
}

/// Distinct `(source, target)` pairs with the set of relations observed
/// across the logical edges for that pair — the "logical, non-temporal"
/// adjacency SCC/feedback analysis runs over. Keyed off `CausalGraph::edges`
/// (one `.rel` per logical edge), never the compiled per-phase edges: a
/// `temporal_profile` phase may override `.rel`, and that override must not
/// leak into classification that is meant to reflect the one true logical
/// relation between a source and a target.
fn logical_pair_relations(graph: &CausalGraph) -> BTreeMap<(String, String), BTreeSet<Relation>> {
    let mut pairs: BTreeMap<(String, String), BTreeSet<Relation>> = BTreeMap::new();
    for edge in graph.edges() {
        pairs
            .entry((edge.source.clone(), edge.target.clone()))
            .or_default()
            .insert(edge.rel);
    }
    pairs
}

fn strongly_connected_components(
    graph: &CausalGraph,
    pair_relations: &BTreeMap<(String, String), BTreeSet<Relation>>,
    self_loop_nodes: &BTreeSet<&str>,
) -> Vec<Vec<String>> {
    let mut index_of: HashMap<String, NodeIndex> = HashMap::new();
    let mut petgraph = DiGraph::<String, ()>::new();
    for node in graph.nodes() {
        let idx = petgraph.add_node(node.id.clone());
        index_of.insert(node.id.clone(), idx);
    }
    for (source, target) in pair_relations.keys() {
        if let (Some(&s), Some(&t)) = (index_of.get(source), index_of.get(target)) {
            petgraph.add_edge(s, t, ());
        }
    }

    let mut components: Vec<Vec<String>> = tarjan_scc(&petgraph)
        .into_iter()
        .map(|indices| {
            let mut nodes: Vec<String> = indices.into_iter().map(|idx| petgraph[idx].clone()).collect();
            nodes.sort();
            nodes
        })
        .filter(|nodes| nodes.len() > 1 || self_loop_nodes.contains(nodes[0].as_str()))
        .collect();

    components.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    components
}

fn classify_feedback_clusters(
    graph: &CausalGraph,
    sccs: &[Vec<String>],
    pair_relations: &BTreeMap<(String, String), BTreeSet<Relation>>,
) -> Vec<FeedbackCluster> {
    let mut clusters = Vec::new();
    for component in sccs {
        let member_set: BTreeSet<&str> = component.iter().map(|s| s.as_str()).collect();
        let induced: Vec<(&String, &String, &BTreeSet<Relation>)> = pair_relations
            .iter()
            .filter(|((s, t), _)| member_set.contains(s.as_str()) && member_set.contains(t.as_str()))
            .map(|((s, t), rels)| (s, t, rels))
            .collect();

        let mut has_positive = false;
        let mut has_negative = false;
        let mut edges = Vec::new();
        for (source, target, rels) in &induced {
            for rel in rels.iter() {
                if rel.is_positive() {
                    has_positive = true;
                } else {
                    has_negative = true;
                }
                edges.push(format!("{source} {rel} {target}"));
            }
        }
        edges.sort();

        let mut reciprocal_pairs = Vec::new();
        for (source, target, _) in &induced {
            if source.as_str() >= target.as_str() {
                continue;
            }
            if pair_relations.contains_key(&((*target).clone(), (*source).clone())) {
                reciprocal_pairs.push(((*source).clone(), (*target).clone()));
            }
        }

        let has_delayed_phase = graph.compiled_edges().iter().any(|edge| {
            member_set.contains(edge.source.as_str())
                && member_set.contains(edge.target.as_str())
                && edge.at_tick > 0
        });

        let has_self_loop = induced.iter().any(|(s, t, _)| s == t);
        let mixed_sign = has_positive && has_negative;
        let reciprocal = !reciprocal_pairs.is_empty() || has_self_loop;
        if !mixed_sign && !reciprocal {
            continue;
        }

        clusters.push(FeedbackCluster {
            nodes: component.clone(),
            edges,
            mixed_sign,
            reciprocal,
            has_delayed_phase,
            reciprocal_pairs,
        });
    }
    clusters
}

fn review_candidates(graph: &CausalGraph, feedback_clusters: &[FeedbackCluster]) -> ReviewCandidates {
    let mut reciprocal_pairs = Vec::new();
    for cluster in feedback_clusters {
        for pair in &cluster.reciprocal_pairs {
            if !reciprocal_pairs.contains(pair) {
                reciprocal_pairs.push(pair.clone());
            }
        }
    }

    let fast_feedback_clusters: Vec<Vec<String>> = feedback_clusters
        .iter()
        .filter(|c| !c.has_delayed_phase)
        .map(|c| c.nodes.clone())
        .collect();

    let cluster_membership: Vec<BTreeSet<&str>> = feedback_clusters
        .iter()
        .map(|c| c.nodes.iter().map(|s| s.as_str()).collect())
        .collect();

    // Weight and relation come from the logical edge, never a compiled
    // phase: `engine.py`'s review-candidate pass keys both the `>= 0.7`
    // threshold test and the emitted label off the one logical edge.
    let mut immediate_high_weight_edges = Vec::new();
    for edge in graph.edges() {
        let phases: Vec<_> = graph
            .compiled_edges()
            .iter()
            .filter(|e| e.source == edge.source && e.target == edge.target)
            .collect();
        let all_immediate = !phases.is_empty() && phases.iter().all(|e| e.at_tick == 0);
        let high_weight = edge.weight >= HIGH_WEIGHT_THRESHOLD;
        let endpoints_in_cluster = cluster_membership
            .iter()
            .any(|members| members.contains(edge.source.as_str()) && members.contains(edge.target.as_str()));
        if all_immediate && high_weight && endpoints_in_cluster {
            immediate_high_weight_edges.push(format!("{} {} {}", edge.source, edge.rel, edge.target));
        }
    }
    immediate_high_weight_edges.sort();
    immediate_high_weight_edges.dedup();

    ReviewCandidates {
        reciprocal_pairs,
        fast_feedback_clusters,
        immediate_high_weight_edges,
    }
}
