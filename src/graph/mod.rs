//! The graph data model: `Node`, `Edge`, `CompiledEdge`, and the validated,
//! immutable `CausalGraph` snapshot a simulation runs against.

pub mod compiled;
pub mod edge;
pub mod node;

pub use compiled::{build_adjacency, compile_edges, CompiledEdge};
pub use edge::{Edge, EdgePhase};
pub use node::Node;

use std::collections::HashMap;

use crate::error::LoadError;
use crate::syndrome::Syndrome;

/// A validated, immutable snapshot of a knowledge pack: nodes, compiled
/// edges, syndromes, and derived adjacency/alias lookups. Ported from
/// `original_source/backend/app/graph_loader.py::GraphLoader`.
#[derive(Debug, Clone)]
pub struct CausalGraph {
    nodes: HashMap<String, Node>,
    /// Lowercased alias -> node id.
    alias_map: HashMap<String, String>,
    syndromes: Vec<Syndrome>,
    /// The logical edges as loaded, one `.rel`/`.weight` per source/target
    /// pair — kept alongside the compiled (per-phase) edges because static
    /// analytics (SCC/feedback-cluster classification, review candidates)
    /// must key off the single logical relation, not a phase override.
    edges: Vec<Edge>,
    compiled_edges: Vec<CompiledEdge>,
    forward_adj: HashMap<String, Vec<CompiledEdge>>,
    reverse_adj: HashMap<String, Vec<CompiledEdge>>,
}

impl CausalGraph {
    /// Builds and validates a graph from already-deserialized components.
    /// The façade owns YAML -> struct deserialization; this is the typed
    /// construction contract it must satisfy (SPEC_FULL.md §6).
    pub fn build(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        syndromes: Vec<Syndrome>,
    ) -> Result<Self, LoadError> {
        let mut node_map: HashMap<String, Node> = HashMap::with_capacity(nodes.len());
        let mut alias_map: HashMap<String, String> = HashMap::new();

        for node in nodes {
            node.validate()?;
            if node_map.contains_key(&node.id) {
                return Err(LoadError::DuplicateNodeId { id: node.id });
            }
            for alias in &node.aliases {
                let key = alias.to_lowercase();
                if let Some(existing_id) = alias_map.get(&key) {
                    if existing_id != &node.id {
                        return Err(LoadError::DuplicateAlias {
                            alias: key,
                            existing_id: existing_id.clone(),
                            new_id: node.id.clone(),
                        });
                    }
                }
                alias_map.insert(key, node.id.clone());
            }
            node_map.insert(node.id.clone(), node);
        }

        for edge in &edges {
            if !node_map.contains_key(&edge.source) {
                return Err(LoadError::DanglingEdgeEndpoint {
                    edge_source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
            if !node_map.contains_key(&edge.target) {
                return Err(LoadError::DanglingEdgeEndpoint {
                    edge_source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }

        let compiled_edges = compile_edges(&edges)?;
        let (forward_adj, reverse_adj) = build_adjacency(&compiled_edges);

        tracing::info!(
            node_count = node_map.len(),
            edge_count = edges.len(),
            compiled_edge_count = compiled_edges.len(),
            syndrome_count = syndromes.len(),
            "causal graph built"
        );

        Ok(CausalGraph {
            nodes: node_map,
            alias_map,
            syndromes,
            edges,
            compiled_edges,
            forward_adj,
            reverse_adj,
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn syndromes(&self) -> &[Syndrome] {
        &self.syndromes
    }

    pub fn compiled_edges(&self) -> &[CompiledEdge] {
        &self.compiled_edges
    }

    /// The logical edges as loaded, one `.rel`/`.weight` per source/target
    /// pair, before temporal-profile compilation.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn outgoing(&self, node_id: &str) -> &[CompiledEdge] {
        self.forward_adj
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn incoming(&self, node_id: &str) -> &[CompiledEdge] {
        self.reverse_adj
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves an identifier that may be an id or a (case-insensitive)
    /// alias. Ports `graph_loader.py::get_node_by_id_or_alias`.
    pub fn alias_to_id(&self, identifier: &str) -> Option<&str> {
        if self.nodes.contains_key(identifier) {
            return Some(&self.nodes.get_key_value(identifier).unwrap().0[..]);
        }
        self.alias_map.get(&identifier.to_lowercase()).map(|s| s.as_str())
    }
}
