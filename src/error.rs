//! Error taxonomy: `LoadError` for graph-construction contract violations,
//! `EngineError` for the broader surface a façade would see.

use crate::domain::{ActivationDirection, Timescale};

/// Raised during `CausalGraph::build`. Loader errors halt the build; there
/// is no partial graph.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LoadError {
    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("duplicate alias '{alias}': already bound to {existing_id}, cannot rebind to {new_id}")]
    DuplicateAlias {
        alias: String,
        existing_id: String,
        new_id: String,
    },

    #[error("edge {edge_source} -> {target} references a node that does not exist")]
    DanglingEdgeEndpoint { edge_source: String, target: String },

    #[error("edge {edge_source} -> {target} declares duplicate temporal phase at {at:?}")]
    DuplicateTemporalPhase {
        edge_source: String,
        target: String,
        at: Timescale,
    },

    #[error(
        "edge {edge_source} -> {target} phase at {at:?} resolves activation_direction {direction:?} \
         without a resolved activation_threshold"
    )]
    MissingActivationThreshold {
        edge_source: String,
        target: String,
        at: Timescale,
        direction: ActivationDirection,
    },

    #[error("node {id} has an invalid range: {reason}")]
    InvalidNode { id: String, reason: String },
}

/// Kinds surfaced to a caller (façade). Only `Load` is ever constructed by
/// this crate today; `BadRequest`/`Internal` are part of the documented
/// contract (spec §7) for a façade wrapping this engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal engine error: {0}")]
    Internal(String),
}
