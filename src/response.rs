//! Response shapes produced by `propagation::simulate` and `compare::compare`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeType, Direction, Magnitude, Timescale};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedNode {
    pub node_id: String,
    pub direction: Direction,
    pub magnitude: Magnitude,
    pub confidence: f64,
    pub effect_size: f64,
    pub timescale: Timescale,
    pub tick: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub path: Vec<String>,
    pub steps: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub affected_nodes: Vec<AffectedNode>,
    /// `BTreeMap`, not `HashMap`: response serialization must be
    /// byte-stable across runs (spec §5), which `HashMap`'s randomized
    /// iteration order would break.
    pub traces: BTreeMap<String, Vec<TraceStep>>,
    pub timelines: BTreeMap<String, Vec<AffectedNode>>,
    pub max_ticks: u8,
}

/// One row of the `compare` endpoint's `changed_nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparedNode {
    pub node_id: String,
    pub change_type: ChangeType,
    pub baseline: Option<AffectedNode>,
    pub intervention: Option<AffectedNode>,
    pub effect_size_delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub baseline: SimulationResponse,
    pub intervention: SimulationResponse,
    pub changed_nodes: Vec<ComparedNode>,
}
