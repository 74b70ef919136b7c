use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ActivationDirection, Priority, Relation, Timescale};

/// One entry of an edge's `temporal_profile`. Any unset field falls back to
/// the owning edge's default during compilation (`compile_edges`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePhase {
    pub at: Timescale,
    #[serde(default)]
    pub rel: Option<Relation>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub activation_direction: Option<ActivationDirection>,
    #[serde(default)]
    pub activation_threshold: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A logical causal edge as loaded from the knowledge pack. Ported from
/// `original_source/backend/app/models.py::Edge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub rel: Relation,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub delay: Timescale,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub activation_direction: ActivationDirection,
    #[serde(default)]
    pub activation_threshold: Option<f64>,
    #[serde(default)]
    pub context: HashMap<String, bool>,
    #[serde(default)]
    pub temporal_profile: Option<Vec<EdgePhase>>,
}

fn default_weight() -> f64 {
    1.0
}
