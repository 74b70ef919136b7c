//! Request shapes: what a façade deserializes an incoming simulation body
//! into before calling `propagation::simulate`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, PerturbationOp, TimeWindow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perturbation {
    pub node_id: String,
    pub op: PerturbationOp,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Perturbation {
    /// Seeds the tick-0 direction. `set` is accepted but coerced to
    /// `unchanged` — see spec.md §9 Open Question 1.
    pub fn seed_direction(&self) -> Direction {
        self.op.seed_direction()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub max_hops: u32,
    pub min_confidence: f64,
    pub min_effect_size: f64,
    pub time_window: TimeWindow,
    pub dim_unaffected: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            max_hops: 5,
            min_confidence: 0.1,
            min_effect_size: 0.05,
            time_window: TimeWindow::All,
            dim_unaffected: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub perturbations: Vec<Perturbation>,
    #[serde(default)]
    pub context: HashMap<String, bool>,
    #[serde(default)]
    pub options: SimulationOptions,
}

/// `{baseline, intervention}`: the comparison endpoint's request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub baseline: SimulationRequest,
    pub intervention: SimulationRequest,
}
