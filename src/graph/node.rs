use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Domain, StateType, TimeConstant};
use crate::error::LoadError;

/// A physiological variable. Ported from
/// `original_source/backend/app/models.py::Node`, extended with the
/// temporal/dynamic-range fields spec §3 requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub domain: Domain,
    #[serde(default)]
    pub subdomain: Option<String>,
    /// Free-form node type (hormone, variable, organ, vessel, process, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub state_type: StateType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub normal_range: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub time_constant: TimeConstant,
    #[serde(default)]
    pub baseline_level: f64,
    #[serde(default = "default_min_level")]
    pub min_level: f64,
    #[serde(default = "default_max_level")]
    pub max_level: f64,
}

fn default_min_level() -> f64 {
    -1.0
}

fn default_max_level() -> f64 {
    1.0
}

impl Node {
    /// Range invariants a loader must enforce: `min_level <= max_level`,
    /// `baseline_level` within `[min_level, max_level]`, and `baseline_level`
    /// within the documented default dynamic range `[-1, 1]`.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.min_level > self.max_level {
            return Err(LoadError::InvalidNode {
                id: self.id.clone(),
                reason: format!(
                    "min_level ({}) exceeds max_level ({})",
                    self.min_level, self.max_level
                ),
            });
        }
        if self.baseline_level < self.min_level || self.baseline_level > self.max_level {
            return Err(LoadError::InvalidNode {
                id: self.id.clone(),
                reason: format!(
                    "baseline_level ({}) outside [min_level, max_level] = [{}, {}]",
                    self.baseline_level, self.min_level, self.max_level
                ),
            });
        }
        if !(-1.0..=1.0).contains(&self.baseline_level) {
            return Err(LoadError::InvalidNode {
                id: self.id.clone(),
                reason: format!(
                    "baseline_level ({}) outside documented range [-1, 1]",
                    self.baseline_level
                ),
            });
        }
        Ok(())
    }

    /// Whether this node uses the default, unconstrained dynamic range.
    /// Saturation gating is a no-op for such nodes — see §4.3.3(d).
    pub fn uses_default_range(&self) -> bool {
        self.min_level <= -1.0 && self.max_level >= 1.0
    }
}
