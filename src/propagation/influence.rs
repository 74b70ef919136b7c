//! A pending signed contribution into a `(node, tick)` bucket.

use crate::domain::{Direction, PriorityTier};

#[derive(Debug, Clone)]
pub struct Influence {
    pub direction: Direction,
    pub confidence: f64,
    pub effect_size: f64,
    pub priority: PriorityTier,
    pub path: Vec<String>,
    pub steps: Vec<String>,
}
