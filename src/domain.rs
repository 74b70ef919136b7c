//! Shared enums used across the graph model, requests, and responses.
//!
//! All of these are small, closed, `serde`-tagged enums in the style of
//! `cortex-core`'s memory-type enums: `rename_all = "snake_case"` so the
//! wire representation matches the spec's lowercase vocabulary, and unknown
//! variants are rejected at parse time by serde's default behavior.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Cardio,
    Pulm,
    Renal,
    Acidbase,
    Neuro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateType {
    Qualitative,
    Numeric,
}

impl Default for StateType {
    fn default() -> Self {
        StateType::Qualitative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeConstant {
    Acute,
    Subacute,
    Chronic,
}

impl Default for TimeConstant {
    fn default() -> Self {
        TimeConstant::Acute
    }
}

/// A delay / temporal-phase timescale. Also doubles as the unit edges are
/// compiled into ticks with (`tick_of`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timescale {
    Immediate,
    Minutes,
    Hours,
    Days,
}

impl Default for Timescale {
    fn default() -> Self {
        Timescale::Immediate
    }
}

impl Timescale {
    /// `tick_of`: immediate=0, minutes=1, hours=2, days=3.
    pub fn tick(self) -> u8 {
        match self {
            Timescale::Immediate => 0,
            Timescale::Minutes => 1,
            Timescale::Hours => 2,
            Timescale::Days => 3,
        }
    }

    /// Inverse of `tick`. Ticks outside 0..=3 fall back to `Immediate`,
    /// mirroring the Python source's `REV_TIME_MAP.get(tick, "immediate")`.
    pub fn from_tick(tick: u8) -> Self {
        match tick {
            0 => Timescale::Immediate,
            1 => Timescale::Minutes,
            2 => Timescale::Hours,
            3 => Timescale::Days,
            _ => Timescale::Immediate,
        }
    }

    pub const ALL: [Timescale; 4] = [
        Timescale::Immediate,
        Timescale::Minutes,
        Timescale::Hours,
        Timescale::Days,
    ];
}

/// `options.time_window`: like `Timescale` but with the extra `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Immediate,
    Minutes,
    Hours,
    Days,
    All,
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::All
    }
}

impl TimeWindow {
    /// `all` behaves as `days` (tick 3); everything else maps through
    /// `Timescale::tick`.
    pub fn max_tick(self) -> u8 {
        match self {
            TimeWindow::Immediate => Timescale::Immediate.tick(),
            TimeWindow::Minutes => Timescale::Minutes.tick(),
            TimeWindow::Hours => Timescale::Hours.tick(),
            TimeWindow::Days | TimeWindow::All => Timescale::Days.tick(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Increases,
    Decreases,
    ConvertsTo,
    Requires,
    Enables,
    Precedes,
    PartOf,
    Causes,
    Refines,
    Derives,
}

impl Relation {
    /// Eight of the ten relations are direction-preserving; `decreases` is
    /// the only direction-flipping one.
    pub fn is_positive(self) -> bool {
        !matches!(self, Relation::Decreases)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Increases => "increases",
            Relation::Decreases => "decreases",
            Relation::ConvertsTo => "converts_to",
            Relation::Requires => "requires",
            Relation::Enables => "enables",
            Relation::Precedes => "precedes",
            Relation::PartOf => "part_of",
            Relation::Causes => "causes",
            Relation::Refines => "refines",
            Relation::Derives => "derives",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge-declared priority. Manual perturbations resolve at the higher
/// `PriorityTier::Ultra`, which only exists on the influence side — no edge
/// can declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Priority tier considered by the influence resolver. `Ultra` is reserved
/// for seeded (manual) perturbations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl PriorityTier {
    pub fn rank(self) -> u8 {
        match self {
            PriorityTier::Low => 1,
            PriorityTier::Medium => 2,
            PriorityTier::High => 3,
            PriorityTier::Ultra => 10,
        }
    }
}

impl From<Priority> for PriorityTier {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Low => PriorityTier::Low,
            Priority::Medium => PriorityTier::Medium,
            Priority::High => PriorityTier::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationDirection {
    Up,
    Down,
    Any,
}

impl Default for ActivationDirection {
    fn default() -> Self {
        ActivationDirection::Any
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
    Unknown,
}

impl Direction {
    /// Whether this resolved direction matches a gate's required
    /// `ActivationDirection` (`Any` matches everything).
    pub fn matches_activation(self, want: ActivationDirection) -> bool {
        match want {
            ActivationDirection::Any => true,
            ActivationDirection::Up => self == Direction::Up,
            ActivationDirection::Down => self == Direction::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    None,
    Small,
    Medium,
    Large,
}

impl Magnitude {
    /// Magnitude binning from an effect size. Bin edges are load-bearing —
    /// see spec §4.3.1.
    pub fn from_effect_size(effect_size: f64) -> Self {
        if effect_size < 0.10 {
            Magnitude::None
        } else if effect_size < 0.30 {
            Magnitude::Small
        } else if effect_size < 0.65 {
            Magnitude::Medium
        } else {
            Magnitude::Large
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationOp {
    Increase,
    Decrease,
    Block,
    Set,
}

impl PerturbationOp {
    /// Seeds the tick-0 influence direction. `set` is accepted by the
    /// schema but coerced to `unchanged` (no propagation) — see spec §9
    /// Open Question 1.
    pub fn seed_direction(self) -> Direction {
        match self {
            PerturbationOp::Increase => Direction::Up,
            PerturbationOp::Decrease | PerturbationOp::Block => Direction::Down,
            PerturbationOp::Set => Direction::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    New,
    Resolved,
    DirectionFlip,
    Strengthened,
    Weakened,
    Unchanged,
}

pub(crate) fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

pub(crate) fn clamp(value: f64, floor: f64, ceiling: f64) -> f64 {
    value.max(floor).min(ceiling)
}
