//! Qualitative causal reasoning engine over a typed, directed multigraph of
//! physiological variables.
//!
//! Given user perturbations and a Boolean clinical context, [`propagation::simulate`]
//! propagates signed influence through a [`graph::CausalGraph`] under temporal,
//! threshold, saturation, and priority rules, producing resolved node states,
//! ranked causal traces, and syndrome labels. [`compare::compare`] runs two
//! simulations and classifies per-node differences.
//!
//! This crate is the reasoning core only: graph construction from a typed
//! representation, the tick-scheduled propagation engine, trace maintenance,
//! syndrome matching, and static graph analytics. It exposes plain functions
//! and types; an external façade owns file I/O, HTTP, and YAML parsing.

pub mod analytics;
pub mod compare;
pub mod context;
pub mod domain;
pub mod error;
pub mod graph;
pub mod propagation;
pub mod request;
pub mod response;
pub mod syndrome;
pub mod trace;

pub use compare::compare;
pub use error::{EngineError, LoadError};
pub use graph::CausalGraph;
pub use propagation::simulate;
pub use request::{CompareRequest, Perturbation, SimulationOptions, SimulationRequest};
pub use response::{AffectedNode, CompareResponse, ComparedNode, SimulationResponse, TraceStep};
