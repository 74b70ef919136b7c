//! Per-target ranked causal-path store. Ported from
//! `original_source/backend/app/engine.py::_upsert_trace`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::response::TraceStep;
use crate::syndrome::{self, Syndrome};

const TRACE_CAP: usize = 10;

#[derive(Debug, Default)]
pub struct TraceStore {
    by_target: BTreeMap<String, Vec<TraceStep>>,
}

impl TraceStore {
    pub fn new() -> Self {
        TraceStore::default()
    }

    /// Inserts or replaces a trace at `target` keyed by exact `path`, then
    /// re-sorts descending by `(confidence, path length)` and truncates to
    /// the per-target cap.
    pub fn upsert(
        &mut self,
        target: &str,
        path: Vec<String>,
        steps: Vec<String>,
        confidence: f64,
        syndromes: &[Syndrome],
    ) {
        let entries = self.by_target.entry(target.to_string()).or_default();

        let existing_idx = entries.iter().position(|t| t.path == path);
        match existing_idx {
            Some(idx) => {
                if confidence > entries[idx].confidence {
                    entries[idx] = build_step(path, steps, confidence, syndromes);
                } else {
                    return;
                }
            }
            None => {
                entries.push(build_step(path, steps, confidence, syndromes));
            }
        }

        entries.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.path.len().cmp(&a.path.len()))
        });
        entries.truncate(TRACE_CAP);
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<TraceStep>> {
        self.by_target
    }
}

fn build_step(path: Vec<String>, steps: Vec<String>, confidence: f64, syndromes: &[Syndrome]) -> TraceStep {
    let summary = syndrome::summarize(&path, syndromes);
    TraceStep {
        path,
        steps,
        confidence,
        summary,
    }
}
