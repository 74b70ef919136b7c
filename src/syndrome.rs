//! Syndrome definitions and the trace-path subsequence matcher. Ported from
//! `original_source/backend/app/engine.py::_build_trace_summary` and its
//! subsequence-span helper.

use serde::{Deserialize, Serialize};

/// A named, ordered sequence of node ids. A trace path "has" a syndrome when
/// the sequence appears as a (non-contiguous) order-preserving subsequence
/// of the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Syndrome {
    pub id: String,
    pub label: String,
    pub sequence: Vec<String>,
}

struct Match<'a> {
    label: &'a str,
    first_idx: usize,
    last_idx: usize,
}

/// Leftmost order-preserving subsequence match of `sequence` within `path`.
/// Returns `None` if `sequence` does not occur as a subsequence.
fn leftmost_span(path: &[String], sequence: &[String]) -> Option<(usize, usize)> {
    if sequence.is_empty() {
        return None;
    }
    let mut cursor = 0usize;
    let mut first_idx = None;
    let mut last_idx = 0usize;
    for needle in sequence {
        let mut found = None;
        for (i, node) in path.iter().enumerate().skip(cursor) {
            if node == needle {
                found = Some(i);
                break;
            }
        }
        let idx = found?;
        if first_idx.is_none() {
            first_idx = Some(idx);
        }
        last_idx = idx;
        cursor = idx + 1;
    }
    Some((first_idx.unwrap(), last_idx))
}

/// Computes the human-readable syndrome summary for a trace path, or `None`
/// if no syndrome matches.
pub fn summarize(path: &[String], syndromes: &[Syndrome]) -> Option<String> {
    let mut matches: Vec<Match> = syndromes
        .iter()
        .filter_map(|syndrome| {
            leftmost_span(path, &syndrome.sequence).map(|(first_idx, last_idx)| Match {
                label: syndrome.label.as_str(),
                first_idx,
                last_idx,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.first_idx
            .cmp(&b.first_idx)
            .then_with(|| span_len(b).cmp(&span_len(a)))
    });

    let mut kept: Vec<&Match> = Vec::new();
    for candidate in &matches {
        let subsumed = kept.iter().any(|existing| {
            existing.first_idx <= candidate.first_idx
                && existing.last_idx >= candidate.last_idx
                && span_len(existing) > span_len(candidate)
        });
        if !subsumed {
            kept.push(candidate);
        }
    }

    let mut labels: Vec<&str> = Vec::new();
    for m in kept {
        if !labels.contains(&m.label) {
            labels.push(m.label);
        }
    }

    format_labels(&labels)
}

fn span_len(m: &Match) -> usize {
    m.last_idx - m.first_idx + 1
}

fn format_labels(labels: &[&str]) -> Option<String> {
    match labels.len() {
        0 => None,
        1 => Some(labels[0].to_string()),
        2 => Some(format!("{} followed by {}", labels[0], labels[1])),
        _ => {
            let (last, init) = labels.split_last().unwrap();
            Some(format!("{}, followed by {}", init.join(", "), last))
        }
    }
}
