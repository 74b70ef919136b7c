//! Per-node influence resolution. Ported line-for-line from
//! `original_source/backend/app/engine.py::_resolve_influence`.
//!
//! Tie-breaking follows Python's `max()`/`sorted()` semantics exactly:
//! `max()` returns the *first* maximal element on ties, and `sorted(...,
//! reverse=True)` is stable. Rust's `Iterator::max_by` returns the *last*
//! maximal element, so the dominant-influence selection below uses a manual
//! fold instead.

use crate::domain::{clamp, clamp01, Direction, Magnitude};
use crate::propagation::influence::Influence;

const SECONDARY_BRANCH_CAP: usize = 3;
pub(crate) const SECONDARY_ATTENUATION: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct SecondaryBranch {
    pub direction: Direction,
    pub confidence: f64,
    pub path: Vec<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedInfluence {
    pub direction: Direction,
    pub effect_size: f64,
    pub confidence: f64,
    pub magnitude: Magnitude,
    pub dominant_path: Vec<String>,
    pub dominant_steps: Vec<String>,
    pub dominant_hops: usize,
    pub secondary_branches: Vec<SecondaryBranch>,
}

/// Resolves a non-empty bucket of influences into at most one
/// `ResolvedInfluence`. Returns `None` when up/down scores are exactly
/// balanced (including both zero) — "no resolution" per spec §4.3.1.
pub fn resolve_influence(influences: &[Influence]) -> Option<ResolvedInfluence> {
    if influences.is_empty() {
        return None;
    }

    let max_rank = influences.iter().map(|i| i.priority.rank()).max()?;
    let top: Vec<usize> = influences
        .iter()
        .enumerate()
        .filter(|(_, i)| i.priority.rank() == max_rank)
        .map(|(idx, _)| idx)
        .collect();

    let up_score: f64 = top
        .iter()
        .filter(|&&idx| influences[idx].direction == Direction::Up)
        .map(|&idx| influences[idx].effect_size)
        .sum();
    let down_score: f64 = top
        .iter()
        .filter(|&&idx| influences[idx].direction == Direction::Down)
        .map(|&idx| influences[idx].effect_size)
        .sum();

    if up_score == down_score {
        return None;
    }

    let direction = if up_score > down_score {
        Direction::Up
    } else {
        Direction::Down
    };
    let winning_sum = up_score.max(down_score);
    let losing_sum = up_score.min(down_score);
    let effect_size = clamp01((up_score - down_score).abs());
    let opposition_ratio = losing_sum / (up_score + down_score).max(0.01);

    let winning: Vec<usize> = top
        .iter()
        .copied()
        .filter(|&idx| influences[idx].direction == direction)
        .collect();
    let mean_conf: f64 =
        winning.iter().map(|&idx| influences[idx].confidence).sum::<f64>() / winning.len() as f64;
    let confidence = clamp(mean_conf * (1.0 - 0.5 * opposition_ratio), 0.1, 1.0);
    let magnitude = Magnitude::from_effect_size(effect_size);

    // First-wins max over (effect_size, confidence) among winning members,
    // matching Python `max(winning, key=...)`.
    let mut dominant_idx = winning[0];
    for &idx in &winning[1..] {
        let candidate = (influences[idx].effect_size, influences[idx].confidence);
        let current = (influences[dominant_idx].effect_size, influences[dominant_idx].confidence);
        if candidate > current {
            dominant_idx = idx;
        }
    }
    let dominant = &influences[dominant_idx];
    let dominant_hops = dominant.path.len().saturating_sub(1);

    let mut ranked: Vec<usize> = top.iter().copied().filter(|&idx| idx != dominant_idx).collect();
    ranked.sort_by(|&a, &b| {
        let ka = (influences[a].effect_size, influences[a].confidence, influences[a].path.len());
        let kb = (influences[b].effect_size, influences[b].confidence, influences[b].path.len());
        kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut secondary_branches = Vec::with_capacity(SECONDARY_BRANCH_CAP);
    let mut seen: Vec<(Direction, Vec<String>)> = Vec::new();
    for idx in ranked {
        if secondary_branches.len() >= SECONDARY_BRANCH_CAP {
            break;
        }
        let influence = &influences[idx];
        let key = (influence.direction, influence.path.clone());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        secondary_branches.push(SecondaryBranch {
            direction: influence.direction,
            confidence: influence.confidence * SECONDARY_ATTENUATION,
            path: influence.path.clone(),
            steps: influence.steps.clone(),
        });
    }

    Some(ResolvedInfluence {
        direction,
        effect_size,
        confidence,
        magnitude,
        dominant_path: dominant.path.clone(),
        dominant_steps: dominant.steps.clone(),
        dominant_hops,
        secondary_branches,
    })
}
