//! Context-baseline expansion: a fixed table mapping clinical context flags
//! to baseline perturbations, merged with user-provided perturbations.
//! Ported verbatim (flags, node ids, ops, declaration order) from
//! `original_source/backend/app/context_baselines.py::CONTEXT_BASELINE_EFFECTS`.

use crate::domain::PerturbationOp;
use crate::request::Perturbation;

struct BaselineEffect {
    flag: &'static str,
    node_id: &'static str,
    op: PerturbationOp,
}

/// Declaration order is observable: earlier flags win on node-id collision
/// (spec.md §4.2).
const CONTEXT_BASELINES: &[BaselineEffect] = &[
    BaselineEffect {
        flag: "ace_inhibitor",
        node_id: "renal.raas.at1_receptor",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "ace_inhibitor",
        node_id: "renal.raas.aldosterone",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "beta_blocker",
        node_id: "cardio.signaling.gs_protein",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "beta_blocker",
        node_id: "cardio.hemodynamics.heart_rate",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "heart_failure",
        node_id: "cardio.hemodynamics.stroke_volume",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "heart_failure",
        node_id: "cardio.metabolism.myocardial_o2_supply",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "heart_failure",
        node_id: "renal.metabolism.anp_bnp",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "dehydration",
        node_id: "renal.volume.ecf_volume",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "dehydration",
        node_id: "renal.metabolism.osmolarity",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "dehydration",
        node_id: "renal.metabolism.adh",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "ckd",
        node_id: "renal.tubule.na_reabsorption",
        op: PerturbationOp::Decrease,
    },
    BaselineEffect {
        flag: "ckd",
        node_id: "renal.metabolism.potassium",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "copd",
        node_id: "pulm.mechanics.resistance",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "copd",
        node_id: "pulm.gasexchange.vq_mismatch",
        op: PerturbationOp::Increase,
    },
    BaselineEffect {
        flag: "copd",
        node_id: "pulm.gasexchange.diffusion_capacity",
        op: PerturbationOp::Decrease,
    },
];

/// Merges context-implied baseline perturbations with user perturbations.
/// User perturbations always win; among baseline entries, table (flag)
/// declaration order wins on node-id collision. Unlisted flags contribute
/// nothing; flags not present in `context` (or present as `false`) are
/// treated as unset, matching the documented default-false context lookup.
pub fn expand_perturbations(
    user_perturbations: &[Perturbation],
    context: &std::collections::HashMap<String, bool>,
) -> Vec<Perturbation> {
    let mut merged: Vec<Perturbation> = user_perturbations.to_vec();
    let mut taken: std::collections::HashSet<String> =
        user_perturbations.iter().map(|p| p.node_id.clone()).collect();

    for effect in CONTEXT_BASELINES {
        if !context.get(effect.flag).copied().unwrap_or(false) {
            continue;
        }
        if taken.contains(effect.node_id) {
            continue;
        }
        taken.insert(effect.node_id.to_string());
        merged.push(Perturbation {
            node_id: effect.node_id.to_string(),
            op: effect.op,
            value: None,
        });
    }

    merged
}
