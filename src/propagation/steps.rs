//! Human-readable step descriptions for trace paths. Ported from
//! `original_source/backend/app/engine.py::_generate_step_description`.

use crate::domain::{Direction, Timescale};

/// Builds one step description for an edge traversal. `source_dir` is the
/// direction the influence arrived at the source with; only `Up`/`Down` are
/// meaningful here since other directions are dropped before fan-out.
pub fn generate_step_description(
    source_label: &str,
    target_label: &str,
    rel_is_positive: bool,
    source_dir: Direction,
    at: Timescale,
) -> String {
    let prefix = if at != Timescale::Immediate {
        format!("Over {}, ", timescale_word(at))
    } else {
        String::new()
    };

    let body = match (rel_is_positive, source_dir) {
        (true, Direction::Up) => format!(
            "Increased {source_label} promotes {target_label} \u{2192} Increased {target_label}"
        ),
        (true, Direction::Down) => format!(
            "Reduced {source_label} fails to promote {target_label} \u{2192} Decreased {target_label}"
        ),
        (false, Direction::Up) => format!(
            "Increased {source_label} inhibits {target_label} \u{2192} Decreased {target_label}"
        ),
        (false, Direction::Down) => format!(
            "Reduced {source_label} disinhibits {target_label} \u{2192} Increased {target_label}"
        ),
        _ => format!("{source_label} affects {target_label}"),
    };

    format!("{prefix}{body}")
}

fn timescale_word(at: Timescale) -> &'static str {
    match at {
        Timescale::Immediate => "immediately",
        Timescale::Minutes => "minutes",
        Timescale::Hours => "hours",
        Timescale::Days => "days",
    }
}
