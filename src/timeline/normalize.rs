//! Interval normalization: resolve effective start/end instants for tasks
//! from partial date fields, and phase bounds from task candidates.

use crate::config::EngineConfig;
use crate::types::{MS_PER_DAY, Phase, Task};
use serde::{Deserialize, Serialize};

/// Resolved `[start, end]` bounds of a phase. Always finite: bounds fall back
/// to task candidates, then to a default span anchored at today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBounds {
    pub start: i64,
    pub end: i64,
}

/// A task interval after fallback resolution, ready for lane packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedInterval {
    pub start: i64,
    pub end: i64,
    /// Rendered as a point marker rather than a bar.
    pub milestone: bool,
}

/// Min/max over a set of instants, with the two sanitizing rules applied:
/// an empty set yields `[today, today + default span]`, and a zero-width
/// result has its max pushed out so the range never collapses.
pub fn range_of<I>(instants: I, today: i64, config: &EngineConfig) -> (i64, i64)
where
    I: IntoIterator<Item = i64>,
{
    let mut min: Option<i64> = None;
    let mut max: Option<i64> = None;
    for at in instants {
        min = Some(min.map_or(at, |m: i64| m.min(at)));
        max = Some(max.map_or(at, |m: i64| m.max(at)));
    }

    match (min, max) {
        (Some(min), Some(max)) if min == max => {
            (min, max + config.zero_width_extension_days * MS_PER_DAY)
        }
        (Some(min), Some(max)) => (min, max),
        _ => (today, today + config.default_phase_span_days * MS_PER_DAY),
    }
}

/// Candidate instants a task contributes to derived phase bounds: its start
/// (or creation) instant and its due (or start) instant.
fn task_candidates(task: &Task) -> impl Iterator<Item = i64> {
    let start = task.start_at.or(task.created_at);
    let end = task.due_at.or(task.start_at);
    start.into_iter().chain(end)
}

/// Resolve a phase's bounds: explicit instants win; missing sides derive from
/// the min/max over task candidates, with `range_of`'s fallbacks.
pub fn phase_bounds(phase: &Phase, today: i64, config: &EngineConfig) -> PhaseBounds {
    if let (Some(start), Some(end)) = (phase.start_at, phase.end_at) {
        return PhaseBounds { start, end };
    }

    let (min, max) = range_of(
        phase.tasks.iter().flat_map(task_candidates),
        today,
        config,
    );
    PhaseBounds {
        start: phase.start_at.unwrap_or(min),
        end: phase.end_at.unwrap_or(max),
    }
}

/// Resolve a task's effective interval against its phase bounds.
///
/// Start: explicit start, else creation instant, else phase start.
/// End: explicit due, else the explicit start, else phase end.
/// Tasks flagged or tagged as milestones collapse to a single representative
/// instant (due, else start, else the phase midpoint). Anything whose
/// resolved duration is under one day renders as a milestone regardless of
/// flags.
pub fn normalize_task(
    task: &Task,
    bounds: PhaseBounds,
    config: &EngineConfig,
) -> NormalizedInterval {
    let mut start = task
        .start_at
        .or(task.created_at)
        .unwrap_or(bounds.start);
    let mut end = task
        .due_at
        .or(task.start_at)
        .unwrap_or(bounds.end);

    if task.flagged_milestone(&config.milestone_markers) {
        let at = task
            .due_at
            .or(task.start_at)
            .unwrap_or((bounds.start + bounds.end) / 2);
        start = at;
        end = at;
    }

    let milestone = (end - start).abs() < MS_PER_DAY;
    NormalizedInterval {
        start,
        end,
        milestone,
    }
}
