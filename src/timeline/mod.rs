//! Conflict-free temporal layout for Gantt-style rendering.
//!
//! Raw entity trees go through interval normalization and lane packing;
//! the output carries everything a renderer needs to size its canvas and
//! draw bars, diamonds, and the today marker.

pub mod lanes;
pub mod normalize;

use crate::config::EngineConfig;
use crate::types::Project;
use lanes::assign_lanes;
use normalize::{normalize_task, phase_bounds, range_of};
use serde::{Deserialize, Serialize};

/// A positioned task segment within a phase row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineTask {
    pub id: String,
    pub name: String,
    pub start: i64,
    pub end: i64,
    /// Rendered as a point/diamond centered on `start` instead of a bar.
    pub is_milestone: bool,
    /// Horizontal track; tasks sharing a lane never overlap in time.
    pub lane: usize,
}

/// A phase row: resolved bounds plus its packed task segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTimeline {
    pub id: String,
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub lane_count: usize,
    pub tasks: Vec<TimelineTask>,
}

/// The full timeline for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineView {
    pub project_id: String,
    pub project_name: String,
    /// Overall visible range: the union of phase bounds and task instants.
    pub start: i64,
    pub end: i64,
    /// The reference instant the view was computed at.
    pub today: i64,
    /// Whether the today marker falls inside the visible range.
    pub today_visible: bool,
    pub phases: Vec<PhaseTimeline>,
}

/// Lay out every phase of a project: resolve bounds, normalize task
/// intervals, pack lanes, and compute the overall display range.
pub fn project_timeline(project: &Project, today: i64, config: &EngineConfig) -> TimelineView {
    let mut rows = Vec::with_capacity(project.phases.len());

    for phase in &project.phases {
        let bounds = phase_bounds(phase, today, config);

        let normalized: Vec<_> = phase
            .tasks
            .iter()
            .map(|t| normalize_task(t, bounds, config))
            .collect();
        let intervals: Vec<(i64, i64)> = normalized.iter().map(|n| (n.start, n.end)).collect();
        let assignment = assign_lanes(&intervals);

        let tasks: Vec<TimelineTask> = phase
            .tasks
            .iter()
            .zip(&normalized)
            .zip(&assignment.lanes)
            .map(|((task, n), &lane)| TimelineTask {
                id: task.id.clone(),
                name: task.name.clone(),
                start: n.start,
                end: n.end,
                is_milestone: n.milestone,
                lane,
            })
            .collect();

        // Row range covers the placed bars as well as the phase bounds.
        let (start, end) = range_of(
            [bounds.start, bounds.end]
                .into_iter()
                .chain(tasks.iter().flat_map(|t| [t.start, t.end])),
            today,
            config,
        );

        rows.push(PhaseTimeline {
            id: phase.id.clone(),
            name: phase.name.clone(),
            start,
            end,
            lane_count: assignment.lane_count,
            tasks,
        });
    }

    let (start, end) = range_of(
        rows.iter().flat_map(|r| {
            [r.start, r.end]
                .into_iter()
                .chain(r.tasks.iter().flat_map(|t| [t.start, t.end]))
        }),
        today,
        config,
    );

    TimelineView {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        start,
        end,
        today,
        today_visible: start <= today && today <= end,
        phases: rows,
    }
}
