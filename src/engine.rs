//! The computation pipeline: one pure pass over an immutable snapshot.
//!
//! `compute` re-derives progress, timeline layout, and the filtered alert
//! list from scratch on every invocation. It performs no I/O and holds no
//! state; callers re-invoke it whenever they consider their snapshot stale.
//! The suppression store is the single mutation point, and it is only read
//! here.

use crate::alerts::suppression::SuppressionStore;
use crate::alerts::{
    UpcomingItem, critical_count, evaluate_project, filter_suppressed, sort_alerts,
    upcoming_milestones,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::progress::{ProjectProgress, project_report};
use crate::timeline::{TimelineView, project_timeline};
use crate::types::{Alert, Project, Viewer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// An immutable snapshot of project trees, assembled by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub projects: Vec<Project>,
}

impl Snapshot {
    /// Parse a snapshot from its JSON representation.
    pub fn from_json_str(raw: &str) -> EngineResult<Self> {
        serde_json::from_str(raw).map_err(EngineError::invalid_snapshot)
    }

    /// Read and parse a snapshot file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            EngineError::invalid_snapshot(format!(
                "{}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// Look up a project by id. Absence is a caller contract violation.
    pub fn project(&self, id: &str) -> EngineResult<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EngineError::project_not_found(id))
    }

    /// Look up a phase within a project.
    pub fn phase(&self, project_id: &str, phase_id: &str) -> EngineResult<&crate::types::Phase> {
        self.project(project_id)?
            .phases
            .iter()
            .find(|ph| ph.id == phase_id)
            .ok_or_else(|| EngineError::phase_not_found(phase_id))
    }

    /// Look up a task anywhere within a project.
    pub fn task(&self, project_id: &str, task_id: &str) -> EngineResult<&crate::types::Task> {
        self.project(project_id)?
            .phases
            .iter()
            .flat_map(|ph| ph.tasks.iter())
            .find(|t| t.id == task_id)
            .ok_or_else(|| EngineError::task_not_found(task_id))
    }

    /// A snapshot narrowed to a single project.
    pub fn for_project(&self, id: &str) -> EngineResult<Snapshot> {
        Ok(Snapshot {
            projects: vec![self.project(id)?.clone()],
        })
    }
}

/// Everything one pass derives.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeResult {
    pub progress: Vec<ProjectProgress>,
    pub timelines: Vec<TimelineView>,
    /// Suppression-filtered, ordered severity-first.
    pub alerts: Vec<Alert>,
    /// Count of critical alerts in `alerts`, for badge rendering.
    pub critical: usize,
    /// Open items due within the upcoming window. Not suppression-filtered.
    pub upcoming: Vec<UpcomingItem>,
}

/// Run the full pipeline over a snapshot for one viewing identity.
pub fn compute(
    snapshot: &Snapshot,
    viewer: &Viewer,
    store: &SuppressionStore,
    now: i64,
    config: &EngineConfig,
) -> ComputeResult {
    let mut progress = Vec::with_capacity(snapshot.projects.len());
    let mut timelines = Vec::with_capacity(snapshot.projects.len());
    let mut candidates = Vec::new();
    let mut upcoming = Vec::new();

    for project in &snapshot.projects {
        progress.push(project_report(project));
        timelines.push(project_timeline(project, now, config));
        candidates.extend(evaluate_project(project, viewer, now, config));
        upcoming.extend(upcoming_milestones(project, now, config));
    }

    let raised = candidates.len();
    let mut alerts = filter_suppressed(candidates, store, now);
    sort_alerts(&mut alerts);
    upcoming.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));

    debug!(
        projects = snapshot.projects.len(),
        raised,
        visible = alerts.len(),
        "computation pass complete"
    );

    ComputeResult {
        critical: critical_count(&alerts),
        progress,
        timelines,
        alerts,
        upcoming,
    }
}
