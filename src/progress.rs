//! Progress rollup: subtask → task → phase → project completion percentages.
//!
//! Every value is re-derived from lifecycle statuses on each pass; nothing
//! here is stored back onto the records.

use crate::types::{Phase, Project, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derived progress for a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProgress {
    pub id: String,
    pub name: String,
    /// Integer percentage in [0, 100].
    pub progress: u8,
}

/// Derived progress for a phase and its tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub id: String,
    pub name: String,
    pub progress: u8,
    pub tasks: Vec<TaskProgress>,
}

/// Assigned-item count for one assignee, across tasks and subtasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub assignee: String,
    pub items: u32,
}

/// Derived progress for a whole project tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub id: String,
    pub name: String,
    pub progress: u8,
    pub phases: Vec<PhaseProgress>,
    pub workload: Vec<WorkloadEntry>,
}

/// Task progress: the task's own status weight and the mean of its subtask
/// weights are both computed, and the further-along signal wins. A task
/// manually closed never reads below its subtasks, and a task whose subtasks
/// are all done never reads below them because its own status went stale.
pub fn task_progress(task: &Task) -> u8 {
    let by_status = (task.status().weight() * 100.0).round() as i64;

    let by_subtasks = if task.subtasks.is_empty() {
        by_status
    } else {
        let sum: f64 = task.subtasks.iter().map(|st| st.status().weight()).sum();
        ((sum / task.subtasks.len() as f64) * 100.0).round() as i64
    };

    by_status.max(by_subtasks).clamp(0, 100) as u8
}

/// Phase progress: unweighted mean of task progress, rounded half-up. A phase
/// with no tasks falls back to its own status weight.
pub fn phase_progress(phase: &Phase) -> u8 {
    if phase.tasks.is_empty() {
        return (phase.status().weight() * 100.0).round() as u8;
    }
    let sum: u64 = phase.tasks.iter().map(|t| task_progress(t) as u64).sum();
    (sum as f64 / phase.tasks.len() as f64).round() as u8
}

/// Project progress: unweighted mean of phase progress. Zero phases means 0.
pub fn project_progress(project: &Project) -> u8 {
    if project.phases.is_empty() {
        return 0;
    }
    let sum: u64 = project
        .phases
        .iter()
        .map(|ph| phase_progress(ph) as u64)
        .sum();
    (sum as f64 / project.phases.len() as f64).round() as u8
}

/// Count assigned tasks and subtasks per assignee, sorted by descending load
/// (ties by assignee id) so the staffing table renders deterministically.
pub fn workload(project: &Project) -> Vec<WorkloadEntry> {
    let mut counter: HashMap<&str, u32> = HashMap::new();
    for phase in &project.phases {
        for task in &phase.tasks {
            if let Some(uid) = task.assignee() {
                *counter.entry(uid).or_default() += 1;
            }
            for st in &task.subtasks {
                if let Some(uid) = st.assignee() {
                    *counter.entry(uid).or_default() += 1;
                }
            }
        }
    }

    let mut entries: Vec<WorkloadEntry> = counter
        .into_iter()
        .map(|(assignee, items)| WorkloadEntry {
            assignee: assignee.to_string(),
            items,
        })
        .collect();
    entries.sort_by(|a, b| b.items.cmp(&a.items).then_with(|| a.assignee.cmp(&b.assignee)));
    entries
}

/// Full derived progress tree for one project.
pub fn project_report(project: &Project) -> ProjectProgress {
    let phases = project
        .phases
        .iter()
        .map(|ph| PhaseProgress {
            id: ph.id.clone(),
            name: ph.name.clone(),
            progress: phase_progress(ph),
            tasks: ph
                .tasks
                .iter()
                .map(|t| TaskProgress {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    progress: task_progress(t),
                })
                .collect(),
        })
        .collect();

    ProjectProgress {
        id: project.id.clone(),
        name: project.name.clone(),
        progress: project_progress(project),
        phases,
        workload: workload(project),
    }
}
