//! Risk rule engine: overdue, due-soon, unassigned, and status-inconsistency
//! detection over a snapshot, scoped to a viewing identity.
//!
//! Rules are pure predicates; the only state consulted afterwards is the
//! suppression store. Alert keys encode (rule, owning entity id) and nothing
//! else, so an unchanged snapshot always re-derives the same keys.

pub mod suppression;

use crate::config::EngineConfig;
use crate::format::fmt_day;
use crate::types::{
    Alert, AlertKind, MS_PER_DAY, Phase, Priority, Project, Role, Severity, Subtask, Task, Viewer,
};
use serde::{Deserialize, Serialize};
use suppression::SuppressionStore;
use tracing::debug;

/// Days from `now` until `due`, rounded up. Negative when already past.
fn days_until(due: i64, now: i64) -> i64 {
    (due - now + MS_PER_DAY - 1).div_euclid(MS_PER_DAY)
}

struct AlertContext<'a> {
    project: &'a Project,
    phase: &'a Phase,
    now: i64,
}

impl<'a> AlertContext<'a> {
    fn alert(
        &self,
        key: String,
        kind: AlertKind,
        severity: Severity,
        title: String,
        message: String,
        task_id: &str,
        subtask_id: Option<&str>,
        due_at: Option<i64>,
    ) -> Alert {
        Alert {
            key,
            kind,
            severity,
            project_id: self.project.id.clone(),
            project_name: self.project.name.clone(),
            phase_id: Some(self.phase.id.clone()),
            task_id: Some(task_id.to_string()),
            subtask_id: subtask_id.map(|s| s.to_string()),
            title,
            message,
            entity_url: format!("/projects/{}", self.project.id),
            due_at,
            computed_at: self.now,
        }
    }
}

fn task_alerts(
    ctx: &AlertContext<'_>,
    task: &Task,
    viewer: &Viewer,
    config: &EngineConfig,
    out: &mut Vec<Alert>,
) {
    if !viewer.can_see(task) {
        return;
    }

    let now = ctx.now;
    let status = task.status();
    let priority = task.priority();
    let milestone = task.flagged_milestone(&config.milestone_markers);
    let milestone_suffix = if milestone { " (Milestone)" } else { "" };

    if let Some(due) = task.due_at {
        // Overdue and due-soon are mutually exclusive: the first needs
        // due < now, the second due >= now.
        if !status.is_completed() && due < now {
            out.push(ctx.alert(
                format!("overdue_task_{}", task.id),
                AlertKind::Overdue,
                Severity::Critical,
                format!("Task overdue{}", milestone_suffix),
                format!("{} — was due {}.", task.name, fmt_day(due)),
                &task.id,
                None,
                Some(due),
            ));
        } else if !status.is_completed() && due >= now {
            let days = days_until(due, now);
            let window = config.sla_window_days(priority);
            if days <= window {
                let severity = if priority == Priority::High && days <= config.high_critical_days {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                out.push(ctx.alert(
                    format!("duesoon_task_{}", task.id),
                    AlertKind::DueSoon,
                    severity,
                    format!("Due soon{}", milestone_suffix),
                    format!(
                        "{} — due {} ({} days left).",
                        task.name,
                        fmt_day(due),
                        days
                    ),
                    &task.id,
                    None,
                    Some(due),
                ));
            }
        }
    }

    if task.assignee().is_none() {
        let severity = if milestone || priority == Priority::High {
            Severity::Critical
        } else {
            Severity::Warning
        };
        out.push(ctx.alert(
            format!("unassigned_task_{}", task.id),
            AlertKind::Unassigned,
            severity,
            format!("Task unassigned{}", milestone_suffix),
            format!("{} — needs an assignee.", task.name),
            &task.id,
            None,
            task.due_at,
        ));
    }

    let any_subtask_open = task.subtasks.iter().any(|st| !st.status().is_completed());
    let all_subtasks_done =
        !task.subtasks.is_empty() && task.subtasks.iter().all(|st| st.status().is_completed());

    if status.is_completed() && any_subtask_open {
        out.push(ctx.alert(
            format!("inconsistency_task_{}_subs_open", task.id),
            AlertKind::Inconsistency,
            Severity::Info,
            "Status inconsistency".to_string(),
            format!("{} is marked completed but has open subtasks.", task.name),
            &task.id,
            None,
            None,
        ));
    } else if !status.is_completed() && all_subtasks_done {
        out.push(ctx.alert(
            format!("inconsistency_task_{}_task_open", task.id),
            AlertKind::Inconsistency,
            Severity::Info,
            "Status inconsistency".to_string(),
            format!("{} has all of its subtasks completed.", task.name),
            &task.id,
            None,
            None,
        ));
    }

    for st in &task.subtasks {
        subtask_alerts(ctx, task, st, viewer, config, out);
    }
}

fn subtask_alerts(
    ctx: &AlertContext<'_>,
    task: &Task,
    subtask: &Subtask,
    viewer: &Viewer,
    config: &EngineConfig,
    out: &mut Vec<Alert>,
) {
    // Task-level visibility already passed; subtask alerts additionally go
    // only to the subtask's own assignee unless the viewer is a manager.
    if !viewer.is_manager() && subtask.assignee() != Some(viewer.uid.as_str()) {
        return;
    }

    let now = ctx.now;
    let status = subtask.status();
    let title = format!("Subtask: {}", subtask.name);

    // Date rules are silenced once the parent task is closed.
    if let Some(due) = subtask.due_at
        && !task.status().is_completed()
        && !status.is_completed()
    {
        if due < now {
            out.push(ctx.alert(
                format!("overdue_sub_{}", subtask.id),
                AlertKind::Overdue,
                Severity::Critical,
                title.clone(),
                format!("Subtask overdue — was due {}.", fmt_day(due)),
                &task.id,
                Some(&subtask.id),
                Some(due),
            ));
        } else {
            let days = days_until(due, now);
            if days <= config.subtask_due_soon_days {
                out.push(ctx.alert(
                    format!("duesoon_sub_{}", subtask.id),
                    AlertKind::DueSoon,
                    Severity::Warning,
                    title.clone(),
                    format!("Subtask due {} ({} days left).", fmt_day(due), days),
                    &task.id,
                    Some(&subtask.id),
                    Some(due),
                ));
            }
        }
    }

    if subtask.assignee().is_none() {
        out.push(ctx.alert(
            format!("unassigned_sub_{}", subtask.id),
            AlertKind::Unassigned,
            Severity::Warning,
            title,
            "Subtask needs an assignee.".to_string(),
            &task.id,
            Some(&subtask.id),
            subtask.due_at,
        ));
    }
}

/// Evaluate every risk rule over one project tree for the given viewer.
/// Read-only identities receive no alerts.
pub fn evaluate_project(
    project: &Project,
    viewer: &Viewer,
    now: i64,
    config: &EngineConfig,
) -> Vec<Alert> {
    if viewer.role == Role::Viewer {
        return Vec::new();
    }

    let mut out = Vec::new();
    for phase in &project.phases {
        let ctx = AlertContext {
            project,
            phase,
            now,
        };
        for task in &phase.tasks {
            task_alerts(&ctx, task, viewer, config, &mut out);
        }
    }

    debug!(
        project = %project.id,
        alerts = out.len(),
        "evaluated risk rules"
    );
    out
}

/// Order alerts for rendering: severity first, then due instant ascending
/// with dateless alerts last, then key for a stable total order.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| match (a.due_at, b.due_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Drop alerts whose keys are acknowledged or still snoozed.
pub fn filter_suppressed(
    alerts: Vec<Alert>,
    store: &SuppressionStore,
    now: i64,
) -> Vec<Alert> {
    alerts
        .into_iter()
        .filter(|a| !store.is_suppressed(&a.key, now))
        .collect()
}

/// Number of critical alerts, for badge rendering.
pub fn critical_count(alerts: &[Alert]) -> usize {
    alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count()
}

/// Whether an upcoming item is a task or a subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingKind {
    Task,
    Subtask,
}

/// A not-yet-completed item due within the upcoming window, for report
/// rendering. Not an alert: never suppression-filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingItem {
    pub kind: UpcomingKind,
    pub id: String,
    pub name: String,
    pub phase_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub due_at: i64,
}

/// Collect open tasks and subtasks due within the configured upcoming
/// window, ordered by due instant.
pub fn upcoming_milestones(
    project: &Project,
    now: i64,
    config: &EngineConfig,
) -> Vec<UpcomingItem> {
    let horizon = now + config.upcoming_window_days * MS_PER_DAY;
    let mut items = Vec::new();

    for phase in &project.phases {
        for task in &phase.tasks {
            if let Some(due) = task.due_at
                && !task.status().is_completed()
                && due >= now
                && due <= horizon
            {
                items.push(UpcomingItem {
                    kind: UpcomingKind::Task,
                    id: task.id.clone(),
                    name: task.name.clone(),
                    phase_name: phase.name.clone(),
                    assigned_to: task.assignee().map(|s| s.to_string()),
                    due_at: due,
                });
            }
            for st in &task.subtasks {
                if let Some(due) = st.due_at
                    && !st.status().is_completed()
                    && due >= now
                    && due <= horizon
                {
                    items.push(UpcomingItem {
                        kind: UpcomingKind::Subtask,
                        id: st.id.clone(),
                        name: st.name.clone(),
                        phase_name: phase.name.clone(),
                        assigned_to: st.assignee().map(|s| s.to_string()),
                        due_at: due,
                    });
                }
            }
        }
    }

    items.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
    items
}
