//! Output formatting utilities for markdown and JSON.

use crate::alerts::{UpcomingItem, UpcomingKind};
use crate::progress::ProjectProgress;
use crate::timeline::TimelineView;
use crate::types::{Alert, Severity};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Short day-month rendering, e.g. `07 Sep`.
pub fn fmt_day(at: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(at) {
        Some(dt) => dt.format("%d %b").to_string(),
        None => "?".to_string(),
    }
}

/// Full date rendering, e.g. `07 Sep 2026`.
pub fn fmt_day_long(at: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(at) {
        Some(dt) => dt.format("%d %b %Y").to_string(),
        None => "?".to_string(),
    }
}

/// Format a project progress report as markdown.
pub fn format_progress_markdown(report: &ProjectProgress) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} — {}%\n\n", report.name, report.progress));

    for phase in &report.phases {
        md.push_str(&format!("## {} — {}%\n", phase.name, phase.progress));
        for task in &phase.tasks {
            md.push_str(&format!("- {}: {}%\n", task.name, task.progress));
        }
        md.push('\n');
    }

    if !report.workload.is_empty() {
        md.push_str("## Workload\n");
        for entry in &report.workload {
            md.push_str(&format!("- {}: {} items\n", entry.assignee, entry.items));
        }
        md.push('\n');
    }

    md
}

/// Format a project timeline as markdown.
pub fn format_timeline_markdown(view: &TimelineView) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Timeline: {}\n", view.project_name));
    md.push_str(&format!(
        "{} — {}{}\n\n",
        fmt_day_long(view.start),
        fmt_day_long(view.end),
        if view.today_visible {
            format!(" (today: {})", fmt_day(view.today))
        } else {
            String::new()
        }
    ));

    for phase in &view.phases {
        md.push_str(&format!(
            "## {} — {} · {} ({} lanes)\n",
            phase.name,
            fmt_day_long(phase.start),
            fmt_day_long(phase.end),
            phase.lane_count
        ));
        for task in &phase.tasks {
            if task.is_milestone {
                md.push_str(&format!(
                    "- [lane {}] ◆ {} — {}\n",
                    task.lane,
                    task.name,
                    fmt_day(task.start)
                ));
            } else {
                md.push_str(&format!(
                    "- [lane {}] {} — {} · {}\n",
                    task.lane,
                    task.name,
                    fmt_day(task.start),
                    fmt_day(task.end)
                ));
            }
        }
        md.push('\n');
    }

    md
}

/// Format the filtered alert list as markdown, grouped by severity.
pub fn format_alerts_markdown(alerts: &[Alert]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Alerts ({})\n\n", alerts.len()));

    for severity in [Severity::Critical, Severity::Warning, Severity::Info] {
        let group: Vec<&Alert> = alerts.iter().filter(|a| a.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        md.push_str(&format!(
            "## {} ({})\n\n",
            capitalize(severity.as_str()),
            group.len()
        ));
        for alert in group {
            md.push_str(&format!(
                "- **{}** — {} [{}] `{}`\n",
                alert.title, alert.message, alert.project_name, alert.key
            ));
        }
        md.push('\n');
    }

    md
}

/// Format the upcoming-milestones table as markdown.
pub fn format_upcoming_markdown(items: &[UpcomingItem]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Upcoming ({})\n\n", items.len()));
    for item in items {
        let kind = match item.kind {
            UpcomingKind::Task => "task",
            UpcomingKind::Subtask => "subtask",
        };
        md.push_str(&format!(
            "- {} · {} ({}) — due {}{}\n",
            item.name,
            item.phase_name,
            kind,
            fmt_day(item.due_at),
            match &item.assigned_to {
                Some(uid) => format!(", assigned to {}", uid),
                None => ", unassigned".to_string(),
            }
        ));
    }

    md
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
