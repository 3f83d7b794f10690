//! Core types for the project analytics engine.

use serde::{Deserialize, Serialize};

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Normalized lifecycle status of a phase, task, or subtask.
///
/// Raw records carry free-form status strings; everything the engine does not
/// recognize counts as `Todo` (weight 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Completed,
}

impl Status {
    /// Parse a raw status string, tolerating the aliases seen in stored data.
    /// Unrecognized or missing values normalize to `Todo`.
    pub fn parse(raw: Option<&str>) -> Self {
        let val = raw.unwrap_or("").trim().to_lowercase();
        match val.as_str() {
            "completed" | "complete" | "done" => Status::Completed,
            "in_progress" | "doing" | "progress" => Status::InProgress,
            _ => Status::Todo,
        }
    }

    /// Completion weight in [0, 1] used by the progress rollup.
    pub fn weight(self) -> f64 {
        match self {
            Status::Completed => 1.0,
            Status::InProgress => 0.5,
            Status::Todo => 0.0,
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, Status::Completed)
    }
}

/// Task priority. Default is medium; the due-soon SLA window depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a raw priority string ("high", "medium"/"med", "low").
    /// Returns `Medium` for unrecognized or missing values.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("").trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Role of the identity a computation pass is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectManager,
    Technician,
    Viewer,
}

/// The viewing identity a pass is evaluated for.
///
/// Visibility is a pure predicate over (role, uid, task) so new roles extend
/// the enum and this one function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub role: Role,
    pub uid: String,
}

impl Viewer {
    pub fn new(role: Role, uid: impl Into<String>) -> Self {
        Self {
            role,
            uid: uid.into(),
        }
    }

    /// Managers (admins and project managers) see every task.
    pub fn is_manager(&self) -> bool {
        matches!(self.role, Role::Admin | Role::ProjectManager)
    }

    /// Whether this identity is affected by the given task: managers always,
    /// anyone else only via direct assignment to the task or one of its
    /// subtasks.
    pub fn can_see(&self, task: &Task) -> bool {
        if self.is_manager() {
            return true;
        }
        if self.uid.is_empty() {
            return false;
        }
        if task.assignee() == Some(self.uid.as_str()) {
            return true;
        }
        task.subtasks
            .iter()
            .any(|st| st.assignee() == Some(self.uid.as_str()))
    }
}

/// A project: the root of an entity tree.
///
/// Progress is derived, never stored on the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

/// A phase within a project. Phase order matters for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Explicit start instant (epoch ms). Derived from tasks when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<i64>,
    /// Explicit end instant (epoch ms). Derived from tasks when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    pub fn status(&self) -> Status {
        Status::parse(self.status.as_deref())
    }
}

/// A task within a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Explicit milestone flag. Tasks can also become milestones via tags or
    /// a collapsed effective interval.
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn status(&self) -> Status {
        Status::parse(self.status.as_deref())
    }

    pub fn priority(&self) -> Priority {
        Priority::parse(self.priority.as_deref())
    }

    /// Empty-string assignees count as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether the task is declared a milestone up front, either by the
    /// explicit flag or by carrying one of the configured marker tags.
    pub fn flagged_milestone(&self, markers: &[String]) -> bool {
        if self.is_milestone {
            return true;
        }
        self.tags.iter().any(|tag| {
            let t = tag.trim().to_lowercase();
            markers.iter().any(|m| m == &t)
        })
    }
}

/// A subtask. Has no further children and no priority field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<i64>,
}

impl Subtask {
    pub fn status(&self) -> Status {
        Status::parse(self.status.as_deref())
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to.as_deref().filter(|s| !s.is_empty())
    }
}

/// Kind of risk condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Overdue,
    DueSoon,
    Unassigned,
    Inconsistency,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Overdue => "overdue",
            AlertKind::DueSoon => "due_soon",
            AlertKind::Unassigned => "unassigned",
            AlertKind::Inconsistency => "inconsistency",
        }
    }
}

/// Alert severity, ordered critical > warning > info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Sort rank; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A derived risk alert. Never persisted; the deterministic `key` makes
/// re-computation against an unchanged snapshot idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Deterministic key: rule kind plus owning entity id. Does not encode
    /// severity or message text, so the same logical risk keeps its key
    /// across re-derivation.
    pub key: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub project_id: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_id: Option<String>,
    pub title: String,
    pub message: String,
    /// Navigable reference to the owning entity's detail view.
    pub entity_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<i64>,
    pub computed_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_aliases() {
        assert_eq!(Status::parse(Some("completed")), Status::Completed);
        assert_eq!(Status::parse(Some("done")), Status::Completed);
        assert_eq!(Status::parse(Some("Complete")), Status::Completed);
        assert_eq!(Status::parse(Some("in_progress")), Status::InProgress);
        assert_eq!(Status::parse(Some("doing")), Status::InProgress);
        assert_eq!(Status::parse(Some("todo")), Status::Todo);
        assert_eq!(Status::parse(Some("not_started")), Status::Todo);
        assert_eq!(Status::parse(Some("blocked")), Status::Todo);
        assert_eq!(Status::parse(None), Status::Todo);
    }

    #[test]
    fn status_weights() {
        assert_eq!(Status::Completed.weight(), 1.0);
        assert_eq!(Status::InProgress.weight(), 0.5);
        assert_eq!(Status::Todo.weight(), 0.0);
    }

    #[test]
    fn priority_parse_defaults_to_medium() {
        assert_eq!(Priority::parse(Some("high")), Priority::High);
        assert_eq!(Priority::parse(Some("med")), Priority::Medium);
        assert_eq!(Priority::parse(Some("medium")), Priority::Medium);
        assert_eq!(Priority::parse(Some("low")), Priority::Low);
        assert_eq!(Priority::parse(Some("urgent")), Priority::Medium);
        assert_eq!(Priority::parse(None), Priority::Medium);
    }

    #[test]
    fn viewer_visibility() {
        let task = Task {
            id: "t1".into(),
            name: "Install fixture".into(),
            status: None,
            assigned_to: Some("u1".into()),
            due_at: None,
            start_at: None,
            created_at: None,
            priority: None,
            tags: vec![],
            is_milestone: false,
            subtasks: vec![Subtask {
                id: "s1".into(),
                name: "Check wiring".into(),
                status: None,
                assigned_to: Some("u2".into()),
                due_at: None,
            }],
        };

        assert!(Viewer::new(Role::ProjectManager, "boss").can_see(&task));
        assert!(Viewer::new(Role::Admin, "root").can_see(&task));
        assert!(Viewer::new(Role::Technician, "u1").can_see(&task));
        // Assigned via subtask only
        assert!(Viewer::new(Role::Technician, "u2").can_see(&task));
        assert!(!Viewer::new(Role::Technician, "u3").can_see(&task));
        assert!(!Viewer::new(Role::Technician, "").can_see(&task));
    }

    #[test]
    fn milestone_tag_markers() {
        let markers = vec!["milestone".to_string(), "hito".to_string()];
        let mut task = Task {
            id: "t1".into(),
            name: "Release".into(),
            status: None,
            assigned_to: None,
            due_at: None,
            start_at: None,
            created_at: None,
            priority: None,
            tags: vec!["  Hito ".into()],
            is_milestone: false,
            subtasks: vec![],
        };
        assert!(task.flagged_milestone(&markers));

        task.tags = vec!["urgent".into()];
        assert!(!task.flagged_milestone(&markers));

        task.is_milestone = true;
        assert!(task.flagged_milestone(&markers));
    }
}
