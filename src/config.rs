//! Engine configuration.
//!
//! All tunable thresholds live here so the computation modules never
//! hard-code defaulting logic. The `Default` impl is the canonical rule set;
//! a YAML file can override individual keys.

use crate::types::Priority;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable thresholds for progress, timeline, and risk computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Due-soon SLA window for high-priority tasks, in days.
    #[serde(default = "default_sla_high_days")]
    pub sla_high_days: i64,

    /// Due-soon SLA window for medium-priority tasks, in days.
    #[serde(default = "default_sla_medium_days")]
    pub sla_medium_days: i64,

    /// Due-soon SLA window for low-priority tasks, in days.
    #[serde(default = "default_sla_low_days")]
    pub sla_low_days: i64,

    /// Fixed due-soon window for subtasks (no priority field), in days.
    #[serde(default = "default_subtask_due_soon_days")]
    pub subtask_due_soon_days: i64,

    /// A due-soon alert on a high-priority task escalates to critical when
    /// the remaining time is at most this many days.
    #[serde(default = "default_high_critical_days")]
    pub high_critical_days: i64,

    /// Span of the fallback phase range when no date candidate exists, in days.
    #[serde(default = "default_phase_span_days")]
    pub default_phase_span_days: i64,

    /// Extension applied to a derived phase range whose min equals its max,
    /// in days.
    #[serde(default = "default_zero_width_extension_days")]
    pub zero_width_extension_days: i64,

    /// Window for the upcoming-milestones report, in days.
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,

    /// Lowercased tags that mark a task as an explicit milestone.
    #[serde(default = "default_milestone_markers")]
    pub milestone_markers: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sla_high_days: default_sla_high_days(),
            sla_medium_days: default_sla_medium_days(),
            sla_low_days: default_sla_low_days(),
            subtask_due_soon_days: default_subtask_due_soon_days(),
            high_critical_days: default_high_critical_days(),
            default_phase_span_days: default_phase_span_days(),
            zero_width_extension_days: default_zero_width_extension_days(),
            upcoming_window_days: default_upcoming_window_days(),
            milestone_markers: default_milestone_markers(),
        }
    }
}

fn default_sla_high_days() -> i64 {
    3
}

fn default_sla_medium_days() -> i64 {
    7
}

fn default_sla_low_days() -> i64 {
    14
}

fn default_subtask_due_soon_days() -> i64 {
    7
}

fn default_high_critical_days() -> i64 {
    1
}

fn default_phase_span_days() -> i64 {
    30
}

fn default_zero_width_extension_days() -> i64 {
    7
}

fn default_upcoming_window_days() -> i64 {
    30
}

fn default_milestone_markers() -> Vec<String> {
    vec!["milestone".to_string(), "hito".to_string()]
}

impl EngineConfig {
    /// Load configuration from a YAML file. Keys absent from the file keep
    /// their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from an optional path, falling back to defaults when none is
    /// given.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Due-soon SLA window in days for a task of the given priority.
    pub fn sla_window_days(&self, priority: Priority) -> i64 {
        match priority {
            Priority::High => self.sla_high_days,
            Priority::Medium => self.sla_medium_days,
            Priority::Low => self.sla_low_days,
        }
    }
}
