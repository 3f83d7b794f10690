//! CLI command definitions for project-pulse.
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::types::Role;
use clap::{Parser, Subcommand, ValueEnum};

/// Viewer role, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RoleArg {
    Admin,
    #[default]
    ProjectManager,
    Technician,
    Viewer,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::ProjectManager => Role::ProjectManager,
            RoleArg::Technician => Role::Technician,
            RoleArg::Viewer => Role::Viewer,
        }
    }
}

/// Progress, timeline, and risk analytics over project snapshots
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a snapshot JSON file (projects with phases/tasks/subtasks)
    #[arg(short, long, global = true)]
    pub snapshot: Option<String>,

    /// Path to the suppression store database (default: ~/.project-pulse/suppressions.db)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format: json or markdown
    #[arg(short, long, global = true, default_value = "markdown")]
    pub format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Roll up completion percentages per project, phase, and task
    Progress {
        /// Restrict to a single project id
        #[arg(long)]
        project: Option<String>,
    },

    /// Lay out phase and task intervals on non-overlapping lanes
    Timeline {
        /// Restrict to a single project id
        #[arg(long)]
        project: Option<String>,
    },

    /// Evaluate risk rules and print the suppression-filtered alert list
    Alerts {
        /// Viewer user id the alerts are scoped to
        #[arg(long, default_value = "")]
        uid: String,

        /// Viewer role
        #[arg(long, value_enum, default_value_t = RoleArg::ProjectManager)]
        role: RoleArg,

        /// Restrict to a single project id
        #[arg(long)]
        project: Option<String>,

        /// Also list open items due within the upcoming window
        #[arg(long)]
        upcoming: bool,
    },

    /// Permanently suppress an alert key
    Ack {
        /// The alert key to acknowledge
        key: String,
    },

    /// Temporarily suppress an alert key
    Snooze {
        /// The alert key to snooze
        key: String,

        /// Days until the snooze lapses
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
}
