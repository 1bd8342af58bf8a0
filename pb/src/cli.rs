//! CLI command definitions and subcommands

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use trainapi::TaskDraft;

/// Planboard - training day-plan workflow client
#[derive(Parser)]
#[command(
    name = "pb",
    about = "Training day-plan workflow client",
    version,
    after_help = "Logs are written to: ~/.local/share/planboard/logs/planboard.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Sign in: persist the API token and identity (7-day expiry)
    Login {
        /// API token issued by the backend
        #[arg(long)]
        token: String,

        /// Role (admin, trainer, master-trainer, trainee, boa)
        #[arg(long)]
        role: trainapi::Role,

        /// Backend user id
        #[arg(long)]
        user_id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Employee id
        #[arg(long, default_value = "")]
        employee_id: String,
    },

    /// Sign out: remove the persisted session
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// List day plans visible to the signed-in role
    Plans {
        /// Filter by status (draft, pending, in_progress, completed, rejected)
        #[arg(short, long)]
        status: Option<String>,

        /// Show tasks and checkboxes under each plan
        #[arg(short, long)]
        detailed: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Create day plans for selected trainees (one plan per trainee)
    Create {
        /// The date the plans cover
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,

        /// Trainee id (repeatable). Trainees may omit it to self-author.
        #[arg(long = "trainee", value_name = "ID")]
        trainees: Vec<String>,

        /// Task line as TITLE[|DESCRIPTION[|TIME]] (repeatable)
        #[arg(long = "task", value_name = "SPEC", required = true)]
        tasks: Vec<String>,
    },

    /// Approve or reject a submitted plan
    Review {
        /// Plan id
        plan_id: String,

        /// Approve the plan
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject the plan (requires --remarks)
        #[arg(long)]
        reject: bool,

        /// Reviewer remarks
        #[arg(short, long, default_value = "")]
        remarks: String,
    },

    /// Delete a plan
    Delete {
        /// Plan id
        plan_id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the trainee roster
    Roster {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Launch the interactive TUI
    Tui,
}

/// Output format for list commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Parse a `TITLE[|DESCRIPTION[|TIME]]` task spec
pub fn parse_task_spec(spec: &str) -> TaskDraft {
    let mut parts = spec.splitn(3, '|');
    TaskDraft {
        title: parts.next().unwrap_or_default().trim().to_string(),
        description: parts.next().unwrap_or_default().trim().to_string(),
        time_allocation: parts.next().unwrap_or_default().trim().to_string(),
    }
}

/// Path to the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planboard")
        .join("logs")
        .join("planboard.log")
}
