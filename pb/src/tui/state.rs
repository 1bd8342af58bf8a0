//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here. Rows are
//! display snapshots rebuilt from the workflow controller after every
//! refresh or action; rendering never touches the controller directly.

use trainapi::{PlanStatus, ReviewDecision};

use crate::workflow::NoticeLevel;

/// One visible row of the expandable plan tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Plan {
        plan_id: String,
        date: String,
        trainee: String,
        status: PlanStatus,
        has_eod: bool,
        reviewable: bool,
        expanded: bool,
    },
    Task {
        plan_id: String,
        task_index: usize,
        title: String,
        time_allocation: String,
        status: String,
        expanded: bool,
        has_checkboxes: bool,
    },
    Checkbox {
        label: String,
        checked: bool,
    },
}

impl Row {
    /// The plan this row belongs to
    pub fn plan_id(&self) -> Option<&str> {
        match self {
            Self::Plan { plan_id, .. } | Self::Task { plan_id, .. } => Some(plan_id),
            Self::Checkbox { .. } => None,
        }
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Collecting reviewer remarks before submitting a rejection
    Remarks(RemarksDialog),
    /// Confirmation dialog for destructive actions
    Confirm(ConfirmDialog),
    /// Help overlay
    Help,
}

/// Remarks input dialog
#[derive(Debug, Clone)]
pub struct RemarksDialog {
    pub plan_id: String,
    pub decision: ReviewDecision,
    pub buffer: String,
    /// Inline validation hint (e.g. blank remarks on a rejection)
    pub hint: Option<String>,
}

impl RemarksDialog {
    pub fn reject(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            decision: ReviewDecision::Rejected,
            buffer: String::new(),
            hint: None,
        }
    }
}

/// Confirmation dialog for dangerous actions
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
    pub selected_yes: bool,
}

impl ConfirmDialog {
    pub fn delete_plan(plan_id: impl Into<String>, label: &str) -> Self {
        let plan_id = plan_id.into();
        Self {
            message: format!("Delete {}? This cannot be undone here.", label),
            action: ConfirmAction::DeletePlan(plan_id),
            selected_yes: false,
        }
    }
}

/// Actions a confirmation dialog can trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeletePlan(String),
}

/// Controller operations requested by key handling, executed by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Refresh,
    TogglePlan(String),
    ToggleTask(String, usize),
    Review {
        plan_id: String,
        decision: ReviewDecision,
        remarks: String,
    },
    Delete(String),
}

/// Transient status line content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: NoticeLevel,
    pub text: String,
}

/// Plan counts shown in the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub rejected: usize,
}

/// Application state shared between key handling and rendering
#[derive(Debug, Default)]
pub struct AppState {
    /// Visible rows of the plan tree
    pub rows: Vec<Row>,
    /// Selected row index
    pub selected: usize,
    /// Current modal mode
    pub interaction: InteractionMode,
    /// Transient status line
    pub status_message: Option<StatusMessage>,
    /// Operations queued for the runner
    pub pending: Vec<PendingAction>,
    /// Signed-in user label, None when there is no session
    pub identity_label: Option<String>,
    /// Whether the signed-in role may review/delete
    pub can_review: bool,
    pub can_delete: bool,
    /// Header counts
    pub counts: StatusCounts,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected row
    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() && self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Keep the selection in bounds after the row list changes
    pub fn clamp_selection(&mut self) {
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn set_status(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
