//! DayPlan domain type
//!
//! A DayPlan is a trainee's (or trainer-authored) schedule of tasks for one
//! date, subject to reviewer approval. Status moves forward only, except for
//! rejection, which returns the plan to a re-workable state on the trainee's
//! side.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Checkbox, Task};
use super::trainee::Trainee;

/// Day plan status in the review workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Being drafted, not yet submitted
    #[default]
    Draft,
    /// Submitted, awaiting review
    Pending,
    /// Day underway, tasks being worked
    InProgress,
    /// Reviewer approved
    Completed,
    /// Reviewer rejected; trainee may rework and resubmit
    Rejected,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!(
                "Unknown status: {}. Use: draft, pending, in_progress, completed, or rejected",
                s
            )),
        }
    }
}

impl PlanStatus {
    /// Completed is terminal from the reviewer's perspective
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// A reviewer decision applies only to submitted or in-progress plans
    pub fn is_reviewable(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

/// Who authored the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreatedBy {
    Trainer,
    /// Self-authored (the default for older records that omit the field)
    #[default]
    Trainee,
}

/// Reviewer decision on a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Wire value sent in the review payload's `status` field
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Local status the plan takes once the server confirms the decision
    pub fn resulting_status(self) -> PlanStatus {
        match self {
            Self::Approved => PlanStatus::Completed,
            Self::Rejected => PlanStatus::Rejected,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_value())
    }
}

/// End-of-day remarks submission attached to a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDayUpdate {
    /// Overall remarks for the day
    #[serde(default)]
    pub overall_remarks: String,

    /// When the update was submitted
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A trainee's schedule of tasks for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// Backend plan id
    pub id: String,

    /// Owning trainee
    pub trainee: Trainee,

    /// The date the plan covers
    pub date: NaiveDate,

    /// Ordered task list
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Checkboxes keyed by task key, then checkbox id. Task keys come in
    /// several historical encodings; see [`DayPlan::checkboxes_for_task`].
    #[serde(default)]
    pub checkboxes: HashMap<String, BTreeMap<String, Checkbox>>,

    /// Current workflow status
    #[serde(default)]
    pub status: PlanStatus,

    /// End-of-day update, if submitted
    #[serde(default)]
    pub eod_update: Option<EndOfDayUpdate>,

    /// When the plan was submitted for review
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,

    /// Who authored the plan
    #[serde(default)]
    pub created_by: CreatedBy,
}

impl DayPlan {
    /// Which review endpoint applies: the EOD-review route serves exactly the
    /// plans that carry an end-of-day update while still `pending`; every
    /// other combination goes through the standard review route.
    pub fn uses_eod_review(&self) -> bool {
        self.eod_update.is_some() && self.status == PlanStatus::Pending
    }

    /// Candidate task keys, probed in order, for the checkbox map.
    ///
    /// Historical encodings observed in backend data: bare index, stringified
    /// index, `task_<index>` prefix, task id, stringified task id. JSON object
    /// keys always parse as strings, so the bare/stringified spellings of the
    /// index (and of a numeric id) collapse to one entry here; the probe order
    /// is unchanged by the collapse.
    pub fn checkbox_key_candidates(&self, task_index: usize) -> Vec<String> {
        let mut keys = vec![task_index.to_string(), format!("task_{}", task_index)];
        if let Some(id) = self.tasks.get(task_index).and_then(|t| t.id.clone()) {
            keys.push(id);
        }
        keys
    }

    /// Resolve the checkboxes for a task, tolerating the heterogeneous key
    /// encodings. Returns the first candidate key that holds a non-empty
    /// entry, else None.
    pub fn checkboxes_for_task(&self, task_index: usize) -> Option<&BTreeMap<String, Checkbox>> {
        self.checkbox_key_candidates(task_index)
            .iter()
            .filter_map(|key| self.checkboxes.get(key))
            .find(|entry| !entry.is_empty())
    }

    /// Apply a confirmed reviewer decision to local state
    pub fn apply_review(&mut self, decision: ReviewDecision) {
        self.status = decision.resulting_status();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_trainee() -> Trainee {
        Trainee {
            id: "u-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            employee_id: "E100".to_string(),
        }
    }

    fn sample_plan() -> DayPlan {
        DayPlan {
            id: "dp-1".to_string(),
            trainee: sample_trainee(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            tasks: Vec::new(),
            checkboxes: HashMap::new(),
            status: PlanStatus::Pending,
            eod_update: None,
            submitted_at: None,
            created_by: CreatedBy::Trainer,
        }
    }

    fn one_checkbox(label: &str) -> BTreeMap<String, Checkbox> {
        let mut map = BTreeMap::new();
        map.insert(
            "cb-1".to_string(),
            Checkbox {
                label: label.to_string(),
                checked: false,
                time_allocation: String::new(),
            },
        );
        map
    }

    #[test]
    fn test_status_is_reviewable() {
        assert!(!PlanStatus::Draft.is_reviewable());
        assert!(PlanStatus::Pending.is_reviewable());
        assert!(PlanStatus::InProgress.is_reviewable());
        assert!(!PlanStatus::Completed.is_reviewable());
        assert!(!PlanStatus::Rejected.is_reviewable());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("pending".parse::<PlanStatus>().unwrap(), PlanStatus::Pending);
        assert_eq!("in-progress".parse::<PlanStatus>().unwrap(), PlanStatus::InProgress);
        assert!("archived".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(PlanStatus::Completed.is_terminal());
        assert!(!PlanStatus::Rejected.is_terminal());
        assert!(!PlanStatus::Pending.is_terminal());
    }

    #[test]
    fn test_uses_eod_review_requires_both_conditions() {
        let mut plan = sample_plan();
        assert!(!plan.uses_eod_review());

        plan.eod_update = Some(EndOfDayUpdate {
            overall_remarks: "done".to_string(),
            submitted_at: None,
        });
        assert!(plan.uses_eod_review());

        // EOD update present but status moved on: standard route
        plan.status = PlanStatus::InProgress;
        assert!(!plan.uses_eod_review());

        // Pending but no EOD update: standard route
        plan.status = PlanStatus::Pending;
        plan.eod_update = None;
        assert!(!plan.uses_eod_review());
    }

    #[test]
    fn test_apply_review() {
        let mut plan = sample_plan();
        plan.apply_review(ReviewDecision::Approved);
        assert_eq!(plan.status, PlanStatus::Completed);

        let mut plan = sample_plan();
        plan.apply_review(ReviewDecision::Rejected);
        assert_eq!(plan.status, PlanStatus::Rejected);
    }

    #[test]
    fn test_checkboxes_under_prefixed_key() {
        let mut plan = sample_plan();
        plan.tasks = vec![Task::new("a"), Task::new("b"), Task::new("c")];
        plan.checkboxes.insert("task_2".to_string(), one_checkbox("sub"));

        let found = plan.checkboxes_for_task(2).expect("task_2 entry should resolve");
        assert_eq!(found.len(), 1);
        assert!(plan.checkboxes_for_task(0).is_none());
    }

    #[test]
    fn test_checkbox_index_key_wins_over_prefixed() {
        let mut plan = sample_plan();
        plan.tasks = vec![Task::new("a")];
        plan.checkboxes.insert("0".to_string(), one_checkbox("by index"));
        plan.checkboxes.insert("task_0".to_string(), one_checkbox("by prefix"));

        let found = plan.checkboxes_for_task(0).unwrap();
        assert_eq!(found.get("cb-1").unwrap().label, "by index");
    }

    #[test]
    fn test_checkbox_task_id_fallback() {
        let mut plan = sample_plan();
        let mut task = Task::new("a");
        task.id = Some("t-77".to_string());
        plan.tasks = vec![task];
        plan.checkboxes.insert("t-77".to_string(), one_checkbox("by id"));

        let found = plan.checkboxes_for_task(0).unwrap();
        assert_eq!(found.get("cb-1").unwrap().label, "by id");
    }

    #[test]
    fn test_checkbox_empty_entry_skipped() {
        let mut plan = sample_plan();
        plan.tasks = vec![Task::new("a")];
        plan.checkboxes.insert("0".to_string(), BTreeMap::new());
        plan.checkboxes.insert("task_0".to_string(), one_checkbox("fallback"));

        // The empty index entry must not shadow the non-empty prefixed one
        let found = plan.checkboxes_for_task(0).unwrap();
        assert_eq!(found.get("cb-1").unwrap().label, "fallback");
    }

    #[test]
    fn test_plan_wire_format() {
        let json = r#"{
            "id": "dp-9",
            "trainee": {"id": "u-1", "name": "Ada", "email": "ada@example.com"},
            "date": "2024-06-01",
            "tasks": [{"title": "Standup", "timeAllocation": "09:00 - 09:15"}],
            "checkboxes": {"0": {"cb-1": {"label": "Join call", "checked": true}}},
            "status": "in_progress",
            "eodUpdate": {"overallRemarks": "good day"},
            "createdBy": "trainer"
        }"#;
        let plan: DayPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.status, PlanStatus::InProgress);
        assert_eq!(plan.created_by, CreatedBy::Trainer);
        assert_eq!(plan.eod_update.as_ref().unwrap().overall_remarks, "good day");
        assert!(plan.checkboxes_for_task(0).unwrap().get("cb-1").unwrap().checked);
    }

    #[test]
    fn test_plan_minimal_wire_format() {
        let json = r#"{
            "id": "dp-9",
            "trainee": {"id": "u-1", "name": "Ada", "email": "ada@example.com"},
            "date": "2024-06-01"
        }"#;
        let plan: DayPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.status, PlanStatus::Draft);
        assert_eq!(plan.created_by, CreatedBy::Trainee);
        assert!(plan.tasks.is_empty());
        assert!(plan.eod_update.is_none());
    }

    proptest! {
        /// Whichever subset of candidate keys is populated, resolution picks
        /// the earliest one in the {index, task_<index>, task-id} probe order.
        #[test]
        fn prop_resolution_order(by_index: bool, by_prefix: bool, by_id: bool) {
            let mut plan = sample_plan();
            let mut task = Task::new("a");
            task.id = Some("t-9".to_string());
            plan.tasks = vec![task];

            if by_index {
                plan.checkboxes.insert("0".to_string(), one_checkbox("index"));
            }
            if by_prefix {
                plan.checkboxes.insert("task_0".to_string(), one_checkbox("prefix"));
            }
            if by_id {
                plan.checkboxes.insert("t-9".to_string(), one_checkbox("id"));
            }

            let expected = if by_index {
                Some("index")
            } else if by_prefix {
                Some("prefix")
            } else if by_id {
                Some("id")
            } else {
                None
            };

            let got = plan.checkboxes_for_task(0).map(|m| m.get("cb-1").unwrap().label.as_str());
            prop_assert_eq!(got, expected);
        }
    }
}
