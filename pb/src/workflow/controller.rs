//! Day-plan workflow controller
//!
//! Owns the authoritative local view of plans for the current identity and
//! mediates every state transition with the backend.
//!
//! Failure semantics: operations are never retried automatically, every
//! failure is surfaced as a notice (server message when available, generic
//! fallback otherwise), and prior local state is left untouched on failure.
//! Status flips happen only after server confirmation.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, warn};

use trainapi::{
    Checkbox, CreateDayPlanRequest, CreatedBy, DayPlan, PlanRepository, ReviewDecision, ReviewRequest, Role, Session,
    TaskDraft, Trainee,
};

use super::validation;
use super::WorkflowError;

/// The signed-in user, as the workflow sees it
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: Trainee,
    pub role: Role,
}

impl From<&Session> for Identity {
    fn from(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            role: session.role,
        }
    }
}

/// Shared content of a bulk plan creation: one plan per selected trainee,
/// same date and task lines, independent ownership.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub date: NaiveDate,
    pub tasks: Vec<TaskDraft>,
}

/// Outcome of a bulk creation: successes are kept even when siblings fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkCreateReport {
    pub created: usize,
    pub failed: usize,
}

/// Outcome of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Plans fetched and local state replaced
    Loaded(usize),
    /// No identity; resolved immediately without a fetch
    NotSignedIn,
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// The day-plan workflow controller
pub struct WorkflowController<R> {
    repo: R,
    identity: Option<Identity>,
    plans: Vec<DayPlan>,
    /// Expanded rows as composite keys: `<plan-id>` for a plan,
    /// `<plan-id>:<task-index>` for a task within it.
    expanded: HashSet<String>,
    notices: Vec<Notice>,
}

impl<R: PlanRepository> WorkflowController<R> {
    pub fn new(repo: R, identity: Option<Identity>) -> Self {
        Self {
            repo,
            identity,
            plans: Vec::new(),
            expanded: HashSet::new(),
            notices: Vec::new(),
        }
    }

    /// The current local view of plans
    pub fn plans(&self) -> &[DayPlan] {
        &self.plans
    }

    /// The signed-in identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Find a plan by id
    pub fn plan(&self, plan_id: &str) -> Option<&DayPlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    /// Drain accumulated notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Fetch all plans visible to the current identity.
    ///
    /// Without an identity this resolves immediately and no fetch happens.
    /// On failure the prior local state is left untouched.
    pub async fn load_plans(&mut self) -> Result<LoadOutcome, WorkflowError> {
        if self.identity.is_none() {
            debug!("load_plans: no identity, skipping fetch");
            return Ok(LoadOutcome::NotSignedIn);
        }

        match self.repo.list_day_plans().await {
            Ok(plans) => {
                let count = plans.len();
                debug!(count, "load_plans: fetched");
                self.plans = plans;
                Ok(LoadOutcome::Loaded(count))
            }
            Err(e) => {
                warn!(error = %e, "load_plans: fetch failed, keeping prior state");
                self.notice(NoticeLevel::Error, e.user_message());
                Err(e.into())
            }
        }
    }

    /// Fetch the trainee roster (read-only reference data, not cached)
    pub async fn roster(&mut self) -> Result<Vec<Trainee>, WorkflowError> {
        match self.repo.list_trainees().await {
            Ok(trainees) => Ok(trainees),
            Err(e) => {
                self.notice(NoticeLevel::Error, e.user_message());
                Err(e.into())
            }
        }
    }

    /// Create one plan per selected trainee, sharing the draft's date and
    /// tasks. Requests are issued concurrently; per-trainee failures are
    /// counted and reported, successes are kept (no rollback).
    pub async fn create_plans(
        &mut self,
        draft: &PlanDraft,
        trainee_ids: &[String],
    ) -> Result<BulkCreateReport, WorkflowError> {
        validation::validate_draft(draft, trainee_ids)?;

        let created_by = match self.identity.as_ref().map(|i| i.role) {
            Some(Role::Trainee) => CreatedBy::Trainee,
            _ => CreatedBy::Trainer,
        };

        let tasks: Vec<TaskDraft> = draft.tasks.iter().filter(|t| !t.title.trim().is_empty()).cloned().collect();

        let requests: Vec<CreateDayPlanRequest> = trainee_ids
            .iter()
            .map(|trainee_id| CreateDayPlanRequest {
                trainee_id: trainee_id.clone(),
                date: draft.date,
                tasks: tasks.clone(),
                created_by,
            })
            .collect();

        debug!(trainees = requests.len(), "create_plans: issuing requests");
        let results = join_all(requests.iter().map(|request| self.repo.create_day_plan(request))).await;

        let mut report = BulkCreateReport { created: 0, failed: 0 };
        for result in results {
            match result {
                Ok(plan) => {
                    self.plans.push(plan);
                    report.created += 1;
                }
                Err(e) => {
                    warn!(error = %e, "create_plans: per-trainee request failed");
                    report.failed += 1;
                }
            }
        }

        if report.failed > 0 {
            self.notice(
                NoticeLevel::Warn,
                format!(
                    "{} of {} plans could not be created",
                    report.failed,
                    trainee_ids.len()
                ),
            );
        } else {
            self.notice(
                NoticeLevel::Info,
                format!("Created {} plan(s) for {}", report.created, draft.date),
            );
        }

        Ok(report)
    }

    /// Submit a reviewer decision. Rejections require non-blank remarks.
    ///
    /// Routing: a plan carrying an end-of-day update while still `pending`
    /// goes through the EOD-review route; every other combination goes
    /// through the standard review route. The local status flips only after
    /// the server confirms.
    pub async fn review_plan(
        &mut self,
        plan_id: &str,
        decision: ReviewDecision,
        remarks: &str,
    ) -> Result<(), WorkflowError> {
        validation::validate_review(decision, remarks)?;

        let plan = self
            .plans
            .iter()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| WorkflowError::PlanNotFound(plan_id.to_string()))?;
        if !plan.status.is_reviewable() {
            return Err(WorkflowError::NotReviewable(plan.status));
        }
        let uses_eod_review = plan.uses_eod_review();

        let review = ReviewRequest {
            status: decision.wire_value().to_string(),
            review_comments: remarks.trim().to_string(),
        };

        debug!(plan_id, %decision, uses_eod_review, "review_plan: submitting");
        let result = if uses_eod_review {
            self.repo.review_end_of_day(plan_id, &review).await
        } else {
            self.repo.review_day_plan(plan_id, &review).await
        };

        match result {
            Ok(()) => {
                if let Some(plan) = self.plans.iter_mut().find(|p| p.id == plan_id) {
                    plan.apply_review(decision);
                }
                let verb = match decision {
                    ReviewDecision::Approved => "approved",
                    ReviewDecision::Rejected => "rejected",
                };
                self.notice(NoticeLevel::Info, format!("Plan {}", verb));
                Ok(())
            }
            Err(e) => {
                self.notice(NoticeLevel::Error, e.user_message());
                Err(e.into())
            }
        }
    }

    /// Delete a plan. The local entry is dropped only on server success;
    /// on failure the plan stays and the error is surfaced.
    pub async fn delete_plan(&mut self, plan_id: &str) -> Result<(), WorkflowError> {
        if self.plan(plan_id).is_none() {
            return Err(WorkflowError::PlanNotFound(plan_id.to_string()));
        }

        match self.repo.delete_day_plan(plan_id).await {
            Ok(()) => {
                self.plans.retain(|p| p.id != plan_id);
                let task_prefix = format!("{}:", plan_id);
                self.expanded.retain(|key| key != plan_id && !key.starts_with(&task_prefix));
                self.notice(NoticeLevel::Info, "Plan deleted");
                Ok(())
            }
            Err(e) => {
                self.notice(NoticeLevel::Error, e.user_message());
                Err(e.into())
            }
        }
    }

    // === Expansion state (pure local, no network effect) ===

    fn task_key(plan_id: &str, task_index: usize) -> String {
        format!("{}:{}", plan_id, task_index)
    }

    pub fn toggle_expansion(&mut self, plan_id: &str) {
        if !self.expanded.remove(plan_id) {
            self.expanded.insert(plan_id.to_string());
        }
    }

    pub fn toggle_task_expansion(&mut self, plan_id: &str, task_index: usize) {
        let key = Self::task_key(plan_id, task_index);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    pub fn is_expanded(&self, plan_id: &str) -> bool {
        self.expanded.contains(plan_id)
    }

    pub fn is_task_expanded(&self, plan_id: &str, task_index: usize) -> bool {
        self.expanded.contains(&Self::task_key(plan_id, task_index))
    }

    /// Checkboxes for a task of a plan, resolved through the key fallback
    /// chain (see [`DayPlan::checkboxes_for_task`]).
    pub fn checkboxes_for_task(
        &self,
        plan_id: &str,
        task_index: usize,
    ) -> Option<&std::collections::BTreeMap<String, Checkbox>> {
        self.plan(plan_id)?.checkboxes_for_task(task_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network-free tests for the pure-local pieces; the repository-driven
    // scenarios live in tests/integration_test.rs.

    struct UnreachableRepo;

    #[async_trait::async_trait]
    impl PlanRepository for UnreachableRepo {
        async fn list_day_plans(&self) -> Result<Vec<DayPlan>, trainapi::ApiError> {
            panic!("no network expected in this test");
        }
        async fn list_trainees(&self) -> Result<Vec<Trainee>, trainapi::ApiError> {
            panic!("no network expected in this test");
        }
        async fn create_day_plan(&self, _: &CreateDayPlanRequest) -> Result<DayPlan, trainapi::ApiError> {
            panic!("no network expected in this test");
        }
        async fn review_day_plan(&self, _: &str, _: &ReviewRequest) -> Result<(), trainapi::ApiError> {
            panic!("no network expected in this test");
        }
        async fn review_end_of_day(&self, _: &str, _: &ReviewRequest) -> Result<(), trainapi::ApiError> {
            panic!("no network expected in this test");
        }
        async fn delete_day_plan(&self, _: &str) -> Result<(), trainapi::ApiError> {
            panic!("no network expected in this test");
        }
    }

    fn controller() -> WorkflowController<UnreachableRepo> {
        WorkflowController::new(UnreachableRepo, None)
    }

    #[test]
    fn test_expansion_toggle_roundtrip() {
        let mut ctl = controller();
        assert!(!ctl.is_expanded("dp-1"));

        ctl.toggle_expansion("dp-1");
        assert!(ctl.is_expanded("dp-1"));
        assert!(!ctl.is_expanded("dp-2"));

        ctl.toggle_expansion("dp-1");
        assert!(!ctl.is_expanded("dp-1"));
    }

    #[test]
    fn test_task_expansion_is_per_plan_and_index() {
        let mut ctl = controller();
        ctl.toggle_task_expansion("dp-1", 2);
        assert!(ctl.is_task_expanded("dp-1", 2));
        assert!(!ctl.is_task_expanded("dp-1", 1));
        assert!(!ctl.is_task_expanded("dp-2", 2));
    }

    #[tokio::test]
    async fn test_load_without_identity_short_circuits() {
        // UnreachableRepo panics on any call: reaching the network here
        // would fail the test.
        let mut ctl = controller();
        let outcome = ctl.load_plans().await.unwrap();
        assert_eq!(outcome, LoadOutcome::NotSignedIn);
        assert!(ctl.plans().is_empty());
    }

    #[tokio::test]
    async fn test_validation_blocks_before_network() {
        let mut ctl = controller();
        let draft = PlanDraft {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            tasks: vec![],
        };
        let err = ctl.create_plans(&draft, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Validation(crate::workflow::ValidationError::NoTrainees)
        ));
    }

    #[test]
    fn test_take_notices_drains() {
        let mut ctl = controller();
        ctl.notice(NoticeLevel::Info, "hello");
        assert_eq!(ctl.take_notices().len(), 1);
        assert!(ctl.take_notices().is_empty());
    }
}
