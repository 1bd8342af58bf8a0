//! Client-side validation
//!
//! Validation failures block an operation before any network call is made.

use thiserror::Error;
use trainapi::ReviewDecision;

use super::controller::PlanDraft;

/// Validation failures, reported verbatim to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select at least one trainee")]
    NoTrainees,

    #[error("Add at least one task")]
    NoTasks,

    #[error("Remarks are required when rejecting a plan")]
    RemarksRequired,
}

/// A draft passes when at least one trainee is selected and at least one task
/// line has a non-blank title.
pub fn validate_draft(draft: &PlanDraft, trainee_ids: &[String]) -> Result<(), ValidationError> {
    if trainee_ids.is_empty() {
        return Err(ValidationError::NoTrainees);
    }
    if !draft.tasks.iter().any(|t| !t.title.trim().is_empty()) {
        return Err(ValidationError::NoTasks);
    }
    Ok(())
}

/// Rejections require non-blank remarks; approvals do not.
pub fn validate_review(decision: ReviewDecision, remarks: &str) -> Result<(), ValidationError> {
    if decision == ReviewDecision::Rejected && remarks.trim().is_empty() {
        return Err(ValidationError::RemarksRequired);
    }
    Ok(())
}
