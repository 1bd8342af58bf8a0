//! Day-plan workflow
//!
//! The controller owns the local view of day plans for the current identity
//! and mediates every state transition with the backend. Local status never
//! flips ahead of server confirmation.

mod controller;
mod validation;

pub use controller::{
    BulkCreateReport, Identity, LoadOutcome, Notice, NoticeLevel, PlanDraft, WorkflowController,
};
pub use validation::ValidationError;

use thiserror::Error;
use trainapi::{ApiError, PlanStatus};

/// Errors from workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Client-side validation failure; never reaches the network
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend failure (transport or server-reported)
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Plan cannot be reviewed while {0}")]
    NotReviewable(PlanStatus),
}

impl WorkflowError {
    /// The message to show the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Api(e) => e.user_message(),
            Self::PlanNotFound(id) => format!("Plan {} is no longer available", id),
            Self::NotReviewable(status) => format!("Plan cannot be reviewed while {}", status),
        }
    }
}
