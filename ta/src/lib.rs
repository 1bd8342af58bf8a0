//! TrainAPI - domain model and typed client for the training-management API
//!
//! The backend owns nearly all state; this crate is the thin, typed edge of
//! it. It provides:
//!
//! - [`domain`] - DayPlan, Task, Checkbox, Trainee and the status enums
//! - [`client`] - the [`PlanRepository`] seam and its reqwest implementation
//! - [`session`] - the persisted credential + identity (cookie token, 7-day TTL)
//! - [`error`] - transport vs server-business error taxonomy

pub mod client;
pub mod domain;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use client::{AckEnvelope, CreateDayPlanRequest, HttpClient, PlanRepository, ReviewRequest, TaskDraft};
pub use domain::{
    Checkbox, CreatedBy, DayPlan, EndOfDayUpdate, PlanStatus, ReviewDecision, Role, Task, TaskStatus, Trainee,
};
pub use error::ApiError;
pub use session::{Session, SessionError, SessionStore, SESSION_TTL_DAYS};
