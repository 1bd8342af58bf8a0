//! Domain types for the training-management API
//!
//! Core types: DayPlan, Task, Checkbox, Trainee.
//! All mirror the backend's camelCase wire format via serde; status enums
//! carry snake_case wire values.

mod plan;
mod task;
mod trainee;

pub use plan::{CreatedBy, DayPlan, EndOfDayUpdate, PlanStatus, ReviewDecision};
pub use task::{Checkbox, Task, TaskStatus};
pub use trainee::{Role, Trainee};
