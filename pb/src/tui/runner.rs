//! TUI Runner - main loop that owns the terminal and the workflow controller
//!
//! The runner draws, dispatches events to [`App`] for handling, executes the
//! controller operations the App queued, and refreshes data from the backend
//! on a timer. Everything the views show is rebuilt from the controller
//! after each action or refresh.

use std::time::{Duration, Instant};

use eyre::Result;
use tracing::debug;
use trainapi::{PlanRepository, PlanStatus};

use crate::capability::capabilities;
use crate::workflow::{LoadOutcome, NoticeLevel, WorkflowController};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{PendingAction, Row, StatusCounts};

/// How often to refresh data from the backend
const DATA_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner<R> {
    app: App,
    controller: WorkflowController<R>,
    terminal: Tui,
    events: EventHandler,
    last_refresh: Instant,
}

impl<R: PlanRepository> TuiRunner<R> {
    pub fn new(terminal: Tui, controller: WorkflowController<R>) -> Self {
        let mut app = App::new();
        if let Some(identity) = controller.identity() {
            let caps = capabilities(identity.role);
            app.state_mut().identity_label = Some(format!("{} ({})", identity.user.name, identity.role));
            app.state_mut().can_review = caps.can_review;
            app.state_mut().can_delete = caps.can_delete;
        }

        Self {
            app,
            controller,
            terminal,
            events: EventHandler::new(Duration::from_millis(100)),
            last_refresh: Instant::now(),
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        self.refresh_data().await;
        self.rebuild_rows();

        loop {
            self.terminal.draw(|frame| super::views::render(self.app.state(), frame))?;

            match self.events.next().await? {
                Event::Tick => self.handle_tick().await,
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                    // Execute whatever the key handler queued right away
                    self.drain_actions().await;
                }
                Event::Resize => {}
            }

            if self.app.state().should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_tick(&mut self) {
        self.drain_actions().await;

        if self.last_refresh.elapsed() >= DATA_REFRESH_INTERVAL {
            self.refresh_data().await;
            self.rebuild_rows();
        }
    }

    async fn drain_actions(&mut self) {
        let actions: Vec<PendingAction> = std::mem::take(&mut self.app.state_mut().pending);
        for action in actions {
            self.execute_action(action).await;
        }
    }

    async fn execute_action(&mut self, action: PendingAction) {
        debug!(?action, "TUI action");
        match action {
            PendingAction::Refresh => {
                self.refresh_data().await;
            }
            PendingAction::TogglePlan(plan_id) => {
                self.controller.toggle_expansion(&plan_id);
            }
            PendingAction::ToggleTask(plan_id, task_index) => {
                self.controller.toggle_task_expansion(&plan_id, task_index);
            }
            PendingAction::Review {
                plan_id,
                decision,
                remarks,
            } => {
                if let Err(e) = self.controller.review_plan(&plan_id, decision, &remarks).await {
                    self.app.state_mut().set_status(NoticeLevel::Error, e.user_message());
                }
                self.publish_notices();
            }
            PendingAction::Delete(plan_id) => {
                if let Err(e) = self.controller.delete_plan(&plan_id).await {
                    self.app.state_mut().set_status(NoticeLevel::Error, e.user_message());
                }
                self.publish_notices();
            }
        }

        self.rebuild_rows();
    }

    /// Surface the controller's accumulated notices on the status line
    /// (the most recent one wins).
    fn publish_notices(&mut self) {
        for notice in self.controller.take_notices() {
            self.app.state_mut().set_status(notice.level, notice.message);
        }
    }

    async fn refresh_data(&mut self) {
        self.last_refresh = Instant::now();
        match self.controller.load_plans().await {
            Ok(LoadOutcome::NotSignedIn) => {
                self.app
                    .state_mut()
                    .set_status(NoticeLevel::Warn, "Not signed in. Run `pb login` first.");
            }
            Ok(LoadOutcome::Loaded(count)) => {
                debug!(count, "TUI refreshed");
            }
            Err(_) => {
                // Prior rows stay on screen; the notice carries the message
                self.publish_notices();
            }
        }
    }

    /// Rebuild the visible rows from the controller's plans and expansion set
    fn rebuild_rows(&mut self) {
        let mut rows = Vec::new();
        let mut counts = StatusCounts::default();

        for plan in self.controller.plans() {
            match plan.status {
                PlanStatus::Pending => counts.pending += 1,
                PlanStatus::InProgress => counts.in_progress += 1,
                PlanStatus::Completed => counts.completed += 1,
                PlanStatus::Rejected => counts.rejected += 1,
                PlanStatus::Draft => {}
            }

            let expanded = self.controller.is_expanded(&plan.id);
            rows.push(Row::Plan {
                plan_id: plan.id.clone(),
                date: plan.date.to_string(),
                trainee: plan.trainee.name.clone(),
                status: plan.status,
                has_eod: plan.eod_update.is_some(),
                reviewable: plan.status.is_reviewable(),
                expanded,
            });

            if !expanded {
                continue;
            }

            for (task_index, task) in plan.tasks.iter().enumerate() {
                let checkboxes = plan.checkboxes_for_task(task_index);
                let task_expanded = self.controller.is_task_expanded(&plan.id, task_index);
                rows.push(Row::Task {
                    plan_id: plan.id.clone(),
                    task_index,
                    title: task.title.clone(),
                    time_allocation: task.time_allocation.clone(),
                    status: task.status.to_string(),
                    expanded: task_expanded,
                    has_checkboxes: checkboxes.is_some(),
                });

                if task_expanded
                    && let Some(checkboxes) = checkboxes
                {
                    for checkbox in checkboxes.values() {
                        rows.push(Row::Checkbox {
                            label: checkbox.label.clone(),
                            checked: checkbox.checked,
                        });
                    }
                }
            }
        }

        let state = self.app.state_mut();
        state.rows = rows;
        state.counts = counts;
        state.clamp_selection();
    }
}
