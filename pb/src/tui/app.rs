//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering and it does not talk to the backend;
//! controller operations are queued as [`PendingAction`]s for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use trainapi::ReviewDecision;

use crate::workflow::NoticeLevel;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode, PendingAction, RemarksDialog, Row};

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event.
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Transient status messages disappear on the next key press
        self.state.clear_status();

        match &self.state.interaction {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Remarks(_) => self.handle_remarks_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('q'), _) => {
                self.state.should_quit = true;
            }

            // === Help ===
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.state.interaction = InteractionMode::Help;
            }

            // === Navigation ===
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.state.select_prev(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.state.select_next(),
            (KeyCode::Char('g'), _) => self.state.select_first(),
            (KeyCode::Char('G'), _) => self.state.select_last(),

            // === Expand / collapse ===
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => self.toggle_selected(),

            // === Refresh ===
            (KeyCode::Char('r'), _) => self.state.pending.push(PendingAction::Refresh),

            // === Review actions ===
            (KeyCode::Char('a'), _) => self.approve_selected(),
            (KeyCode::Char('x'), _) => self.reject_selected(),

            // === Delete ===
            (KeyCode::Char('d'), _) => self.delete_selected(),

            _ => {}
        }

        false
    }

    /// Expand/collapse the selected plan or task row
    fn toggle_selected(&mut self) {
        match self.state.selected_row() {
            Some(Row::Plan { plan_id, .. }) => {
                let action = PendingAction::TogglePlan(plan_id.clone());
                self.state.pending.push(action);
            }
            Some(Row::Task {
                plan_id,
                task_index,
                has_checkboxes: true,
                ..
            }) => {
                let action = PendingAction::ToggleTask(plan_id.clone(), *task_index);
                self.state.pending.push(action);
            }
            _ => {}
        }
    }

    /// Approve the selected plan (no remarks required)
    fn approve_selected(&mut self) {
        if !self.state.can_review {
            self.state.set_status(NoticeLevel::Warn, "Your role cannot review plans");
            return;
        }
        match self.state.selected_row() {
            Some(Row::Plan {
                plan_id,
                reviewable: true,
                ..
            }) => {
                let action = PendingAction::Review {
                    plan_id: plan_id.clone(),
                    decision: ReviewDecision::Approved,
                    remarks: String::new(),
                };
                self.state.pending.push(action);
            }
            Some(Row::Plan { .. }) => {
                self.state.set_status(NoticeLevel::Warn, "Plan is not awaiting review");
            }
            _ => {}
        }
    }

    /// Open the remarks dialog for rejecting the selected plan
    fn reject_selected(&mut self) {
        if !self.state.can_review {
            self.state.set_status(NoticeLevel::Warn, "Your role cannot review plans");
            return;
        }
        match self.state.selected_row() {
            Some(Row::Plan {
                plan_id,
                reviewable: true,
                ..
            }) => {
                self.state.interaction = InteractionMode::Remarks(RemarksDialog::reject(plan_id.clone()));
            }
            Some(Row::Plan { .. }) => {
                self.state.set_status(NoticeLevel::Warn, "Plan is not awaiting review");
            }
            _ => {}
        }
    }

    /// Open the confirmation dialog for deleting the selected plan
    fn delete_selected(&mut self) {
        if !self.state.can_delete {
            self.state.set_status(NoticeLevel::Warn, "Your role cannot delete plans");
            return;
        }
        if let Some(Row::Plan {
            plan_id, trainee, date, ..
        }) = self.state.selected_row()
        {
            let label = format!("plan for {} on {}", trainee, date);
            self.state.interaction = InteractionMode::Confirm(ConfirmDialog::delete_plan(plan_id.clone(), &label));
        }
    }

    fn handle_remarks_key(&mut self, key: KeyEvent) -> bool {
        let InteractionMode::Remarks(dialog) = &mut self.state.interaction else {
            return false;
        };

        match key.code {
            KeyCode::Esc => {
                self.state.interaction = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                // Rejections need non-blank remarks; keep the dialog open
                // with a hint instead of submitting a doomed request.
                if dialog.decision == ReviewDecision::Rejected && dialog.buffer.trim().is_empty() {
                    dialog.hint = Some("Remarks are required when rejecting a plan".to_string());
                    return false;
                }
                let action = PendingAction::Review {
                    plan_id: dialog.plan_id.clone(),
                    decision: dialog.decision,
                    remarks: dialog.buffer.clone(),
                };
                self.state.pending.push(action);
                self.state.interaction = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                dialog.buffer.pop();
                dialog.hint = None;
            }
            KeyCode::Char(c) => {
                dialog.buffer.push(c);
                dialog.hint = None;
            }
            _ => {}
        }

        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        let InteractionMode::Confirm(dialog) = &mut self.state.interaction else {
            return false;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.state.interaction = InteractionMode::Normal;
            }
            KeyCode::Char('y') => {
                let action = dialog.action.clone();
                self.execute_confirmed(action);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                dialog.selected_yes = !dialog.selected_yes;
            }
            KeyCode::Enter => {
                if dialog.selected_yes {
                    let action = dialog.action.clone();
                    self.execute_confirmed(action);
                } else {
                    self.state.interaction = InteractionMode::Normal;
                }
            }
            _ => {}
        }

        false
    }

    fn execute_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeletePlan(plan_id) => {
                self.state.pending.push(PendingAction::Delete(plan_id));
            }
        }
        self.state.interaction = InteractionMode::Normal;
    }

    fn handle_help_key(&mut self, _key: KeyEvent) -> bool {
        self.state.interaction = InteractionMode::Normal;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainapi::PlanStatus;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_plan(reviewable: bool) -> App {
        let mut app = App::new();
        app.state_mut().can_review = true;
        app.state_mut().can_delete = true;
        app.state_mut().rows = vec![Row::Plan {
            plan_id: "dp-1".to_string(),
            date: "2024-06-01".to_string(),
            trainee: "Ada".to_string(),
            status: if reviewable { PlanStatus::Pending } else { PlanStatus::Completed },
            has_eod: false,
            reviewable,
            expanded: false,
        }];
        app
    }

    #[test]
    fn test_q_quits() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_enter_queues_plan_toggle() {
        let mut app = app_with_plan(true);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().pending, vec![PendingAction::TogglePlan("dp-1".to_string())]);
    }

    #[test]
    fn test_approve_queues_review() {
        let mut app = app_with_plan(true);
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(
            app.state().pending,
            vec![PendingAction::Review {
                plan_id: "dp-1".to_string(),
                decision: ReviewDecision::Approved,
                remarks: String::new(),
            }]
        );
    }

    #[test]
    fn test_approve_blocked_without_review_capability() {
        let mut app = app_with_plan(true);
        app.state_mut().can_review = false;
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.state().pending.is_empty());
        assert!(app.state().status_message.is_some());
    }

    #[test]
    fn test_approve_blocked_on_non_reviewable_plan() {
        let mut app = app_with_plan(false);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.state().pending.is_empty());
    }

    #[test]
    fn test_reject_opens_remarks_dialog_and_requires_text() {
        let mut app = app_with_plan(true);
        app.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(app.state().interaction, InteractionMode::Remarks(_)));

        // Enter with empty buffer: stays open with a hint, nothing queued
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().pending.is_empty());
        let InteractionMode::Remarks(dialog) = &app.state().interaction else {
            panic!("dialog should stay open");
        };
        assert!(dialog.hint.is_some());

        // Type remarks and submit
        for c in "redo".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.state().pending,
            vec![PendingAction::Review {
                plan_id: "dp-1".to_string(),
                decision: ReviewDecision::Rejected,
                remarks: "redo".to_string(),
            }]
        );
        assert!(matches!(app.state().interaction, InteractionMode::Normal));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with_plan(true);
        app.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(app.state().interaction, InteractionMode::Confirm(_)));
        assert!(app.state().pending.is_empty());

        // Esc aborts without queueing
        app.handle_key(key(KeyCode::Esc));
        assert!(app.state().pending.is_empty());

        // Confirm with 'y'
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.state().pending, vec![PendingAction::Delete("dp-1".to_string())]);
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(matches!(app.state().interaction, InteractionMode::Help));
        app.handle_key(key(KeyCode::Char('j')));
        assert!(matches!(app.state().interaction, InteractionMode::Normal));
    }
}
