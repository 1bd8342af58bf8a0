//! Role capabilities
//!
//! One pure function maps a role to everything it can reach; the CLI and TUI
//! gate on the returned descriptor instead of scattering role conditionals.

use trainapi::Role;

/// Views reachable from the top level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Day plans of everyone visible to the role
    DayPlans,
    /// Trainee roster
    Roster,
}

/// What a role can see and do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Reachable top-level views
    pub views: &'static [ViewKind],

    /// May author plans for selected trainees (bulk creation)
    pub can_create_for_others: bool,

    /// May author their own plan
    pub can_self_author: bool,

    /// May approve/reject submitted plans
    pub can_review: bool,

    /// May delete plans
    pub can_delete: bool,
}

impl Capabilities {
    /// Whether the role can author plans at all
    pub fn can_create(&self) -> bool {
        self.can_create_for_others || self.can_self_author
    }

    /// Whether the roster view is reachable
    pub fn can_view_roster(&self) -> bool {
        self.views.contains(&ViewKind::Roster)
    }
}

/// Map a role to its capability descriptor
pub fn capabilities(role: Role) -> Capabilities {
    match role {
        Role::Admin => Capabilities {
            views: &[ViewKind::DayPlans, ViewKind::Roster],
            can_create_for_others: true,
            can_self_author: false,
            can_review: true,
            can_delete: true,
        },
        Role::Trainer => Capabilities {
            views: &[ViewKind::DayPlans, ViewKind::Roster],
            can_create_for_others: true,
            can_self_author: false,
            can_review: true,
            can_delete: true,
        },
        Role::MasterTrainer => Capabilities {
            views: &[ViewKind::DayPlans, ViewKind::Roster],
            can_create_for_others: false,
            can_self_author: false,
            can_review: true,
            can_delete: false,
        },
        Role::Trainee => Capabilities {
            views: &[ViewKind::DayPlans],
            can_create_for_others: false,
            can_self_author: true,
            can_review: false,
            can_delete: false,
        },
        Role::Boa => Capabilities {
            views: &[ViewKind::DayPlans],
            can_create_for_others: false,
            can_self_author: false,
            can_review: false,
            can_delete: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainer_capabilities() {
        let caps = capabilities(Role::Trainer);
        assert!(caps.can_create_for_others);
        assert!(!caps.can_self_author);
        assert!(caps.can_review);
        assert!(caps.can_delete);
        assert!(caps.can_view_roster());
    }

    #[test]
    fn test_trainee_capabilities() {
        let caps = capabilities(Role::Trainee);
        assert!(!caps.can_create_for_others);
        assert!(caps.can_self_author);
        assert!(caps.can_create());
        assert!(!caps.can_review);
        assert!(!caps.can_delete);
        assert!(!caps.can_view_roster());
    }

    #[test]
    fn test_master_trainer_reviews_without_authoring() {
        let caps = capabilities(Role::MasterTrainer);
        assert!(caps.can_review);
        assert!(!caps.can_create());
        assert!(!caps.can_delete);
    }

    #[test]
    fn test_boa_is_read_only() {
        let caps = capabilities(Role::Boa);
        assert!(!caps.can_create());
        assert!(!caps.can_review);
        assert!(!caps.can_delete);
        assert_eq!(caps.views, &[ViewKind::DayPlans]);
    }
}
