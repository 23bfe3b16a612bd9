//! Assignment rules and workflow plumbing.
//!
//! [`ASSIGNMENT_RULES`] is the only place that decides which viewer may
//! assign which role. Everything else (row controls, form submission checks)
//! asks [`assignment_workflow`].

use std::collections::HashMap;

use tracing::debug;

use userdesk_api::UserApi;
use userdesk_auth::AuthToken;
use userdesk_core::{ConsoleError, FieldErrors};
use userdesk_models::{
    AssignAcademicCoordinatorRequest, AssignCenterAdminRequest, AssignFinancialPartnerRequest,
    AssignManagerRequest, AssignStateAdminRequest, AssignTeacherRequest, LookupEntry, LookupKind,
    Role, UserRecord,
};

use crate::modules::assignments::model::{
    AssignmentForm, AssignmentRequest, RowActions, SelectionField, SelectionSlot, Workflow,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRule {
    pub viewer: Role,
    pub target: Role,
    pub workflow: Workflow,
}

const fn rule(viewer: Role, target: Role, workflow: Workflow) -> AssignmentRule {
    AssignmentRule {
        viewer,
        target,
        workflow,
    }
}

/// (viewer, target role) pairs that offer an assignment. Every rule applies
/// to unassigned targets only.
pub const ASSIGNMENT_RULES: &[AssignmentRule] = &[
    rule(Role::Manager, Role::State, Workflow::StateAdmin),
    rule(Role::Admin, Role::State, Workflow::StateAdmin),
    rule(Role::Manager, Role::Center, Workflow::CenterAdmin),
    rule(Role::Admin, Role::Center, Workflow::CenterAdmin),
    rule(Role::Admin, Role::Academic, Workflow::AcademicToManager),
    rule(Role::Admin, Role::Manager, Workflow::ActivateManager),
    rule(Role::Admin, Role::Financial, Workflow::FinancialToManager),
    rule(Role::Academic, Role::Teacher, Workflow::TeacherToCenter),
];

/// Workflow an unassigned `target` row offers to `viewer`, if any.
pub fn assignment_workflow(viewer: Role, target: Role, assigned: bool) -> Option<Workflow> {
    if assigned {
        return None;
    }
    ASSIGNMENT_RULES
        .iter()
        .find(|r| r.viewer == viewer && r.target == target)
        .map(|r| r.workflow)
}

pub fn row_actions(viewer: Role, user: &UserRecord) -> RowActions {
    RowActions {
        assign: assignment_workflow(viewer, user.role, user.status),
        delete: !user.status,
        edit: true,
    }
}

pub struct AssignmentService;

impl AssignmentService {
    /// Builds the form for `workflow` on `target` from the fetched lookups.
    ///
    /// Slot lookups drop entries that already have an admin; parent lookups
    /// (managers, coordinators, a teacher's center) offer every entry.
    pub fn build_form(
        workflow: Workflow,
        target: &UserRecord,
        lookups: &HashMap<LookupKind, Vec<LookupEntry>>,
    ) -> AssignmentForm {
        let fields = workflow
            .slots()
            .iter()
            .map(|&slot| SelectionField {
                slot,
                options: lookups
                    .get(&slot.lookup())
                    .map(|entries| {
                        entries
                            .iter()
                            .filter(|e| !(slot.only_unassigned() && e.assigned))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default(),
                selected: None,
            })
            .collect();

        AssignmentForm {
            workflow,
            target: target.id,
            target_name: target.display_name().to_string(),
            fields,
        }
    }

    /// Loads every lookup `workflow` needs and builds its form.
    pub async fn load_form<A: UserApi + ?Sized>(
        api: &A,
        workflow: Workflow,
        target: &UserRecord,
    ) -> Result<AssignmentForm, ConsoleError> {
        let mut lookups = HashMap::new();
        for slot in workflow.slots() {
            let kind = slot.lookup();
            if lookups.contains_key(&kind) {
                continue;
            }
            let entries = api.lookup(kind).await?.into_data()?;
            debug!(%kind, count = entries.len(), "Lookup loaded");
            lookups.insert(kind, entries);
        }
        Ok(Self::build_form(workflow, target, &lookups))
    }

    /// Turns a completed form into its request.
    ///
    /// # Errors
    ///
    /// Validation error naming every slot without a selection or with one
    /// that is not among its options.
    pub fn build_request(form: &AssignmentForm) -> Result<AssignmentRequest, ConsoleError> {
        let mut errors = FieldErrors::new();
        for field in &form.fields {
            if field.selected().is_none() {
                errors.add(
                    field.slot.field(),
                    format!("Select a {}", field.slot.label()),
                );
            } else if !field.selection_offered() {
                errors.add(
                    field.slot.field(),
                    format!("The selected {} is not available", field.slot.label()),
                );
            }
        }
        errors.into_result()?;

        // Every slot has a selection past this point.
        let pick = |slot: SelectionSlot| form.selected(slot).unwrap_or_default();
        let user_id = form.target;

        let request = match form.workflow {
            Workflow::StateAdmin => AssignmentRequest::StateAdmin(AssignStateAdminRequest {
                state_id: pick(SelectionSlot::AdminState).into(),
                user_id,
                academic_coordinator_id: Some(pick(SelectionSlot::AcademicCoordinator).into()),
            }),
            Workflow::CenterAdmin => AssignmentRequest::CenterAdmin(AssignCenterAdminRequest {
                center_id: pick(SelectionSlot::AdminCenter).into(),
                user_id,
            }),
            Workflow::AcademicToManager => {
                AssignmentRequest::AcademicCoordinator(AssignAcademicCoordinatorRequest {
                    user_id,
                    manager_id: pick(SelectionSlot::Manager).into(),
                })
            }
            Workflow::ActivateManager => {
                AssignmentRequest::Manager(AssignManagerRequest { user_id })
            }
            Workflow::FinancialToManager => {
                AssignmentRequest::FinancialPartner(AssignFinancialPartnerRequest {
                    user_id,
                    manager_id: pick(SelectionSlot::Manager).into(),
                })
            }
            Workflow::TeacherToCenter => AssignmentRequest::Teacher(AssignTeacherRequest {
                user_id,
                center_id: pick(SelectionSlot::Center).into(),
            }),
        };
        Ok(request)
    }

    /// Issues the one API call `request` maps to.
    pub async fn dispatch<A: UserApi + ?Sized>(
        api: &A,
        request: &AssignmentRequest,
        token: &AuthToken,
    ) -> Result<UserRecord, ConsoleError> {
        let response = match request {
            AssignmentRequest::Teacher(r) => api.assign_teacher(r, token).await?,
            AssignmentRequest::AcademicCoordinator(r) => {
                api.assign_academic_coordinator(r, token).await?
            }
            AssignmentRequest::Manager(r) => api.assign_manager(r, token).await?,
            AssignmentRequest::FinancialPartner(r) => {
                api.assign_financial_partner(r, token).await?
            }
            AssignmentRequest::StateAdmin(r) => api.assign_state_admin(r, token).await?,
            AssignmentRequest::CenterAdmin(r) => api.assign_center_admin(r, token).await?,
        };
        Ok(response.into_data()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_core::ErrorKind;
    use userdesk_models::{CenterId, UserId};
    use uuid::Uuid;

    fn lookups() -> HashMap<LookupKind, Vec<LookupEntry>> {
        HashMap::from([
            (
                LookupKind::Centers,
                vec![
                    LookupEntry::new(CenterId::from_u128(1), "North", true),
                    LookupEntry::new(CenterId::from_u128(2), "South", false),
                ],
            ),
            (
                LookupKind::Managers,
                vec![LookupEntry::new(UserId::from_u128(3), "Mo", true)],
            ),
        ])
    }

    #[test]
    fn test_assigned_targets_offer_nothing() {
        for rule in ASSIGNMENT_RULES {
            assert_eq!(assignment_workflow(rule.viewer, rule.target, true), None);
        }
    }

    #[test]
    fn test_rules_are_unique_per_pair() {
        for (i, a) in ASSIGNMENT_RULES.iter().enumerate() {
            for b in &ASSIGNMENT_RULES[i + 1..] {
                assert!(!(a.viewer == b.viewer && a.target == b.target));
            }
        }
    }

    #[test]
    fn test_rule_targets_match_workflow() {
        for rule in ASSIGNMENT_RULES {
            assert_eq!(rule.workflow.target_role(), rule.target);
        }
    }

    #[test]
    fn test_row_actions_for_assigned_row() {
        let mut user = UserRecord::new("m", Role::Manager);
        user.status = true;
        let actions = row_actions(Role::Admin, &user);
        assert_eq!(actions.assign, None);
        assert!(!actions.delete);
        assert!(actions.edit);
    }

    #[test]
    fn test_admin_center_slot_hides_taken_centers() {
        let target = UserRecord::new("c", Role::Center);
        let form = AssignmentService::build_form(Workflow::CenterAdmin, &target, &lookups());
        let options = form.options(SelectionSlot::AdminCenter);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "South");
    }

    #[test]
    fn test_teacher_center_offers_every_center() {
        let target = UserRecord::new("t", Role::Teacher);
        let form = AssignmentService::build_form(Workflow::TeacherToCenter, &target, &lookups());
        assert_eq!(form.options(SelectionSlot::Center).len(), 2);
        assert!(form.can_submit());
    }

    #[test]
    fn test_missing_lookup_reports_empty_options() {
        let target = UserRecord::new("s", Role::State);
        let form = AssignmentService::build_form(Workflow::StateAdmin, &target, &lookups());
        assert!(!form.can_submit());
        assert_eq!(form.empty_options().len(), 2);
        assert_eq!(
            form.empty_options()[0].to_string(),
            "No state without an admin available"
        );
    }

    #[test]
    fn test_build_request_requires_selection() {
        let target = UserRecord::new("a", Role::Academic);
        let mut form =
            AssignmentService::build_form(Workflow::AcademicToManager, &target, &lookups());

        let err = AssignmentService::build_request(&form).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.field_errors().unwrap().contains("manager_id"));

        assert!(form.select(SelectionSlot::Manager, Uuid::from_u128(3)));
        let request = AssignmentService::build_request(&form).unwrap();
        assert_eq!(
            request,
            AssignmentRequest::AcademicCoordinator(AssignAcademicCoordinatorRequest {
                user_id: target.id,
                manager_id: UserId::from_u128(3),
            })
        );
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let target = UserRecord::new("c", Role::Center);
        let mut form = AssignmentService::build_form(Workflow::CenterAdmin, &target, &lookups());
        assert!(!form.select(SelectionSlot::AdminCenter, Uuid::from_u128(1)));
        assert!(!form.select(SelectionSlot::Manager, Uuid::from_u128(3)));
        assert_eq!(form.selected(SelectionSlot::AdminCenter), None);
    }

    #[test]
    fn test_build_request_rejects_selection_outside_options() {
        let target = UserRecord::new("c", Role::Center);
        let mut form = AssignmentService::build_form(Workflow::CenterAdmin, &target, &lookups());
        // North already has an admin and is not offered.
        form.fields[0].selected = Some(Uuid::from_u128(1));

        let err = AssignmentService::build_request(&form).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.field_errors().unwrap().get("center_id").unwrap(),
            &["The selected center is not available".to_string()]
        );

        assert!(form.select(SelectionSlot::AdminCenter, Uuid::from_u128(2)));
        assert!(AssignmentService::build_request(&form).is_ok());
    }

    #[test]
    fn test_activate_manager_needs_no_selection() {
        let target = UserRecord::new("m", Role::Manager);
        let form = AssignmentService::build_form(Workflow::ActivateManager, &target, &lookups());
        assert!(form.can_submit());
        assert_eq!(
            AssignmentService::build_request(&form).unwrap(),
            AssignmentRequest::Manager(AssignManagerRequest { user_id: target.id })
        );
    }
}
