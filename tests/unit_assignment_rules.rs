use userdesk::modules::assignments::model::Workflow;
use userdesk::modules::assignments::service::{assignment_workflow, row_actions};
use userdesk_models::{Role, UserRecord};

/// The decision table, written out pair by pair.
fn expected(viewer: Role, target: Role) -> Option<Workflow> {
    match (viewer, target) {
        (Role::Manager | Role::Admin, Role::State) => Some(Workflow::StateAdmin),
        (Role::Manager | Role::Admin, Role::Center) => Some(Workflow::CenterAdmin),
        (Role::Admin, Role::Academic) => Some(Workflow::AcademicToManager),
        (Role::Admin, Role::Manager) => Some(Workflow::ActivateManager),
        (Role::Admin, Role::Financial) => Some(Workflow::FinancialToManager),
        (Role::Academic, Role::Teacher) => Some(Workflow::TeacherToCenter),
        _ => None,
    }
}

#[test]
fn test_every_viewer_target_pair() {
    let mut offered = 0;
    for viewer in Role::ALL {
        for target in Role::ALL {
            assert_eq!(
                assignment_workflow(viewer, target, false),
                expected(viewer, target),
                "viewer {} target {}",
                viewer,
                target
            );
            assert_eq!(assignment_workflow(viewer, target, true), None);
            if expected(viewer, target).is_some() {
                offered += 1;
            }
        }
    }
    assert_eq!(offered, 8);
}

#[test]
fn test_row_actions_follow_status() {
    for viewer in Role::ALL {
        for target in Role::ALL {
            let mut user = UserRecord::new("row", target);

            let actions = row_actions(viewer, &user);
            assert_eq!(actions.assign, expected(viewer, target));
            assert!(actions.delete);
            assert!(actions.edit);

            user.status = true;
            let actions = row_actions(viewer, &user);
            assert_eq!(actions.assign, None);
            assert!(!actions.delete, "assigned rows never offer delete");
            assert!(actions.edit);
        }
    }
}

#[test]
fn test_workflows_cover_their_target_role() {
    for workflow in Workflow::ALL {
        let target = workflow.target_role();
        assert!(
            Role::ALL
                .into_iter()
                .any(|viewer| assignment_workflow(viewer, target, false) == Some(workflow))
        );
    }
}
