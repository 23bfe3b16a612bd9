use userdesk::modules::permissions::{can_create, creatable_roles, creatable_roles_for_tag};
use userdesk_models::Role;

#[test]
fn test_permission_table() {
    assert_eq!(
        creatable_roles(Role::Admin),
        &[
            Role::Manager,
            Role::Financial,
            Role::Academic,
            Role::State,
            Role::Center,
            Role::Teacher,
            Role::CardAdmin,
        ]
    );
    assert_eq!(creatable_roles(Role::Manager), &[Role::State, Role::Center]);
    assert_eq!(creatable_roles(Role::Academic), &[Role::Teacher]);

    for role in [
        Role::Financial,
        Role::State,
        Role::Center,
        Role::Teacher,
        Role::CardAdmin,
    ] {
        assert!(creatable_roles(role).is_empty(), "{} creates nothing", role);
    }
}

#[test]
fn test_tags_are_case_insensitive() {
    for role in Role::ALL {
        assert_eq!(
            creatable_roles_for_tag(&role.as_str().to_uppercase()),
            creatable_roles(role)
        );
    }
}

#[test]
fn test_unknown_tag_yields_empty_set() {
    assert!(creatable_roles_for_tag("root").is_empty());
    assert!(creatable_roles_for_tag("card admin").is_empty());
}

#[test]
fn test_can_create_agrees_with_table() {
    for actor in Role::ALL {
        for role in Role::ALL {
            assert_eq!(
                can_create(actor, role),
                creatable_roles(actor).contains(&role)
            );
        }
    }
}
