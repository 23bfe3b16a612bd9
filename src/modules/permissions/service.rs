//! Which roles an actor may create.

use userdesk_models::Role;

const ADMIN_CREATES: &[Role] = &[
    Role::Manager,
    Role::Financial,
    Role::Academic,
    Role::State,
    Role::Center,
    Role::Teacher,
    Role::CardAdmin,
];
const MANAGER_CREATES: &[Role] = &[Role::State, Role::Center];
const ACADEMIC_CREATES: &[Role] = &[Role::Teacher];

/// Roles `actor` may create, in display order.
pub fn creatable_roles(actor: Role) -> &'static [Role] {
    match actor {
        Role::Admin => ADMIN_CREATES,
        Role::Manager => MANAGER_CREATES,
        Role::Academic => ACADEMIC_CREATES,
        Role::Financial | Role::State | Role::Center | Role::Teacher | Role::CardAdmin => &[],
    }
}

/// Same as [`creatable_roles`] for an untyped role tag. Unknown tags may
/// create nothing.
pub fn creatable_roles_for_tag(tag: &str) -> &'static [Role] {
    tag.parse::<Role>().map(creatable_roles).unwrap_or(&[])
}

pub fn can_create(actor: Role, role: Role) -> bool {
    creatable_roles(actor).contains(&role)
}
