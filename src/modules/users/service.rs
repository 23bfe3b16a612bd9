//! Client-side filtering of the fetched user list.
//!
//! The visible rows are always recomputed here from the full fetched list,
//! whatever the server already filtered.

use userdesk_models::{Role, RoleFilter, UserFilterParams, UserRecord};

/// Roles a viewer is limited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerScope {
    pub viewer: Role,
    pub visible: &'static [Role],
}

/// Viewers not listed here see every role.
pub const VIEWER_SCOPES: &[ViewerScope] = &[
    ViewerScope {
        viewer: Role::Academic,
        visible: &[Role::Teacher],
    },
    ViewerScope {
        viewer: Role::Manager,
        visible: &[Role::State, Role::Center],
    },
];

/// Roles `viewer` is restricted to, or `None` when unrestricted.
pub fn visible_roles(viewer: Role) -> Option<&'static [Role]> {
    VIEWER_SCOPES
        .iter()
        .find(|scope| scope.viewer == viewer)
        .map(|scope| scope.visible)
}

pub fn is_visible_to(viewer: Role, role: Role) -> bool {
    visible_roles(viewer).is_none_or(|roles| roles.contains(&role))
}

/// Case-insensitive substring match on the display name. A blank term
/// matches everyone; a record without a name matches no other term.
pub fn matches_search(user: &UserRecord, search: &str) -> bool {
    let term = search.trim();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    user.name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(&term))
}

/// Rows `viewer` sees for the given search term and role filter, unassigned
/// first, fetch order kept within each group.
pub fn filter_users(
    users: &[UserRecord],
    search: &str,
    role_filter: &RoleFilter,
    viewer: Role,
) -> Vec<UserRecord> {
    let (unassigned, assigned): (Vec<&UserRecord>, Vec<&UserRecord>) = users
        .iter()
        .filter(|u| is_visible_to(viewer, u.role))
        .filter(|u| role_filter.admits(u.role))
        .filter(|u| matches_search(u, search))
        .partition(|u| !u.status);

    unassigned.into_iter().chain(assigned).cloned().collect()
}

/// Query parameters sent with the list fetch.
///
/// The whole list is requested in one page. Viewers scoped to a single role
/// ask the server for that role; the search term is applied locally.
pub fn fetch_filters(viewer: Role, page_size: i64) -> UserFilterParams {
    let role = match visible_roles(viewer) {
        Some([only]) => Some(*only),
        _ => None,
    };
    UserFilterParams {
        search: None,
        role,
        pagination: Some(false),
        limit: Some(page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, role: Role, status: bool) -> UserRecord {
        let mut user = UserRecord::new("x", role);
        user.name = name.map(str::to_string);
        user.status = status;
        user
    }

    #[test]
    fn test_nameless_records_only_match_blank_search() {
        let nameless = user(None, Role::Teacher, false);
        assert!(matches_search(&nameless, ""));
        assert!(matches_search(&nameless, "   "));
        assert!(!matches_search(&nameless, "a"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let ana = user(Some("Ana Lopez"), Role::Teacher, false);
        assert!(matches_search(&ana, "LOP"));
        assert!(!matches_search(&ana, "bob"));
    }

    #[test]
    fn test_manager_scope_excludes_teachers() {
        let users = vec![
            user(Some("t"), Role::Teacher, false),
            user(Some("s"), Role::State, false),
        ];
        let rows = filter_users(&users, "", &RoleFilter::parse("teacher"), Role::Manager);
        assert!(rows.is_empty());
        let rows = filter_users(&users, "", &RoleFilter::All, Role::Manager);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, Role::State);
    }

    #[test]
    fn test_unknown_role_filter_matches_nothing() {
        let users = vec![user(Some("t"), Role::Teacher, false)];
        let rows = filter_users(&users, "", &RoleFilter::parse("wizard"), Role::Admin);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_fetch_filters_per_viewer() {
        assert_eq!(fetch_filters(Role::Academic, 50).role, Some(Role::Teacher));
        assert_eq!(fetch_filters(Role::Manager, 50).role, None);
        let admin = fetch_filters(Role::Admin, 50);
        assert_eq!(admin.role, None);
        assert_eq!(admin.pagination, Some(false));
        assert_eq!(admin.limit, Some(50));
    }
}
