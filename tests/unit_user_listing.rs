mod common;

use common::user;
use userdesk::modules::users::service::{filter_users, visible_roles};
use userdesk_models::{Role, RoleFilter, UserRecord};

/// A mixed list: every role, assigned and unassigned rows interleaved, a
/// few records without a name.
fn sample_users() -> Vec<UserRecord> {
    let names = ["Ada", "bruno", "Carla", "dmitri", "Eve", "ana maria"];
    (0..48)
        .map(|i| {
            let role = Role::ALL[i % Role::ALL.len()];
            let name = if i % 11 == 5 {
                None
            } else {
                Some(format!("{} {}", names[i % names.len()], i))
            };
            user(name.as_deref(), role, (i * 7) % 3 == 0)
        })
        .collect()
}

fn filters() -> Vec<RoleFilter> {
    let mut filters = vec![RoleFilter::All, RoleFilter::parse("ALL"), RoleFilter::parse("nope")];
    filters.extend(Role::ALL.into_iter().map(RoleFilter::Only));
    filters
}

#[test]
fn test_filtering_is_idempotent() {
    let users = sample_users();
    for viewer in Role::ALL {
        for filter in filters() {
            for search in ["", "a", "ANA", "  "] {
                let once = filter_users(&users, search, &filter, viewer);
                let twice = filter_users(&once, search, &filter, viewer);
                assert_eq!(once, twice);
            }
        }
    }
}

#[test]
fn test_academic_viewer_sees_only_teachers() {
    let users = sample_users();
    for filter in filters() {
        let rows = filter_users(&users, "", &filter, Role::Academic);
        assert!(rows.iter().all(|u| u.role == Role::Teacher));
    }
    let rows = filter_users(&users, "", &RoleFilter::All, Role::Academic);
    assert_eq!(rows.len(), users.iter().filter(|u| u.role == Role::Teacher).count());
}

#[test]
fn test_manager_viewer_scope() {
    assert_eq!(visible_roles(Role::Manager), Some(&[Role::State, Role::Center][..]));
    let users = sample_users();
    let rows = filter_users(&users, "", &RoleFilter::parse("teacher"), Role::Manager);
    assert!(rows.is_empty());
    let rows = filter_users(&users, "", &RoleFilter::parse("Center"), Role::Manager);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|u| u.role == Role::Center));
}

#[test]
fn test_unassigned_rows_come_first_in_fetch_order() {
    let users = sample_users();
    for viewer in Role::ALL {
        let rows = filter_users(&users, "", &RoleFilter::All, viewer);

        let first_assigned = rows.iter().position(|u| u.status).unwrap_or(rows.len());
        assert!(rows[first_assigned..].iter().all(|u| u.status));

        for group in [&rows[..first_assigned], &rows[first_assigned..]] {
            let positions: Vec<usize> = group
                .iter()
                .map(|row| users.iter().position(|u| u.id == row.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_search_matches_names_only() {
    let users = vec![
        user(Some("Ana Lopez"), Role::Teacher, false),
        user(None, Role::Teacher, false),
        user(Some("Bruno"), Role::Teacher, true),
    ];

    let rows = filter_users(&users, "ana", &RoleFilter::All, Role::Admin);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("Ana Lopez"));

    let rows = filter_users(&users, "", &RoleFilter::All, Role::Admin);
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_role_filter_is_case_insensitive() {
    let users = sample_users();
    let lower = filter_users(&users, "", &RoleFilter::parse("teacher"), Role::Admin);
    let upper = filter_users(&users, "", &RoleFilter::parse("TEACHER"), Role::Admin);
    assert_eq!(lower, upper);
    assert!(!lower.is_empty());
}
