//! User records and DTOs.
//!
//! A [`UserRecord`] is created unassigned (`status == false`), becomes
//! assigned once its role-specific relation is set, and may only be deleted
//! while still unassigned. Its role never changes through this console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use userdesk_core::serde::{deserialize_flag, deserialize_optional_uuid};

use crate::ids::{CenterId, StateId, UserId};
use crate::roles::Role;

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Display name used for search. Some legacy records have none.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    /// `true` once the role-specific assignment has been made.
    #[serde(deserialize_with = "deserialize_flag")]
    pub status: bool,
    pub created_at: DateTime<Utc>,
    /// State administered by a `state` user.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub state_id: Option<StateId>,
    /// Center administered by a `center` user, or a teacher's center.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub center_id: Option<CenterId>,
    /// Managing user of an academic coordinator or financial partner.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub manager_id: Option<UserId>,
    /// Academic coordinator attached to a `state` user.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub academic_coordinator_id: Option<UserId>,
}

impl UserRecord {
    /// A fresh, unassigned record.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        Self {
            id: UserId::new(),
            full_name: Some(name.clone()),
            name: Some(name),
            role,
            status: false,
            created_at: Utc::now(),
            state_id: None,
            center_id: None,
            manager_id: None,
            academic_coordinator_id: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.status
    }

    /// Name shown in lists and confirmation prompts.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(custom(function = "userdesk_core::password::validate_password_policy"))]
    pub password: String,
    pub role: Role,
}

/// Payload for editing a user. Absent fields are left unchanged; the role
/// cannot be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EditUserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "userdesk_core::password::validate_password_policy"))]
    pub password: Option<String>,
}

impl EditUserDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.full_name.is_none() && self.password.is_none()
    }
}

/// Filters sent with a user list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserFilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// `Some(false)` asks for the whole list in a single page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(password: &str) -> CreateUserDto {
        CreateUserDto {
            name: "jdoe".to_string(),
            full_name: "Jane Doe".to_string(),
            password: password.to_string(),
            role: Role::Teacher,
        }
    }

    #[test]
    fn test_create_dto_accepts_policy_password() {
        assert!(create_dto("Secur3!pass").validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_weak_password() {
        let errors = create_dto("password").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_create_dto_requires_names() {
        let mut dto = create_dto("Secur3!pass");
        dto.name.clear();
        dto.full_name.clear();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("full_name"));
    }

    #[test]
    fn test_edit_dto_skips_absent_password() {
        let dto = EditUserDto {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let dto = EditUserDto {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_record_deserializes_loose_payload() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789abc",
            "name": null,
            "role": "Center",
            "status": "false",
            "created_at": "2024-03-01T10:00:00Z",
            "center_id": ""
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.role, Role::Center);
        assert!(!record.status);
        assert!(record.center_id.is_none());
        assert_eq!(record.display_name(), "(unnamed)");
    }

    #[test]
    fn test_new_record_is_unassigned() {
        let record = UserRecord::new("Ana", Role::Manager);
        assert!(!record.is_assigned());
        assert_eq!(record.display_name(), "Ana");
    }

    #[test]
    fn test_filter_params_skip_empty_fields() {
        let params = UserFilterParams {
            role: Some(Role::Teacher),
            pagination: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"role":"teacher","pagination":false}"#);
    }
}
