//! Assignment request payloads and lookup entries.
//!
//! Field names follow the API's camelCase wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ids::{CenterId, StateId, UserId};

/// Links a teacher to a center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeacherRequest {
    pub user_id: UserId,
    pub center_id: CenterId,
}

/// Links an academic coordinator to a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAcademicCoordinatorRequest {
    pub user_id: UserId,
    pub manager_id: UserId,
}

/// Confirms (activates) a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignManagerRequest {
    pub user_id: UserId,
}

/// Links a financial partner to a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignFinancialPartnerRequest {
    pub user_id: UserId,
    pub manager_id: UserId,
}

/// Makes a `state` user the admin of a state, with its academic coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStateAdminRequest {
    pub state_id: StateId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_coordinator_id: Option<UserId>,
}

/// Makes a `center` user the admin of a center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCenterAdminRequest {
    pub center_id: CenterId,
    pub user_id: UserId,
}

/// Reference lists the assignment workflows pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Managers,
    States,
    Centers,
    AcademicCoordinators,
}

impl LookupKind {
    pub fn label(self) -> &'static str {
        match self {
            LookupKind::Managers => "managers",
            LookupKind::States => "states",
            LookupKind::Centers => "centers",
            LookupKind::AcademicCoordinators => "academic coordinators",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable entry of a lookup list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: Uuid,
    pub name: String,
    /// For states and centers: already has an admin. For users: status.
    #[serde(default)]
    pub assigned: bool,
}

impl LookupEntry {
    pub fn new(id: impl Into<Uuid>, name: impl Into<String>, assigned: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            assigned,
        }
    }
}
