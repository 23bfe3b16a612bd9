use serde::Serialize;

use userdesk_core::{ConsoleError, ErrorKind, FieldErrors};
use userdesk_models::{RoleFilter, UserId, UserRecord};

use crate::modules::assignments::model::{RowActions, Workflow};

/// A visible list row with the controls it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub user: UserRecord,
    pub actions: RowActions,
}

/// Mutating actions guarded against duplicate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Edit,
    Delete,
    Assign(Workflow),
}

/// Outcome of a submit trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    /// The call was made and the list refetched.
    Completed(T),
    /// The same action was already in flight; nothing happened.
    Ignored,
}

impl<T> Submission<T> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Submission::Ignored)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Submission::Completed(value) => Some(value),
            Submission::Ignored => None,
        }
    }
}

/// A delete waiting for the viewer's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub user_id: UserId,
    pub name: String,
}

/// Dismissable message describing the last failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl From<&ConsoleError> for ErrorNotice {
    fn from(err: &ConsoleError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            fields: err.field_errors().cloned(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PageState {
    pub users: Vec<UserRecord>,
    pub search: String,
    pub role_filter: RoleFilter,
    pub pending_delete: Option<PendingDelete>,
    pub last_error: Option<ErrorNotice>,
}
