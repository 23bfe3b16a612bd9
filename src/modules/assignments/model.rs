use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use userdesk_models::{
    AssignAcademicCoordinatorRequest, AssignCenterAdminRequest, AssignFinancialPartnerRequest,
    AssignManagerRequest, AssignStateAdminRequest, AssignTeacherRequest, LookupEntry, LookupKind,
    Role, UserId,
};

/// Assignment workflow offered on an unassigned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Give a `state` user a state to administer, plus an academic coordinator.
    StateAdmin,
    /// Give a `center` user a center to administer.
    CenterAdmin,
    /// Link an academic coordinator to a manager.
    AcademicToManager,
    /// Confirm a manager.
    ActivateManager,
    /// Link a financial partner to a manager.
    FinancialToManager,
    /// Link a teacher to a center.
    TeacherToCenter,
}

impl Workflow {
    pub const ALL: [Workflow; 6] = [
        Workflow::StateAdmin,
        Workflow::CenterAdmin,
        Workflow::AcademicToManager,
        Workflow::ActivateManager,
        Workflow::FinancialToManager,
        Workflow::TeacherToCenter,
    ];

    /// Role of the users this workflow assigns.
    pub const fn target_role(self) -> Role {
        match self {
            Workflow::StateAdmin => Role::State,
            Workflow::CenterAdmin => Role::Center,
            Workflow::AcademicToManager => Role::Academic,
            Workflow::ActivateManager => Role::Manager,
            Workflow::FinancialToManager => Role::Financial,
            Workflow::TeacherToCenter => Role::Teacher,
        }
    }

    /// Selections the viewer has to make before submitting.
    pub const fn slots(self) -> &'static [SelectionSlot] {
        match self {
            Workflow::StateAdmin => &[SelectionSlot::AdminState, SelectionSlot::AcademicCoordinator],
            Workflow::CenterAdmin => &[SelectionSlot::AdminCenter],
            Workflow::AcademicToManager | Workflow::FinancialToManager => &[SelectionSlot::Manager],
            Workflow::ActivateManager => &[],
            Workflow::TeacherToCenter => &[SelectionSlot::Center],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Workflow::StateAdmin => "Assign state admin",
            Workflow::CenterAdmin => "Assign center admin",
            Workflow::AcademicToManager => "Assign academic coordinator to manager",
            Workflow::ActivateManager => "Activate manager",
            Workflow::FinancialToManager => "Assign financial partner to manager",
            Workflow::TeacherToCenter => "Assign teacher to center",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selection inside an assignment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSlot {
    /// State the target will administer. Taken states are not offered.
    AdminState,
    /// Center the target will administer. Taken centers are not offered.
    AdminCenter,
    /// Center a teacher works at.
    Center,
    Manager,
    AcademicCoordinator,
}

impl SelectionSlot {
    pub const fn lookup(self) -> LookupKind {
        match self {
            SelectionSlot::AdminState => LookupKind::States,
            SelectionSlot::AdminCenter | SelectionSlot::Center => LookupKind::Centers,
            SelectionSlot::Manager => LookupKind::Managers,
            SelectionSlot::AcademicCoordinator => LookupKind::AcademicCoordinators,
        }
    }

    /// Whether entries that already have an admin are left out.
    pub const fn only_unassigned(self) -> bool {
        matches!(self, SelectionSlot::AdminState | SelectionSlot::AdminCenter)
    }

    /// Request field the selection fills, used for validation messages.
    pub const fn field(self) -> &'static str {
        match self {
            SelectionSlot::AdminState => "state_id",
            SelectionSlot::AdminCenter | SelectionSlot::Center => "center_id",
            SelectionSlot::Manager => "manager_id",
            SelectionSlot::AcademicCoordinator => "academic_coordinator_id",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SelectionSlot::AdminState => "state",
            SelectionSlot::AdminCenter | SelectionSlot::Center => "center",
            SelectionSlot::Manager => "manager",
            SelectionSlot::AcademicCoordinator => "academic coordinator",
        }
    }
}

/// Informational state shown instead of a selection list that has nothing
/// to offer. Submitting is disabled while any is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyOptions(pub SelectionSlot);

impl fmt::Display for EmptyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.lookup() {
            LookupKind::States | LookupKind::Centers if self.0.only_unassigned() => {
                write!(f, "No {} without an admin available", self.0.label())
            }
            kind => write!(f, "No {} available", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionField {
    pub slot: SelectionSlot,
    pub options: Vec<LookupEntry>,
    /// Only set through [`AssignmentForm::select`].
    pub(crate) selected: Option<Uuid>,
}

impl SelectionField {
    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Whether the selection, if any, is one of the offered options.
    pub fn selection_offered(&self) -> bool {
        self.selected
            .is_none_or(|id| self.options.iter().any(|o| o.id == id))
    }
}

/// An open assignment workflow for a single target row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentForm {
    pub workflow: Workflow,
    pub target: UserId,
    pub target_name: String,
    pub fields: Vec<SelectionField>,
}

impl AssignmentForm {
    pub fn field(&self, slot: SelectionSlot) -> Option<&SelectionField> {
        self.fields.iter().find(|f| f.slot == slot)
    }

    pub fn options(&self, slot: SelectionSlot) -> &[LookupEntry] {
        self.field(slot).map(|f| f.options.as_slice()).unwrap_or(&[])
    }

    pub fn selected(&self, slot: SelectionSlot) -> Option<Uuid> {
        self.field(slot).and_then(|f| f.selected)
    }

    /// Picks `id` for `slot`. Returns `false` when the form has no such slot
    /// or `id` is not one of its options.
    pub fn select(&mut self, slot: SelectionSlot, id: Uuid) -> bool {
        match self.fields.iter_mut().find(|f| f.slot == slot) {
            Some(field) if field.options.iter().any(|o| o.id == id) => {
                field.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self, slot: SelectionSlot) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.slot == slot) {
            field.selected = None;
        }
    }

    pub fn empty_options(&self) -> Vec<EmptyOptions> {
        self.fields
            .iter()
            .filter(|f| f.options.is_empty())
            .map(|f| EmptyOptions(f.slot))
            .collect()
    }

    /// Submit is enabled when every selection has something to choose from.
    pub fn can_submit(&self) -> bool {
        self.fields.iter().all(|f| !f.options.is_empty())
    }
}

/// Controls available on a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowActions {
    pub assign: Option<Workflow>,
    pub delete: bool,
    pub edit: bool,
}

/// The single mutating call a submitted form turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentRequest {
    Teacher(AssignTeacherRequest),
    AcademicCoordinator(AssignAcademicCoordinatorRequest),
    Manager(AssignManagerRequest),
    FinancialPartner(AssignFinancialPartnerRequest),
    StateAdmin(AssignStateAdminRequest),
    CenterAdmin(AssignCenterAdminRequest),
}

impl AssignmentRequest {
    pub fn user_id(&self) -> UserId {
        match self {
            AssignmentRequest::Teacher(r) => r.user_id,
            AssignmentRequest::AcademicCoordinator(r) => r.user_id,
            AssignmentRequest::Manager(r) => r.user_id,
            AssignmentRequest::FinancialPartner(r) => r.user_id,
            AssignmentRequest::StateAdmin(r) => r.user_id,
            AssignmentRequest::CenterAdmin(r) => r.user_id,
        }
    }
}
