//! # Userdesk Models
//!
//! Domain models and DTOs for the Userdesk console.
//!
//! # Modules
//!
//! - [`assignments`]: Assignment request payloads and lookup entries
//! - [`ids`]: Strongly-typed IDs for users, states and centers
//! - [`roles`]: The closed role set and the list role filter
//! - [`users`]: User records and create/edit/filter DTOs
//!
//! # Example
//!
//! ```ignore
//! use userdesk_models::{Role, RoleFilter, UserRecord};
//!
//! let record = UserRecord::new("Ana", Role::Manager);
//! assert!(RoleFilter::parse("manager").admits(record.role));
//! ```

pub mod assignments;
pub mod ids;
pub mod roles;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use assignments::{
    AssignAcademicCoordinatorRequest, AssignCenterAdminRequest, AssignFinancialPartnerRequest,
    AssignManagerRequest, AssignStateAdminRequest, AssignTeacherRequest, LookupEntry, LookupKind,
};
pub use ids::{CenterId, StateId, UserId};
pub use roles::{Role, RoleFilter, RoleParseError};
pub use users::{CreateUserDto, EditUserDto, UserFilterParams, UserRecord};
