pub mod assignments;
pub mod permissions;
pub mod users;

pub use self::assignments::model::{AssignmentForm, RowActions, Workflow};
pub use self::users::controller::UsersPage;
