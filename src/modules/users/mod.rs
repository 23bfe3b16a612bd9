pub mod controller;
pub mod model;
pub mod service;

pub use controller::UsersPage;
pub use model::*;
pub use service::{VIEWER_SCOPES, ViewerScope, filter_users, fetch_filters, visible_roles};
