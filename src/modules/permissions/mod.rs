pub mod service;

pub use service::{can_create, creatable_roles, creatable_roles_for_tag};
