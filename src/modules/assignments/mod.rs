pub mod controller;
pub mod model;
pub mod service;

pub use model::*;
pub use service::{ASSIGNMENT_RULES, AssignmentRule, AssignmentService, assignment_workflow, row_actions};
