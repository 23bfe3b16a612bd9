//! # Userdesk
//!
//! Role-based user management console core: the logic behind a page that
//! lists, searches, filters, creates, edits, deletes and assigns users across
//! a small role hierarchy.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Offline CLI support (snapshot workspace, seeding)
//! ├── modules/          # Feature modules
//! │   ├── permissions/ # Role -> creatable roles table
//! │   ├── assignments/ # Assignment rules, forms and submission
//! │   └── users/       # List filtering and the UsersPage orchestrator
//! └── utils/           # Debounce and in-flight guards
//! ```
//!
//! Workspace crates:
//!
//! - `userdesk-core`: Error taxonomy, password policy, pagination
//! - `userdesk-config`: Environment-driven configuration
//! - `userdesk-models`: Roles, user records, request payloads
//! - `userdesk-auth`: Session tokens, token storage, the explicit [`Session`](userdesk_auth::Session)
//! - `userdesk-api`: The `UserApi` contract and the in-memory backend
//!
//! ## Role Hierarchy
//!
//! | Role | May create | May assign |
//! |------|------------|------------|
//! | admin | every role except admin | state, center, academic, manager, financial |
//! | manager | state, center | state, center |
//! | academic | teacher | teacher |
//! | others | nothing | nothing |
//!
//! A user starts unassigned, becomes assigned through exactly one workflow,
//! and can only be deleted while unassigned.
//!
//! ## Data Flow
//!
//! ```text
//! UserApi -> fetched list -> filter_users -> rows -> row action
//!        -> assignment rules -> workflow form -> UserApi mutation -> refetch
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! cargo run --bin userdesk-cli -- seed
//! cargo run --bin userdesk-cli -- login --name admin
//! cargo run --bin userdesk-cli -- list --role manager
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Offline administration helpers
//! - [`logging`]: Console tracing setup
//! - [`modules`]: Feature modules (permissions, assignments, users)
//! - [`utils`]: Shared utilities (debounce, in-flight guards)

pub mod cli;
pub mod logging;
pub mod modules;
pub mod utils;

// Re-export workspace crates for convenience
pub use userdesk_api;
pub use userdesk_auth;
pub use userdesk_config;
pub use userdesk_core;
pub use userdesk_models;
