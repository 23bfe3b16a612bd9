//! # Userdesk Core
//!
//! Core types, errors, and utilities for the Userdesk console.
//!
//! - [`errors`]: Console error taxonomy and field-level validation messages
//! - [`pagination`]: Page selection for user list fetches
//! - [`password`]: Password policy and hashing
//! - [`serde`]: Lenient deserialization helpers for API payloads
//!
//! # Example
//!
//! ```ignore
//! use userdesk_core::errors::ConsoleError;
//! use userdesk_core::password::validate_password;
//!
//! validate_password("Secur3!pass")?;
//! let error = ConsoleError::not_found("User no longer exists");
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{ConsoleError, ErrorKind, FieldErrors};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, validate_password, verify_password};
