//! # Userdesk Config
//!
//! Configuration types for the Userdesk console, loaded from environment
//! variables with defaults:
//!
//! - [`console`]: Search debounce, page size, token storage and data file
//! - [`jwt`]: Secret and expiry of session tokens
//!
//! # Example
//!
//! ```ignore
//! use userdesk_config::{ConsoleConfig, JwtConfig};
//!
//! let console = ConsoleConfig::from_env();
//! let jwt = JwtConfig::from_env();
//! ```

pub mod console;
pub mod jwt;

pub use console::ConsoleConfig;
pub use jwt::JwtConfig;
