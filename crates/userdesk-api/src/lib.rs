//! # Userdesk API
//!
//! The remote collaborator the console delegates every fetch and mutation to.
//!
//! - [`client`]: The [`UserApi`] contract, [`ApiResponse`] envelope and [`ApiError`]
//! - [`memory`]: [`MemoryApi`], an in-memory backend with JSON snapshots
//!
//! # Example
//!
//! ```ignore
//! use userdesk_api::{MemoryApi, UserApi};
//! use userdesk_config::JwtConfig;
//! use userdesk_models::UserFilterParams;
//!
//! let api = MemoryApi::new(JwtConfig::from_env());
//! let users = api.fetch_users(1, 100, &UserFilterParams::default()).await?.into_data()?;
//! ```

pub mod client;
pub mod memory;

// Re-export commonly used types at crate root
pub use client::{ApiError, ApiResponse, ApiResult, UserApi};
pub use memory::{MemoryApi, Place, Snapshot, StoredUser};
