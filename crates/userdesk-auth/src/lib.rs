//! # Userdesk Auth
//!
//! Session tokens and token storage for the Userdesk console.
//!
//! - [`claims`]: JWT claims carried by a session token
//! - [`jwt`]: Token creation and verification
//! - [`session`]: The explicit [`Session`] context and [`TokenStore`] backends
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use userdesk_auth::{FileTokenStore, Session};
//! use userdesk_config::{ConsoleConfig, JwtConfig};
//!
//! let console = ConsoleConfig::from_env();
//! let store = Arc::new(FileTokenStore::new(&console.token_file, &console.token_key));
//! let session = Session::restore(store, &JwtConfig::from_env())?;
//! println!("Signed in as {}", session.role());
//! ```

pub mod claims;
pub mod jwt;
pub mod session;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use session::{AuthToken, FileTokenStore, MemoryTokenStore, Session, TokenStore};
