//! JWT claims carried by a console session token.

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// The console only needs the actor's identity and role; everything else
/// the viewer may do is derived from the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Display name of the actor
    pub name: String,
    /// Role tag of the actor
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
