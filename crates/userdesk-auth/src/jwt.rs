//! Session token creation and verification.
//!
//! # Example
//!
//! ```ignore
//! use userdesk_auth::{create_access_token, verify_token};
//! use userdesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "Ana", Role::Manager, &config)?;
//! let claims = verify_token(token.as_str(), &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use userdesk_config::JwtConfig;
use userdesk_core::ConsoleError;
use userdesk_models::{Role, UserId};

use crate::claims::Claims;
use crate::session::AuthToken;

/// Issues a session token for `user_id` acting as `role`.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: UserId,
    name: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<AuthToken, ConsoleError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry).max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        role: role.as_str().to_string(),
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map(AuthToken::new)
    .map_err(|e| ConsoleError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// Returns an authentication error when the token is malformed, expired or
/// signed with a different secret.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, ConsoleError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ConsoleError::unauthenticated("Invalid or expired token"))
}
