//! Password policy and hashing.
//!
//! A password is accepted only when it satisfies all five rules: at least
//! [`MIN_PASSWORD_LENGTH`] characters, an uppercase letter, a lowercase
//! letter, a digit, and one of [`SPECIAL_CHARACTERS`].

use std::borrow::Cow;

use bcrypt::{DEFAULT_COST, hash, verify};
use validator::ValidationError;

use crate::errors::{ConsoleError, FieldErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A single password rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::Uppercase,
        PasswordRule::Lowercase,
        PasswordRule::Digit,
        PasswordRule::Special,
    ];

    pub fn is_satisfied_by(self, password: &str) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= MIN_PASSWORD_LENGTH,
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MinLength => "Password must be at least 8 characters long",
            Self::Uppercase => "Password must contain an uppercase letter",
            Self::Lowercase => "Password must contain a lowercase letter",
            Self::Digit => "Password must contain a number",
            Self::Special => "Password must contain a special character",
        }
    }
}

/// Rules `password` fails, in rule order. Empty means the password is accepted.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    PasswordRule::ALL
        .into_iter()
        .filter(|rule| !rule.is_satisfied_by(password))
        .collect()
}

/// Checks `password` against the policy, reporting every failing rule
/// under the `password` field.
pub fn validate_password(password: &str) -> Result<(), ConsoleError> {
    let mut fields = FieldErrors::new();
    for rule in password_violations(password) {
        fields.add("password", rule.message());
    }
    fields.into_result()
}

/// `validator` custom hook for DTO fields holding a password.
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let violations = password_violations(password);
    if violations.is_empty() {
        return Ok(());
    }

    let message = violations
        .iter()
        .map(|rule| rule.message())
        .collect::<Vec<_>>()
        .join("; ");
    Err(ValidationError::new("password_policy").with_message(Cow::Owned(message)))
}

/// bcrypt cost used outside of tests.
pub const DEFAULT_HASH_COST: u32 = DEFAULT_COST;

pub fn hash_password(password: &str) -> Result<String, ConsoleError> {
    hash_password_with_cost(password, DEFAULT_HASH_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, ConsoleError> {
    hash(password, cost)
        .map_err(|e| ConsoleError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ConsoleError> {
    verify(password, hash)
        .map_err(|e| ConsoleError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}
