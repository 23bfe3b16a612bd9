//! Console behaviour configuration.
//!
//! # Environment Variables
//!
//! - `USERDESK_SEARCH_DEBOUNCE_MS`: Search input debounce window (default: 300)
//! - `USERDESK_PAGE_SIZE`: Page size sent with list fetches (default: 100)
//! - `USERDESK_TOKEN_KEY`: Storage key of the persisted auth token
//!   (default: `userdesk.auth_token`)
//! - `USERDESK_TOKEN_FILE`: File backing the token storage
//!   (default: `storage/session.json`)
//! - `USERDESK_DATA_FILE`: Snapshot used by the offline CLI backend
//!   (default: `storage/userdesk.json`)

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const DEFAULT_TOKEN_KEY: &str = "userdesk.auth_token";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub search_debounce: Duration,
    pub page_size: i64,
    pub token_key: String,
    pub token_file: PathBuf,
    pub data_file: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            page_size: DEFAULT_PAGE_SIZE,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_file: PathBuf::from("storage/session.json"),
            data_file: PathBuf::from("storage/userdesk.json"),
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            search_debounce: lookup("USERDESK_SEARCH_DEBOUNCE_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            page_size: lookup("USERDESK_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|size: &i64| *size > 0)
                .unwrap_or(defaults.page_size),
            token_key: lookup("USERDESK_TOKEN_KEY")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.token_key),
            token_file: lookup("USERDESK_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            data_file: lookup("USERDESK_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
        }
    }
}
