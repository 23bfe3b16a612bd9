//! Shared utilities for the console.
//!
//! - [`debounce`]: Trailing-edge debounce of the search input
//! - [`in_flight`]: Per-action guards against duplicate submissions

pub mod debounce;
pub mod in_flight;
