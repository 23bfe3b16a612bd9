//! Per-action "submitting" flags.
//!
//! An action is in flight from a successful [`InFlight::try_acquire`] until
//! the returned guard is dropped, whichever way the call it protects ends.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
pub struct InFlight<K> {
    active: Mutex<HashSet<K>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            active: Mutex::new(HashSet::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as in flight, or returns `None` when it already is.
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<'_, K>> {
        if self.active().insert(key.clone()) {
            Some(InFlightGuard { owner: self, key })
        } else {
            None
        }
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active().contains(key)
    }

    fn active(&self) -> MutexGuard<'_, HashSet<K>> {
        // The set stays consistent even if a holder panicked.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a, K: Eq + Hash + Clone> {
    owner: &'a InFlight<K>,
    key: K,
}

impl<K: Eq + Hash + Clone> Drop for InFlightGuard<'_, K> {
    fn drop(&mut self) {
        self.owner.active().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let flags = InFlight::new();
        let guard = flags.try_acquire("create");
        assert!(guard.is_some());
        assert!(flags.try_acquire("create").is_none());
        assert!(flags.is_active(&"create"));
    }

    #[test]
    fn test_drop_releases() {
        let flags = InFlight::new();
        {
            let _guard = flags.try_acquire("delete");
        }
        assert!(!flags.is_active(&"delete"));
        assert!(flags.try_acquire("delete").is_some());
    }

    #[test]
    fn test_keys_are_independent() {
        let flags = InFlight::new();
        let _create = flags.try_acquire("create");
        assert!(flags.try_acquire("edit").is_some());
    }
}
