//! Per-row busy flags for the mutation protocol.
//!
//! A row is busy while a mutation on it is in flight. A second action on a
//! busy row is refused without contacting the backend. The flag lives in a
//! registry shared by all requests so a double submit from the browser is
//! caught as well; [`BusyGuard`] clears it when dropped, whatever the
//! outcome.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared registry of busy rows, namespaced by scope.
#[derive(Debug, Clone, Default)]
pub struct BusyRows {
    scope: Arc<str>,
    keys: Arc<Mutex<HashSet<String>>>,
}

impl BusyRows {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// View of the same registry under another namespace, e.g. `sales`.
    pub fn scoped(&self, scope: &str) -> Self {
        Self {
            scope: Arc::from(scope),
            keys: Arc::clone(&self.keys),
        }
    }

    /// Mark `key` busy. Returns `None` when it already is.
    pub fn try_acquire(&self, key: &str) -> Option<BusyGuard> {
        let entry = format!("{}:{}", self.scope, key);
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(entry.clone()) {
            return None;
        }
        Some(BusyGuard {
            keys: Arc::clone(&self.keys),
            entry,
        })
    }

    /// Whether `key` is busy in this scope.
    pub fn is_busy(&self, key: &str) -> bool {
        let entry = format!("{}:{}", self.scope, key);
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&entry)
    }
}

/// Busy flag for one row; released on drop.
#[derive(Debug)]
pub struct BusyGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    entry: String,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn second_acquire_is_refused_until_release() {
        let rows = BusyRows::new().scoped("requests");
        let guard = rows.try_acquire("7").expect("first acquire");
        assert!(rows.try_acquire("7").is_none());
        assert!(rows.is_busy("7"));
        drop(guard);
        assert!(!rows.is_busy("7"));
        assert!(rows.try_acquire("7").is_some());
    }

    #[rstest]
    fn scopes_do_not_collide() {
        let registry = BusyRows::new();
        let _sale = registry
            .scoped("sales")
            .try_acquire("7")
            .expect("sale lock");
        assert!(registry.scoped("requests").try_acquire("7").is_some());
    }
}
