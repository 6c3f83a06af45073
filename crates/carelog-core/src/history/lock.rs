//! Per-subject serialization of the read-modify-write append cycle.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-subject async mutexes.
///
/// Entries are created on demand and dropped again once the last holder
/// releases its guard, so the map only tracks subjects with appends in flight.
#[derive(Debug, Default)]
pub struct SubjectLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SubjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `subject`.
    pub async fn acquire(&self, subject: &str) -> SubjectGuard<'_> {
        let lock = self.locks.entry(subject.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        SubjectGuard {
            locks: self,
            subject: subject.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of subjects currently holding or waiting on a lock.
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}

/// Held for the duration of one append; releases on drop, including early returns.
pub struct SubjectGuard<'a> {
    locks: &'a SubjectLocks,
    subject: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SubjectGuard<'_> {
    fn drop(&mut self) {
        // Release before pruning so the strong count reflects only other waiters.
        self.guard.take();
        self.locks
            .locks
            .remove_if(&self.subject, |_, lock| Arc::strong_count(lock) == 1);
    }
}
