//! `StateAggregator`: mutex-guarded partition of operation ids.
//!
//! Every id lives in exactly one of three containers:
//!
//! - `active`: id → status text, for changes in flight
//! - `completed`: ids that finished cleanly
//! - `errored`: ids that finished with an error
//!
//! The terminal lists only grow. All reads go through [`StateAggregator::snapshot`],
//! which copies and sorts under the same lock the mutations take, so the
//! display never sees a torn state. The lock is never held across a draw.

use super::operation::Phase;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// A consistent, sorted copy of the aggregate state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Active entries formatted as `"id: status"`, sorted.
    pub active: Vec<String>,
    /// Completed ids, sorted.
    pub completed: Vec<String>,
    /// Errored ids, sorted.
    pub errored: Vec<String>,
}

impl Snapshot {
    /// Total number of ids across all three partitions.
    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len() + self.errored.len()
    }

    /// Whether no id has been seen.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct Aggregate {
    active: HashMap<String, String>,
    completed: Vec<String>,
    errored: Vec<String>,
    /// Ids already in `completed` or `errored`.
    finished: HashSet<String>,
}

/// Shared store of operation phases.
#[derive(Debug, Default)]
pub struct StateAggregator {
    inner: Mutex<Aggregate>,
}

impl StateAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the partition half-edited:
    // every mutation is a single insert/remove+push. Keep going on poison.
    fn lock(&self) -> MutexGuard<'_, Aggregate> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Discard all state.
    pub fn reset(&self) {
        *self.lock() = Aggregate::default();
    }

    /// Mark `id` as in flight with the given status text.
    ///
    /// Repeating `begin` for an active id overwrites its status. Returns
    /// `false` if the id already finished; it stays where it is.
    pub fn begin(&self, id: &str, status: &str) -> bool {
        let mut state = self.lock();
        if state.finished.contains(id) {
            drop(state);
            warn!(id, "begin for an operation that already finished; ignoring");
            return false;
        }
        state.active.insert(id.to_string(), status.to_string());
        true
    }

    /// Move `id` out of the active set into `completed` or `errored`.
    ///
    /// Returns the phase the id landed in, or `None` if it was not active,
    /// in which case nothing changes.
    pub fn end(&self, id: &str, failed: bool) -> Option<Phase> {
        let mut state = self.lock();
        if state.active.remove(id).is_none() {
            drop(state);
            warn!(id, failed, "end for an operation that was never begun; ignoring");
            return None;
        }

        state.finished.insert(id.to_string());
        if failed {
            state.errored.push(id.to_string());
            Some(Phase::Errored)
        } else {
            state.completed.push(id.to_string());
            Some(Phase::Completed)
        }
    }

    /// Copy the current state, sorted for display.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();

        let mut active: Vec<String> = state
            .active
            .iter()
            .map(|(id, status)| format!("{id}: {status}"))
            .collect();
        let mut completed = state.completed.clone();
        let mut errored = state.errored.clone();

        active.sort_unstable();
        completed.sort_unstable();
        errored.sort_unstable();

        Snapshot {
            active,
            completed,
            errored,
        }
    }

    /// Current phase of `id`, if it has been seen.
    pub fn phase(&self, id: &str) -> Option<Phase> {
        let state = self.lock();
        if state.active.contains_key(id) {
            Some(Phase::Active)
        } else if !state.finished.contains(id) {
            None
        } else if state.errored.iter().any(|e| e == id) {
            Some(Phase::Errored)
        } else {
            Some(Phase::Completed)
        }
    }

    /// Number of ids seen so far.
    pub fn len(&self) -> usize {
        let state = self.lock();
        state.active.len() + state.finished.len()
    }

    /// Whether no id has been seen.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_begin_then_end() {
        let state = StateAggregator::new();
        assert!(state.begin("aws_instance.web", "Creating..."));

        let snap = state.snapshot();
        assert_eq!(snap.active, vec!["aws_instance.web: Creating..."]);
        assert!(snap.completed.is_empty());
        assert!(snap.errored.is_empty());

        assert_eq!(state.end("aws_instance.web", false), Some(Phase::Completed));
        let snap = state.snapshot();
        assert!(snap.active.is_empty());
        assert_eq!(snap.completed, vec!["aws_instance.web"]);
    }

    #[test]
    fn test_begin_overwrites_status() {
        let state = StateAggregator::new();
        state.begin("a", "Creating...");
        state.begin("a", "Modifying...");
        assert_eq!(state.snapshot().active, vec!["a: Modifying..."]);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let state = StateAggregator::new();
        assert_eq!(state.end("ghost", true), None);
        assert!(state.snapshot().is_empty());
        assert_eq!(state.phase("ghost"), None);
    }

    #[test]
    fn test_end_twice_is_noop() {
        let state = StateAggregator::new();
        state.begin("a", "Creating...");
        state.end("a", false);
        assert_eq!(state.end("a", true), None);

        let snap = state.snapshot();
        assert_eq!(snap.completed, vec!["a"]);
        assert!(snap.errored.is_empty());
    }

    #[test]
    fn test_begin_after_finish_is_ignored() {
        let state = StateAggregator::new();
        state.begin("a", "Creating...");
        state.end("a", true);
        assert!(!state.begin("a", "Creating..."));

        let snap = state.snapshot();
        assert!(snap.active.is_empty());
        assert_eq!(snap.errored, vec!["a"]);
        assert_eq!(state.phase("a"), Some(Phase::Errored));
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let state = StateAggregator::new();
        for id in ["zeta", "alpha", "mu", "beta"] {
            state.begin(id, "Creating...");
        }
        for id in ["mu", "zeta", "alpha"] {
            state.end(id, false);
        }
        state.end("beta", true);
        state.begin("gamma", "Destroying...");
        state.begin("delta", "Modifying...");

        let snap = state.snapshot();
        assert_eq!(snap.active, vec!["delta: Modifying...", "gamma: Destroying..."]);
        assert_eq!(snap.completed, vec!["alpha", "mu", "zeta"]);
        assert_eq!(snap.errored, vec!["beta"]);
    }

    #[test]
    fn test_repeated_snapshots_are_identical() {
        let state = StateAggregator::new();
        state.begin("b", "Creating...");
        state.begin("a", "Creating...");
        state.end("b", false);
        assert_eq!(state.snapshot(), state.snapshot());
    }

    #[test]
    fn test_phase_tracking() {
        let state = StateAggregator::new();
        state.begin("a", "Creating...");
        state.begin("b", "Creating...");
        assert_eq!(state.phase("a"), Some(Phase::Active));
        state.end("a", false);
        state.end("b", true);
        assert_eq!(state.phase("a"), Some(Phase::Completed));
        assert_eq!(state.phase("b"), Some(Phase::Errored));
    }

    #[test]
    fn test_reset() {
        let state = StateAggregator::new();
        state.begin("a", "Creating...");
        state.end("a", false);
        state.reset();
        assert!(state.is_empty());
        assert!(state.snapshot().is_empty());
        // A reset run may reuse the id.
        assert!(state.begin("a", "Creating..."));
    }

    #[test]
    fn test_concurrent_partition() {
        let state = Arc::new(StateAggregator::new());
        let handles: Vec<_> = (0..16)
            .map(|worker| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    for i in 0..64 {
                        let id = format!("res_{worker:02}_{i:03}");
                        state.begin(&id, "Creating...");
                        let _ = state.snapshot();
                        state.end(&id, i % 5 == 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = state.snapshot();
        assert!(snap.active.is_empty());
        assert_eq!(snap.completed.len() + snap.errored.len(), 16 * 64);
        assert_eq!(snap.errored.len(), 16 * 13);

        let mut all: Vec<&String> = snap.completed.iter().chain(&snap.errored).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 16 * 64);
    }
}
