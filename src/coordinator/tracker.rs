use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory record of request ids an auto-assignment attempt has been
/// dispatched for.
///
/// An id is claimed before the attempt is dispatched and released only when
/// the attempt fails retryably. Successful attempts keep their entry (the
/// request leaves the pending-unassigned view on its own) and so do
/// capability-missing failures, which caps a dead endpoint at one attempt per
/// request for the process lifetime.
#[derive(Default)]
pub struct AssignmentAttemptTracker {
    attempted: Mutex<HashSet<i64>>,
}

impl AssignmentAttemptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an id for dispatch. Returns false if an attempt is already
    /// recorded, in which case the caller must not dispatch.
    pub fn try_claim(&self, request_id: i64) -> bool {
        self.attempted
            .lock()
            .expect("tracker lock poisoned")
            .insert(request_id)
    }

    /// Release an id after a retryable failure so the next reconcile pass can
    /// try again.
    pub fn release(&self, request_id: i64) {
        self.attempted
            .lock()
            .expect("tracker lock poisoned")
            .remove(&request_id);
    }

    pub fn contains(&self, request_id: i64) -> bool {
        self.attempted
            .lock()
            .expect("tracker lock poisoned")
            .contains(&request_id)
    }

    pub fn len(&self) -> usize {
        self.attempted.lock().expect("tracker lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive() {
        let tracker = AssignmentAttemptTracker::new();
        assert!(tracker.try_claim(1));
        assert!(!tracker.try_claim(1));
        assert!(tracker.try_claim(2));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_release_allows_reclaim() {
        let tracker = AssignmentAttemptTracker::new();
        assert!(tracker.try_claim(5));
        tracker.release(5);
        assert!(!tracker.contains(5));
        assert!(tracker.try_claim(5));
    }

    #[test]
    fn test_release_unknown_id_is_noop() {
        let tracker = AssignmentAttemptTracker::new();
        tracker.release(99);
        assert!(tracker.is_empty());
    }
}
