pub mod http_backend;
pub mod tracker;

pub use http_backend::HttpAssignmentBackend;
pub use tracker::AssignmentAttemptTracker;

use crate::{
    api::middleware::error::ApiError,
    models::{ServiceRequest, StaffMember},
    services::AssignmentService,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Notification key under which all "auto-assignment unavailable" warnings
/// coalesce.
pub const AUTO_ASSIGN_UNAVAILABLE_KEY: &str = "auto-assign-unavailable";

/// Failure classes for an auto-assignment attempt, as seen by the coordinator.
#[derive(Debug, Error)]
pub enum AssignError {
    /// The assignment capability does not exist in this deployment. Permanent
    /// for the process lifetime; the request stays tracked so it is never
    /// retried.
    #[error("auto-assignment is not available: {0}")]
    CapabilityMissing(String),

    /// Anything else: validation, conflict, server error, no eligible staff.
    /// The request is untracked so the next reconcile pass retries it.
    #[error("{0}")]
    Transient(String),
}

#[async_trait::async_trait]
pub trait AssignmentBackend: Send + Sync {
    async fn auto_assign(&self, request_id: i64) -> Result<StaffMember, AssignError>;
}

/// Sink for user-facing notices. `warn_once` coalesces by key so a whole class
/// of failures produces a single notice.
pub trait Notifier: Send + Sync {
    fn warn_once(&self, key: &str, message: &str);
    fn error(&self, message: &str);
}

/// Production notifier: structured logs, warnings deduplicated per key.
#[derive(Default)]
pub struct LogNotifier {
    warned_keys: Mutex<HashSet<String>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for LogNotifier {
    fn warn_once(&self, key: &str, message: &str) {
        let mut warned = self.warned_keys.lock().expect("notifier lock poisoned");
        if warned.insert(key.to_string()) {
            tracing::warn!("{}", message);
        }
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Reconciles observed service requests against the rule that every pending,
/// unassigned request gets an auto-assignment attempt dispatched at most once.
pub struct AssignmentCoordinator {
    backend: Arc<dyn AssignmentBackend>,
    notifier: Arc<dyn Notifier>,
    tracker: AssignmentAttemptTracker,
}

impl AssignmentCoordinator {
    pub fn new(backend: Arc<dyn AssignmentBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            tracker: AssignmentAttemptTracker::new(),
        }
    }

    /// One reconciliation pass over the current request list. Safe to call
    /// repeatedly with the same input: the tracker gate is checked before
    /// dispatch, so no request gets a second in-flight attempt. Attempts for
    /// distinct requests run concurrently and are isolated from each other.
    pub async fn reconcile(&self, requests: &[ServiceRequest]) {
        let mut attempts = Vec::new();
        for request in requests {
            if !request.needs_assignment() {
                continue;
            }
            if !self.tracker.try_claim(request.id) {
                continue;
            }
            attempts.push(self.attempt(request.id));
        }

        if attempts.is_empty() {
            return;
        }

        tracing::debug!("Dispatching {} auto-assignment attempts", attempts.len());
        futures::future::join_all(attempts).await;
    }

    async fn attempt(&self, request_id: i64) {
        match self.backend.auto_assign(request_id).await {
            Ok(staff) => {
                tracing::info!(
                    "Auto-assigned request {} to staff {} ({})",
                    request_id,
                    staff.id,
                    staff.name
                );
            }
            Err(AssignError::CapabilityMissing(msg)) => {
                // Keep the tracker entry: retrying a missing capability would
                // only hammer a dead endpoint.
                self.notifier.warn_once(
                    AUTO_ASSIGN_UNAVAILABLE_KEY,
                    &format!("Automatic staff assignment is unavailable: {}", msg),
                );
            }
            Err(AssignError::Transient(msg)) => {
                self.tracker.release(request_id);
                self.notifier.error(&format!(
                    "Auto-assignment of request {} failed: {}",
                    request_id, msg
                ));
            }
        }
    }

    /// Exposed for tests and diagnostics.
    pub fn tracker(&self) -> &AssignmentAttemptTracker {
        &self.tracker
    }
}

/// In-process backend over the assignment service. A deployment can switch the
/// capability off entirely, which the coordinator treats as permanent.
pub struct DbAssignmentBackend {
    service: Arc<AssignmentService>,
    enabled: bool,
}

impl DbAssignmentBackend {
    pub fn new(service: Arc<AssignmentService>, enabled: bool) -> Self {
        Self { service, enabled }
    }
}

#[async_trait::async_trait]
impl AssignmentBackend for DbAssignmentBackend {
    async fn auto_assign(&self, request_id: i64) -> Result<StaffMember, AssignError> {
        if !self.enabled {
            return Err(AssignError::CapabilityMissing(
                "disabled for this deployment".to_string(),
            ));
        }

        match self.service.auto_assign(request_id).await {
            Ok((_, staff)) => Ok(staff),
            Err(err) => Err(classify_api_error(err)),
        }
    }
}

fn classify_api_error(err: ApiError) -> AssignError {
    // Request-level NotFound is transient from the coordinator's point of
    // view: the request may simply have been deleted between fetch and
    // attempt, and the next pass will no longer see it.
    AssignError::Transient(err.to_string())
}
