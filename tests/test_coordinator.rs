// Reconciliation invariants: at-most-one in-flight attempt per request,
// permanent skip on missing capability, retry on transient failure.
use roomops::coordinator::{
    AssignError, AssignmentBackend, AssignmentCoordinator, Notifier,
};
use roomops::models::{
    Department, Priority, RequestStatus, ServiceCategory, ServiceRequest, StaffMember,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy)]
enum Outcome {
    Succeed,
    CapabilityMissing,
    Transient,
}

/// Backend double: records every dispatched call, resolves per-id scripted
/// outcomes (default: success).
struct ScriptedBackend {
    calls: Mutex<Vec<i64>>,
    outcomes: Mutex<HashMap<i64, Outcome>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcomes: Mutex::new(HashMap::new()),
        }
    }

    fn script(&self, request_id: i64, outcome: Outcome) {
        self.outcomes.lock().unwrap().insert(request_id, outcome);
    }

    fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, request_id: i64) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| **id == request_id)
            .count()
    }
}

#[async_trait::async_trait]
impl AssignmentBackend for ScriptedBackend {
    async fn auto_assign(&self, request_id: i64) -> Result<StaffMember, AssignError> {
        self.calls.lock().unwrap().push(request_id);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&request_id)
            .copied()
            .unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => Ok(dummy_staff()),
            Outcome::CapabilityMissing => Err(AssignError::CapabilityMissing(
                "endpoint not found".to_string(),
            )),
            Outcome::Transient => {
                Err(AssignError::Transient("no staff available".to_string()))
            }
        }
    }
}

/// Notifier double counting warnings (per key) and errors.
#[derive(Default)]
struct RecordingNotifier {
    warnings: Mutex<Vec<String>>,
    warned_keys: Mutex<std::collections::HashSet<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn warning_count(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }

    fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn warn_once(&self, key: &str, message: &str) {
        let mut warned = self.warned_keys.lock().unwrap();
        if warned.insert(key.to_string()) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

fn dummy_staff() -> StaffMember {
    StaffMember {
        id: 1,
        name: "Alice".to_string(),
        email: "alice@hotel.test".to_string(),
        phone: String::new(),
        department: Department::Housekeeping,
        position: String::new(),
        is_on_duty: true,
        is_available: true,
        current_task_id: None,
        last_assigned_at: None,
        tasks_today: 0,
        tasks_completed: 0,
        clock_in_time: None,
        clock_out_time: None,
        created_at: "2026-01-12T08:00:00Z".to_string(),
        updated_at: "2026-01-12T08:00:00Z".to_string(),
    }
}

fn request(id: i64, status: RequestStatus, assigned: Option<&str>) -> ServiceRequest {
    ServiceRequest {
        id,
        room_number: "204".to_string(),
        guest_id: None,
        category: ServiceCategory::Housekeeping,
        status,
        priority: Priority::Medium,
        description: String::new(),
        assigned_to: assigned.map(|_| 1),
        assigned_staff_name: assigned.map(|name| name.to_string()),
        requested_at: "2026-01-12T10:00:00Z".to_string(),
        completed_at: None,
        created_at: "2026-01-12T10:00:00Z".to_string(),
        updated_at: "2026-01-12T10:00:00Z".to_string(),
    }
}

fn coordinator(
    backend: Arc<ScriptedBackend>,
    notifier: Arc<RecordingNotifier>,
) -> AssignmentCoordinator {
    AssignmentCoordinator::new(backend, notifier)
}

#[tokio::test]
async fn test_reconcile_dispatches_once_for_repeated_input() {
    let backend = Arc::new(ScriptedBackend::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![request(1, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;
    coordinator.reconcile(&requests).await;

    assert_eq!(backend.calls_for(1), 1);
}

#[tokio::test]
async fn test_capability_missing_is_permanent_skip() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(5, Outcome::CapabilityMissing);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier.clone());

    let requests = vec![request(5, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;
    coordinator.reconcile(&requests).await;
    coordinator.reconcile(&requests).await;

    assert_eq!(backend.calls_for(5), 1);
    assert!(coordinator.tracker().contains(5));
}

#[tokio::test]
async fn test_transient_failure_is_retried_next_pass() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(7, Outcome::Transient);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier.clone());

    let requests = vec![request(7, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;
    assert_eq!(backend.calls_for(7), 1);
    assert!(!coordinator.tracker().contains(7));

    coordinator.reconcile(&requests).await;
    assert_eq!(backend.calls_for(7), 2);
    assert_eq!(notifier.error_count(), 2);
}

#[tokio::test]
async fn test_no_dispatch_for_already_assigned() {
    let backend = Arc::new(ScriptedBackend::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![
        request(1, RequestStatus::Pending, Some("Alice")),
        request(2, RequestStatus::InProgress, Some("Bob")),
        request(3, RequestStatus::Completed, Some("Carol")),
    ];
    coordinator.reconcile(&requests).await;

    assert!(backend.calls().is_empty());
    assert!(coordinator.tracker().is_empty());
}

#[tokio::test]
async fn test_no_dispatch_for_non_pending_status() {
    let backend = Arc::new(ScriptedBackend::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![
        request(1, RequestStatus::InProgress, None),
        request(2, RequestStatus::Completed, None),
        request(3, RequestStatus::Cancelled, None),
    ];
    coordinator.reconcile(&requests).await;

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_scenario_mixed_list_dispatches_only_unassigned_pending() {
    let backend = Arc::new(ScriptedBackend::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![
        request(1, RequestStatus::Pending, None),
        request(2, RequestStatus::Pending, Some("Alice")),
        request(3, RequestStatus::InProgress, Some("Bob")),
    ];
    coordinator.reconcile(&requests).await;

    assert_eq!(backend.calls(), vec![1]);
}

#[tokio::test]
async fn test_scenario_not_found_single_throttled_warning() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(1, Outcome::CapabilityMissing);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier.clone());

    let requests = vec![request(1, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;

    assert!(coordinator.tracker().contains(1));
    assert_eq!(notifier.warning_count(), 1);

    // Second pass with the same view: zero dispatches, still one warning.
    coordinator.reconcile(&requests).await;
    assert_eq!(backend.calls_for(1), 1);
    assert_eq!(notifier.warning_count(), 1);
}

#[tokio::test]
async fn test_capability_warning_coalesces_across_requests() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(1, Outcome::CapabilityMissing);
    backend.script(2, Outcome::CapabilityMissing);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier.clone());

    let requests = vec![
        request(1, RequestStatus::Pending, None),
        request(2, RequestStatus::Pending, None),
    ];
    coordinator.reconcile(&requests).await;

    // Both failed with the missing-capability class, one notice total.
    assert_eq!(backend.calls().len(), 2);
    assert_eq!(notifier.warning_count(), 1);
}

#[tokio::test]
async fn test_scenario_validation_error_retries() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(1, Outcome::Transient);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier.clone());

    let requests = vec![request(1, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;
    assert!(!coordinator.tracker().contains(1));

    coordinator.reconcile(&requests).await;
    assert_eq!(backend.calls_for(1), 2);
}

#[tokio::test]
async fn test_one_failing_attempt_does_not_block_others() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script(1, Outcome::Transient);
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![
        request(1, RequestStatus::Pending, None),
        request(2, RequestStatus::Pending, None),
        request(3, RequestStatus::Pending, None),
    ];
    coordinator.reconcile(&requests).await;

    let mut calls = backend.calls();
    calls.sort_unstable();
    assert_eq!(calls, vec![1, 2, 3]);
    // Only the failed id is eligible again.
    assert!(!coordinator.tracker().contains(1));
    assert!(coordinator.tracker().contains(2));
    assert!(coordinator.tracker().contains(3));
}

#[tokio::test]
async fn test_successful_attempt_stays_tracked() {
    let backend = Arc::new(ScriptedBackend::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = coordinator(backend.clone(), notifier);

    let requests = vec![request(9, RequestStatus::Pending, None)];
    coordinator.reconcile(&requests).await;

    assert_eq!(backend.calls_for(9), 1);
    assert!(coordinator.tracker().contains(9));
}
