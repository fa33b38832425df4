use crate::{
    api::middleware::AppState,
    config::Config,
    coordinator::{
        AssignmentBackend, AssignmentCoordinator, DbAssignmentBackend, HttpAssignmentBackend,
        LogNotifier,
    },
    database::Database,
    events::{self, EventBus},
    services::{AssignmentService, RequestService, StaffService},
    workers::ReconcileWorker,
};
use std::sync::Arc;
use std::time::Duration;

/// Build application state and start the background tasks: the audit logger
/// and the reconcile worker.
pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let db = Arc::new(db);
    let event_bus = EventBus::default();
    events::spawn_audit_logger(&event_bus);

    let request_service = Arc::new(RequestService::new(db.clone(), event_bus.clone()));
    let staff_service = Arc::new(StaffService::new(db.clone(), event_bus.clone()));
    let assignment_service = Arc::new(AssignmentService::new(db.clone(), event_bus.clone()));

    let backend: Arc<dyn AssignmentBackend> = match &config.assign_backend_url {
        Some(url) => {
            tracing::info!("Using remote assignment backend at {}", url);
            Arc::new(HttpAssignmentBackend::new(url))
        }
        None => Arc::new(DbAssignmentBackend::new(
            assignment_service.clone(),
            config.auto_assign_enabled,
        )),
    };
    let coordinator = Arc::new(AssignmentCoordinator::new(
        backend,
        Arc::new(LogNotifier::new()),
    ));

    let worker = ReconcileWorker::new(
        db.clone(),
        coordinator,
        Duration::from_secs(config.reconcile_interval_secs),
    );
    tokio::spawn(async move {
        worker.run().await;
    });

    AppState {
        db,
        event_bus,
        request_service,
        staff_service,
        assignment_service,
    }
}
