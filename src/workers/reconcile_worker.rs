use crate::coordinator::AssignmentCoordinator;
use crate::database::Database;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Background loop that feeds the coordinator: fetch the pending-unassigned
/// view, reconcile, sleep. Attempt failures never escape a pass; fetch
/// failures back off and try again.
pub struct ReconcileWorker {
    db: Arc<Database>,
    coordinator: Arc<AssignmentCoordinator>,
    interval: Duration,
}

impl ReconcileWorker {
    pub fn new(
        db: Arc<Database>,
        coordinator: Arc<AssignmentCoordinator>,
        interval: Duration,
    ) -> Self {
        Self {
            db,
            coordinator,
            interval,
        }
    }

    pub async fn run(&self) {
        info!(
            "Starting ReconcileWorker (interval {}s)...",
            self.interval.as_secs()
        );
        loop {
            match self.run_once().await {
                Ok(count) => {
                    if count > 0 {
                        debug!("Reconciled {} pending unassigned requests", count);
                    }
                    tokio::time::sleep(self.interval).await;
                }
                Err(e) => {
                    error!("Failed to fetch requests for reconciliation: {}", e);
                    tokio::time::sleep(self.interval * 2).await;
                }
            }
        }
    }

    /// One fetch-and-reconcile pass. Returns how many requests were observed
    /// in the pending-unassigned view.
    pub async fn run_once(&self) -> Result<usize, crate::api::middleware::error::ApiError> {
        let requests = self.db.get_pending_unassigned_requests().await?;
        let count = requests.len();
        self.coordinator.reconcile(&requests).await;
        Ok(count)
    }
}
