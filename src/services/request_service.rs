use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    events::{EventBus, SystemEvent},
    models::{
        CreateServiceRequest, RequestStatus, ServiceCategory, ServiceRequest,
    },
    services::state_machine,
};
use std::sync::Arc;

pub struct RequestService {
    db: Arc<Database>,
    event_bus: EventBus,
}

impl RequestService {
    pub fn new(db: Arc<Database>, event_bus: EventBus) -> Self {
        Self { db, event_bus }
    }

    pub async fn create_request(
        &self,
        create: CreateServiceRequest,
    ) -> ApiResult<ServiceRequest> {
        if create.room_number.trim().is_empty() {
            return Err(ApiError::BadRequest("Room number is required".to_string()));
        }

        let request = self.db.create_service_request(&create).await?;

        self.event_bus.publish(SystemEvent::RequestCreated {
            request_id: request.id,
            category: request.category.to_string(),
            priority: request.priority.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        Ok(request)
    }

    pub async fn get_request(&self, id: i64) -> ApiResult<ServiceRequest> {
        self.db
            .get_service_request_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Service request {} not found", id)))
    }

    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
        category: Option<ServiceCategory>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<ServiceRequest>, i64)> {
        self.db
            .list_service_requests(status, category, limit, offset)
            .await
    }

    /// Transition a request's status. The state machine is the authority; the
    /// conditional UPDATE keeps the check valid under concurrent writers.
    /// Completion and cancellation both hand the assigned staff member back.
    pub async fn update_status(
        &self,
        request_id: i64,
        new_status: RequestStatus,
    ) -> ApiResult<ServiceRequest> {
        let request = self.get_request(request_id).await?;
        let old_status = request.status;

        state_machine::validate_transition(old_status, new_status)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let updated = self
            .db
            .update_request_status(request_id, old_status, new_status)
            .await?;
        if !updated {
            return Err(ApiError::Conflict(format!(
                "Service request {} changed status concurrently",
                request_id
            )));
        }

        if matches!(
            new_status,
            RequestStatus::Completed | RequestStatus::Cancelled
        ) {
            if let Some(staff_id) = request.assigned_to {
                self.db
                    .release_staff_from_task(
                        staff_id,
                        request_id,
                        new_status == RequestStatus::Completed,
                    )
                    .await?;
            }
        }

        self.event_bus.publish(SystemEvent::RequestStatusChanged {
            request_id,
            old_status,
            new_status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        tracing::info!(
            "Service request {} moved from {} to {}",
            request_id,
            old_status,
            new_status
        );

        self.get_request(request_id).await
    }

    /// Mark an in-progress request as done.
    pub async fn complete_request(&self, request_id: i64) -> ApiResult<ServiceRequest> {
        self.update_status(request_id, RequestStatus::Completed)
            .await
    }
}
