use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    events::{EventBus, SystemEvent},
    models::{Department, RequestStatus, ServiceRequest, StaffMember},
};
use std::sync::Arc;

pub struct AssignmentService {
    db: Arc<Database>,
    event_bus: EventBus,
}

impl AssignmentService {
    pub fn new(db: Arc<Database>, event_bus: EventBus) -> Self {
        Self { db, event_bus }
    }

    /// Backend-driven staff selection for a pending, unassigned request.
    pub async fn auto_assign(&self, request_id: i64) -> ApiResult<(ServiceRequest, StaffMember)> {
        // 1. Verify request exists and still needs assignment
        let request = self.require_assignable_request(request_id).await?;

        // 2. Pick a candidate from the responsible department
        let department = Department::for_category(request.category);
        let candidate = self
            .db
            .find_assignable_staff(department)
            .await?
            .ok_or_else(|| {
                ApiError::BadRequest("No staff available for assignment".to_string())
            })?;

        // 3. Bind and claim
        let staff = self.bind(&request, &candidate, "auto").await?;

        // 4. Return updated request
        let updated = self.reload_request(request_id).await?;
        Ok((updated, staff))
    }

    /// Explicit staff-to-request binding, bypassing auto-selection.
    pub async fn manual_assign(
        &self,
        request_id: i64,
        staff_id: i64,
    ) -> ApiResult<ServiceRequest> {
        let request = self.require_assignable_request(request_id).await?;

        let staff = self
            .db
            .get_staff_by_id(staff_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Staff member {} not found", staff_id)))?;

        if !staff.is_assignable() {
            return Err(ApiError::Conflict(format!(
                "Staff member {} is not on duty and available",
                staff_id
            )));
        }

        self.bind(&request, &staff, &staff_id.to_string()).await?;
        self.reload_request(request_id).await
    }

    async fn require_assignable_request(&self, request_id: i64) -> ApiResult<ServiceRequest> {
        let request = self
            .db
            .get_service_request_by_id(request_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Service request {} not found", request_id))
            })?;

        if request.status != RequestStatus::Pending || request.assigned_to.is_some() {
            return Err(ApiError::Conflict(format!(
                "Service request {} is not pending and unassigned",
                request_id
            )));
        }

        Ok(request)
    }

    /// Bind request and staff. The request row is the race arbiter; the staff
    /// claim is compensated on failure so neither side is left half-bound.
    async fn bind(
        &self,
        request: &ServiceRequest,
        staff: &StaffMember,
        assigned_by: &str,
    ) -> ApiResult<StaffMember> {
        let bound = self
            .db
            .bind_request_to_staff(request.id, staff.id, &staff.name)
            .await?;
        if !bound {
            return Err(ApiError::Conflict(format!(
                "Service request {} was assigned concurrently",
                request.id
            )));
        }

        let claimed = self.db.claim_staff_for_task(staff.id, request.id).await?;
        if !claimed {
            self.db.unbind_request(request.id).await?;
            return Err(ApiError::Conflict(format!(
                "Staff member {} is no longer available",
                staff.id
            )));
        }

        self.event_bus.publish(SystemEvent::RequestAssigned {
            request_id: request.id,
            staff_id: staff.id,
            staff_name: staff.name.clone(),
            assigned_by: assigned_by.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        tracing::info!(
            "Assigned request {} to staff {} ({})",
            request.id,
            staff.id,
            assigned_by
        );

        self.db
            .get_staff_by_id(staff.id)
            .await?
            .ok_or_else(|| ApiError::Internal("Staff disappeared after assignment".to_string()))
    }

    async fn reload_request(&self, request_id: i64) -> ApiResult<ServiceRequest> {
        self.db
            .get_service_request_by_id(request_id)
            .await?
            .ok_or_else(|| ApiError::Internal("Request disappeared after assignment".to_string()))
    }
}
