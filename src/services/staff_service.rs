use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    events::{EventBus, SystemEvent},
    models::{CreateStaffRequest, Department, StaffMember},
};
use std::sync::Arc;

pub struct StaffService {
    db: Arc<Database>,
    event_bus: EventBus,
}

impl StaffService {
    pub fn new(db: Arc<Database>, event_bus: EventBus) -> Self {
        Self { db, event_bus }
    }

    pub async fn create_staff(&self, create: CreateStaffRequest) -> ApiResult<StaffMember> {
        if create.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name is required".to_string()));
        }
        if create.email.trim().is_empty() {
            return Err(ApiError::BadRequest("Email is required".to_string()));
        }

        self.db.create_staff(&create).await
    }

    pub async fn get_staff(&self, id: i64) -> ApiResult<StaffMember> {
        self.db
            .get_staff_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Staff member {} not found", id)))
    }

    pub async fn list_staff(
        &self,
        department: Option<Department>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<StaffMember>, i64)> {
        self.db.list_staff(department, limit, offset).await
    }

    /// Staff eligible for new assignments: on duty and available.
    pub async fn available_staff(&self) -> ApiResult<Vec<StaffMember>> {
        self.db.get_available_staff().await
    }

    pub async fn on_duty_staff(&self) -> ApiResult<Vec<StaffMember>> {
        self.db.get_on_duty_staff().await
    }

    pub async fn clock_in(&self, staff_id: i64) -> ApiResult<StaffMember> {
        // Verify the staff member exists first so a missing id reads as 404
        self.get_staff(staff_id).await?;

        let updated = self.db.clock_in_staff(staff_id).await?;
        if !updated {
            return Err(ApiError::Conflict(format!(
                "Staff member {} is already clocked in",
                staff_id
            )));
        }

        self.event_bus.publish(SystemEvent::StaffClockedIn {
            staff_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        tracing::info!("Staff member {} clocked in", staff_id);

        self.get_staff(staff_id).await
    }

    pub async fn clock_out(&self, staff_id: i64) -> ApiResult<StaffMember> {
        self.get_staff(staff_id).await?;

        let updated = self.db.clock_out_staff(staff_id).await?;
        if !updated {
            return Err(ApiError::Conflict(format!(
                "Staff member {} is not clocked in",
                staff_id
            )));
        }

        self.event_bus.publish(SystemEvent::StaffClockedOut {
            staff_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        tracing::info!("Staff member {} clocked out", staff_id);

        self.get_staff(staff_id).await
    }

    /// Toggle availability. Only meaningful while on duty; rejected otherwise
    /// so callers learn the toggle had no effect.
    pub async fn set_availability(
        &self,
        staff_id: i64,
        available: bool,
    ) -> ApiResult<StaffMember> {
        self.get_staff(staff_id).await?;

        let updated = self.db.set_staff_availability(staff_id, available).await?;
        if !updated {
            return Err(ApiError::BadRequest(format!(
                "Staff member {} is not on duty",
                staff_id
            )));
        }

        self.event_bus.publish(SystemEvent::StaffAvailabilityChanged {
            staff_id,
            available,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        self.get_staff(staff_id).await
    }
}
