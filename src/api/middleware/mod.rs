pub mod error;

pub use error::{ApiError, ApiResult};

use crate::{
    database::Database,
    events::EventBus,
    services::{AssignmentService, RequestService, StaffService},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub event_bus: EventBus,
    pub request_service: Arc<RequestService>,
    pub staff_service: Arc<StaffService>,
    pub assignment_service: Arc<AssignmentService>,
}
