pub mod middleware;
pub mod router;
pub mod service_requests;
pub mod staff;

pub use middleware::{ApiError, ApiResult, AppState};
pub use router::build_router;
