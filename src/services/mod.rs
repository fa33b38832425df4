pub mod assignment_service;
pub mod request_service;
pub mod staff_service;
pub mod state_machine;

pub use assignment_service::AssignmentService;
pub use request_service::RequestService;
pub use staff_service::StaffService;
