use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ServiceCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Housekeeping,
    Maintenance,
    FrontDesk,
    RoomService,
    Management,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::Housekeeping => write!(f, "housekeeping"),
            Department::Maintenance => write!(f, "maintenance"),
            Department::FrontDesk => write!(f, "front_desk"),
            Department::RoomService => write!(f, "room_service"),
            Department::Management => write!(f, "management"),
        }
    }
}

impl From<String> for Department {
    fn from(s: String) -> Self {
        match s.as_str() {
            "housekeeping" => Department::Housekeeping,
            "maintenance" => Department::Maintenance,
            "room_service" => Department::RoomService,
            "management" => Department::Management,
            _ => Department::FrontDesk,
        }
    }
}

impl Department {
    /// Department responsible for a given service category. Categories without
    /// a dedicated department are handled by the front desk.
    pub fn for_category(category: ServiceCategory) -> Self {
        match category {
            ServiceCategory::RoomService => Department::RoomService,
            ServiceCategory::Housekeeping => Department::Housekeeping,
            ServiceCategory::Maintenance => Department::Maintenance,
            ServiceCategory::SpecialRequests
            | ServiceCategory::Transportation
            | ServiceCategory::GeneralAssistance => Department::FrontDesk,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub position: String,
    pub is_on_duty: bool,
    pub is_available: bool,
    pub current_task_id: Option<i64>,
    pub last_assigned_at: Option<String>, // ISO8601 string from DB
    pub tasks_today: i64,
    pub tasks_completed: i64,
    pub clock_in_time: Option<String>,
    pub clock_out_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl StaffMember {
    /// Eligible to receive a new assignment.
    pub fn is_assignable(&self) -> bool {
        self.is_on_duty && self.is_available
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub department: Department,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffListResponse {
    pub staff: Vec<StaffMember>,
    pub pagination: crate::models::PaginationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_for_category() {
        assert_eq!(
            Department::for_category(ServiceCategory::RoomService),
            Department::RoomService
        );
        assert_eq!(
            Department::for_category(ServiceCategory::Maintenance),
            Department::Maintenance
        );
        assert_eq!(
            Department::for_category(ServiceCategory::Transportation),
            Department::FrontDesk
        );
    }

    #[test]
    fn test_department_string_conversions() {
        assert_eq!(Department::FrontDesk.to_string(), "front_desk");
        assert_eq!(
            Department::from("room_service".to_string()),
            Department::RoomService
        );
    }
}
