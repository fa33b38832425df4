use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::InProgress => write!(f, "in-progress"),
            RequestStatus::Completed => write!(f, "completed"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// Convert from string (for SQLx rows)
impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "in-progress" => RequestStatus::InProgress,
            "completed" => RequestStatus::Completed,
            "cancelled" => RequestStatus::Cancelled,
            _ => RequestStatus::Pending,
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "in-progress" => Ok(RequestStatus::InProgress),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    RoomService,
    Housekeeping,
    Maintenance,
    SpecialRequests,
    Transportation,
    GeneralAssistance,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::RoomService => write!(f, "room-service"),
            ServiceCategory::Housekeeping => write!(f, "housekeeping"),
            ServiceCategory::Maintenance => write!(f, "maintenance"),
            ServiceCategory::SpecialRequests => write!(f, "special-requests"),
            ServiceCategory::Transportation => write!(f, "transportation"),
            ServiceCategory::GeneralAssistance => write!(f, "general-assistance"),
        }
    }
}

impl From<String> for ServiceCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "room-service" => ServiceCategory::RoomService,
            "housekeeping" => ServiceCategory::Housekeeping,
            "maintenance" => ServiceCategory::Maintenance,
            "special-requests" => ServiceCategory::SpecialRequests,
            "transportation" => ServiceCategory::Transportation,
            _ => ServiceCategory::GeneralAssistance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub room_number: String,
    pub guest_id: Option<i64>,
    pub category: ServiceCategory,
    pub status: RequestStatus,
    pub priority: Priority,
    pub description: String,
    pub assigned_to: Option<i64>,
    pub assigned_staff_name: Option<String>,
    pub requested_at: String, // ISO8601 string from DB
    pub completed_at: Option<String>, // ISO8601 string from DB
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceRequest {
    /// True when the reconcile pass should consider this request for
    /// auto-assignment.
    pub fn needs_assignment(&self) -> bool {
        self.status == RequestStatus::Pending && self.assigned_to.is_none()
    }

    pub fn completed_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.completed_at
            .as_ref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub room_number: String,
    pub guest_id: Option<i64>,
    pub category: ServiceCategory,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignStaffRequest {
    pub staff_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestListResponse {
    pub requests: Vec<ServiceRequest>,
    pub pagination: crate::models::PaginationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(RequestStatus::InProgress.to_string(), "in-progress");
        assert_eq!(
            RequestStatus::from("in-progress".to_string()),
            RequestStatus::InProgress
        );
        assert_eq!(
            "cancelled".parse::<RequestStatus>().unwrap(),
            RequestStatus::Cancelled
        );
        assert!("snoozed".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_category_kebab_case_serde() {
        let json = serde_json::to_string(&ServiceCategory::GeneralAssistance).unwrap();
        assert_eq!(json, "\"general-assistance\"");
        let back: ServiceCategory = serde_json::from_str("\"room-service\"").unwrap();
        assert_eq!(back, ServiceCategory::RoomService);
    }

    #[test]
    fn test_needs_assignment() {
        let mut request = ServiceRequest {
            id: 1,
            room_number: "204".to_string(),
            guest_id: None,
            category: ServiceCategory::Housekeeping,
            status: RequestStatus::Pending,
            priority: Priority::Medium,
            description: String::new(),
            assigned_to: None,
            assigned_staff_name: None,
            requested_at: "2026-01-12T10:00:00Z".to_string(),
            completed_at: None,
            created_at: "2026-01-12T10:00:00Z".to_string(),
            updated_at: "2026-01-12T10:00:00Z".to_string(),
        };
        assert!(request.needs_assignment());

        request.assigned_to = Some(7);
        assert!(!request.needs_assignment());

        request.assigned_to = None;
        request.status = RequestStatus::InProgress;
        assert!(!request.needs_assignment());
    }
}
