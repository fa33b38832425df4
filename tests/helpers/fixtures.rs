#![allow(dead_code)]
use roomops::database::Database;
use roomops::models::{
    CreateServiceRequest, CreateStaffRequest, Department, ServiceCategory, ServiceRequest,
    StaffMember,
};

/// Create a staff member and clock them in so they are assignable.
pub async fn create_on_duty_staff(
    db: &Database,
    name: &str,
    email: &str,
    department: Department,
) -> StaffMember {
    let staff = create_off_duty_staff(db, name, email, department).await;
    db.clock_in_staff(staff.id)
        .await
        .expect("Failed to clock in staff");
    db.get_staff_by_id(staff.id)
        .await
        .expect("Failed to reload staff")
        .expect("Staff not found")
}

pub async fn create_off_duty_staff(
    db: &Database,
    name: &str,
    email: &str,
    department: Department,
) -> StaffMember {
    db.create_staff(&CreateStaffRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        department,
        position: None,
    })
    .await
    .expect("Failed to create staff")
}

pub async fn create_test_request(
    db: &Database,
    room_number: &str,
    category: ServiceCategory,
) -> ServiceRequest {
    db.create_service_request(&CreateServiceRequest {
        room_number: room_number.to_string(),
        guest_id: None,
        category,
        priority: None,
        description: Some("test request".to_string()),
    })
    .await
    .expect("Failed to create service request")
}
