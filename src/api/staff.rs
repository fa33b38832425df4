use crate::{
    api::middleware::{ApiResult, AppState},
    models::*,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct StaffListParams {
    pub department: Option<Department>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

pub async fn list_staff(
    State(state): State<AppState>,
    Query(params): Query<StaffListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = params.page.max(1);
    let page_size = params.page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    let (staff, total) = state
        .staff_service
        .list_staff(params.department, page_size, offset)
        .await?;

    let response = StaffListResponse {
        staff,
        pagination: PaginationMetadata::new(page, page_size, total),
    };
    Ok(Json(json!({ "data": response })))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Json(request): Json<CreateStaffRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let created = state.staff_service.create_staff(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let staff = state.staff_service.get_staff(id).await?;
    Ok(Json(json!({ "data": staff })))
}

pub async fn available_staff(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let staff = state.staff_service.available_staff().await?;
    Ok(Json(json!({ "data": staff })))
}

pub async fn on_duty_staff(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let staff = state.staff_service.on_duty_staff().await?;
    Ok(Json(json!({ "data": staff })))
}

pub async fn clock_in(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let staff = state.staff_service.clock_in(id).await?;
    Ok(Json(json!({ "data": staff })))
}

pub async fn clock_out(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let staff = state.staff_service.clock_out(id).await?;
    Ok(Json(json!({ "data": staff })))
}

pub async fn set_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SetAvailabilityRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let staff = state
        .staff_service
        .set_availability(id, body.available)
        .await?;
    Ok(Json(json!({ "data": staff })))
}
