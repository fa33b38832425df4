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
pub struct ListParams {
    pub status: Option<RequestStatus>,
    pub category: Option<ServiceCategory>,
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

pub async fn list_service_requests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = params.page.max(1);
    let page_size = params.page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    let (requests, total) = state
        .request_service
        .list_requests(params.status, params.category, page_size, offset)
        .await?;

    let response = ServiceRequestListResponse {
        requests,
        pagination: PaginationMetadata::new(page, page_size, total),
    };
    Ok(Json(json!({ "data": response })))
}

pub async fn create_service_request(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let created = state.request_service.create_request(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

pub async fn get_service_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let request = state.request_service.get_request(id).await?;
    Ok(Json(json!({ "data": request })))
}

pub async fn update_service_request_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = state.request_service.update_status(id, body.status).await?;
    Ok(Json(json!({ "data": updated })))
}

pub async fn assign_service_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AssignStaffRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = state
        .assignment_service
        .manual_assign(id, body.staff_id)
        .await?;
    Ok(Json(json!({ "data": updated })))
}

pub async fn auto_assign_service_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let (_, staff) = state.assignment_service.auto_assign(id).await?;
    Ok(Json(json!({ "data": staff })))
}
