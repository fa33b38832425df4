use crate::api::middleware::AppState;
use crate::api::{service_requests, staff};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Service request routes
        .route(
            "/service-requests",
            get(service_requests::list_service_requests)
                .post(service_requests::create_service_request),
        )
        .route(
            "/service-requests/:id",
            get(service_requests::get_service_request),
        )
        .route(
            "/service-requests/:id/status",
            put(service_requests::update_service_request_status),
        )
        .route(
            "/service-requests/:id/assign",
            post(service_requests::assign_service_request),
        )
        .route(
            "/service-requests/:id/auto-assign",
            post(service_requests::auto_assign_service_request),
        )
        // Staff routes
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route("/staff/available", get(staff::available_staff))
        .route("/staff/on-duty", get(staff::on_duty_staff))
        .route("/staff/:id", get(staff::get_staff))
        .route("/staff/:id/clock-in", post(staff::clock_in))
        .route("/staff/:id/clock-out", post(staff::clock_out))
        .route("/staff/:id/availability", put(staff::set_availability));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
