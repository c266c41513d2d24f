use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, patch},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, shop, grid, service, barber, block, appointment, availability, dashboard, profile};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Shop setup
        .route("/api/v1/shops", post(shop::create_shop))
        .route("/api/v1/{shop_id}/business-hours", get(shop::get_business_hours).put(shop::save_business_hours))
        .route("/api/v1/{shop_id}/grid", get(grid::get_grid).post(grid::generate_grid))
        .route("/api/v1/{shop_id}/users/{user_id}", patch(profile::update_profile))

        // Catalogue & staff
        .route("/api/v1/{shop_id}/services", get(service::list_services).post(service::save_services))
        .route("/api/v1/{shop_id}/barbers", get(barber::list_barbers).post(barber::save_barbers))

        // Blocks
        .route("/api/v1/{shop_id}/blocks", get(block::list_blocks).post(block::save_blocks))
        .route("/api/v1/{shop_id}/blocks/slot", post(block::block_slot))
        .route("/api/v1/{shop_id}/blocks/delete", post(block::delete_blocks))

        // Appointments
        .route("/api/v1/{shop_id}/appointments", get(appointment::list_appointments))
        .route("/api/v1/{shop_id}/appointments/today", get(appointment::list_today))
        .route("/api/v1/{shop_id}/appointments/{appointment_id}/complete", post(appointment::complete_appointment))
        .route("/api/v1/{shop_id}/appointments/{appointment_id}/cancel", post(appointment::cancel_appointment))

        // Read models
        .route("/api/v1/{shop_id}/availability", get(availability::get_availability))
        .route("/api/v1/{shop_id}/dashboard", get(dashboard::get_dashboard))
        .route("/api/v1/{shop_id}/statistics", get(dashboard::get_statistics))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        shop_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
