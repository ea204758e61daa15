use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::address::handlers;
use crate::features::address::services::AddressService;

/// Create routes for the address feature
pub fn routes(service: Arc<AddressService>) -> Router {
    Router::new()
        .route("/api/address/dataset", get(handlers::get_dataset_status))
        // Province routes
        .route("/api/address/provinces", get(handlers::list_provinces))
        .route("/api/address/provinces/{id}", get(handlers::get_province))
        .route(
            "/api/address/provinces/{id}/districts",
            get(handlers::list_districts_by_province),
        )
        // District routes
        .route("/api/address/districts/{id}", get(handlers::get_district))
        .route(
            "/api/address/districts/{id}/sub-districts",
            get(handlers::list_sub_districts_by_district),
        )
        // Sub-district routes
        .route(
            "/api/address/sub-districts/{id}",
            get(handlers::get_sub_district),
        )
        // Search & reverse lookup
        .route("/api/address/search", get(handlers::search_address_units))
        .route(
            "/api/address/postal-codes/{code}",
            get(handlers::lookup_postal_code),
        )
        // Selection state machine
        .route(
            "/api/address/selection/transitions",
            post(handlers::apply_selection_transition),
        )
        .route(
            "/api/address/selection/validate",
            post(handlers::validate_selection_state),
        )
        .route(
            "/api/address/selection/format",
            post(handlers::format_selection),
        )
        .with_state(service)
}
