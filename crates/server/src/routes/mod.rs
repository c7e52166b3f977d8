mod catalog;
pub mod health;
pub mod metrics;
mod procedures;
mod providers;
mod search;
mod specialties;

use axum::{Router, routing::get};

use crate::AppState;

/// Build the `/api/v1` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/specialties", get(specialties::list))
        .route("/specialties/{slug}", get(specialties::detail))
        .route(
            "/specialties/{slug}/providers",
            get(specialties::providers),
        )
        .route("/search", get(search::search))
        .route("/procedures/{slug}", get(procedures::detail))
        .route("/procedures/{slug}/providers", get(procedures::providers))
        .route("/providers/{id}", get(providers::detail))
        .route(
            "/providers/{id}/procedures/{slug}",
            get(providers::procedure_detail),
        )
        .route("/categories", get(catalog::categories))
        .route("/categories/{slug}/families", get(catalog::families))
        .route("/families/{slug}/procedures", get(catalog::procedures))
        .route("/codes/{code}", get(catalog::billing_code))
}
