//! Route table for the `/api/v1` surface.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Root-level routes (health check).
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// All versioned API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // -- Projects --
        .route(
            "/projects",
            post(handlers::project::create).get(handlers::project::list),
        )
        .route(
            "/projects/{id}",
            get(handlers::project::get_by_id)
                .put(handlers::project::update)
                .delete(handlers::project::delete),
        )
        .route(
            "/projects/{project_id}/phases",
            post(handlers::phase::create).get(handlers::phase::list_by_project),
        )
        .route(
            "/projects/{project_id}/phases/reorder",
            post(handlers::phase::reorder),
        )
        .route(
            "/projects/{project_id}/offers",
            get(handlers::offer::list_by_project),
        )
        // -- Products (catalog stub) --
        .route(
            "/products",
            post(handlers::product::create).get(handlers::product::list),
        )
        .route("/products/{id}", get(handlers::product::get_by_id))
        // -- Phases --
        .route(
            "/phases/{id}",
            get(handlers::phase::get_by_id)
                .put(handlers::phase::update)
                .delete(handlers::phase::delete),
        )
        .route(
            "/phases/{id}/discount",
            put(handlers::phase::toggle_discount),
        )
        .route(
            "/phases/{phase_id}/variants",
            post(handlers::variant::create).get(handlers::variant::list_by_phase),
        )
        .route(
            "/phases/{phase_id}/variants/reorder",
            post(handlers::variant::reorder),
        )
        .route(
            "/phases/{phase_id}/offer-variants",
            get(handlers::variant::list_for_offer),
        )
        // -- Variants --
        .route(
            "/variants/{id}",
            get(handlers::variant::get_by_id)
                .put(handlers::variant::update)
                .delete(handlers::variant::delete),
        )
        .route(
            "/variants/{id}/discount",
            put(handlers::variant::toggle_discount),
        )
        .route("/variants/{id}/select", post(handlers::variant::select))
        .route(
            "/variants/{id}/duplicate",
            post(handlers::variant::duplicate),
        )
        .route(
            "/variants/{variant_id}/rooms",
            post(handlers::room::create).get(handlers::room::list_by_variant),
        )
        // -- Rooms --
        .route(
            "/rooms/{id}",
            get(handlers::room::get_by_id)
                .put(handlers::room::update)
                .delete(handlers::room::delete),
        )
        .route("/rooms/{id}/duplicate", post(handlers::room::duplicate))
        .route(
            "/rooms/{room_id}/products",
            post(handlers::room_product::create).get(handlers::room_product::list_by_room),
        )
        // -- Line items --
        .route(
            "/room-products/{id}",
            put(handlers::room_product::update).delete(handlers::room_product::delete),
        )
        // -- Offers --
        .route("/offers", post(handlers::offer::create))
        .route(
            "/offers/{id}",
            get(handlers::offer::get_by_id).put(handlers::offer::update),
        )
        .route("/offers/{id}/preview", get(handlers::offer::preview))
}
