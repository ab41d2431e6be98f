//! Route definitions.
//!
//! - **Health endpoints**
//!   - `GET /healthz` — liveness
//!   - `GET /readyz`  — readiness (DB + disk)
//!
//! - **Hotel endpoints**
//!   - `GET  /hotels` — list the caller's hotels
//!   - `POST /hotels` — create a hotel with an image (Admin only)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        hotel_handlers::{add_hotel, list_hotels},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};

/// Image uploads are small; anything past this is a client mistake.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the router for all endpoints. Shared state (`AppState`) is attached
/// by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/hotels",
            get(list_hotels)
                .post(add_hotel)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}
