pub mod health;

use axum::{routing::get, Router};

use crate::admin::handlers::admin_router;
use crate::contact::handlers::contact_router;
use crate::public::handlers::public_router;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public site
        .merge(public_router())
        .merge(contact_router())
        // Admin console
        .merge(admin_router())
        .with_state(state)
}
