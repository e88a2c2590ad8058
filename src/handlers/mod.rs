pub mod backend;
pub mod bookings;
pub mod drafts;
pub mod health;
pub mod notifications;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::errors::AppError;
use crate::models::Party;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/draft",
            get(drafts::get_draft)
                .post(drafts::start_draft)
                .delete(drafts::clear_draft),
        )
        .route("/api/draft/schedule", put(drafts::set_schedule))
        .route("/api/draft/address", put(drafts::set_address))
        .route("/api/draft/total", get(drafts::draft_total))
        .route("/api/draft/submit", post(drafts::submit_draft))
        .route("/api/bookings", get(bookings::list_bookings))
        .route("/api/bookings/tabs", get(bookings::tab_view))
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/status", patch(bookings::update_status))
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/api/bookings/:id/review", post(bookings::review_booking))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id/read", patch(notifications::mark_read))
        .with_state(state)
}

/// Resolves the bearer token to the signed-in party.
pub async fn current_party(state: &AppState, headers: &HeaderMap) -> Result<Party, AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if token.is_empty() {
        return Err(AppError::NotAuthenticated);
    }

    state
        .sessions
        .current_party(token)
        .await
        .map_err(AppError::remote)?
        .ok_or(AppError::NotAuthenticated)
}
