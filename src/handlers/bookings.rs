use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use super::current_party;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Party, Review, StatusFilter};
use crate::services::classifier::{matches_search, Classifier, Tab};
use crate::services::notify;
use crate::services::store::StatusCounts;
use crate::state::AppState;

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub filter: Option<String>,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    bookings: Vec<Booking>,
    filter: String,
    counts: StatusCounts,
    /// Set when the latest load failed and `bookings` is a stale copy.
    error: Option<String>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, AppError> {
    let party = current_party(&state, &headers).await?;

    let store = state.store(&party.id).await;
    let mut store = store.lock().await;
    store.load(state.backend.as_ref(), &party).await;
    if let Some(filter) = query.filter.as_deref() {
        store.set_filter(StatusFilter::parse(filter));
    }

    Ok(Json(BookingsResponse {
        bookings: store.filtered().to_vec(),
        filter: store.filter().as_str().to_string(),
        counts: store.counts(),
        error: store.error().map(str::to_string),
    }))
}

// GET /api/bookings/tabs
#[derive(Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct TabCount {
    tab: Tab,
    count: usize,
}

#[derive(Serialize)]
pub struct TabResponse {
    tab: Tab,
    bookings: Vec<Booking>,
    counts: Vec<TabCount>,
    error: Option<String>,
}

pub async fn tab_view(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TabQuery>,
) -> Result<Json<TabResponse>, AppError> {
    let party = current_party(&state, &headers).await?;

    let tab = match query.tab.as_deref() {
        None => Tab::All,
        Some(raw) => {
            Tab::parse(raw).ok_or_else(|| AppError::Validation(format!("unknown tab: {raw}")))?
        }
    };
    let search = query.search.unwrap_or_default();

    let store = state.store(&party.id).await;
    let mut store = store.lock().await;
    store.load(state.backend.as_ref(), &party).await;

    let today = Local::now().date_naive();
    let classifier = Classifier::for_role(party.role);
    let bookings = store
        .bookings()
        .iter()
        .filter(|b| matches_search(b, &search, party.role))
        .filter(|b| classifier.matches(b, tab, today))
        .cloned()
        .collect();
    let counts = classifier
        .tab_counts(store.bookings(), today)
        .into_iter()
        .map(|(tab, count)| TabCount { tab, count })
        .collect();

    Ok(Json(TabResponse {
        tab,
        bookings,
        counts,
        error: store.error().map(str::to_string),
    }))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let party = current_party(&state, &headers).await?;
    fetch_visible(&state, &id, &party).await.map(Json)
}

// PATCH /api/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let party = current_party(&state, &headers).await?;
    if !party.is_partner() {
        return Err(AppError::Forbidden(
            "only the assigned partner can change a booking's status".to_string(),
        ));
    }

    // checked against the live record, not the cached list
    let mut booking = fetch_visible(&state, &id, &party).await?;
    if !booking.status.can_transition_to(body.status) {
        return Err(AppError::InvalidTransition {
            from: booking.status,
            to: body.status,
        });
    }

    let store = state.store(&party.id).await;
    store
        .lock()
        .await
        .update_status(state.backend.as_ref(), &id, body.status)
        .await
        .map_err(AppError::remote)?;

    booking.status = body.status;
    Ok(Json(booking))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let party = current_party(&state, &headers).await?;

    let mut booking = fetch_visible(&state, &id, &party).await?;
    if !booking.status.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::InvalidTransition {
            from: booking.status,
            to: BookingStatus::Cancelled,
        });
    }

    let store = state.store(&party.id).await;
    store
        .lock()
        .await
        .update_status(state.backend.as_ref(), &id, BookingStatus::Cancelled)
        .await
        .map_err(AppError::remote)?;

    booking.status = BookingStatus::Cancelled;
    tracing::info!(booking_id = %id, party_id = %party.id, "booking cancelled");

    notify::deliver(
        state.notifier.as_ref(),
        &notify::booking_cancelled(&booking, Utc::now()),
    )
    .await;

    Ok(Json(booking))
}

// POST /api/bookings/:id/review
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: Option<String>,
}

pub async fn review_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let party = current_party(&state, &headers).await?;
    if party.is_partner() {
        return Err(AppError::Forbidden(
            "only the customer can review a booking".to_string(),
        ));
    }

    let booking = fetch_visible(&state, &id, &party).await?;
    if booking.status != BookingStatus::Completed {
        return Err(AppError::Conflict(format!(
            "only completed bookings can be reviewed, this one is {}",
            booking.status
        )));
    }

    let review = Review::new(&booking, &party, body.rating, body.comment, Utc::now())
        .map_err(AppError::Validation)?;
    let created = state
        .backend
        .create_review(&review)
        .await
        .map_err(AppError::remote)?;

    tracing::info!(booking_id = %id, review_id = %created.id, rating = created.rating, "review submitted");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetches the live booking, hiding records the party is not a side of.
async fn fetch_visible(state: &AppState, id: &str, party: &Party) -> Result<Booking, AppError> {
    state
        .backend
        .get_booking(id)
        .await
        .map_err(AppError::remote)?
        .filter(|b| is_visible_to(b, party))
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

fn is_visible_to(booking: &Booking, party: &Party) -> bool {
    if party.is_partner() {
        booking.partner_id == party.id
    } else {
        booking.user_id == party.id
    }
}
