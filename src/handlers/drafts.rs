use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::current_party;
use crate::errors::AppError;
use crate::models::{Address, Booking, BookingDraft, PaymentMethod, ServiceOffer};
use crate::services::draft::{build_booking, Provider};
use crate::services::notify;
use crate::services::pricing::{calculate_total, PriceBreakdown};
use crate::state::AppState;

// POST /api/draft
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDraftRequest {
    pub service_id: String,
    pub service_name: String,
    pub price: Decimal,
    pub duration: String,
    /// Absolute discount. When absent it is resolved from the offer fields.
    pub discount: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub offer: Option<String>,
}

pub async fn start_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StartDraftRequest>,
) -> Result<(StatusCode, Json<BookingDraft>), AppError> {
    let party = current_party(&state, &headers).await?;

    let discount = body.discount.or_else(|| {
        let offer = ServiceOffer {
            price: body.price,
            original_price: body.original_price,
            discount: body.offer.clone(),
        };
        let amount = offer.discount_amount();
        (!amount.is_zero()).then_some(amount)
    });

    let slot = state.draft_slot(&party.id).await;
    let mut slot = slot.lock().await;
    let draft = slot.start(
        &body.service_id,
        &body.service_name,
        body.price,
        &body.duration,
        discount,
    );

    tracing::info!(party_id = %party.id, service_id = %body.service_id, "booking draft started");
    Ok((StatusCode::CREATED, Json(draft.clone())))
}

// PUT /api/draft/schedule
#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub date: NaiveDate,
    pub time: String,
}

pub async fn set_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ScheduleRequest>,
) -> Result<Json<Option<BookingDraft>>, AppError> {
    let party = current_party(&state, &headers).await?;

    let Some(slot) = state.existing_draft_slot(&party.id).await else {
        return Ok(Json(None));
    };
    let mut slot = slot.lock().await;
    slot.set_schedule(body.date, &body.time);

    Ok(Json(slot.get().cloned()))
}

// PUT /api/draft/address
#[derive(Deserialize)]
pub struct AddressRequest {
    pub address: Address,
    pub instructions: Option<String>,
}

pub async fn set_address(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Option<BookingDraft>>, AppError> {
    let party = current_party(&state, &headers).await?;
    body.address.validate().map_err(AppError::Validation)?;

    let instructions = body.instructions.filter(|s| !s.trim().is_empty());

    let Some(slot) = state.existing_draft_slot(&party.id).await else {
        return Ok(Json(None));
    };
    let mut slot = slot.lock().await;
    slot.set_address(body.address, instructions);

    Ok(Json(slot.get().cloned()))
}

// GET /api/draft
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<BookingDraft>>, AppError> {
    let party = current_party(&state, &headers).await?;

    let Some(slot) = state.existing_draft_slot(&party.id).await else {
        return Ok(Json(None));
    };
    let draft = slot.lock().await.get().cloned();
    Ok(Json(draft))
}

// DELETE /api/draft
pub async fn clear_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let party = current_party(&state, &headers).await?;

    if let Some(slot) = state.existing_draft_slot(&party.id).await {
        slot.lock().await.clear();
    }
    state.release_draft_slot(&party.id).await;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/draft/total
pub async fn draft_total(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PriceBreakdown>, AppError> {
    let party = current_party(&state, &headers).await?;

    let Some(slot) = state.existing_draft_slot(&party.id).await else {
        return Ok(Json(calculate_total(None)));
    };
    let slot = slot.lock().await;
    Ok(Json(calculate_total(slot.get())))
}

// POST /api/draft/submit
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub payment_method: PaymentMethod,
    pub partner_id: String,
    pub partner_name: String,
}

pub async fn submit_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let party = current_party(&state, &headers).await?;

    let no_draft = || AppError::NotFound("no booking in progress".to_string());
    let slot = state
        .existing_draft_slot(&party.id)
        .await
        .ok_or_else(no_draft)?;
    // held until the draft is cleared so a resubmit cannot book twice
    let mut slot = slot.lock().await;
    if slot.get().is_none() {
        return Err(no_draft());
    }

    let provider = Provider {
        id: body.partner_id,
        name: body.partner_name,
    };
    let now = Utc::now();
    let booking = slot
        .get()
        .and_then(|draft| build_booking(draft, &party, &provider, body.payment_method, now))
        .ok_or(AppError::IncompleteDraft)?;

    let created = state
        .backend
        .create_booking(&booking)
        .await
        .map_err(AppError::remote)?;

    tracing::info!(
        booking_id = %created.id,
        party_id = %party.id,
        amount = %created.amount,
        "booking created"
    );

    slot.clear();
    drop(slot);
    state.release_draft_slot(&party.id).await;

    notify::deliver(
        state.notifier.as_ref(),
        &notify::booking_created(&created, now),
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}
