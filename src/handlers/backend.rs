//! Embedded REST collection backend.
//!
//! Serves bookings, notifications, reviews and sessions the way a json-server mock
//! does: documents are opaque JSON keyed by `id`, filterable by owner.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::db::queries::{self, Collection, OwnerFilter};
use crate::errors::AppError;
use crate::models::Party;
use crate::state::BackendState;

pub fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/:id",
            get(get_booking).put(replace_booking).patch(patch_booking),
        )
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/:id",
            get(get_notification)
                .put(replace_notification)
                .patch(patch_notification),
        )
        .route("/userReviews", get(list_reviews).post(create_review))
        .route("/sessions/:token", get(get_session).put(put_session))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<String>,
    pub partner_id: Option<String>,
}

impl OwnerQuery {
    fn filter(self) -> Option<OwnerFilter> {
        match (self.user_id, self.partner_id) {
            (Some(user), _) => Some(OwnerFilter::User(user)),
            (None, Some(partner)) => Some(OwnerFilter::Partner(partner)),
            (None, None) => None,
        }
    }
}

fn list(
    state: &BackendState,
    collection: Collection,
    query: OwnerQuery,
) -> Result<Json<Vec<Value>>, AppError> {
    let filter = query.filter();
    let docs = queries::list_documents(&state.db(), collection, filter.as_ref())?;
    Ok(Json(docs))
}

fn create(
    state: &BackendState,
    collection: Collection,
    mut doc: Value,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Some(obj) = doc.as_object_mut() else {
        return Err(AppError::Validation("body must be a JSON object".to_string()));
    };

    let id = match obj.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = uuid::Uuid::new_v4().simple().to_string();
            obj.insert("id".to_string(), Value::String(id.clone()));
            id
        }
    };

    if !queries::insert_document(&state.db(), collection, &id, &doc)? {
        return Err(AppError::Validation(format!("duplicate id: {id}")));
    }

    tracing::debug!(collection = ?collection, id = %id, "document created");
    Ok((StatusCode::CREATED, Json(doc)))
}

fn fetch(state: &BackendState, collection: Collection, id: &str) -> Result<Json<Value>, AppError> {
    queries::get_document(&state.db(), collection, id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{collection:?} {id}")))
}

fn replace(
    state: &BackendState,
    collection: Collection,
    id: &str,
    doc: Value,
) -> Result<Json<Value>, AppError> {
    if !doc.is_object() {
        return Err(AppError::Validation("body must be a JSON object".to_string()));
    }

    queries::replace_document(&state.db(), collection, id, doc)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{collection:?} {id}")))
}

fn patch(
    state: &BackendState,
    collection: Collection,
    id: &str,
    patch: Value,
) -> Result<Json<Value>, AppError> {
    let Some(fields) = patch.as_object() else {
        return Err(AppError::Validation("body must be a JSON object".to_string()));
    };

    queries::patch_document(&state.db(), collection, id, fields)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{collection:?} {id}")))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, Collection::Bookings, query)
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<BackendState>>,
    Json(doc): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Collection::Bookings, doc)
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    fetch(&state, Collection::Bookings, &id)
}

// PUT /bookings/:id
pub async fn replace_booking(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Json(doc): Json<Value>,
) -> Result<Json<Value>, AppError> {
    replace(&state, Collection::Bookings, &id, doc)
}

// PATCH /bookings/:id
pub async fn patch_booking(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Json(fields): Json<Value>,
) -> Result<Json<Value>, AppError> {
    patch(&state, Collection::Bookings, &id, fields)
}

// GET /notifications
pub async fn list_notifications(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, Collection::Notifications, query)
}

// POST /notifications
pub async fn create_notification(
    State(state): State<Arc<BackendState>>,
    Json(doc): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Collection::Notifications, doc)
}

// GET /notifications/:id
pub async fn get_notification(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    fetch(&state, Collection::Notifications, &id)
}

// PUT /notifications/:id
pub async fn replace_notification(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Json(doc): Json<Value>,
) -> Result<Json<Value>, AppError> {
    replace(&state, Collection::Notifications, &id, doc)
}

// PATCH /notifications/:id
pub async fn patch_notification(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Json(fields): Json<Value>,
) -> Result<Json<Value>, AppError> {
    patch(&state, Collection::Notifications, &id, fields)
}

// GET /userReviews
pub async fn list_reviews(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, Collection::Reviews, query)
}

// POST /userReviews
pub async fn create_review(
    State(state): State<Arc<BackendState>>,
    Json(doc): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Collection::Reviews, doc)
}

// GET /sessions/:token
pub async fn get_session(
    State(state): State<Arc<BackendState>>,
    Path(token): Path<String>,
) -> Result<Json<Party>, AppError> {
    queries::get_session(&state.db(), &token)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("session".to_string()))
}

// PUT /sessions/:token
pub async fn put_session(
    State(state): State<Arc<BackendState>>,
    Path(token): Path<String>,
    Json(party): Json<Party>,
) -> Result<Json<Party>, AppError> {
    if party.id.trim().is_empty() {
        return Err(AppError::Validation("party id is required".to_string()));
    }

    queries::create_session(&state.db(), &token, &party)?;
    tracing::info!(party_id = %party.id, role = ?party.role, "session stored");
    Ok(Json(party))
}
