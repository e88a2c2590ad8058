use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::current_party;
use crate::errors::AppError;
use crate::models::Notification;
use crate::services::notify::{is_addressed_to, newest_first, unread_count};
use crate::state::AppState;

// GET /api/notifications
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    notifications: Vec<Notification>,
    unread_count: usize,
}

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<InboxResponse>, AppError> {
    let party = current_party(&state, &headers).await?;

    let notifications = state
        .inbox
        .list_notifications(&party)
        .await
        .map_err(AppError::remote)?;
    let notifications = newest_first(notifications);

    Ok(Json(InboxResponse {
        unread_count: unread_count(&notifications),
        notifications,
    }))
}

// PATCH /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    let party = current_party(&state, &headers).await?;

    let mut notification = state
        .inbox
        .get_notification(&id)
        .await
        .map_err(AppError::remote)?
        .filter(|n| is_addressed_to(n, &party))
        .ok_or_else(|| AppError::NotFound(format!("notification {id}")))?;

    if !notification.is_read {
        state.inbox.mark_read(&id).await.map_err(AppError::remote)?;
        notification.is_read = true;
    }

    Ok(Json(notification))
}

// POST /api/notifications/read-all
#[derive(Serialize)]
pub struct MarkAllResponse {
    updated: usize,
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MarkAllResponse>, AppError> {
    let party = current_party(&state, &headers).await?;

    let unread: Vec<Notification> = state
        .inbox
        .list_notifications(&party)
        .await
        .map_err(AppError::remote)?
        .into_iter()
        .filter(|n| !n.is_read)
        .collect();

    for notification in &unread {
        state
            .inbox
            .mark_read(&notification.id)
            .await
            .map_err(AppError::remote)?;
    }

    tracing::debug!(party_id = %party.id, count = unread.len(), "notifications marked read");
    Ok(Json(MarkAllResponse {
        updated: unread.len(),
    }))
}
