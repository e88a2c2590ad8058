pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Booking, Notification, Party};

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Read side of the notification collection.
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// Notifications addressed to `party`: by `partnerId` for partners, by `userId` otherwise.
    async fn list_notifications(&self, party: &Party) -> anyhow::Result<Vec<Notification>>;
    async fn get_notification(&self, id: &str) -> anyhow::Result<Option<Notification>>;
    async fn mark_read(&self, id: &str) -> anyhow::Result<()>;
}

pub fn is_addressed_to(notification: &Notification, party: &Party) -> bool {
    let recipient = if party.is_partner() {
        notification.partner_id.as_deref()
    } else {
        notification.user_id.as_deref()
    };
    recipient == Some(party.id.as_str())
}

/// Orders an inbox newest first.
pub fn newest_first(mut notifications: Vec<Notification>) -> Vec<Notification> {
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    notifications
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// Sends every notification, logging failures instead of returning them.
pub async fn deliver(sink: &dyn NotificationSink, notifications: &[Notification]) {
    for notification in notifications {
        if let Err(e) = sink.send(notification).await {
            tracing::warn!(
                error = %format!("{e:#}"),
                notification_id = %notification.id,
                "failed to deliver notification"
            );
        }
    }
}

fn notification_id(suffix: char) -> String {
    format!("NOT{}{suffix}", uuid::Uuid::new_v4().simple())
}

pub fn booking_created(booking: &Booking, now: DateTime<Utc>) -> [Notification; 2] {
    [
        Notification {
            id: notification_id('U'),
            user_id: Some(booking.user_id.clone()),
            partner_id: None,
            kind: "booking".to_string(),
            title: "Booking Confirmed".to_string(),
            message: format!(
                "Your booking for {} is confirmed for {}",
                booking.service_name, booking.date
            ),
            timestamp: now,
            is_read: false,
            action_route: Some("/user/bookings".to_string()),
            action_id: Some(booking.id.clone()),
        },
        Notification {
            id: notification_id('P'),
            user_id: None,
            partner_id: Some(booking.partner_id.clone()),
            kind: "booking".to_string(),
            title: "New Booking Received".to_string(),
            message: format!(
                "New booking for {} on {}",
                booking.service_name, booking.date
            ),
            timestamp: now,
            is_read: false,
            action_route: Some("/partner/bookings".to_string()),
            action_id: Some(booking.id.clone()),
        },
    ]
}

pub fn booking_cancelled(booking: &Booking, now: DateTime<Utc>) -> [Notification; 2] {
    let date = booking.date.format("%b %-d, %Y");
    [
        Notification {
            id: notification_id('U'),
            user_id: Some(booking.user_id.clone()),
            partner_id: None,
            kind: "booking".to_string(),
            title: "Booking Cancelled".to_string(),
            message: format!(
                "Your booking for {} on {date} has been cancelled.",
                booking.service_name
            ),
            timestamp: now,
            is_read: false,
            action_route: None,
            action_id: Some(booking.id.clone()),
        },
        Notification {
            id: notification_id('P'),
            user_id: None,
            partner_id: Some(booking.partner_id.clone()),
            kind: "booking".to_string(),
            title: "Booking Cancelled".to_string(),
            message: format!(
                "Booking for {} on {date} has been cancelled by the user.",
                booking.service_name
            ),
            timestamp: now,
            is_read: false,
            action_route: None,
            action_id: Some(booking.id.clone()),
        },
    ]
}
