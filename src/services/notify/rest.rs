use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

use super::{NotificationInbox, NotificationSink};
use crate::models::{Notification, Party};
use crate::services::http_client;

/// Client for the backend's `/notifications` collection.
pub struct RestNotifications {
    base_url: String,
    client: reqwest::Client,
}

impl RestNotifications {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/notifications{}", self.base_url, path)
    }
}

#[async_trait]
impl NotificationSink for RestNotifications {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.client
            .post(self.url(""))
            .json(notification)
            .send()
            .await
            .context("failed to post notification")?
            .error_for_status()
            .context("notification backend returned error")?;

        Ok(())
    }
}

#[async_trait]
impl NotificationInbox for RestNotifications {
    async fn list_notifications(&self, party: &Party) -> anyhow::Result<Vec<Notification>> {
        let key = if party.is_partner() { "partnerId" } else { "userId" };

        self.client
            .get(self.url(""))
            .query(&[(key, party.id.as_str())])
            .send()
            .await
            .context("failed to fetch notifications")?
            .error_for_status()
            .context("notification backend returned error")?
            .json()
            .await
            .context("failed to parse notifications")
    }

    async fn get_notification(&self, id: &str) -> anyhow::Result<Option<Notification>> {
        let resp = self
            .client
            .get(self.url(&format!("/{id}")))
            .send()
            .await
            .context("failed to fetch notification")?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let notification = resp
            .error_for_status()
            .context("notification backend returned error")?
            .json()
            .await
            .context("failed to parse notification")?;
        Ok(Some(notification))
    }

    async fn mark_read(&self, id: &str) -> anyhow::Result<()> {
        self.client
            .patch(self.url(&format!("/{id}")))
            .json(&serde_json::json!({ "isRead": true }))
            .send()
            .await
            .context("failed to mark notification read")?
            .error_for_status()
            .context("notification backend returned error")?;

        Ok(())
    }
}
