use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

use super::{BookingBackend, SessionProvider};
use crate::services::http_client;
use crate::models::{Booking, BookingStatus, Party, Review};

/// Client for a json-server style REST collection backend.
pub struct RestBackend {
    base_url: String,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BookingBackend for RestBackend {
    async fn list_bookings(&self, party: &Party) -> anyhow::Result<Vec<Booking>> {
        let key = if party.is_partner() { "partnerId" } else { "userId" };

        self.client
            .get(self.url("/bookings"))
            .query(&[(key, party.id.as_str())])
            .send()
            .await
            .context("failed to fetch bookings")?
            .error_for_status()
            .context("booking backend returned error")?
            .json()
            .await
            .context("failed to parse bookings")
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let resp = self
            .client
            .get(self.url(&format!("/bookings/{id}")))
            .send()
            .await
            .context("failed to fetch booking")?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let booking = resp
            .error_for_status()
            .context("booking backend returned error")?
            .json()
            .await
            .context("failed to parse booking")?;
        Ok(Some(booking))
    }

    async fn create_booking(&self, booking: &Booking) -> anyhow::Result<Booking> {
        self.client
            .post(self.url("/bookings"))
            .json(booking)
            .send()
            .await
            .context("failed to create booking")?
            .error_for_status()
            .context("booking backend returned error")?
            .json()
            .await
            .context("failed to parse created booking")
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> anyhow::Result<()> {
        self.client
            .patch(self.url(&format!("/bookings/{id}")))
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .context("failed to update booking status")?
            .error_for_status()
            .context("booking backend returned error")?;

        Ok(())
    }

    async fn create_review(&self, review: &Review) -> anyhow::Result<Review> {
        self.client
            .post(self.url("/userReviews"))
            .json(review)
            .send()
            .await
            .context("failed to post review")?
            .error_for_status()
            .context("review backend returned error")?
            .json()
            .await
            .context("failed to parse created review")
    }
}

#[async_trait]
impl SessionProvider for RestBackend {
    async fn current_party(&self, token: &str) -> anyhow::Result<Option<Party>> {
        let resp = self
            .client
            .get(self.url(&format!("/sessions/{token}")))
            .send()
            .await
            .context("failed to look up session")?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let party = resp
            .error_for_status()
            .context("session backend returned error")?
            .json()
            .await
            .context("failed to parse session")?;
        Ok(Some(party))
    }
}
