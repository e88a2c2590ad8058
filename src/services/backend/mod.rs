pub mod rest;

use async_trait::async_trait;

use crate::models::{Booking, BookingStatus, Party, Review};

/// The remote booking collection.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Bookings visible to `party`: by `partnerId` for partners, by `userId` otherwise.
    async fn list_bookings(&self, party: &Party) -> anyhow::Result<Vec<Booking>>;
    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>>;
    async fn create_booking(&self, booking: &Booking) -> anyhow::Result<Booking>;
    async fn update_status(&self, id: &str, status: BookingStatus) -> anyhow::Result<()>;
    async fn create_review(&self, review: &Review) -> anyhow::Result<Review>;
}

/// Resolves a session token to the signed-in party.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_party(&self, token: &str) -> anyhow::Result<Option<Party>>;
}
