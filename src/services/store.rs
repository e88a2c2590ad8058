use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Booking, BookingStatus, Party, StatusFilter};
use crate::services::backend::BookingBackend;

/// The bookings visible to one party, with a status filter over them.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: Vec<Booking>,
    filter: StatusFilter,
    filtered: Vec<Booking>,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn filtered(&self) -> &[Booking] {
        &self.filtered
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    /// Error left by the most recent failed load or update, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the list with the party's bookings.
    ///
    /// On failure the previous list stays in place and the error is recorded.
    pub async fn load(&mut self, backend: &dyn BookingBackend, party: &Party) {
        match backend.list_bookings(party).await {
            Ok(bookings) => {
                tracing::debug!(party_id = %party.id, count = bookings.len(), "loaded bookings");
                self.bookings = bookings;
                self.error = None;
                self.refilter();
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), party_id = %party.id, "failed to load bookings");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.refilter();
    }

    /// Updates the remote record first; the local copy is patched only on success.
    pub async fn update_status(
        &mut self,
        backend: &dyn BookingBackend,
        id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<()> {
        if let Err(e) = backend.update_status(id, status).await {
            tracing::error!(error = %format!("{e:#}"), booking_id = %id, "failed to update booking status");
            self.error = Some(e.to_string());
            return Err(e);
        }

        if let Some(booking) = self.bookings.iter_mut().find(|b| b.id == id) {
            booking.status = status;
        }
        self.refilter();

        tracing::info!(booking_id = %id, status = %status, "booking status updated");
        Ok(())
    }

    pub fn counts(&self) -> StatusCounts {
        let mut by_status: BTreeMap<&'static str, usize> =
            BookingStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for booking in &self.bookings {
            *by_status.entry(booking.status.as_str()).or_default() += 1;
        }

        StatusCounts {
            all: self.bookings.len(),
            by_status,
        }
    }

    fn refilter(&mut self) {
        self.filtered = self
            .bookings
            .iter()
            .filter(|b| self.filter.matches(b))
            .cloned()
            .collect();
    }
}
